use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::domain::errors::{StatusError, StatusResult};
use crate::domain::repositories::{StatusStore, StatusUpdate};
use crate::domain::status::{AgentId, AgentStatus};

/// One suspended caller waiting for the next status of an agent
struct Waiter {
    id: u64,
    tx: oneshot::Sender<AgentStatus>,
}

/// Everything guarded by the store lock
///
/// `latest` and `waiters` live under the same mutex so that a long-poll's
/// compare-and-register can never interleave with a write.
#[derive(Default)]
struct StoreState {
    latest: HashMap<AgentId, AgentStatus>,
    waiters: HashMap<AgentId, Vec<Waiter>>,
}

impl StoreState {
    /// Current status, inserting the idle default on first reference
    fn current(&mut self, agent_id: AgentId) -> &AgentStatus {
        self.latest.entry(agent_id).or_default()
    }

    /// Commit `status` and resolve every pending waiter for the agent
    ///
    /// Returns how many waiters actually received the status. Waiters whose
    /// receiving side is already gone are skipped.
    fn publish(&mut self, agent_id: AgentId, status: AgentStatus) -> usize {
        let waiters = self.waiters.remove(&agent_id).unwrap_or_default();
        let woken = waiters
            .into_iter()
            .map(|waiter| waiter.tx.send(status.clone()).is_ok())
            .filter(|delivered| *delivered)
            .count();
        self.latest.insert(agent_id, status);
        woken
    }

    /// Remove a waiter that is still pending; the list goes away once empty
    fn detach(&mut self, agent_id: AgentId, waiter_id: u64) -> bool {
        let Some(waiters) = self.waiters.get_mut(&agent_id) else {
            return false;
        };

        let before = waiters.len();
        waiters.retain(|waiter| waiter.id != waiter_id);
        let removed = waiters.len() != before;

        if waiters.is_empty() {
            self.waiters.remove(&agent_id);
        }
        removed
    }
}

/// Registration of a long-poll in the waiter list
///
/// Detaches itself when dropped, which covers timeouts as well as callers
/// that give up on the future (e.g. a disconnected client).
struct PendingWait<'a> {
    state: &'a Mutex<StoreState>,
    agent_id: AgentId,
    waiter_id: u64,
}

impl PendingWait<'_> {
    /// Finish a wait whose timer fired
    ///
    /// Detaches first; a status a writer delivered before the detach still
    /// wins over the timeout.
    fn expire(
        self,
        mut rx: oneshot::Receiver<AgentStatus>,
        timeout: Duration,
    ) -> StatusResult<AgentStatus> {
        drop(self);
        rx.try_recv().map_err(|_| StatusError::Timeout(timeout))
    }
}

impl Drop for PendingWait<'_> {
    fn drop(&mut self) {
        if self.state.lock().detach(self.agent_id, self.waiter_id) {
            tracing::debug!(agent_id = %self.agent_id, waiter_id = self.waiter_id, "Detached status waiter");
        }
    }
}

/// In-memory implementation of StatusStore
///
/// Holds the latest status of every agent seen so far plus the pending
/// long-polls for each agent. Created once and shared (behind an `Arc`) by
/// everything that reads or writes agent status; nothing is persisted.
pub struct InMemoryStatusStore {
    state: Mutex<StoreState>,
    next_waiter_id: AtomicU64,
}

impl InMemoryStatusStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            next_waiter_id: AtomicU64::new(1),
        }
    }

    /// Number of long-polls currently suspended on `agent_id`
    pub fn pending_waiters(&self, agent_id: AgentId) -> usize {
        self.state
            .lock()
            .waiters
            .get(&agent_id)
            .map_or(0, Vec::len)
    }

    /// Number of agents that have a recorded status
    pub fn known_agents(&self) -> usize {
        self.state.lock().latest.len()
    }
}

impl Default for InMemoryStatusStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusStore for InMemoryStatusStore {
    async fn set_status(&self, agent_id: AgentId, status: AgentStatus) {
        let woken = self.state.lock().publish(agent_id, status);
        tracing::debug!(agent_id = %agent_id, woken, "Status set");
    }

    async fn update_status(
        &self,
        agent_id: AgentId,
        update: StatusUpdate,
    ) -> StatusResult<AgentStatus> {
        let mut state = self.state.lock();
        let next = update(state.current(agent_id))?;
        let woken = state.publish(agent_id, next.clone());
        drop(state);

        tracing::debug!(agent_id = %agent_id, woken, "Status updated");
        Ok(next)
    }

    async fn get_status(&self, agent_id: AgentId) -> AgentStatus {
        self.state.lock().current(agent_id).clone()
    }

    async fn await_status_change(
        &self,
        agent_id: AgentId,
        known: &AgentStatus,
        timeout: Duration,
    ) -> StatusResult<AgentStatus> {
        let (pending, mut rx) = {
            let mut state = self.state.lock();
            let current = state.current(agent_id);
            if current != known {
                return Ok(current.clone());
            }

            let waiter_id = self.next_waiter_id.fetch_add(1, Ordering::Relaxed);
            let (tx, rx) = oneshot::channel();
            state
                .waiters
                .entry(agent_id)
                .or_default()
                .push(Waiter { id: waiter_id, tx });

            let pending = PendingWait {
                state: &self.state,
                agent_id,
                waiter_id,
            };
            (pending, rx)
        };
        tracing::debug!(agent_id = %agent_id, waiter_id = pending.waiter_id, ?timeout, "Waiting for status change");

        let outcome = tokio::time::timeout(timeout, &mut rx).await;
        match outcome {
            Ok(Ok(status)) => Ok(status),
            // The sender is only ever dropped after sending or by our own detach.
            Ok(Err(_)) => Err(StatusError::Timeout(timeout)),
            Err(_) => pending.expire(rx, timeout),
        }
    }
}
