use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::StatusResult;
use crate::domain::status::{AgentId, AgentStatus};

/// Fallible read-modify-write applied to an agent's current status
pub type StatusUpdate = Box<dyn FnOnce(&AgentStatus) -> StatusResult<AgentStatus> + Send>;

/// Single in-process authority for live agent status
///
/// Implementations must serialize the compare-and-register step of
/// [`await_status_change`](StatusStore::await_status_change) against writers,
/// so that no update can slip in between a waiter's check and its
/// registration.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Replace an agent's status and wake everyone waiting on that agent
    async fn set_status(&self, agent_id: AgentId, status: AgentStatus);

    /// Apply `update` to the current status and commit the result as
    /// [`set_status`](StatusStore::set_status) would, atomically
    ///
    /// A rejected update leaves the status and its waiters untouched.
    async fn update_status(
        &self,
        agent_id: AgentId,
        update: StatusUpdate,
    ) -> StatusResult<AgentStatus>;

    /// Snapshot of an agent's status, defaulting to idle for unseen agents
    async fn get_status(&self, agent_id: AgentId) -> AgentStatus;

    /// Long-poll for the next status that differs from `known`
    ///
    /// # Returns
    /// * `Ok(AgentStatus)` - Immediately if `known` is stale, otherwise the
    ///   status delivered by the next write for this agent
    /// * `Err(StatusError::Timeout)` - If no write arrived within `timeout`
    async fn await_status_change(
        &self,
        agent_id: AgentId,
        known: &AgentStatus,
        timeout: Duration,
    ) -> StatusResult<AgentStatus>;
}
