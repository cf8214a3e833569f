use serde::Serialize;

use super::value_objects::AgentId;

/// Domain events produced by call-control transitions
///
/// Every transition commits a new [`AgentStatus`](super::AgentStatus) to the
/// store and reports what happened as one of these events.
///
/// # Example
/// ```
/// use agent_status_core::domain::status::{AgentId, StatusEvent};
///
/// let event = StatusEvent::MuteChanged {
///     agent_id: AgentId::new(42),
///     is_mute: true,
/// };
/// assert_eq!(event.agent_id(), AgentId::new(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StatusEvent {
    /// Fired when an agent starts a call
    CallStarted {
        agent_id: AgentId,
        /// Identifier generated for the new call
        call_id: String,
        contact_phone: String,
    },
    /// Fired when a call is hung up or redirected
    CallEnded {
        agent_id: AgentId,
        /// Target number when the call was redirected
        redirected_to: Option<String>,
    },
    /// Fired when the microphone is muted or unmuted
    MuteChanged { agent_id: AgentId, is_mute: bool },
    /// Fired when the call is put on or taken off hold
    HoldChanged { agent_id: AgentId, is_hold: bool },
}

impl StatusEvent {
    /// Returns the agent this event concerns
    pub fn agent_id(&self) -> AgentId {
        match self {
            StatusEvent::CallStarted { agent_id, .. } => *agent_id,
            StatusEvent::CallEnded { agent_id, .. } => *agent_id,
            StatusEvent::MuteChanged { agent_id, .. } => *agent_id,
            StatusEvent::HoldChanged { agent_id, .. } => *agent_id,
        }
    }
}
