use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an agent whose call status is tracked
///
/// Agents are not pre-registered; any integer is a valid identifier.
///
/// # Example
/// ```
/// use agent_status_core::domain::status::AgentId;
///
/// let agent = AgentId::new(42);
/// assert_eq!(agent.value(), 42);
/// assert_eq!(agent.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(i64);

impl AgentId {
    /// Wraps a raw agent identifier
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for AgentId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether an agent is currently on a call
///
/// # Status Transitions
/// ```text
/// NotInConversation --originate--> InConversation
/// InConversation --hangup/redirect--> NotInConversation
/// InConversation --mute/hold--> InConversation
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallStatus {
    /// Agent has an active call
    InConversation,
    /// Agent is idle
    #[default]
    NotInConversation,
}

impl CallStatus {
    /// Returns true when a call is active
    pub fn is_in_conversation(&self) -> bool {
        matches!(self, CallStatus::InConversation)
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallStatus::InConversation => write!(f, "IN_CONVERSATION"),
            CallStatus::NotInConversation => write!(f, "NOT_IN_CONVERSATION"),
        }
    }
}
