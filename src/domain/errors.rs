use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use super::status::AgentId;

/// Errors that can occur in the agent status system
///
/// Only [`StatusError::Timeout`] comes out of a long-poll; it is an expected
/// "no update" outcome rather than a fault.
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("No status change within {0:?}")]
    Timeout(Duration),

    #[error("Agent {0} has no active call")]
    NoActiveCall(AgentId),

    #[error("Contact not found: {0}")]
    ContactNotFound(Uuid),

    #[error("Invalid agent status: {0}")]
    InvalidStatus(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StatusError {
    /// Returns true when a long-poll ended without observing a change
    pub fn is_timeout(&self) -> bool {
        matches!(self, StatusError::Timeout(_))
    }
}

pub type StatusResult<T> = Result<T, StatusError>;
