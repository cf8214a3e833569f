// Runtime configuration
// Values come from the environment, optionally seeded from a .env file

use std::time::Duration;

use crate::domain::errors::{StatusError, StatusResult};
use crate::domain::status::AgentId;

/// Default long-poll bound when `LONG_POLL_TIMEOUT_SECS` is unset
pub const DEFAULT_LONG_POLL_TIMEOUT: Duration = Duration::from_secs(10);

/// Default agent driven by the demo binary
pub const DEFAULT_DEMO_AGENT_ID: AgentId = AgentId::new(42);

/// Settings loaded at startup
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// How long `agent_status` waits for a change before timing out
    pub long_poll_timeout: Duration,
    /// Agent whose call the demo binary simulates
    pub demo_agent_id: AgentId,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            long_poll_timeout: DEFAULT_LONG_POLL_TIMEOUT,
            demo_agent_id: DEFAULT_DEMO_AGENT_ID,
        }
    }
}

impl Settings {
    /// Load settings from process environment variables
    ///
    /// Invalid values are logged and replaced by their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let long_poll_timeout = match lookup("LONG_POLL_TIMEOUT_SECS") {
            Some(raw) => parse_timeout(&raw).unwrap_or_else(|e| {
                tracing::warn!("{}, using default {:?}", e, defaults.long_poll_timeout);
                defaults.long_poll_timeout
            }),
            None => defaults.long_poll_timeout,
        };

        let demo_agent_id = match lookup("DEMO_AGENT_ID") {
            Some(raw) => parse_agent_id(&raw).unwrap_or_else(|e| {
                tracing::warn!("{}, using default {}", e, defaults.demo_agent_id);
                defaults.demo_agent_id
            }),
            None => defaults.demo_agent_id,
        };

        Self {
            long_poll_timeout,
            demo_agent_id,
        }
    }
}

/// Parses a positive number of seconds, fractions allowed
fn parse_timeout(raw: &str) -> StatusResult<Duration> {
    let secs: f64 = raw.trim().parse().map_err(|_| {
        StatusError::Config(format!("LONG_POLL_TIMEOUT_SECS is not a number: {:?}", raw))
    })?;

    if !secs.is_finite() || secs <= 0.0 {
        return Err(StatusError::Config(format!(
            "LONG_POLL_TIMEOUT_SECS must be positive: {}",
            secs
        )));
    }

    Ok(Duration::from_secs_f64(secs))
}

fn parse_agent_id(raw: &str) -> StatusResult<AgentId> {
    raw.trim()
        .parse::<i64>()
        .map(AgentId::new)
        .map_err(|_| StatusError::Config(format!("DEMO_AGENT_ID is not an integer: {:?}", raw)))
}
