//! Agent Status Core
//!
//! Live call status for agents, with a long-poll primitive that blocks until
//! an agent's status changes. Includes the domain model, the in-memory status
//! store, and the call-control operations a request dispatcher calls into.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod services;
