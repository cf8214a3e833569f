// Agent status domain module
// Contains the status value type, its value objects, and transition events

pub mod agent_status;
pub mod events;
pub mod value_objects;

// Re-export main types for convenience
pub use agent_status::{AgentStatus, CallInfo};
pub use events::StatusEvent;
pub use value_objects::{AgentId, CallStatus};
