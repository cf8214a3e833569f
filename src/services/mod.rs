// Application services
// Entry points for the request dispatcher; they coordinate domain types and ports

pub mod call_control;

pub use call_control::CallControl;
