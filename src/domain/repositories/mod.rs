// Repository and store traits (ports)
// Implemented by adapters in the infrastructure layer

pub mod contact_repository;
pub mod status_store;

pub use contact_repository::ContactRepository;
pub use status_store::{StatusStore, StatusUpdate};
