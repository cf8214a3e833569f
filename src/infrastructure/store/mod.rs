// Agent status store adapters

pub mod in_memory_status_store;

pub use in_memory_status_store::InMemoryStatusStore;
