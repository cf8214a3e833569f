use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::contact::Contact;

/// Repository trait for the contact directory
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Find a contact by its uuid
    async fn find_by_uuid(&self, uuid: Uuid) -> Option<Contact>;

    /// Find contacts whose name or phone starts with `prefix`, in directory order
    async fn search(&self, prefix: &str, max_results: usize) -> Vec<Contact>;

    /// Most recently dialed contacts
    async fn recent(&self, max_results: usize) -> Vec<Contact>;
}
