use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::contact::Contact;
use crate::domain::repositories::ContactRepository;

/// In-memory implementation of ContactRepository
///
/// The directory is fixed at construction. Recently dialed contacts are a
/// separate ordered list, most recent first.
pub struct InMemoryContactRepository {
    contacts: Vec<Contact>,
    recent: Vec<Contact>,
}

impl InMemoryContactRepository {
    /// Creates a repository over the given directory
    ///
    /// # Arguments
    /// * `contacts` - The full directory, in search order
    /// * `recent_count` - How many leading directory entries count as recently dialed
    pub fn new(contacts: Vec<Contact>, recent_count: usize) -> Self {
        let recent = contacts.iter().take(recent_count).cloned().collect();
        Self { contacts, recent }
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn find_by_uuid(&self, uuid: Uuid) -> Option<Contact> {
        self.contacts.iter().find(|c| c.uuid == uuid).cloned()
    }

    async fn search(&self, prefix: &str, max_results: usize) -> Vec<Contact> {
        self.contacts
            .iter()
            .filter(|c| c.matches_prefix(prefix))
            .take(max_results)
            .cloned()
            .collect()
    }

    async fn recent(&self, max_results: usize) -> Vec<Contact> {
        self.recent.iter().take(max_results).cloned().collect()
    }
}
