use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Entry in the contact directory that agents can dial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub uuid: Uuid,
    pub name: String,
    pub phone: String,
}

impl Contact {
    /// Creates a contact with a freshly generated uuid
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            phone: phone.into(),
        }
    }

    /// Checks whether this contact matches a search prefix
    ///
    /// The name is compared case-insensitively; the phone number is compared
    /// as-is.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.name.to_lowercase().starts_with(&prefix.to_lowercase())
            || self.phone.starts_with(prefix)
    }
}
