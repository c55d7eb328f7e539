//! Document identifier — an opaque string key.
//!
//! Clients may supply their own `_id` values, so the type never parses or
//! validates its contents beyond emptiness checks. Server-generated ids are
//! random UUIDs rendered without hyphens.

use std::fmt;

use serde::{Deserialize, Serialize};

/// String key identifying a [`Document`](crate::document::Document).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Access the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_generate_unique_ids_when_called_twice() {
        let a = DocumentId::random();
        let b = DocumentId::random();
        assert_ne!(a, b);
    }

    #[test]
    fn should_keep_client_supplied_ids_verbatim() {
        let id = DocumentId::from("nonExistingId");
        assert_eq!(id.as_str(), "nonExistingId");
    }

    #[test]
    fn should_serialize_as_a_plain_json_string() {
        let id = DocumentId::from("abc123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc123\"");
        let parsed: DocumentId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn should_report_empty_for_empty_string() {
        assert!(DocumentId::from("").is_empty());
        assert!(!DocumentId::random().is_empty());
    }
}
