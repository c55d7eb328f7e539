//! Document — the schemaless JSON record the bridge moves around.
//!
//! A document is a JSON object whose optional `_id` field is a string. The
//! bridge never interprets any other field; it only ensures an `_id` exists
//! before an insert and compares it during item lookups.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::DocumentId;

/// Field carrying the document identifier.
pub const ID_FIELD: &str = "_id";

/// A schemaless JSON object record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value, returning `None` unless it is an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// The document identifier, when `_id` is present and a string.
    #[must_use]
    pub fn id(&self) -> Option<DocumentId> {
        self.0
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .map(DocumentId::from)
    }

    /// Set the `_id` field, replacing any previous value.
    pub fn set_id(&mut self, id: &DocumentId) {
        self.0
            .insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    }

    /// Return the existing `_id`, generating and storing a random one when
    /// the document lacks it.
    pub fn ensure_id(&mut self) -> DocumentId {
        if let Some(id) = self.id() {
            return id;
        }
        let id = DocumentId::random();
        self.set_id(&id);
        id
    }

    /// Read a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Write a field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Merge every field of `changes` into this document, keeping `_id`.
    pub fn merge(&mut self, changes: Document) {
        for (key, value) in changes.0 {
            if key != ID_FIELD {
                self.0.insert(key, value);
            }
        }
    }

    /// Consume the document into a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        doc.into_value()
    }
}
