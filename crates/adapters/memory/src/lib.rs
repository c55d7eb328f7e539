//! # restpub-adapter-memory
//!
//! In-memory implementation of the [`Collection`] port.
//!
//! Stands in for the host platform's method-handler-backed collections: each
//! mutation runs an optional **guard** first, the moral equivalent of the
//! authorization a real method handler performs against the caller context.
//! A guard that returns a [`MethodError`] aborts the operation and its
//! status/message pass through to the HTTP response untouched.
//!
//! Documents are kept in a `BTreeMap` keyed by `_id`, so read functions see
//! a deterministic order.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use restpub_app::ports::{Collection, ReadFn};
use restpub_app::scope::CallContext;
use restpub_domain::document::Document;
use restpub_domain::error::MethodError;
use restpub_domain::id::DocumentId;

/// Authorization hook run before a mutation.
///
/// Receives the caller context and, for inserts and updates, the incoming
/// payload; for removals, the stored document (or an empty one when the id
/// is unknown).
pub type Guard = Box<dyn Fn(&CallContext, &Document) -> Result<(), MethodError> + Send + Sync>;

/// A named in-memory document collection.
pub struct MemoryCollection {
    name: String,
    docs: Mutex<BTreeMap<String, Document>>,
    insert_guard: Option<Guard>,
    update_guard: Option<Guard>,
    remove_guard: Option<Guard>,
}

impl MemoryCollection {
    /// Create an empty collection.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            docs: Mutex::new(BTreeMap::new()),
            insert_guard: None,
            update_guard: None,
            remove_guard: None,
        }
    }

    /// Install a guard consulted before every insert.
    #[must_use]
    pub fn with_insert_guard(mut self, guard: Guard) -> Self {
        self.insert_guard = Some(guard);
        self
    }

    /// Install a guard consulted before every update.
    #[must_use]
    pub fn with_update_guard(mut self, guard: Guard) -> Self {
        self.update_guard = Some(guard);
        self
    }

    /// Install a guard consulted before every removal.
    #[must_use]
    pub fn with_remove_guard(mut self, guard: Guard) -> Self {
        self.remove_guard = Some(guard);
        self
    }

    /// Snapshot of every stored document, ordered by id.
    #[must_use]
    pub fn all(&self) -> Vec<Document> {
        self.lock().values().cloned().collect()
    }

    /// Read function publishing the whole collection to every caller.
    #[must_use]
    pub fn read_all(collection: &Arc<Self>) -> ReadFn {
        let collection = Arc::clone(collection);
        Arc::new(move |_scope| Some(Box::new(collection.all())))
    }

    /// Read function publishing only the documents `filter` accepts for the
    /// current scope.
    pub fn read_filtered<F>(collection: &Arc<Self>, filter: F) -> ReadFn
    where
        F: Fn(&restpub_app::scope::PublishScope, &Document) -> bool + Send + Sync + 'static,
    {
        let collection = Arc::clone(collection);
        Arc::new(move |scope| {
            let docs: Vec<Document> = collection
                .all()
                .into_iter()
                .filter(|doc| filter(scope, doc))
                .collect();
            Some(Box::new(docs))
        })
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Document>> {
        self.docs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(guard: Option<&Guard>, ctx: &CallContext, doc: &Document) -> Result<(), MethodError> {
        match guard {
            Some(guard) => guard(ctx, doc),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert(&self, ctx: &CallContext, doc: Document) -> Result<(), MethodError> {
        Self::check(self.insert_guard.as_ref(), ctx, &doc)?;
        let Some(id) = doc.id() else {
            return Err(MethodError::new(400, "Document is missing an _id"));
        };
        self.lock().insert(id.to_string(), doc);
        Ok(())
    }

    async fn update(
        &self,
        ctx: &CallContext,
        id: &DocumentId,
        changes: Document,
    ) -> Result<(), MethodError> {
        Self::check(self.update_guard.as_ref(), ctx, &changes)?;
        // Updating an unknown id matches zero documents and succeeds.
        if let Some(doc) = self.lock().get_mut(id.as_str()) {
            doc.merge(changes);
        }
        Ok(())
    }

    async fn remove(&self, ctx: &CallContext, id: &DocumentId) -> Result<(), MethodError> {
        let existing = self.lock().get(id.as_str()).cloned().unwrap_or_default();
        Self::check(self.remove_guard.as_ref(), ctx, &existing)?;
        self.lock().remove(id.as_str());
        Ok(())
    }

    async fn find_one(&self, id: &DocumentId) -> Option<Document> {
        self.lock().get(id.as_str()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        Document::from_value(value).unwrap()
    }

    fn ctx(user: Option<&str>) -> CallContext {
        CallContext {
            user_id: user.map(ToString::to_string),
        }
    }

    #[tokio::test]
    async fn should_insert_and_find_documents() {
        let collection = MemoryCollection::new("notes");
        collection
            .insert(&ctx(None), doc(json!({"_id": "a", "text": "hello"})))
            .await
            .unwrap();

        let found = collection.find_one(&DocumentId::from("a")).await.unwrap();
        assert_eq!(found.get("text"), Some(&json!("hello")));
    }

    #[tokio::test]
    async fn should_reject_insert_without_id() {
        let collection = MemoryCollection::new("notes");
        let result = collection.insert(&ctx(None), doc(json!({"text": "x"}))).await;
        assert_eq!(result.unwrap_err().status, Some(400));
    }

    #[tokio::test]
    async fn should_merge_updates_into_existing_document() {
        let collection = MemoryCollection::new("notes");
        collection
            .insert(&ctx(None), doc(json!({"_id": "a", "text": "old", "kept": 1})))
            .await
            .unwrap();
        collection
            .update(
                &ctx(None),
                &DocumentId::from("a"),
                doc(json!({"text": "UPDATED"})),
            )
            .await
            .unwrap();

        let found = collection.find_one(&DocumentId::from("a")).await.unwrap();
        assert_eq!(found.get("text"), Some(&json!("UPDATED")));
        assert_eq!(found.get("kept"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn should_treat_update_of_unknown_id_as_matching_zero_documents() {
        let collection = MemoryCollection::new("notes");
        let result = collection
            .update(&ctx(None), &DocumentId::from("nope"), doc(json!({"x": 1})))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn should_remove_documents() {
        let collection = MemoryCollection::new("notes");
        collection
            .insert(&ctx(None), doc(json!({"_id": "a"})))
            .await
            .unwrap();
        collection
            .remove(&ctx(None), &DocumentId::from("a"))
            .await
            .unwrap();
        assert!(collection.find_one(&DocumentId::from("a")).await.is_none());
    }

    #[tokio::test]
    async fn should_let_guards_deny_operations_with_their_own_status() {
        let collection = MemoryCollection::new("notes").with_insert_guard(Box::new(|ctx, _doc| {
            if ctx.user_id.is_some() {
                Ok(())
            } else {
                Err(MethodError::new(403, "Access denied"))
            }
        }));

        let denied = collection
            .insert(&ctx(None), doc(json!({"_id": "a"})))
            .await
            .unwrap_err();
        assert_eq!(denied.status, Some(403));
        assert_eq!(denied.message, "Access denied");

        collection
            .insert(&ctx(Some("user-1")), doc(json!({"_id": "a"})))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn should_hand_existing_document_to_remove_guards() {
        let collection = MemoryCollection::new("notes").with_remove_guard(Box::new(|ctx, doc| {
            let owner = doc.get("owner").and_then(serde_json::Value::as_str);
            if owner == ctx.user_id.as_deref() {
                Ok(())
            } else {
                Err(MethodError::new(403, "Not the owner"))
            }
        }));
        collection
            .insert(&ctx(None), doc(json!({"_id": "a", "owner": "user-1"})))
            .await
            .unwrap();

        let denied = collection
            .remove(&ctx(Some("intruder")), &DocumentId::from("a"))
            .await
            .unwrap_err();
        assert_eq!(denied.message, "Not the owner");

        collection
            .remove(&ctx(Some("user-1")), &DocumentId::from("a"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn should_order_snapshots_by_id() {
        let collection = MemoryCollection::new("notes");
        for id in ["c", "a", "b"] {
            collection
                .insert(&ctx(None), doc(json!({"_id": id})))
                .await
                .unwrap();
        }
        let ids: Vec<String> = collection
            .all()
            .into_iter()
            .map(|d| d.id().unwrap().to_string())
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn should_filter_reads_per_scope() {
        let collection = Arc::new(MemoryCollection::new("notes"));
        collection
            .insert(&ctx(None), doc(json!({"_id": "mine", "owner": "user-1"})))
            .await
            .unwrap();
        collection
            .insert(&ctx(None), doc(json!({"_id": "theirs", "owner": "user-2"})))
            .await
            .unwrap();

        let read = MemoryCollection::read_filtered(&collection, |scope, doc| {
            doc.get("owner").and_then(serde_json::Value::as_str) == scope.user_id.as_deref()
        });

        let scope = restpub_app::scope::PublishScope {
            user_id: Some("user-1".to_string()),
            ..Default::default()
        };
        let docs = read(&scope).unwrap().fetch();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id().unwrap().as_str(), "mine");
    }
}
