//! Collection port — the data collection the bridge mounts as a rest point.
//!
//! The mutation operations are the pre-existing method handlers of the host
//! platform: each one receives the caller context and performs its own
//! authorization and validation. The bridge never inspects or relaxes that;
//! it only passes the true caller through and maps the outcome onto HTTP.

use async_trait::async_trait;

use restpub_domain::document::Document;
use restpub_domain::error::MethodError;
use restpub_domain::id::DocumentId;

use crate::scope::CallContext;

/// A named document collection with authorization-carrying operations.
#[async_trait]
pub trait Collection: Send + Sync {
    /// Unique identifier of the collection; the resource name is derived
    /// from it.
    fn name(&self) -> &str;

    /// Insert `doc` on behalf of the caller.
    async fn insert(&self, ctx: &CallContext, doc: Document) -> Result<(), MethodError>;

    /// Apply `changes` to the document with id `id` on behalf of the caller.
    async fn update(
        &self,
        ctx: &CallContext,
        id: &DocumentId,
        changes: Document,
    ) -> Result<(), MethodError>;

    /// Remove the document with id `id` on behalf of the caller.
    async fn remove(&self, ctx: &CallContext, id: &DocumentId) -> Result<(), MethodError>;

    /// Direct point lookup by id, bypassing any caller-specific view.
    ///
    /// Used only to distinguish "exists but not visible to the caller"
    /// (HTTP 401) from "does not exist" (HTTP 404).
    async fn find_one(&self, id: &DocumentId) -> Option<Document>;
}
