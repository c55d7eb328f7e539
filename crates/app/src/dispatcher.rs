//! Method dispatcher — maps REST verbs onto read functions and collection
//! operations.
//!
//! Every handler is state-free per invocation. HTTP semantics travel through
//! the internal [`Outcome`] variant instead of errors-as-control-flow and are
//! mapped to status codes at the outer boundary, where the negotiated format
//! handler serializes both successes and error bodies.

use std::sync::Arc;

use serde_json::{Value, json};

use restpub_domain::document::Document;
use restpub_domain::error::MethodError;
use restpub_domain::id::DocumentId;

use crate::format::{FormatRegistry, RestResponse};
use crate::ports::{Collection, ReadFn};
use crate::scope::PublishScope;

const MISSING_ID: &str = "Method expected a document id";
const MISSING_DOCUMENT: &str = "Method expected a document";

/// HTTP verbs the bridge can wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    /// Parse an HTTP method name, case-insensitively.
    #[must_use]
    pub fn parse(method: &str) -> Option<Self> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// Which of a resource's two routes a request matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteKind {
    /// The collection path (`/prefix/name`).
    Base,
    /// The item path (`/prefix/name/:id`); the id segment may be empty.
    Item {
        /// Raw `:id` path parameter.
        id: String,
    },
}

/// Internal dispatch outcome, mapped to a status code at the boundary.
enum Outcome {
    Ok(Value),
    BadRequest(&'static str),
    Unauthorized,
    NotFound(String),
    Failed(MethodError),
}

/// A published resource: the optional collection handle plus the optional
/// read function, under a derived base path.
pub struct RestResource {
    name: String,
    collection: Option<Arc<dyn Collection>>,
    read: Option<ReadFn>,
}

impl RestResource {
    pub(crate) fn new(
        name: String,
        collection: Option<Arc<dyn Collection>>,
        read: Option<ReadFn>,
    ) -> Self {
        Self {
            name,
            collection,
            read,
        }
    }

    /// Base path the resource is mounted on.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the item path (`…/:id`) exists for this resource.
    ///
    /// It only does when a collection was published; a name-only rest point
    /// never registers an item route, not even a 404-generating one.
    #[must_use]
    pub fn has_item_route(&self) -> bool {
        self.collection.is_some()
    }

    /// Handle one request against this resource.
    ///
    /// Returns `None` when the verb is not wired for the matched route, so
    /// the host routing layer can answer with its own unmatched-method
    /// response.
    pub async fn dispatch(
        &self,
        verb: Verb,
        route: RouteKind,
        scope: &PublishScope,
        body: Value,
        formats: &FormatRegistry,
    ) -> Option<RestResponse> {
        let outcome = match (verb, route) {
            (Verb::Get, RouteKind::Base) => self.list(scope)?,
            (Verb::Get, RouteKind::Item { id }) => self.read_one(scope, &id).await?,
            (Verb::Post, RouteKind::Base) => self.create(scope, body).await?,
            (Verb::Put, RouteKind::Item { id }) => self.update(scope, &id, body).await?,
            (Verb::Delete, RouteKind::Item { id }) => self.delete(scope, &id).await?,
            _ => return None,
        };
        Some(respond(outcome, scope, formats))
    }

    /// `GET /prefix/name` — materialize the caller's published set.
    fn list(&self, scope: &PublishScope) -> Option<Outcome> {
        let read = self.read.as_ref()?;
        // "No results" is not an error: a read function returning nothing
        // that behaves like a result set means an empty list, status 200.
        let docs = read(scope).map_or_else(Vec::new, |set| set.fetch());
        let records = docs.into_iter().map(Document::into_value).collect();
        Some(Outcome::Ok(Value::Array(records)))
    }

    /// `GET /prefix/name/:id` — scan the published set, then disambiguate
    /// "not visible" from "not there" with a direct existence check.
    async fn read_one(&self, scope: &PublishScope, id: &str) -> Option<Outcome> {
        let read = self.read.as_ref()?;
        let collection = self.collection.as_ref()?;

        if id.is_empty() {
            return Some(Outcome::BadRequest(MISSING_ID));
        }
        let wanted = DocumentId::from(id);

        let published = read(scope).map_or_else(Vec::new, |set| set.fetch());
        let found = published
            .into_iter()
            .find(|doc| doc.id().as_ref() == Some(&wanted));

        Some(match found {
            Some(doc) => Outcome::Ok(doc.into_value()),
            None if collection.find_one(&wanted).await.is_some() => Outcome::Unauthorized,
            None => Outcome::NotFound(wanted.to_string()),
        })
    }

    /// `POST /prefix/name` — insert, generating an `_id` when absent.
    async fn create(&self, scope: &PublishScope, body: Value) -> Option<Outcome> {
        let collection = self.collection.as_ref()?;

        let Some(mut doc) = Document::from_value(body) else {
            return Some(Outcome::BadRequest(MISSING_DOCUMENT));
        };
        let id = doc.ensure_id();

        Some(match collection.insert(&scope.call_context(), doc).await {
            Ok(()) => Outcome::Ok(json!({ "_id": id })),
            Err(err) => Outcome::Failed(err),
        })
    }

    /// `PUT /prefix/name/:id` — update with `{_id: id}` as selector.
    async fn update(&self, scope: &PublishScope, id: &str, body: Value) -> Option<Outcome> {
        let collection = self.collection.as_ref()?;

        if id.is_empty() {
            return Some(Outcome::BadRequest(MISSING_ID));
        }
        let Some(changes) = Document::from_value(body) else {
            return Some(Outcome::BadRequest(MISSING_DOCUMENT));
        };
        let target = DocumentId::from(id);

        Some(
            match collection
                .update(&scope.call_context(), &target, changes)
                .await
            {
                Ok(()) => Outcome::Ok(json!({ "_id": target })),
                Err(err) => Outcome::Failed(err),
            },
        )
    }

    /// `DELETE /prefix/name/:id` — remove with `{_id: id}` as selector.
    async fn delete(&self, scope: &PublishScope, id: &str) -> Option<Outcome> {
        let collection = self.collection.as_ref()?;

        if id.is_empty() {
            return Some(Outcome::BadRequest(MISSING_ID));
        }
        let target = DocumentId::from(id);

        Some(
            match collection.remove(&scope.call_context(), &target).await {
                Ok(()) => Outcome::Ok(json!({ "_id": target })),
                Err(err) => Outcome::Failed(err),
            },
        )
    }
}

/// Map an outcome onto a formatted response. Error bodies go through the
/// negotiated format handler exactly like successful results.
fn respond(outcome: Outcome, scope: &PublishScope, formats: &FormatRegistry) -> RestResponse {
    let requested = scope.requested_format();
    match outcome {
        Outcome::Ok(value) => formats.format(&value, requested, 200),
        Outcome::BadRequest(message) => {
            formats.format(&json!({ "error": message }), requested, 400)
        }
        Outcome::Unauthorized => formats.format(&json!({ "error": "Unauthorized" }), requested, 401),
        Outcome::NotFound(id) => formats.format(
            &json!({ "error": format!("Document with id {id} not found") }),
            requested,
            404,
        ),
        Outcome::Failed(err) => formats.format(
            &json!({ "error": err.message }),
            requested,
            err.status.unwrap_or(500),
        ),
    }
}
