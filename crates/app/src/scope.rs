//! Request scope — the restricted view handed to read functions.
//!
//! Read functions see the caller id, path parameters, and query parameters
//! and nothing else. The transport request never crosses this boundary, so
//! user publish logic cannot grow a dependency on transport internals.

use std::collections::HashMap;

/// Path parameters extracted by the host routing layer.
#[derive(Debug, Clone, Default)]
pub struct Params {
    /// The `:id` segment of an item route, when one matched.
    pub id: Option<String>,
}

/// Per-request context exposed to read functions.
#[derive(Debug, Clone, Default)]
pub struct PublishScope {
    /// Authenticated caller, when the host established one.
    pub user_id: Option<String>,
    /// Path parameters.
    pub params: Params,
    /// Query-string parameters.
    pub query: HashMap<String, String>,
}

impl PublishScope {
    /// The caller identity to bind into collection operations, so the
    /// underlying operation performs its authorization against the true
    /// caller rather than an elevated one.
    #[must_use]
    pub fn call_context(&self) -> CallContext {
        CallContext {
            user_id: self.user_id.clone(),
        }
    }

    /// The requested output format, straight from the query string.
    #[must_use]
    pub fn requested_format(&self) -> Option<&str> {
        self.query.get("format").map(String::as_str)
    }
}

/// Caller identity bound into a collection operation.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    /// Authenticated caller, when the host established one.
    pub user_id: Option<String>,
}
