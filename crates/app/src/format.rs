//! Result formatting — negotiated serialization of call results.
//!
//! The output format is chosen by the `format` query parameter
//! (case-insensitive, default `json`). Handlers live in a registry that is
//! only ever merged into, never drained, so the default `json` entry cannot
//! disappear through normal operation. When the requested handler is missing
//! or fails, the response is forced to HTTP 500 with a raw JSON error body
//! that is never re-run through a handler.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use restpub_domain::error::FormatError;

/// Content type of the built-in `json` handler and of fallback error bodies.
pub const APPLICATION_JSON: &str = "application/json";

/// Serialized output of a format handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedBody {
    /// Content type the response should carry.
    pub content_type: String,
    /// Serialized body.
    pub body: String,
}

/// A format handler: converts a result value into a serialized body plus
/// content type.
pub type FormatFn = Arc<dyn Fn(&Value) -> Result<FormattedBody, FormatError> + Send + Sync>;

/// A fully assembled response, handed to the host transport as a value
/// rather than mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestResponse {
    /// HTTP status code.
    pub status: u16,
    /// Content type header value.
    pub content_type: String,
    /// Serialized body.
    pub body: String,
}

/// Registry of format handlers, keyed by lowercase format name.
#[derive(Clone)]
pub struct FormatRegistry {
    handlers: HashMap<String, FormatFn>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        let mut handlers: HashMap<String, FormatFn> = HashMap::new();
        handlers.insert("json".to_string(), Arc::new(json_handler));
        Self { handlers }
    }
}

fn json_handler(result: &Value) -> Result<FormattedBody, FormatError> {
    let body = serde_json::to_string(result).map_err(|err| FormatError(err.to_string()))?;
    Ok(FormattedBody {
        content_type: APPLICATION_JSON.to_string(),
        body,
    })
}

impl FormatRegistry {
    /// Merge `handlers` into the registry. Existing entries survive unless
    /// a new handler is registered under the same (case-insensitive) name,
    /// in which case the later registration wins.
    pub fn register(&mut self, handlers: HashMap<String, FormatFn>) {
        for (name, handler) in handlers {
            self.handlers.insert(name.to_lowercase(), handler);
        }
    }

    /// Serialize `result` in the requested format and assemble the response.
    ///
    /// `status` is the status code the caller decided on; the two fallback
    /// paths (unknown format, failing handler) override it with 500 and emit
    /// a raw JSON error body instead of recursing into a handler.
    #[must_use]
    pub fn format(&self, result: &Value, requested: Option<&str>, status: u16) -> RestResponse {
        let format = requested.unwrap_or("json").to_lowercase();

        let Some(handler) = self.handlers.get(&format) else {
            return RestResponse {
                status: 500,
                content_type: APPLICATION_JSON.to_string(),
                body: format!("{{\"error\":\"Format handler for: `{format}` not found\"}}"),
            };
        };

        match handler(result) {
            Ok(formatted) => RestResponse {
                status,
                content_type: formatted.content_type,
                body: formatted.body,
            },
            Err(err) => RestResponse {
                status: 500,
                content_type: APPLICATION_JSON.to_string(),
                body: format!("{{\"error\":\"Format handler for: `{format}` Error: {err}\"}}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_serialize_json_by_default() {
        let registry = FormatRegistry::default();
        let response = registry.format(&json!({"a": 1}), None, 200);
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, APPLICATION_JSON);
        assert_eq!(response.body, "{\"a\":1}");
    }

    #[test]
    fn should_match_format_names_case_insensitively() {
        let registry = FormatRegistry::default();
        let response = registry.format(&json!([]), Some("JSON"), 200);
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "[]");
    }

    #[test]
    fn should_force_500_when_format_unknown() {
        let registry = FormatRegistry::default();
        let response = registry.format(&json!([]), Some("bogus"), 200);
        assert_eq!(response.status, 500);
        assert!(response.body.contains("`bogus` not found"));
    }

    #[test]
    fn should_force_500_when_handler_fails() {
        let mut registry = FormatRegistry::default();
        let mut handlers: HashMap<String, FormatFn> = HashMap::new();
        handlers.insert(
            "xml".to_string(),
            Arc::new(|_| Err(FormatError("no xml today".to_string()))),
        );
        registry.register(handlers);

        let response = registry.format(&json!([]), Some("xml"), 200);
        assert_eq!(response.status, 500);
        assert!(response.body.contains("`xml` Error: no xml today"));
    }

    #[test]
    fn should_keep_error_status_when_formatting_error_bodies() {
        let registry = FormatRegistry::default();
        let response = registry.format(&json!({"error": "Unauthorized"}), None, 401);
        assert_eq!(response.status, 401);
        assert_eq!(response.body, "{\"error\":\"Unauthorized\"}");
    }

    #[test]
    fn should_surface_error_even_when_default_handler_is_overwritten_and_faulty() {
        let mut registry = FormatRegistry::default();
        let mut handlers: HashMap<String, FormatFn> = HashMap::new();
        handlers.insert(
            "json".to_string(),
            Arc::new(|_| Err(FormatError("broken override".to_string()))),
        );
        registry.register(handlers);

        let response = registry.format(&json!([]), None, 200);
        assert_eq!(response.status, 500);
        assert!(response.body.contains("broken override"));
    }

    #[test]
    fn should_let_custom_handlers_pick_the_content_type() {
        let mut registry = FormatRegistry::default();
        let mut handlers: HashMap<String, FormatFn> = HashMap::new();
        handlers.insert(
            "xml".to_string(),
            Arc::new(|result| {
                Ok(FormattedBody {
                    content_type: "text/xml".to_string(),
                    body: format!("<result>{result}</result>"),
                })
            }),
        );
        registry.register(handlers);

        let response = registry.format(&json!(1), Some("xml"), 200);
        assert_eq!(response.content_type, "text/xml");
        assert_eq!(response.body, "<result>1</result>");
    }
}
