//! Error taxonomy shared across the workspace.
//!
//! Only two conditions are Rust errors here. Administrative misuse surfaces
//! as [`ConfigError`] from `publish`, and a failed underlying collection
//! operation surfaces as [`MethodError`] carrying the status code the
//! operation chose. Request-time conditions (bad request, unauthorized,
//! not found, format failure) are dispatcher outcomes, not errors — they
//! always become a formatted HTTP response.

/// Administrative-time failure raised while registering a rest point.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Neither a collection nor a non-empty access point name was given.
    #[error("expected a collection or access point name")]
    MissingResourceName,
}

/// Failure reported by an underlying insert/update/remove operation.
///
/// The operation owns its authorization and validation, so the bridge passes
/// its status code and message through to the HTTP response untouched. An
/// operation that reports no status code is answered with HTTP 500.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct MethodError {
    /// HTTP status the response should carry, when the operation chose one.
    pub status: Option<u16>,
    /// Human-readable message placed in the `{"error": …}` body.
    pub message: String,
}

impl MethodError {
    /// Create an error with an explicit status code.
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create an error without a status code.
    #[must_use]
    pub fn untyped(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }
}

/// Failure inside a format handler while serializing a result.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct FormatError(pub String);
