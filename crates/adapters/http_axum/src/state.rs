//! Shared application state for axum handlers.

use std::sync::Arc;

use restpub_app::publisher::Publisher;

/// Application state shared across all axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Publisher whose route table and format registry serve each request.
    pub publisher: Arc<Publisher>,
}

impl AppState {
    /// Create the state around a shared publisher instance.
    #[must_use]
    pub fn new(publisher: Arc<Publisher>) -> Self {
        Self { publisher }
    }
}
