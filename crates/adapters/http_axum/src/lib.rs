//! # restpub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Act as the **host routing layer** for published rest points: resolve
//!   each incoming `(method, path)` against the publisher's route table
//! - Map HTTP requests into dispatcher calls (restricted scope, parsed body)
//! - Map dispatcher responses (status, content type, body) into axum
//!   responses
//! - Answer unmatched paths and unsupported verbs itself (plain 404/405),
//!   since those never reach the bridge core
//!
//! ## Dynamic routes
//! axum's route table is immutable once built, while rest points come and go
//! at runtime through `publish`/`unpublish`. The router therefore installs a
//! fallback handler that consults the publisher per request; route
//! replacement is a single map swap the in-flight request either sees or
//! doesn't.
//!
//! ## Dependency rule
//! Depends on `restpub-app` (publisher, dispatcher, ports). Never leaks axum
//! types into the bridge core.

pub mod router;
pub mod state;
