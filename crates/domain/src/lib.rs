//! # restpub-domain
//!
//! Pure domain model for the restpub REST bridge.
//!
//! ## Responsibilities
//! - Define **Documents** (schemaless JSON records keyed by a string `_id`)
//! - Define **DocumentId** (opaque string key with a random generator for
//!   payloads that omit one)
//! - Define the error taxonomy shared by every layer
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod document;
pub mod error;
pub mod id;
