//! # restpub-app
//!
//! Application layer — the REST bridge core plus **port definitions**
//! (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters and hosts implement:
//!   - [`ports::Collection`] — the data collection whose mutation operations
//!     carry their own authorization
//!   - [`ports::ResultSet`] — a query's matches, materializable to a vector
//! - Provide the three cooperating services of the bridge:
//!   - [`publisher::Publisher`] — route registrar and registration state
//!   - [`dispatcher::RestResource`] — per-verb method dispatch
//!   - [`format::FormatRegistry`] — negotiated result serialization
//!
//! ## Dependency rule
//! Depends on `restpub-domain` only. Never imports adapter crates; the axum
//! host depends on *this* crate, not the reverse.

pub mod dispatcher;
pub mod format;
pub mod ports;
pub mod publisher;
pub mod scope;
