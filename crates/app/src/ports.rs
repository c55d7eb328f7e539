//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the bridge core and the outside world.
//! They are defined here (in `app`) so that both the dispatcher and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod collection;
pub mod result_set;

pub use collection::Collection;
pub use result_set::{ReadFn, ResultSet};
