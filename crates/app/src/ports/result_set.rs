//! Result-set port — what a read function returns.

use std::sync::Arc;

use restpub_domain::document::Document;

use crate::scope::PublishScope;

/// A query's matches, materializable to an ordered vector.
///
/// The dispatcher only ever materializes the set once per request and scans
/// it sequentially, so the trait stays minimal on purpose.
pub trait ResultSet: Send {
    /// Materialize the matches, in the order the query produced them.
    fn fetch(self: Box<Self>) -> Vec<Document>;
}

impl ResultSet for Vec<Document> {
    fn fetch(self: Box<Self>) -> Vec<Document> {
        *self
    }
}

/// A caller-supplied read ("publish") function.
///
/// Returns `None` when it has nothing that behaves like a result set; the
/// bridge answers that with an empty list, not an error.
pub type ReadFn = Arc<dyn Fn(&PublishScope) -> Option<Box<dyn ResultSet>> + Send + Sync>;
