//! Publisher — route registrar and process-wide registration state.
//!
//! A [`Publisher`] is an explicit service instance, not a module-level
//! singleton, so independent bridges can coexist (and tests never share
//! state). It owns the ordered route table consulted by the host routing
//! layer and the format handler registry consulted per request. Both are
//! mutated only by administrative calls; request traffic takes read locks.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use restpub_domain::error::ConfigError;

use crate::dispatcher::{RestResource, RouteKind};
use crate::format::{FormatFn, FormatRegistry};
use crate::ports::{Collection, ReadFn};

/// Prefix prepended to collection-derived resource names.
pub const DEFAULT_API_PREFIX: &str = "/api/";

/// What to mount: an explicit access point name or a collection handle.
#[derive(Clone)]
pub enum ResourceTarget {
    /// Mount at this path verbatim (e.g. `/lists`); read-only.
    Name(String),
    /// Mount at `{api_prefix}{collection.name()}` with full CRUD.
    Collection(Arc<dyn Collection>),
}

/// One `publish` call, resolved at the boundary instead of through
/// positional-argument inference.
#[derive(Clone)]
pub struct PublishConfig {
    /// The resource to mount.
    pub resource: ResourceTarget,
    /// Read function wiring `GET` on both paths; without it no `GET` route
    /// exists at all.
    pub read: Option<ReadFn>,
    /// Prefix for collection-derived names; defaults to [`DEFAULT_API_PREFIX`].
    pub api_prefix: Option<String>,
}

impl PublishConfig {
    /// Mount a collection with full CRUD under the default prefix.
    #[must_use]
    pub fn collection(collection: Arc<dyn Collection>) -> Self {
        Self {
            resource: ResourceTarget::Collection(collection),
            read: None,
            api_prefix: None,
        }
    }

    /// Mount a read-only rest point at `name` verbatim.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            resource: ResourceTarget::Name(name.into()),
            read: None,
            api_prefix: None,
        }
    }

    /// Attach a read function, wiring `GET` on the collection path and,
    /// for collections, on the item path.
    #[must_use]
    pub fn with_read(mut self, read: ReadFn) -> Self {
        self.read = Some(read);
        self
    }

    /// Override the API prefix used for collection-derived names.
    #[must_use]
    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = Some(prefix.into());
        self
    }
}

/// Route registrar and per-request lookup service.
pub struct Publisher {
    routes: RwLock<BTreeMap<String, Arc<RestResource>>>,
    formats: RwLock<FormatRegistry>,
}

impl Default for Publisher {
    fn default() -> Self {
        Self {
            routes: RwLock::new(BTreeMap::new()),
            formats: RwLock::new(FormatRegistry::default()),
        }
    }
}

impl Publisher {
    /// Create a publisher with an empty route table and the default `json`
    /// format handler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a rest point.
    ///
    /// Re-publishing the same derived name replaces the prior handlers in a
    /// single write, so callers observe the swap atomically.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingResourceName`] when neither a collection
    /// nor a non-empty name resolves a mount point.
    pub fn publish(&self, config: PublishConfig) -> Result<(), ConfigError> {
        let prefix = config.api_prefix.as_deref().unwrap_or(DEFAULT_API_PREFIX);
        let (name, collection) = resolve(&config.resource, prefix)?;

        let resource = RestResource::new(name.clone(), collection, config.read);
        tracing::info!(resource = %name, "publishing rest point");
        self.write_routes().insert(name, Arc::new(resource));
        Ok(())
    }

    /// Remove the base and item routes of one rest point.
    ///
    /// Unknown or unresolvable names are a no-op.
    pub fn unpublish(&self, target: &ResourceTarget, api_prefix: Option<&str>) {
        let prefix = api_prefix.unwrap_or(DEFAULT_API_PREFIX);
        let Ok((name, _)) = resolve(target, prefix) else {
            return;
        };
        if self.write_routes().remove(&name).is_some() {
            tracing::info!(resource = %name, "unpublished rest point");
        }
    }

    /// Remove every rest point this publisher has registered.
    pub fn unpublish_all(&self) {
        let mut routes = self.write_routes();
        tracing::info!(count = routes.len(), "unpublishing all rest points");
        routes.clear();
    }

    /// Merge format handlers into the registry; later registrations win on
    /// name collisions and nothing is ever removed.
    pub fn register_formats(&self, handlers: HashMap<String, FormatFn>) {
        self.formats
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register(handlers);
    }

    /// Snapshot of the format registry for one request, so an administrative
    /// re-registration mid-request cannot produce a half-updated view.
    #[must_use]
    pub fn formats(&self) -> FormatRegistry {
        self.formats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Ordered names of every currently registered rest point.
    #[must_use]
    pub fn published(&self) -> Vec<String> {
        self.read_routes().keys().cloned().collect()
    }

    /// Resolve a request path against the route table.
    ///
    /// An exact match is the collection path. Otherwise the last segment is
    /// the `:id` parameter (possibly empty, as in `/api/notes/`) when the
    /// remainder matches a resource that registered an item route.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<(Arc<RestResource>, RouteKind)> {
        let routes = self.read_routes();
        if let Some(resource) = routes.get(path) {
            return Some((Arc::clone(resource), RouteKind::Base));
        }

        let (base, id) = path.rsplit_once('/')?;
        let resource = routes.get(base)?;
        if !resource.has_item_route() {
            return None;
        }
        Some((
            Arc::clone(resource),
            RouteKind::Item { id: id.to_string() },
        ))
    }

    fn read_routes(&self) -> RwLockReadGuard<'_, BTreeMap<String, Arc<RestResource>>> {
        self.routes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_routes(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Arc<RestResource>>> {
        self.routes.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Derive the mount point and collection handle from a target.
fn resolve(
    target: &ResourceTarget,
    prefix: &str,
) -> Result<(String, Option<Arc<dyn Collection>>), ConfigError> {
    match target {
        ResourceTarget::Name(name) if name.is_empty() => Err(ConfigError::MissingResourceName),
        ResourceTarget::Name(name) => Ok((name.clone(), None)),
        ResourceTarget::Collection(collection) if collection.name().is_empty() => {
            Err(ConfigError::MissingResourceName)
        }
        ResourceTarget::Collection(collection) => Ok((
            format!("{prefix}{}", collection.name()),
            Some(Arc::clone(collection)),
        )),
    }
}
