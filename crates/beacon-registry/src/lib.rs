//! Process-wide single-instance registry for Beacon client types.
//!
//! Other parts of the client obtain their canonical instances here: at most
//! one live instance per type, constructed lazily on first request and kept
//! until an explicit total reset. [`InstanceRegistry`] is the owned service
//! object; callers that need ambient access for compatibility use the
//! module-level [`singleton`] / [`conditional_singleton`] /
//! [`clear_singletons`] functions, which share one process-global registry.
//!
//! # Quick start
//!
//! ```
//! use beacon_registry::InstanceRegistry;
//!
//! struct Client { endpoint: String }
//!
//! let registry = InstanceRegistry::new();
//! let a = registry.get_or_create(|| Client { endpoint: "first".into() });
//! // Later initializers are silently ignored once an instance exists.
//! let b = registry.get_or_create(|| Client { endpoint: "second".into() });
//! assert!(std::sync::Arc::ptr_eq(&a, &b));
//! assert_eq!(b.endpoint, "first");
//! ```
//!
//! # Concurrency
//!
//! The check-then-insert sequence runs under a mutex, so concurrent first
//! access constructs at most one instance per type. The initializer runs
//! while the lock is held: re-entering the registry from inside an
//! initializer deadlocks. A panicking initializer poisons nothing: the
//! registry absorbs poison and stays usable.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lazy_static::lazy_static;
use tracing::debug;

type Entries = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

/// Mapping from type identity to the single live instance of that type.
#[derive(Default)]
pub struct InstanceRegistry {
    entries: Mutex<Entries>,
}

impl InstanceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the registered instance of `T`, constructing it with `init`
    /// on first request. Later calls never run their initializer;
    /// construction arguments are silently ignored, a documented quirk of
    /// the singleton contract.
    ///
    /// A panic inside `init` propagates to the caller and leaves no entry.
    pub fn get_or_create<T, F>(&self, init: F) -> Arc<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        let mut entries = self.lock();
        let entry = entries.entry(TypeId::of::<T>()).or_insert_with(|| {
            debug!(instance = type_name::<T>(), "constructing registry instance");
            Arc::new(init())
        });
        match Arc::clone(entry).downcast::<T>() {
            Ok(instance) => instance,
            Err(_) => unreachable!("registry entries are keyed by TypeId"),
        }
    }

    /// Like [`get_or_create`](Self::get_or_create) when `use_singleton` is
    /// true. When false, always constructs a fresh instance and neither
    /// reads nor writes the registry.
    pub fn get_or_create_if<T, F>(&self, use_singleton: bool, init: F) -> Arc<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        if use_singleton {
            self.get_or_create(init)
        } else {
            Arc::new(init())
        }
    }

    /// Discard every entry. Atomic and total: subsequent requests
    /// re-construct.
    pub fn clear(&self) {
        self.lock().clear();
        debug!("cleared instance registry");
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        // A panicking initializer must not wedge the registry.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for InstanceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceRegistry")
            .field("entries", &self.len())
            .finish()
    }
}

lazy_static! {
    static ref GLOBAL_INSTANCES: InstanceRegistry = InstanceRegistry::new();
}

/// The ambient process-global registry backing [`singleton`].
pub fn global() -> &'static InstanceRegistry {
    &GLOBAL_INSTANCES
}

/// Get or construct the process-wide instance of `T`. See
/// [`InstanceRegistry::get_or_create`].
pub fn singleton<T, F>(init: F) -> Arc<T>
where
    T: Send + Sync + 'static,
    F: FnOnce() -> T,
{
    GLOBAL_INSTANCES.get_or_create(init)
}

/// Singleton behavior when `use_singleton` is true; a fresh, unregistered
/// instance when false. See [`InstanceRegistry::get_or_create_if`].
pub fn conditional_singleton<T, F>(use_singleton: bool, init: F) -> Arc<T>
where
    T: Send + Sync + 'static,
    F: FnOnce() -> T,
{
    GLOBAL_INSTANCES.get_or_create_if(use_singleton, init)
}

/// Discard every process-wide instance.
pub fn clear_singletons() {
    GLOBAL_INSTANCES.clear()
}
