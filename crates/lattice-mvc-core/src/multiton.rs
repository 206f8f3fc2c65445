//! Keyed instance registries.
//!
//! Every core is identified by a multiton key. A [`CoreRegistry`] owns one
//! [`Multiton`] map per component kind (models, views, controllers, facades),
//! so there is at most one instance of each kind per key. Registries are plain
//! values: several can coexist, and nothing in this crate is a process-wide
//! singleton.
//!
//! # Example
//!
//! ```
//! use lattice_mvc_core::CoreRegistry;
//!
//! let registry = CoreRegistry::new();
//! let shell = registry.facade("shell").unwrap();
//! let editor = registry.facade("editor").unwrap();
//!
//! assert_eq!(shell.key(), "shell");
//! assert_eq!(registry.core_keys(), vec!["editor", "shell"]);
//!
//! registry.remove_core("editor").unwrap();
//! assert!(!registry.has_core("editor"));
//! # drop(editor);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::controller::Controller;
use crate::error::{CoreKind, MvcError, Result};
use crate::facade::Facade;
use crate::logging::targets;
use crate::model::Model;
use crate::view::View;

/// Reject empty multiton keys.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(MvcError::EmptyKey);
    }
    Ok(())
}

/// A map from multiton key to the single instance of `T` for that key.
pub struct Multiton<T> {
    kind: CoreKind,
    instances: Mutex<HashMap<String, Arc<T>>>,
}

impl<T> Multiton<T> {
    fn new(kind: CoreKind) -> Self {
        Self {
            kind,
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// The kind of instance this map holds.
    pub fn kind(&self) -> CoreKind {
        self.kind
    }

    /// The instance for `key`, if one exists.
    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        self.instances.lock().get(key).cloned()
    }

    /// Whether an instance exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.instances.lock().contains_key(key)
    }

    /// All keys with an instance, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.instances.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.instances.lock().len()
    }

    /// Whether no instance exists.
    pub fn is_empty(&self) -> bool {
        self.instances.lock().is_empty()
    }

    /// Return the instance for `key`, creating it with `create` if missing.
    ///
    /// The lock is released while `create` runs, so construction may itself
    /// consult the registry. The boolean is `true` when `create` produced the
    /// returned instance.
    pub(crate) fn get_or_try_insert_with<F>(&self, key: &str, create: F) -> Result<(Arc<T>, bool)>
    where
        F: FnOnce() -> Result<Arc<T>>,
    {
        validate_key(key)?;
        if let Some(existing) = self.get(key) {
            return Ok((existing, false));
        }

        let created = create()?;
        let mut instances = self.instances.lock();
        if let Some(existing) = instances.get(key) {
            return Ok((existing.clone(), false));
        }
        instances.insert(key.to_string(), created.clone());
        tracing::trace!(target: targets::MULTITON, kind = %self.kind, key, "instance created");
        Ok((created, true))
    }

    /// Store `instance` under `key`, failing if one already exists.
    pub(crate) fn insert_new(&self, key: &str, instance: Arc<T>) -> Result<Arc<T>> {
        validate_key(key)?;
        let mut instances = self.instances.lock();
        if instances.contains_key(key) {
            return Err(MvcError::duplicate_core(self.kind, key));
        }
        instances.insert(key.to_string(), instance.clone());
        Ok(instance)
    }

    /// Drop the entry for `key`.
    pub(crate) fn remove(&self, key: &str) -> Option<Arc<T>> {
        let removed = self.instances.lock().remove(key);
        if removed.is_some() {
            tracing::trace!(target: targets::MULTITON, kind = %self.kind, key, "instance removed");
        }
        removed
    }
}

impl<T> fmt::Debug for Multiton<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Multiton")
            .field("kind", &self.kind)
            .field("keys", &self.keys())
            .finish()
    }
}

pub(crate) struct Cores {
    models: Multiton<Model>,
    views: Multiton<View>,
    controllers: Multiton<Controller>,
    facades: Multiton<Facade>,
}

impl Cores {
    fn new() -> Self {
        Self {
            models: Multiton::new(CoreKind::Model),
            views: Multiton::new(CoreKind::View),
            controllers: Multiton::new(CoreKind::Controller),
            facades: Multiton::new(CoreKind::Facade),
        }
    }
}

/// Handle to a set of cores.
///
/// Cloning the handle shares the same underlying maps.
#[derive(Clone)]
pub struct CoreRegistry {
    inner: Arc<Cores>,
}

impl CoreRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Cores::new()),
        }
    }

    /// Whether a facade exists for `key`.
    pub fn has_core(&self, key: &str) -> bool {
        self.inner.facades.contains(key)
    }

    /// Keys of all cores with a facade, sorted.
    pub fn core_keys(&self) -> Vec<String> {
        self.inner.facades.keys()
    }

    /// The facade for `key`, created on first use.
    pub fn facade(&self, key: &str) -> Result<Arc<Facade>> {
        Facade::get_instance(self, key)
    }

    /// Tear down the core for `key`. See [`Facade::remove_core`].
    pub fn remove_core(&self, key: &str) -> Result<()> {
        Facade::remove_core(self, key)
    }

    /// Model instances by key.
    pub fn models(&self) -> &Multiton<Model> {
        &self.inner.models
    }

    /// View instances by key.
    pub fn views(&self) -> &Multiton<View> {
        &self.inner.views
    }

    /// Controller instances by key.
    pub fn controllers(&self) -> &Multiton<Controller> {
        &self.inner.controllers
    }

    /// Facade instances by key.
    pub fn facades(&self) -> &Multiton<Facade> {
        &self.inner.facades
    }

    pub(crate) fn downgrade(&self) -> WeakCoreRegistry {
        WeakCoreRegistry(Arc::downgrade(&self.inner))
    }
}

impl Default for CoreRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CoreRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreRegistry")
            .field("cores", &self.core_keys())
            .finish()
    }
}

/// Non-owning registry handle kept by actors, so that a core's members never
/// keep the registry itself alive.
#[derive(Clone)]
pub(crate) struct WeakCoreRegistry(Weak<Cores>);

impl WeakCoreRegistry {
    pub(crate) fn upgrade(&self) -> Option<CoreRegistry> {
        self.0.upgrade().map(|inner| CoreRegistry { inner })
    }
}
