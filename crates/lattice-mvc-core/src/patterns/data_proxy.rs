//! A proxy that owns one value behind a lock.

use std::fmt;

use parking_lot::RwLock;

use crate::model::Proxy;
use crate::notifier::{Notifier, NotifierBase};

/// A proxy that owns one value of type `T`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use lattice_mvc_core::{CoreRegistry, DataProxy};
///
/// let registry = CoreRegistry::new();
/// let facade = registry.facade("app").unwrap();
/// facade.register_proxy(Arc::new(DataProxy::new("Score", 10_u32))).unwrap();
///
/// let score = facade.retrieve_proxy_as::<DataProxy<u32>>("Score").unwrap();
/// score.update(|value| *value += 5);
/// assert_eq!(score.data(), 15);
/// ```
pub struct DataProxy<T> {
    name: String,
    data: RwLock<T>,
    notifier: NotifierBase,
}

impl<T: Send + Sync + 'static> DataProxy<T> {
    /// Create a proxy named `name` holding `data`.
    pub fn new(name: impl Into<String>, data: T) -> Self {
        Self {
            name: name.into(),
            data: RwLock::new(data),
            notifier: NotifierBase::new(),
        }
    }

    /// A copy of the current value.
    pub fn data(&self) -> T
    where
        T: Clone,
    {
        self.data.read().clone()
    }

    /// Replace the value, returning the previous one.
    pub fn set_data(&self, data: T) -> T {
        std::mem::replace(&mut *self.data.write(), data)
    }

    /// Run `f` with shared access to the value.
    pub fn with_data<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.data.read())
    }

    /// Run `f` with exclusive access to the value.
    ///
    /// The lock is held while `f` runs; do not send notifications from it.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.data.write())
    }
}

impl<T> Notifier for DataProxy<T> {
    fn notifier(&self) -> &NotifierBase {
        &self.notifier
    }
}

impl<T: Send + Sync + 'static> Proxy for DataProxy<T> {
    fn proxy_name(&self) -> &str {
        &self.name
    }
}

impl<T: fmt::Debug> fmt::Debug for DataProxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataProxy")
            .field("name", &self.name)
            .field("data", &*self.data.read())
            .field("key", &self.notifier.key())
            .finish()
    }
}
