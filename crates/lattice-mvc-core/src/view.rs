//! The view registry: mediators and notification fan-out.
//!
//! A [`View`] owns two tables for its core:
//!
//! - mediators by name
//! - the subscription table: for every notification name, the ordered list
//!   of [`Observer`]s interested in it
//!
//! [`View::notify_observers`] delivers a notification to a snapshot of the
//! list for its name, in registration order. Because the live table is not
//! borrowed during delivery, handlers may register or remove mediators,
//! commands and observers, or send further notifications, while they run.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use lattice_mvc_core::{
//!     CoreRegistry, Mediator, Notification, Notifier, NotifierBase, Result, View,
//! };
//!
//! struct StatusBar {
//!     notifier: NotifierBase,
//!     text: Mutex<String>,
//! }
//!
//! impl Notifier for StatusBar {
//!     fn notifier(&self) -> &NotifierBase {
//!         &self.notifier
//!     }
//! }
//!
//! impl Mediator for StatusBar {
//!     fn mediator_name(&self) -> &str {
//!         "StatusBar"
//!     }
//!
//!     fn list_notification_interests(&self) -> Vec<String> {
//!         vec!["status".into()]
//!     }
//!
//!     fn handle_notification(&self, note: &Notification) -> Result<()> {
//!         if let Some(text) = note.body_as::<&str>() {
//!             *self.text.lock() = text.to_string();
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let registry = CoreRegistry::new();
//! let view = View::get_instance(&registry, "app").unwrap();
//! let bar = Arc::new(StatusBar { notifier: NotifierBase::new(), text: Mutex::new(String::new()) });
//! view.register_mediator(bar.clone()).unwrap();
//!
//! view.notify_observers(&Notification::new("status").with_body("Ready")).unwrap();
//! assert_eq!(*bar.text.lock(), "Ready");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{MvcError, Result};
use crate::logging::{span_names, targets};
use crate::multiton::{CoreRegistry, WeakCoreRegistry};
use crate::notification::Notification;
use crate::notifier::{AsAny, Notifier};
use crate::observer::{ContextId, Observer};

/// An adapter between a view component and the notification bus.
///
/// On registration the view subscribes the mediator to every name returned by
/// [`list_notification_interests`](Self::list_notification_interests).
pub trait Mediator: Notifier + AsAny {
    /// The name this mediator is registered under.
    fn mediator_name(&self) -> &str;

    /// Names of the notifications this mediator wants to receive.
    fn list_notification_interests(&self) -> Vec<String> {
        Vec::new()
    }

    /// Handle a notification this mediator is interested in.
    fn handle_notification(&self, _notification: &Notification) -> Result<()> {
        Ok(())
    }

    /// Called after the mediator has been stored and subscribed.
    fn on_register(&self) -> Result<()> {
        Ok(())
    }

    /// Called after the mediator has been unsubscribed and removed.
    fn on_remove(&self) -> Result<()> {
        Ok(())
    }
}

/// Per-core mediator registry and subscription table.
pub struct View {
    key: String,
    registry: WeakCoreRegistry,
    mediator_map: RwLock<HashMap<String, Arc<dyn Mediator>>>,
    observer_map: RwLock<HashMap<String, Vec<Observer>>>,
}

impl View {
    fn create(registry: &CoreRegistry, key: &str) -> Arc<Self> {
        Arc::new(Self {
            key: key.to_string(),
            registry: registry.downgrade(),
            mediator_map: RwLock::new(HashMap::new()),
            observer_map: RwLock::new(HashMap::new()),
        })
    }

    /// The view for `key`, created on first use.
    pub fn get_instance(registry: &CoreRegistry, key: &str) -> Result<Arc<Self>> {
        let (view, _) = registry
            .views()
            .get_or_try_insert_with(key, || Ok(Self::create(registry, key)))?;
        Ok(view)
    }

    /// Construct the view for `key` directly.
    ///
    /// Fails with [`MvcError::DuplicateCore`] if one already exists.
    pub fn new_instance(registry: &CoreRegistry, key: &str) -> Result<Arc<Self>> {
        registry.views().insert_new(key, Self::create(registry, key))
    }

    /// Drop the view for `key` from the registry.
    pub fn remove_view(registry: &CoreRegistry, key: &str) -> bool {
        registry.views().remove(key).is_some()
    }

    /// The multiton key of this view.
    pub fn key(&self) -> &str {
        &self.key
    }

    // =========================================================================
    // Observers
    // =========================================================================

    /// Append `observer` to the list for `notification_name`.
    pub fn register_observer(&self, notification_name: &str, observer: Observer) {
        tracing::trace!(target: targets::VIEW, key = %self.key, notification = notification_name, context = ?observer.context(), "observer registered");
        self.observer_map
            .write()
            .entry(notification_name.to_string())
            .or_default()
            .push(observer);
    }

    /// Remove the observer for `notification_name` whose context is
    /// `notify_context`.
    ///
    /// Returns whether an observer was removed. A list left empty is dropped
    /// from the table.
    pub fn remove_observer<C: ?Sized>(&self, notification_name: &str, notify_context: &C) -> bool {
        self.remove_observer_by_context(notification_name, ContextId::of(notify_context))
    }

    fn remove_observer_by_context(&self, notification_name: &str, context: ContextId) -> bool {
        let mut observer_map = self.observer_map.write();
        let Some(observers) = observer_map.get_mut(notification_name) else {
            return false;
        };
        let Some(index) = observers.iter().position(|o| o.context() == context) else {
            return false;
        };
        observers.remove(index);
        if observers.is_empty() {
            observer_map.remove(notification_name);
        }
        tracing::trace!(target: targets::VIEW, key = %self.key, notification = notification_name, ?context, "observer removed");
        true
    }

    /// Deliver `notification` to every observer registered for its name.
    ///
    /// Observers are called in registration order, on the caller's stack,
    /// from a snapshot of the list taken before the first delivery. The first
    /// observer error stops delivery and is returned. Names nobody listens to
    /// are ignored.
    pub fn notify_observers(&self, notification: &Notification) -> Result<()> {
        let _span = tracing::trace_span!(
            target: targets::VIEW,
            span_names::NOTIFY,
            key = %self.key,
            notification = notification.name()
        )
        .entered();
        let Some(observers) = self.observer_map.read().get(notification.name()).cloned() else {
            tracing::trace!(target: targets::VIEW, "no observers");
            return Ok(());
        };
        tracing::trace!(target: targets::VIEW, observer_count = observers.len(), "notifying observers");

        for observer in &observers {
            observer.notify_observer(notification)?;
        }
        Ok(())
    }

    /// Number of observers registered for `notification_name`.
    pub fn observer_count(&self, notification_name: &str) -> usize {
        self.observer_map
            .read()
            .get(notification_name)
            .map_or(0, Vec::len)
    }

    /// Notification names with at least one observer, sorted.
    pub fn notification_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.observer_map.read().keys().cloned().collect();
        names.sort();
        names
    }

    // =========================================================================
    // Mediators
    // =========================================================================

    /// Register a mediator under its [`mediator_name`](Mediator::mediator_name).
    ///
    /// Fails with [`MvcError::DuplicateMediator`] and changes nothing if the
    /// name is taken. Otherwise the mediator's notifier is bound to this core,
    /// the mediator is stored, one observer is appended for each of its
    /// interests, and [`Mediator::on_register`] runs.
    pub fn register_mediator(&self, mediator: Arc<dyn Mediator>) -> Result<()> {
        let name = mediator.mediator_name().to_string();
        {
            let mut mediators = self.mediator_map.write();
            if mediators.contains_key(&name) {
                tracing::warn!(target: targets::VIEW, key = %self.key, mediator = %name, "duplicate mediator rejected");
                return Err(MvcError::DuplicateMediator(name));
            }
            mediator.notifier().bind(self.registry.clone(), &self.key);
            mediators.insert(name.clone(), mediator.clone());
        }

        let interests = mediator.list_notification_interests();
        for interest in &interests {
            let observer = Observer::new::<dyn Mediator, _>(
                |mediator, notification| mediator.handle_notification(notification),
                mediator.clone(),
            );
            self.register_observer(interest, observer);
        }
        tracing::debug!(target: targets::VIEW, key = %self.key, mediator = %name, interests = interests.len(), "mediator registered");

        mediator.on_register()
    }

    /// The mediator registered under `name`.
    pub fn retrieve_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        self.mediator_map.read().get(name).cloned()
    }

    /// The mediator registered under `name`, downcast to its concrete type.
    pub fn retrieve_mediator_as<T: Mediator>(&self, name: &str) -> Option<Arc<T>> {
        self.retrieve_mediator(name)?
            .into_any_arc()
            .downcast::<T>()
            .ok()
    }

    /// Whether a mediator is registered under `name`.
    pub fn has_mediator(&self, name: &str) -> bool {
        self.mediator_map.read().contains_key(name)
    }

    /// Remove the mediator registered under `name`.
    ///
    /// Its observer is removed from the list of every notification it is
    /// interested in, it is dropped from the name table, and then
    /// [`Mediator::on_remove`] runs. Returns `None` if nothing was registered.
    pub fn remove_mediator(&self, name: &str) -> Result<Option<Arc<dyn Mediator>>> {
        let Some(mediator) = self.retrieve_mediator(name) else {
            return Ok(None);
        };

        let context = ContextId::of(&*mediator);
        for interest in mediator.list_notification_interests() {
            self.remove_observer_by_context(&interest, context);
        }
        self.mediator_map.write().remove(name);
        tracing::debug!(target: targets::VIEW, key = %self.key, mediator = name, "mediator removed");

        mediator.on_remove()?;
        Ok(Some(mediator))
    }

    /// Names of all registered mediators, sorted.
    pub fn mediator_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.mediator_map.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Remove every mediator, running all `on_remove` hooks.
    ///
    /// Returns the first hook error after every mediator has been removed.
    pub(crate) fn remove_all_mediators(&self) -> Result<()> {
        let mut first_error = None;
        for name in self.mediator_names() {
            if let Err(err) = self.remove_mediator(&name) {
                tracing::warn!(target: targets::VIEW, key = %self.key, mediator = %name, error = %err, "mediator teardown failed");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("key", &self.key)
            .field("mediators", &self.mediator_names())
            .field("notifications", &self.notification_names())
            .finish()
    }
}
