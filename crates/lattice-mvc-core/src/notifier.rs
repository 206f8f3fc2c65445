//! The notifier capability shared by proxies, mediators and commands.
//!
//! Any type that embeds a [`NotifierBase`] and implements [`Notifier`] can
//! send notifications through its core's [`Facade`]. The binding to a core is
//! established by [`Notifier::initialize_notifier`]; the [`Model`](crate::Model),
//! [`View`](crate::View) and [`Controller`](crate::Controller) do this for the
//! actors they manage.
//!
//! # Example
//!
//! ```
//! use lattice_mvc_core::{CoreRegistry, Notifier, NotifierBase};
//!
//! #[derive(Default)]
//! struct Heartbeat {
//!     notifier: NotifierBase,
//! }
//!
//! impl Notifier for Heartbeat {
//!     fn notifier(&self) -> &NotifierBase {
//!         &self.notifier
//!     }
//! }
//!
//! let registry = CoreRegistry::new();
//! let heartbeat = Heartbeat::default();
//! assert!(heartbeat.send_notification("beat", None, None).is_err());
//!
//! heartbeat.initialize_notifier(&registry, "app");
//! heartbeat.send_notification("beat", None, None).unwrap();
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{MvcError, Result};
use crate::facade::Facade;
use crate::logging::targets;
use crate::multiton::{CoreRegistry, WeakCoreRegistry};
use crate::notification::Body;

/// Upcasting helper used for typed retrieval of proxies and mediators.
///
/// Blanket-implemented for every `'static + Send + Sync` type.
pub trait AsAny: Any + Send + Sync {
    /// Borrow as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Convert a shared handle into a shared `dyn Any`.
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

#[derive(Clone)]
struct Binding {
    key: String,
    registry: WeakCoreRegistry,
}

/// Per-object notifier state: the core this object talks to.
#[derive(Default)]
pub struct NotifierBase {
    binding: RwLock<Option<Binding>>,
}

impl NotifierBase {
    /// Create an unbound notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind this notifier to the core `key` of `registry`.
    pub fn initialize(&self, registry: &CoreRegistry, key: &str) {
        self.bind(registry.downgrade(), key);
    }

    pub(crate) fn bind(&self, registry: WeakCoreRegistry, key: &str) {
        tracing::trace!(target: targets::NOTIFIER, key, "notifier bound");
        *self.binding.write() = Some(Binding {
            key: key.to_string(),
            registry,
        });
    }

    /// Bind this notifier to whatever core `other` is bound to.
    pub(crate) fn bind_like(&self, other: &NotifierBase) {
        if let Some(binding) = other.binding.read().clone() {
            *self.binding.write() = Some(binding);
        }
    }

    /// The bound multiton key, if initialized.
    pub fn key(&self) -> Option<String> {
        self.binding.read().as_ref().map(|b| b.key.clone())
    }

    /// Whether [`initialize`](Self::initialize) has been called.
    pub fn is_initialized(&self) -> bool {
        self.binding.read().is_some()
    }

    /// Resolve the bound core's facade.
    ///
    /// This goes through [`Facade::get_instance`], so a core that was removed
    /// resolves to a fresh generation under the same key.
    pub fn facade(&self) -> Result<Arc<Facade>> {
        let binding = self
            .binding
            .read()
            .clone()
            .ok_or(MvcError::NotifierUninitialized)?;
        let registry = binding
            .registry
            .upgrade()
            .ok_or_else(|| MvcError::RegistryDropped(binding.key.clone()))?;
        Facade::get_instance(&registry, &binding.key)
    }

    /// Build a notification and send it through the bound facade.
    pub fn send_notification(
        &self,
        name: &str,
        body: Option<Body>,
        notification_type: Option<&str>,
    ) -> Result<()> {
        self.facade()?.send_notification(name, body, notification_type)
    }
}

impl fmt::Debug for NotifierBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifierBase")
            .field("key", &self.key())
            .finish()
    }
}

/// Capability to send notifications through a core's facade.
///
/// Implementors only provide [`notifier`](Self::notifier); everything else
/// is derived from it. `#[derive(Notifier)]` from `lattice-mvc-macros`
/// generates the implementation.
pub trait Notifier {
    /// The embedded notifier state.
    fn notifier(&self) -> &NotifierBase;

    /// Bind this object to the core `key` of `registry`.
    fn initialize_notifier(&self, registry: &CoreRegistry, key: &str) {
        self.notifier().initialize(registry, key);
    }

    /// The bound multiton key, if initialized.
    fn multiton_key(&self) -> Option<String> {
        self.notifier().key()
    }

    /// The facade of the bound core.
    fn facade(&self) -> Result<Arc<Facade>> {
        self.notifier().facade()
    }

    /// Send a notification through the bound core.
    ///
    /// Fails with [`MvcError::NotifierUninitialized`] before
    /// [`initialize_notifier`](Self::initialize_notifier).
    fn send_notification(
        &self,
        name: &str,
        body: Option<Body>,
        notification_type: Option<&str>,
    ) -> Result<()> {
        self.notifier()
            .send_notification(name, body, notification_type)
    }
}

impl Notifier for NotifierBase {
    fn notifier(&self) -> &NotifierBase {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::Notification;
    use crate::observer::Observer;
    use parking_lot::Mutex;

    #[test]
    fn test_uninitialized_send_fails() {
        let notifier = NotifierBase::new();
        assert!(!notifier.is_initialized());
        let err = notifier.send_notification("x", None, None).unwrap_err();
        assert!(matches!(err, MvcError::NotifierUninitialized));
    }

    #[test]
    fn test_send_reaches_core() {
        let registry = CoreRegistry::new();
        let facade = Facade::get_instance(&registry, "notifier_core").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        facade.view().register_observer(
            "ping",
            Observer::new(
                |seen: &Mutex<Vec<String>>, note: &Notification| {
                    seen.lock().push(note.name().to_string());
                    Ok(())
                },
                seen.clone(),
            ),
        );

        let notifier = NotifierBase::new();
        notifier.initialize(&registry, "notifier_core");
        assert_eq!(notifier.key().as_deref(), Some("notifier_core"));
        notifier.send_notification("ping", None, None).unwrap();

        assert_eq!(*seen.lock(), vec!["ping"]);
    }

    #[test]
    fn test_dropped_registry() {
        let notifier = NotifierBase::new();
        {
            let registry = CoreRegistry::new();
            notifier.initialize(&registry, "short_lived");
        }
        let err = notifier.facade().unwrap_err();
        assert!(matches!(err, MvcError::RegistryDropped(key) if key == "short_lived"));
    }

    #[test]
    fn test_into_any_arc_downcast() {
        let value: Arc<dyn AsAny> = Arc::new(5_u8);
        let any = value.into_any_arc();
        assert_eq!(*any.downcast::<u8>().unwrap(), 5);
    }
}
