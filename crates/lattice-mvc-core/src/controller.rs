//! The controller registry: notification-to-command bindings.
//!
//! A [`Controller`] maps notification names to command factories. The first
//! binding for a name subscribes one controller-owned [`Observer`] with the
//! core's [`View`]. When that notification is sent, the controller builds a
//! fresh command, binds it to the core, executes it and drops it. Commands
//! keep no state between notifications.
//!
//! Removing a binding also unsubscribes the controller's observer, so the
//! subscription table never holds inert entries.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::error::{CoreKind, MvcError, Result};
use crate::logging::targets;
use crate::multiton::{CoreRegistry, WeakCoreRegistry};
use crate::notification::Notification;
use crate::notifier::Notifier;
use crate::observer::Observer;
use crate::view::View;

/// One-shot business logic bound to a notification name.
///
/// A new command is constructed for every matching notification. Its
/// notifier is bound to the core before [`execute`](Self::execute) runs, so
/// the command can send notifications of its own.
pub trait Command: Notifier {
    /// Run the command for `notification`.
    fn execute(&self, notification: &Notification) -> Result<()>;
}

/// Builds a fresh command for each matching notification.
pub type CommandFactory = Arc<dyn Fn() -> Box<dyn Command> + Send + Sync>;

/// Wrap a typed constructor into a [`CommandFactory`].
pub fn command_factory<C, F>(factory: F) -> CommandFactory
where
    C: Command + 'static,
    F: Fn() -> C + Send + Sync + 'static,
{
    Arc::new(move || Box::new(factory()) as Box<dyn Command>)
}

/// Per-core command registry.
pub struct Controller {
    key: String,
    registry: WeakCoreRegistry,
    view: Arc<View>,
    command_map: RwLock<HashMap<String, CommandFactory>>,
    this: Weak<Controller>,
}

impl Controller {
    fn create(registry: &CoreRegistry, key: &str) -> Result<Arc<Self>> {
        let view = View::get_instance(registry, key)?;
        Ok(Arc::new_cyclic(|this| Self {
            key: key.to_string(),
            registry: registry.downgrade(),
            view,
            command_map: RwLock::new(HashMap::new()),
            this: this.clone(),
        }))
    }

    /// The controller for `key`, created on first use.
    ///
    /// Creating a controller also creates the view for `key` if needed.
    pub fn get_instance(registry: &CoreRegistry, key: &str) -> Result<Arc<Self>> {
        let (controller, _) = registry
            .controllers()
            .get_or_try_insert_with(key, || Self::create(registry, key))?;
        Ok(controller)
    }

    /// Construct the controller for `key` directly.
    ///
    /// Fails with [`MvcError::DuplicateCore`](crate::MvcError::DuplicateCore)
    /// if one already exists.
    pub fn new_instance(registry: &CoreRegistry, key: &str) -> Result<Arc<Self>> {
        crate::multiton::validate_key(key)?;
        if registry.controllers().contains(key) {
            return Err(MvcError::duplicate_core(CoreKind::Controller, key));
        }
        registry.controllers().insert_new(key, Self::create(registry, key)?)
    }

    /// Drop the controller for `key` from the registry.
    pub fn remove_controller(registry: &CoreRegistry, key: &str) -> bool {
        registry.controllers().remove(key).is_some()
    }

    /// The multiton key of this controller.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Bind `notification_name` to commands built by `factory`.
    ///
    /// Replaces any existing binding for the name. Only the first binding
    /// subscribes the controller with the view.
    ///
    /// # Example
    ///
    /// ```
    /// use lattice_mvc_core::{Command, Controller, CoreRegistry, Notification, Notifier, NotifierBase, Result};
    ///
    /// #[derive(Default)]
    /// struct Startup {
    ///     notifier: NotifierBase,
    /// }
    ///
    /// impl Notifier for Startup {
    ///     fn notifier(&self) -> &NotifierBase {
    ///         &self.notifier
    ///     }
    /// }
    ///
    /// impl Command for Startup {
    ///     fn execute(&self, _note: &Notification) -> Result<()> {
    ///         self.send_notification("started", None, None)
    ///     }
    /// }
    ///
    /// let registry = CoreRegistry::new();
    /// let controller = Controller::get_instance(&registry, "app").unwrap();
    /// controller.register_command("startup", Startup::default);
    /// assert!(controller.has_command("startup"));
    /// ```
    pub fn register_command<C, F>(&self, notification_name: &str, factory: F)
    where
        C: Command + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.register_command_factory(notification_name, command_factory(factory));
    }

    /// Bind `notification_name` to an already boxed factory.
    pub fn register_command_factory(&self, notification_name: &str, factory: CommandFactory) {
        let first_binding = self
            .command_map
            .write()
            .insert(notification_name.to_string(), factory)
            .is_none();

        if first_binding {
            self.view.register_observer(
                notification_name,
                Observer::new_weak(Controller::execute_command, self.this.clone()),
            );
        }
        tracing::debug!(target: targets::CONTROLLER, key = %self.key, notification = notification_name, first_binding, "command registered");
    }

    /// Build, bind and execute the command for `notification`.
    ///
    /// Does nothing if no command is bound to the notification's name.
    pub fn execute_command(&self, notification: &Notification) -> Result<()> {
        let Some(factory) = self.command_map.read().get(notification.name()).cloned() else {
            return Ok(());
        };

        let command = factory();
        command.notifier().bind(self.registry.clone(), &self.key);
        tracing::trace!(target: targets::CONTROLLER, key = %self.key, notification = notification.name(), "executing command");
        command.execute(notification)
    }

    /// Whether a command is bound to `notification_name`.
    pub fn has_command(&self, notification_name: &str) -> bool {
        self.command_map.read().contains_key(notification_name)
    }

    /// Remove the binding for `notification_name` and unsubscribe the
    /// controller's observer for it.
    ///
    /// Returns whether a binding existed.
    pub fn remove_command(&self, notification_name: &str) -> bool {
        let removed = self.command_map.write().remove(notification_name).is_some();
        if removed {
            self.view.remove_observer(notification_name, self);
            tracing::debug!(target: targets::CONTROLLER, key = %self.key, notification = notification_name, "command removed");
        }
        removed
    }

    /// Notification names with a bound command, sorted.
    pub fn command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.command_map.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Remove every binding.
    pub(crate) fn remove_all_commands(&self) {
        for name in self.command_names() {
            self.remove_command(&name);
        }
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("key", &self.key)
            .field("commands", &self.command_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::NotifierBase;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

    struct CountingCommand {
        notifier: NotifierBase,
        instance: usize,
        log: Arc<Mutex<Vec<(usize, String)>>>,
    }

    impl Notifier for CountingCommand {
        fn notifier(&self) -> &NotifierBase {
            &self.notifier
        }
    }

    impl Command for CountingCommand {
        fn execute(&self, notification: &Notification) -> Result<()> {
            self.log
                .lock()
                .push((self.instance, notification.name().to_string()));
            Ok(())
        }
    }

    fn setup(key: &str) -> (CoreRegistry, Arc<Controller>, Arc<View>) {
        let registry = CoreRegistry::new();
        let controller = Controller::get_instance(&registry, key).unwrap();
        let view = View::get_instance(&registry, key).unwrap();
        (registry, controller, view)
    }

    fn counting(log: &Arc<Mutex<Vec<(usize, String)>>>) -> impl Fn() -> CountingCommand + Send + Sync + use<> {
        let log = log.clone();
        move || CountingCommand {
            notifier: NotifierBase::new(),
            instance: CONSTRUCTED.fetch_add(1, Ordering::SeqCst),
            log: log.clone(),
        }
    }

    #[test]
    fn test_fresh_command_per_notification() {
        let (_registry, controller, view) = setup("controller_fresh");
        let log = Arc::new(Mutex::new(Vec::new()));
        controller.register_command("X", counting(&log));

        view.notify_observers(&Notification::new("X")).unwrap();
        view.notify_observers(&Notification::new("X")).unwrap();

        let log = log.lock();
        assert_eq!(log.len(), 2);
        assert_ne!(log[0].0, log[1].0);
    }

    #[test]
    fn test_reregistration_does_not_duplicate_observer() {
        let (_registry, controller, view) = setup("controller_rereg");
        let log = Arc::new(Mutex::new(Vec::new()));
        controller.register_command("X", counting(&log));
        controller.register_command("X", counting(&log));

        assert_eq!(view.observer_count("X"), 1);
        view.notify_observers(&Notification::new("X")).unwrap();
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_reregistration_replaces_factory() {
        let (_registry, controller, view) = setup("controller_replace");
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));
        controller.register_command("X", counting(&first));
        controller.register_command("X", counting(&second));

        view.notify_observers(&Notification::new("X")).unwrap();
        assert!(first.lock().is_empty());
        assert_eq!(second.lock().len(), 1);
    }

    #[test]
    fn test_remove_command_unsubscribes() {
        let (_registry, controller, view) = setup("controller_remove");
        let log = Arc::new(Mutex::new(Vec::new()));
        controller.register_command("X", counting(&log));

        assert!(controller.remove_command("X"));
        assert!(!controller.has_command("X"));
        assert!(!controller.remove_command("X"));
        assert_eq!(view.observer_count("X"), 0);

        view.notify_observers(&Notification::new("X")).unwrap();
        assert!(log.lock().is_empty());

        // Binding again subscribes again.
        controller.register_command("X", counting(&log));
        assert_eq!(view.observer_count("X"), 1);
    }

    #[test]
    fn test_command_is_bound_to_core() {
        struct KeyCheck {
            notifier: NotifierBase,
            seen: Arc<Mutex<Option<String>>>,
        }

        impl Notifier for KeyCheck {
            fn notifier(&self) -> &NotifierBase {
                &self.notifier
            }
        }

        impl Command for KeyCheck {
            fn execute(&self, _: &Notification) -> Result<()> {
                *self.seen.lock() = self.multiton_key();
                Ok(())
            }
        }

        let (_registry, controller, _view) = setup("controller_bound");
        let seen = Arc::new(Mutex::new(None));
        let check_seen = seen.clone();
        controller.register_command("check_key", move || KeyCheck {
            notifier: NotifierBase::new(),
            seen: check_seen.clone(),
        });

        controller
            .execute_command(&Notification::new("check_key"))
            .unwrap();
        assert_eq!(seen.lock().as_deref(), Some("controller_bound"));
    }

    #[test]
    fn test_execute_unbound_is_noop() {
        let (_registry, controller, _view) = setup("controller_unbound");
        controller
            .execute_command(&Notification::new("nothing"))
            .unwrap();
    }

    #[test]
    fn test_new_instance_duplicate() {
        let (registry, _controller, _view) = setup("controller_direct");
        let err = Controller::new_instance(&registry, "controller_direct").unwrap_err();
        assert!(matches!(
            err,
            MvcError::DuplicateCore { kind: CoreKind::Controller, .. }
        ));
    }

    #[test]
    fn test_empty_key_rejected() {
        let registry = CoreRegistry::new();
        assert!(matches!(Controller::new_instance(&registry, ""), Err(MvcError::EmptyKey)));
        assert!(matches!(Controller::get_instance(&registry, ""), Err(MvcError::EmptyKey)));
        assert!(registry.controllers().is_empty());
    }

    #[test]
    fn test_dropped_controller_observer_is_inert() {
        let (registry, controller, view) = setup("controller_dropped");
        let log = Arc::new(Mutex::new(Vec::new()));
        controller.register_command("X", counting(&log));

        Controller::remove_controller(&registry, "controller_dropped");
        drop(controller);

        view.notify_observers(&Notification::new("X")).unwrap();
        assert!(log.lock().is_empty());
    }
}
