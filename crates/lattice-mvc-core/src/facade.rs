//! The facade: single entry point to one core.
//!
//! A [`Facade`] owns the [`Model`], [`View`] and [`Controller`] of its key and
//! re-exposes their operations. It is also the only place that tears a core
//! down: [`Facade::remove_core`] unwinds every actor, runs their removal hooks
//! and then deletes all four registry entries.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lattice_mvc_core::{CoreRegistry, DataProxy, Facade, FacadeBuilder};
//!
//! let registry = CoreRegistry::new();
//! let facade = FacadeBuilder::new()
//!     .proxy(Arc::new(DataProxy::new("Settings", vec!["dark".to_string()])))
//!     .build(&registry, "app")
//!     .unwrap();
//!
//! assert!(facade.has_proxy("Settings"));
//! assert!(Facade::has_core(&registry, "app"));
//!
//! Facade::remove_core(&registry, "app").unwrap();
//! assert!(!Facade::has_core(&registry, "app"));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::controller::{Command, CommandFactory, Controller, command_factory};
use crate::error::{CoreKind, MvcError, Result};
use crate::logging::targets;
use crate::model::{Model, Proxy};
use crate::multiton::CoreRegistry;
use crate::notification::{Body, Notification};
use crate::view::{Mediator, View};

/// Entry point to one core.
pub struct Facade {
    key: String,
    model: Arc<Model>,
    view: Arc<View>,
    controller: Arc<Controller>,
}

impl Facade {
    fn create(registry: &CoreRegistry, key: &str) -> Result<Arc<Self>> {
        let model = Model::get_instance(registry, key)?;
        let view = View::get_instance(registry, key)?;
        let controller = Controller::get_instance(registry, key)?;
        Ok(Arc::new(Self {
            key: key.to_string(),
            model,
            view,
            controller,
        }))
    }

    /// The facade for `key`, created with its model, view and controller on
    /// first use.
    pub fn get_instance(registry: &CoreRegistry, key: &str) -> Result<Arc<Self>> {
        Self::get_instance_with(registry, key, |_| Ok(()))
    }

    /// Like [`get_instance`](Self::get_instance), but runs `init` once when
    /// the core is newly created.
    ///
    /// `init` runs after the facade is stored, so it may register actors and
    /// send notifications through the core. If it fails, the core stays
    /// registered and the error is returned.
    pub fn get_instance_with<F>(registry: &CoreRegistry, key: &str, init: F) -> Result<Arc<Self>>
    where
        F: FnOnce(&Arc<Facade>) -> Result<()>,
    {
        let (facade, created) = registry
            .facades()
            .get_or_try_insert_with(key, || Self::create(registry, key))?;
        if created {
            tracing::debug!(target: targets::FACADE, key, "core created");
            init(&facade)?;
        }
        Ok(facade)
    }

    /// Construct the facade for `key` directly.
    ///
    /// Fails with [`MvcError::DuplicateCore`] if one already exists.
    pub fn new_instance(registry: &CoreRegistry, key: &str) -> Result<Arc<Self>> {
        crate::multiton::validate_key(key)?;
        if registry.facades().contains(key) {
            return Err(MvcError::duplicate_core(CoreKind::Facade, key));
        }
        registry.facades().insert_new(key, Self::create(registry, key)?)
    }

    /// Whether a core exists for `key`.
    pub fn has_core(registry: &CoreRegistry, key: &str) -> bool {
        registry.facades().contains(key)
    }

    /// Tear down the core for `key`.
    ///
    /// Commands are unbound first, then every mediator and every proxy is
    /// removed with its `on_remove` hook, while the core is still resolvable.
    /// Afterwards the controller, view, model and facade entries are deleted
    /// in that order. All hooks run even if one fails; the first failure is
    /// returned once the core is gone. Unknown keys are a no-op.
    pub fn remove_core(registry: &CoreRegistry, key: &str) -> Result<()> {
        let mut first_error = None;

        if let Some(controller) = registry.controllers().get(key) {
            controller.remove_all_commands();
        }
        if let Some(view) = registry.views().get(key)
            && let Err(err) = view.remove_all_mediators()
        {
            first_error.get_or_insert(err);
        }
        if let Some(model) = registry.models().get(key)
            && let Err(err) = model.remove_all_proxies()
        {
            first_error.get_or_insert(err);
        }

        Controller::remove_controller(registry, key);
        View::remove_view(registry, key);
        Model::remove_model(registry, key);
        if registry.facades().remove(key).is_some() {
            tracing::debug!(target: targets::FACADE, key, "core removed");
        }

        match first_error {
            Some(err) => {
                tracing::warn!(target: targets::FACADE, key, error = %err, "core removed with hook failures");
                Err(err)
            }
            None => Ok(()),
        }
    }

    /// The multiton key of this core.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The core's model.
    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// The core's view.
    pub fn view(&self) -> &Arc<View> {
        &self.view
    }

    /// The core's controller.
    pub fn controller(&self) -> &Arc<Controller> {
        &self.controller
    }

    // =========================================================================
    // Proxies
    // =========================================================================

    /// See [`Model::register_proxy`].
    pub fn register_proxy(&self, proxy: Arc<dyn Proxy>) -> Result<()> {
        self.model.register_proxy(proxy)
    }

    /// See [`Model::retrieve_proxy`].
    pub fn retrieve_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        self.model.retrieve_proxy(name)
    }

    /// See [`Model::retrieve_proxy_as`].
    pub fn retrieve_proxy_as<T: Proxy>(&self, name: &str) -> Option<Arc<T>> {
        self.model.retrieve_proxy_as(name)
    }

    /// See [`Model::has_proxy`].
    pub fn has_proxy(&self, name: &str) -> bool {
        self.model.has_proxy(name)
    }

    /// See [`Model::remove_proxy`].
    pub fn remove_proxy(&self, name: &str) -> Result<Option<Arc<dyn Proxy>>> {
        self.model.remove_proxy(name)
    }

    // =========================================================================
    // Mediators
    // =========================================================================

    /// See [`View::register_mediator`].
    pub fn register_mediator(&self, mediator: Arc<dyn Mediator>) -> Result<()> {
        self.view.register_mediator(mediator)
    }

    /// See [`View::retrieve_mediator`].
    pub fn retrieve_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        self.view.retrieve_mediator(name)
    }

    /// See [`View::retrieve_mediator_as`].
    pub fn retrieve_mediator_as<T: Mediator>(&self, name: &str) -> Option<Arc<T>> {
        self.view.retrieve_mediator_as(name)
    }

    /// See [`View::has_mediator`].
    pub fn has_mediator(&self, name: &str) -> bool {
        self.view.has_mediator(name)
    }

    /// See [`View::remove_mediator`].
    pub fn remove_mediator(&self, name: &str) -> Result<Option<Arc<dyn Mediator>>> {
        self.view.remove_mediator(name)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// See [`Controller::register_command`].
    pub fn register_command<C, F>(&self, notification_name: &str, factory: F)
    where
        C: Command + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.controller.register_command(notification_name, factory);
    }

    /// See [`Controller::has_command`].
    pub fn has_command(&self, notification_name: &str) -> bool {
        self.controller.has_command(notification_name)
    }

    /// See [`Controller::remove_command`].
    pub fn remove_command(&self, notification_name: &str) -> bool {
        self.controller.remove_command(notification_name)
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Build a notification and deliver it to this core's observers.
    pub fn send_notification(
        &self,
        name: &str,
        body: Option<Body>,
        notification_type: Option<&str>,
    ) -> Result<()> {
        let mut notification = Notification::new(name);
        notification.set_body(body);
        notification.set_type(notification_type.map(str::to_string));
        self.notify_observers(&notification)
    }

    /// See [`View::notify_observers`].
    pub fn notify_observers(&self, notification: &Notification) -> Result<()> {
        self.view.notify_observers(notification)
    }
}

impl fmt::Debug for Facade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Facade")
            .field("key", &self.key)
            .field("model", &self.model)
            .field("view", &self.view)
            .field("controller", &self.controller)
            .finish()
    }
}

/// Declarative setup for a new core.
///
/// Actors are registered in a fixed order when the core is created: commands,
/// then proxies, then mediators. The startup notification, if any, is sent
/// last. Building a key that already has a core returns the existing facade
/// and registers nothing.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use lattice_mvc_core::{CoreRegistry, DataProxy, FacadeBuilder, MediatorBase};
///
/// let registry = CoreRegistry::new();
/// let facade = FacadeBuilder::new()
///     .proxy(Arc::new(DataProxy::new("Counter", 0_i64)))
///     .mediator(Arc::new(MediatorBase::new("Root")))
///     .startup("ready", None)
///     .build(&registry, "counter_app")
///     .unwrap();
///
/// assert!(facade.has_proxy("Counter"));
/// assert!(facade.has_mediator("Root"));
/// ```
#[derive(Default)]
pub struct FacadeBuilder {
    commands: Vec<(String, CommandFactory)>,
    proxies: Vec<Arc<dyn Proxy>>,
    mediators: Vec<Arc<dyn Mediator>>,
    startup: Option<Notification>,
}

impl FacadeBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `notification_name` to commands built by `factory`.
    pub fn command<C, F>(mut self, notification_name: &str, factory: F) -> Self
    where
        C: Command + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.commands
            .push((notification_name.to_string(), command_factory(factory)));
        self
    }

    /// Register `proxy`.
    pub fn proxy(mut self, proxy: Arc<dyn Proxy>) -> Self {
        self.proxies.push(proxy);
        self
    }

    /// Register `mediator`.
    pub fn mediator(mut self, mediator: Arc<dyn Mediator>) -> Self {
        self.mediators.push(mediator);
        self
    }

    /// Send a notification once every actor is registered.
    pub fn startup(mut self, name: &str, body: Option<Body>) -> Self {
        let mut notification = Notification::new(name);
        notification.set_body(body);
        self.startup = Some(notification);
        self
    }

    /// Create the core for `key` and apply the configuration.
    ///
    /// The first registration error stops the setup and is returned; the
    /// core keeps whatever was registered before it.
    pub fn build(self, registry: &CoreRegistry, key: &str) -> Result<Arc<Facade>> {
        let Self {
            commands,
            proxies,
            mediators,
            startup,
        } = self;

        Facade::get_instance_with(registry, key, move |facade| {
            for (name, factory) in commands {
                facade.controller().register_command_factory(&name, factory);
            }
            for proxy in proxies {
                facade.register_proxy(proxy)?;
            }
            for mediator in mediators {
                facade.register_mediator(mediator)?;
            }
            if let Some(notification) = startup {
                crate::mvc_debug!(key = facade.key(), notification = notification.name(), "sending startup notification");
                facade.notify_observers(&notification)?;
            }
            Ok(())
        })
    }
}

impl fmt::Debug for FacadeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacadeBuilder")
            .field("commands", &self.commands.iter().map(|(name, _)| name).collect::<Vec<_>>())
            .field("proxies", &self.proxies.iter().map(|p| p.proxy_name()).collect::<Vec<_>>())
            .field("mediators", &self.mediators.iter().map(|m| m.mediator_name()).collect::<Vec<_>>())
            .field("startup", &self.startup.as_ref().map(Notification::name))
            .finish()
    }
}
