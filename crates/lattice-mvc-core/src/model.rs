//! The model registry: named proxies per core.
//!
//! # Key Types
//!
//! - [`Proxy`] - Trait implemented by application data holders
//! - [`Model`] - Per-core store of proxies, keyed by proxy name
//!
//! Proxy names are unique within a model. Registering a name that is taken
//! fails with [`MvcError::DuplicateProxy`]; callers remove the old proxy
//! first.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{MvcError, Result};
use crate::logging::targets;
use crate::multiton::{CoreRegistry, WeakCoreRegistry};
use crate::notifier::{AsAny, Notifier};

/// A named holder of model data.
///
/// The lifecycle hooks run synchronously inside [`Model::register_proxy`] and
/// [`Model::remove_proxy`]. Errors they return propagate to the caller.
pub trait Proxy: Notifier + AsAny {
    /// The name this proxy is registered under.
    fn proxy_name(&self) -> &str;

    /// Called after the proxy has been stored in the model.
    fn on_register(&self) -> Result<()> {
        Ok(())
    }

    /// Called after the proxy has been removed from the model.
    fn on_remove(&self) -> Result<()> {
        Ok(())
    }
}

/// Per-core proxy registry.
pub struct Model {
    key: String,
    registry: WeakCoreRegistry,
    proxy_map: RwLock<HashMap<String, Arc<dyn Proxy>>>,
}

impl Model {
    fn create(registry: &CoreRegistry, key: &str) -> Arc<Self> {
        Arc::new(Self {
            key: key.to_string(),
            registry: registry.downgrade(),
            proxy_map: RwLock::new(HashMap::new()),
        })
    }

    /// The model for `key`, created on first use.
    pub fn get_instance(registry: &CoreRegistry, key: &str) -> Result<Arc<Self>> {
        let (model, _) = registry
            .models()
            .get_or_try_insert_with(key, || Ok(Self::create(registry, key)))?;
        Ok(model)
    }

    /// Construct the model for `key` directly.
    ///
    /// Fails with [`MvcError::DuplicateCore`] if one already exists.
    pub fn new_instance(registry: &CoreRegistry, key: &str) -> Result<Arc<Self>> {
        registry.models().insert_new(key, Self::create(registry, key))
    }

    /// Drop the model for `key` from the registry.
    ///
    /// Registered proxies are not notified; the facade handles that during
    /// [`Facade::remove_core`](crate::Facade::remove_core).
    pub fn remove_model(registry: &CoreRegistry, key: &str) -> bool {
        registry.models().remove(key).is_some()
    }

    /// The multiton key of this model.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Register a proxy under its [`proxy_name`](Proxy::proxy_name).
    ///
    /// The proxy's notifier is bound to this core, the proxy is stored, and
    /// then [`Proxy::on_register`] runs. If the hook fails the proxy stays
    /// registered and the error is returned.
    pub fn register_proxy(&self, proxy: Arc<dyn Proxy>) -> Result<()> {
        let name = proxy.proxy_name().to_string();
        {
            let mut proxies = self.proxy_map.write();
            if proxies.contains_key(&name) {
                tracing::warn!(target: targets::MODEL, key = %self.key, proxy = %name, "duplicate proxy rejected");
                return Err(MvcError::DuplicateProxy(name));
            }
            proxy.notifier().bind(self.registry.clone(), &self.key);
            proxies.insert(name.clone(), proxy.clone());
        }
        tracing::debug!(target: targets::MODEL, key = %self.key, proxy = %name, "proxy registered");
        proxy.on_register()
    }

    /// The proxy registered under `name`.
    pub fn retrieve_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        self.proxy_map.read().get(name).cloned()
    }

    /// The proxy registered under `name`, downcast to its concrete type.
    pub fn retrieve_proxy_as<T: Proxy>(&self, name: &str) -> Option<Arc<T>> {
        self.retrieve_proxy(name)?.into_any_arc().downcast::<T>().ok()
    }

    /// Whether a proxy is registered under `name`.
    pub fn has_proxy(&self, name: &str) -> bool {
        self.proxy_map.read().contains_key(name)
    }

    /// Remove the proxy registered under `name`.
    ///
    /// Returns the removed proxy after [`Proxy::on_remove`] has run, or
    /// `None` if nothing was registered.
    pub fn remove_proxy(&self, name: &str) -> Result<Option<Arc<dyn Proxy>>> {
        let Some(proxy) = self.proxy_map.write().remove(name) else {
            return Ok(None);
        };
        tracing::debug!(target: targets::MODEL, key = %self.key, proxy = name, "proxy removed");
        proxy.on_remove()?;
        Ok(Some(proxy))
    }

    /// Names of all registered proxies, sorted.
    pub fn proxy_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.proxy_map.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Remove every proxy, running all `on_remove` hooks.
    ///
    /// Returns the first hook error after every proxy has been removed.
    pub(crate) fn remove_all_proxies(&self) -> Result<()> {
        let mut first_error = None;
        for name in self.proxy_names() {
            if let Err(err) = self.remove_proxy(&name) {
                tracing::warn!(target: targets::MODEL, key = %self.key, proxy = %name, error = %err, "proxy teardown failed");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("key", &self.key)
            .field("proxies", &self.proxy_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreKind;
    use crate::notifier::NotifierBase;
    use parking_lot::Mutex;

    struct TestProxy {
        name: String,
        notifier: NotifierBase,
        events: Arc<Mutex<Vec<String>>>,
    }

    impl TestProxy {
        fn new(name: &str, events: Arc<Mutex<Vec<String>>>) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                notifier: NotifierBase::new(),
                events,
            })
        }
    }

    impl Notifier for TestProxy {
        fn notifier(&self) -> &NotifierBase {
            &self.notifier
        }
    }

    impl Proxy for TestProxy {
        fn proxy_name(&self) -> &str {
            &self.name
        }

        fn on_register(&self) -> Result<()> {
            self.events.lock().push(format!("register:{}", self.name));
            Ok(())
        }

        fn on_remove(&self) -> Result<()> {
            self.events.lock().push(format!("remove:{}", self.name));
            Ok(())
        }
    }

    fn setup(key: &str) -> (CoreRegistry, Arc<Model>) {
        let registry = CoreRegistry::new();
        let model = Model::get_instance(&registry, key).unwrap();
        (registry, model)
    }

    #[test]
    fn test_register_and_retrieve() {
        let (_registry, model) = setup("model_register");
        let events = Arc::new(Mutex::new(Vec::new()));
        let proxy = TestProxy::new("Users", events.clone());

        model.register_proxy(proxy.clone()).unwrap();

        assert!(model.has_proxy("Users"));
        assert_eq!(*events.lock(), vec!["register:Users"]);
        assert_eq!(proxy.multiton_key().as_deref(), Some("model_register"));
        let typed = model.retrieve_proxy_as::<TestProxy>("Users").unwrap();
        assert!(Arc::ptr_eq(&typed, &proxy));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_registry, model) = setup("model_dup");
        let events = Arc::new(Mutex::new(Vec::new()));
        model.register_proxy(TestProxy::new("P", events.clone())).unwrap();

        let err = model.register_proxy(TestProxy::new("P", events.clone())).unwrap_err();
        assert!(matches!(err, MvcError::DuplicateProxy(name) if name == "P"));
        // The second proxy's hook never ran.
        assert_eq!(events.lock().len(), 1);
    }

    #[test]
    fn test_remove_round_trip() {
        let (_registry, model) = setup("model_remove");
        let events = Arc::new(Mutex::new(Vec::new()));
        let proxy = TestProxy::new("Cart", events.clone());
        model.register_proxy(proxy.clone()).unwrap();

        let removed = model.remove_proxy("Cart").unwrap().unwrap();
        let removed = removed.into_any_arc().downcast::<TestProxy>().unwrap();
        assert!(Arc::ptr_eq(&removed, &proxy));
        assert!(model.retrieve_proxy("Cart").is_none());
        assert_eq!(*events.lock(), vec!["register:Cart", "remove:Cart"]);
    }

    #[test]
    fn test_remove_absent_is_none() {
        let (_registry, model) = setup("model_absent");
        assert!(model.remove_proxy("missing").unwrap().is_none());
        assert!(model.retrieve_proxy("missing").is_none());
        assert!(!model.has_proxy("missing"));
    }

    #[test]
    fn test_retrieve_as_wrong_type() {
        let (_registry, model) = setup("model_wrong_type");
        model
            .register_proxy(Arc::new(crate::patterns::DataProxy::new("Count", 3_u32)))
            .unwrap();
        assert!(model.retrieve_proxy_as::<TestProxy>("Count").is_none());
    }

    #[test]
    fn test_new_instance_duplicate() {
        let (registry, _model) = setup("model_direct");
        let err = Model::new_instance(&registry, "model_direct").unwrap_err();
        assert!(matches!(err, MvcError::DuplicateCore { kind: CoreKind::Model, .. }));
    }

    #[test]
    fn test_remove_model_does_not_cascade() {
        let (registry, model) = setup("model_no_cascade");
        let events = Arc::new(Mutex::new(Vec::new()));
        model.register_proxy(TestProxy::new("Kept", events.clone())).unwrap();

        assert!(Model::remove_model(&registry, "model_no_cascade"));
        assert!(!Model::remove_model(&registry, "model_no_cascade"));
        assert_eq!(*events.lock(), vec!["register:Kept"]);

        let fresh = Model::get_instance(&registry, "model_no_cascade").unwrap();
        assert!(!fresh.has_proxy("Kept"));
    }

    struct FailingHooks {
        notifier: NotifierBase,
        fail_register: bool,
        fail_remove: bool,
    }

    impl Notifier for FailingHooks {
        fn notifier(&self) -> &NotifierBase {
            &self.notifier
        }
    }

    impl Proxy for FailingHooks {
        fn proxy_name(&self) -> &str {
            "Failing"
        }

        fn on_register(&self) -> Result<()> {
            if self.fail_register {
                return Err(MvcError::handler("register hook failed"));
            }
            Ok(())
        }

        fn on_remove(&self) -> Result<()> {
            if self.fail_remove {
                return Err(MvcError::handler("remove hook failed"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_failing_on_register_keeps_proxy() {
        let (_registry, model) = setup("model_register_hook");
        let err = model
            .register_proxy(Arc::new(FailingHooks {
                notifier: NotifierBase::new(),
                fail_register: true,
                fail_remove: false,
            }))
            .unwrap_err();

        assert!(matches!(err, MvcError::Handler(_)));
        assert_eq!(err.to_string(), "Handler error: register hook failed");
        assert!(model.has_proxy("Failing"));
    }

    #[test]
    fn test_failing_on_remove_still_removes() {
        let (_registry, model) = setup("model_remove_hook");
        model
            .register_proxy(Arc::new(FailingHooks {
                notifier: NotifierBase::new(),
                fail_register: false,
                fail_remove: true,
            }))
            .unwrap();

        let err = model.remove_proxy("Failing").err().expect("expected Err");
        assert_eq!(err.to_string(), "Handler error: remove hook failed");
        assert!(!model.has_proxy("Failing"));
    }

    #[test]
    fn test_empty_key_rejected() {
        let registry = CoreRegistry::new();
        assert!(matches!(Model::get_instance(&registry, ""), Err(MvcError::EmptyKey)));
        assert!(matches!(Model::new_instance(&registry, ""), Err(MvcError::EmptyKey)));
        assert!(registry.models().is_empty());
    }
}
