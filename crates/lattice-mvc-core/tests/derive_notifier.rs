//! Integration tests for the #[derive(Notifier)] macro.

use std::sync::Arc;

use lattice_mvc_core::{
    Command, CoreRegistry, MediatorBase, Mediator, MvcError, Notification, Notifier, NotifierBase,
    Proxy, Result,
};
use lattice_mvc_macros::Notifier;
use parking_lot::Mutex;

// Delegates to the field named `notifier`.
#[derive(Notifier, Default)]
struct Announce {
    notifier: NotifierBase,
}

impl Command for Announce {
    fn execute(&self, _notification: &Notification) -> Result<()> {
        self.send_notification("announced", None, Some("derived"))
    }
}

// Delegates to the field named `base`.
#[derive(Notifier)]
struct Settings {
    base: NotifierBase,
    values: Mutex<Vec<String>>,
}

impl Proxy for Settings {
    fn proxy_name(&self) -> &str {
        "Settings"
    }
}

// Delegates to the marked field, which is itself a notifier.
#[derive(Notifier)]
struct Banner {
    title: String,
    #[notifier]
    mediator: MediatorBase,
    seen: Mutex<Vec<String>>,
}

impl Mediator for Banner {
    fn mediator_name(&self) -> &str {
        self.mediator.name()
    }

    fn list_notification_interests(&self) -> Vec<String> {
        vec!["announced".into()]
    }

    fn handle_notification(&self, notification: &Notification) -> Result<()> {
        let kind = notification.notification_type().unwrap_or("none");
        self.seen.lock().push(format!("{}:{kind}", self.title));
        Ok(())
    }
}

// Tuple structs and generics are supported.
#[derive(Notifier)]
struct Wrapper<T: Send + Sync + 'static>(#[notifier] NotifierBase, T);

#[test]
fn test_named_notifier_field() {
    let announce = Announce::default();
    assert!(announce.multiton_key().is_none());
    assert!(matches!(
        announce.send_notification("x", None, None),
        Err(MvcError::NotifierUninitialized)
    ));
}

#[test]
fn test_base_field_is_bound_on_registration() {
    let registry = CoreRegistry::new();
    let facade = registry.facade("derive_base").unwrap();
    let settings = Arc::new(Settings {
        base: NotifierBase::new(),
        values: Mutex::new(vec!["theme".into()]),
    });

    facade.register_proxy(settings.clone()).unwrap();

    assert_eq!(settings.multiton_key().as_deref(), Some("derive_base"));
    assert_eq!(settings.values.lock().len(), 1);
}

#[test]
fn test_derived_actors_talk_through_core() {
    let registry = CoreRegistry::new();
    let facade = registry.facade("derive_core").unwrap();
    let banner = Arc::new(Banner {
        title: "Top".into(),
        mediator: MediatorBase::new("Banner"),
        seen: Mutex::new(Vec::new()),
    });
    facade.register_mediator(banner.clone()).unwrap();
    facade.register_command("announce", Announce::default);

    facade.send_notification("announce", None, None).unwrap();

    assert_eq!(*banner.seen.lock(), vec!["Top:derived"]);
    assert_eq!(banner.multiton_key().as_deref(), Some("derive_core"));
    assert_eq!(banner.mediator.multiton_key().as_deref(), Some("derive_core"));
}

#[test]
fn test_tuple_struct_with_generics() {
    let registry = CoreRegistry::new();
    let wrapper = Wrapper(NotifierBase::new(), 7_u64);
    wrapper.initialize_notifier(&registry, "derive_tuple");

    assert_eq!(wrapper.multiton_key().as_deref(), Some("derive_tuple"));
    assert_eq!(wrapper.1, 7);
    wrapper.send_notification("nobody_listens", None, None).unwrap();
}
