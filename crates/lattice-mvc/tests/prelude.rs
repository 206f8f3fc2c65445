//! Umbrella crate tests: everything an application needs comes from the prelude.

use std::sync::Arc;

use lattice_mvc::prelude::*;
use parking_lot::Mutex;

#[derive(Notifier)]
#[notifier(crate = "lattice_mvc")]
struct Clock {
    #[notifier]
    base: MediatorBase,
    ticks: Mutex<u32>,
}

impl Mediator for Clock {
    fn mediator_name(&self) -> &str {
        self.base.name()
    }

    fn list_notification_interests(&self) -> Vec<String> {
        vec!["tick".into()]
    }

    fn handle_notification(&self, _notification: &Notification) -> Result<()> {
        *self.ticks.lock() += 1;
        Ok(())
    }
}

#[derive(Notifier, Default)]
#[notifier(crate = "lattice_mvc")]
struct Tick {
    notifier: NotifierBase,
}

impl Command for Tick {
    fn execute(&self, _notification: &Notification) -> Result<()> {
        self.send_notification("tick", None, None)
    }
}

#[test]
fn test_prelude_covers_a_whole_core() {
    let registry = CoreRegistry::new();
    let clock = Arc::new(Clock {
        base: MediatorBase::new("Clock"),
        ticks: Mutex::new(0),
    });

    let facade = FacadeBuilder::new()
        .command("advance", Tick::default)
        .mediator(clock.clone())
        .build(&registry, "clock")
        .unwrap();

    facade.send_notification("advance", None, None).unwrap();
    facade.send_notification("advance", None, None).unwrap();
    assert_eq!(*clock.ticks.lock(), 2);
    assert_eq!(clock.multiton_key().as_deref(), Some("clock"));

    Facade::remove_core(&registry, "clock").unwrap();
    assert!(!registry.has_core("clock"));
}
