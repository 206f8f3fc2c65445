//! Core systems for Lattice MVC.
//!
//! This crate provides the building blocks of a multicore Model-View-Controller
//! framework in which every part talks through named notifications:
//!
//! - **Notifications**: Named messages with an optional body and type
//! - **Observers**: Callbacks bound to a context, compared by context identity
//! - **Multiton Registry**: One model, view, controller and facade per key
//! - **Model**: Named proxies holding application data
//! - **View**: Named mediators and the notification subscription table
//! - **Controller**: Stateless commands built fresh for every notification
//! - **Facade**: Single entry point to a core, and core teardown
//! - **Notifier**: The capability to send notifications through a core
//!
//! Delivery is synchronous and in registration order. No lock is held while
//! application code runs, so handlers may re-enter any registry.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use lattice_mvc_core::{
//!     Command, CoreRegistry, DataProxy, Mediator, MediatorBase, Notification, Notifier,
//!     NotifierBase, Result,
//! };
//!
//! // A command that stores the notification body in the "Total" proxy.
//! #[derive(Default)]
//! struct Accumulate {
//!     notifier: NotifierBase,
//! }
//!
//! impl Notifier for Accumulate {
//!     fn notifier(&self) -> &NotifierBase {
//!         &self.notifier
//!     }
//! }
//!
//! impl Command for Accumulate {
//!     fn execute(&self, note: &Notification) -> Result<()> {
//!         let amount = note.body_as::<i64>().copied().unwrap_or_default();
//!         let facade = self.facade()?;
//!         if let Some(total) = facade.retrieve_proxy_as::<DataProxy<i64>>("Total") {
//!             let value = total.update(|total| {
//!                 *total += amount;
//!                 *total
//!             });
//!             self.send_notification("total_changed", Some(Arc::new(value)), None)?;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! // A mediator that displays the running total.
//! struct TotalView {
//!     base: MediatorBase,
//!     shown: Mutex<i64>,
//! }
//!
//! impl Notifier for TotalView {
//!     fn notifier(&self) -> &NotifierBase {
//!         self.base.notifier()
//!     }
//! }
//!
//! impl Mediator for TotalView {
//!     fn mediator_name(&self) -> &str {
//!         self.base.name()
//!     }
//!
//!     fn list_notification_interests(&self) -> Vec<String> {
//!         vec!["total_changed".into()]
//!     }
//!
//!     fn handle_notification(&self, note: &Notification) -> Result<()> {
//!         *self.shown.lock() = note.body_as::<i64>().copied().unwrap_or_default();
//!         Ok(())
//!     }
//! }
//!
//! let registry = CoreRegistry::new();
//! let facade = registry.facade("ledger").unwrap();
//! let display = Arc::new(TotalView { base: MediatorBase::new("Display"), shown: Mutex::new(0) });
//!
//! facade.register_proxy(Arc::new(DataProxy::new("Total", 0_i64))).unwrap();
//! facade.register_mediator(display.clone()).unwrap();
//! facade.register_command("add", Accumulate::default);
//!
//! facade.send_notification("add", Some(Arc::new(5_i64)), None).unwrap();
//! facade.send_notification("add", Some(Arc::new(7_i64)), None).unwrap();
//! assert_eq!(*display.shown.lock(), 12);
//! ```

mod controller;
mod error;
mod facade;
pub mod logging;
mod model;
mod multiton;
mod notification;
mod notifier;
mod observer;
pub mod patterns;
mod view;

pub use controller::{Command, CommandFactory, Controller, command_factory};
pub use error::{BoxError, CoreKind, MvcError, Result};
pub use facade::{Facade, FacadeBuilder};
pub use logging::{CoreDebug, CoreFormatOptions, PerfSpan, TreeStyle};
pub use model::{Model, Proxy};
pub use multiton::{CoreRegistry, Multiton};
pub use notification::{Body, Notification};
pub use notifier::{AsAny, Notifier, NotifierBase};
pub use observer::{ContextId, Observer};
pub use patterns::{DataProxy, MacroCommand, MediatorBase};
pub use view::{Mediator, View};

#[doc(hidden)]
pub mod __private {
    pub use tracing;
}

static_assertions::assert_impl_all!(CoreRegistry: Send, Sync, Clone);
static_assertions::assert_impl_all!(Facade: Send, Sync);
static_assertions::assert_impl_all!(Model: Send, Sync);
static_assertions::assert_impl_all!(View: Send, Sync);
static_assertions::assert_impl_all!(Controller: Send, Sync);
static_assertions::assert_impl_all!(Notification: Send, Sync, Clone);
static_assertions::assert_impl_all!(Observer: Send, Sync, Clone);
static_assertions::assert_impl_all!(NotifierBase: Send, Sync);
static_assertions::assert_impl_all!(MvcError: Send, Sync, std::error::Error);
