//! Lattice MVC - a multicore Model-View-Controller framework.
//!
//! This is the umbrella crate that re-exports all public APIs of
//! `lattice-mvc-core` and the `#[derive(Notifier)]` macro.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lattice_mvc::prelude::*;
//!
//! #[derive(Notifier, Default)]
//! #[notifier(crate = "lattice_mvc")]
//! struct Greet {
//!     notifier: NotifierBase,
//! }
//!
//! impl Command for Greet {
//!     fn execute(&self, note: &Notification) -> Result<()> {
//!         let name = note.body_as::<&str>().copied().unwrap_or("world");
//!         let facade = self.facade()?;
//!         if let Some(log) = facade.retrieve_proxy_as::<DataProxy<Vec<String>>>("Log") {
//!             log.update(|lines| lines.push(format!("hello, {name}")));
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let registry = CoreRegistry::new();
//! let facade = FacadeBuilder::new()
//!     .command("greet", Greet::default)
//!     .proxy(Arc::new(DataProxy::new("Log", Vec::<String>::new())))
//!     .startup("greet", Some(Arc::new("lattice")))
//!     .build(&registry, "hello")
//!     .unwrap();
//!
//! let log = facade.retrieve_proxy_as::<DataProxy<Vec<String>>>("Log").unwrap();
//! assert_eq!(log.data(), vec!["hello, lattice"]);
//! ```

pub use lattice_mvc_core::*;
pub use lattice_mvc_macros::*;

pub mod prelude;
