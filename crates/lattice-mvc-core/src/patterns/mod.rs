//! Ready-made building blocks for common actors.
//!
//! - [`DataProxy`] - A named proxy around a single value
//! - [`MediatorBase`] - Name and view component storage for mediators
//! - [`MacroCommand`] - A command that runs an ordered list of sub-commands

mod data_proxy;
mod macro_command;
mod mediator_base;

pub use data_proxy::DataProxy;
pub use macro_command::MacroCommand;
pub use mediator_base::MediatorBase;
