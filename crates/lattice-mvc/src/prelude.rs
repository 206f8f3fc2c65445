//! Prelude module for Lattice MVC.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```ignore
//! use lattice_mvc::prelude::*;
//! ```
//!
//! This provides access to:
//! - Core registry and facade (`CoreRegistry`, `Facade`, `FacadeBuilder`)
//! - Actor traits (`Proxy`, `Mediator`, `Command`, `Notifier`)
//! - Ready-made actors (`DataProxy`, `MediatorBase`, `MacroCommand`)
//! - Messages and errors (`Notification`, `MvcError`, `Result`)

// ============================================================================
// Cores
// ============================================================================

pub use crate::{CoreRegistry, Facade, FacadeBuilder};

// ============================================================================
// Actors
// ============================================================================

pub use crate::{Command, Mediator, Notifier, NotifierBase, Proxy};
pub use crate::patterns::{DataProxy, MacroCommand, MediatorBase};

// ============================================================================
// Messages
// ============================================================================

pub use crate::{Body, Notification, Observer};

// ============================================================================
// Errors
// ============================================================================

pub use crate::{MvcError, Result};
