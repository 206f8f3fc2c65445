//! Error types for Lattice MVC.

use std::fmt;

/// A specialized Result type for Lattice MVC operations.
pub type Result<T> = std::result::Result<T, MvcError>;

/// Boxed application error carried by [`MvcError::Handler`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The kind of per-core singleton a registry entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreKind {
    /// A [`Model`](crate::Model) instance.
    Model,
    /// A [`View`](crate::View) instance.
    View,
    /// A [`Controller`](crate::Controller) instance.
    Controller,
    /// A [`Facade`](crate::Facade) instance.
    Facade,
}

impl fmt::Display for CoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model => write!(f, "Model"),
            Self::View => write!(f, "View"),
            Self::Controller => write!(f, "Controller"),
            Self::Facade => write!(f, "Facade"),
        }
    }
}

/// The main error type for Lattice MVC operations.
///
/// Lookups of absent proxies, mediators or commands are not errors; they
/// return `None` or `false`.
#[derive(Debug, thiserror::Error)]
pub enum MvcError {
    /// A multiton key was empty.
    #[error("Multiton key must not be empty")]
    EmptyKey,

    /// A second instance was constructed directly for a key that already has one.
    #[error("{kind} instance for core '{key}' already exists")]
    DuplicateCore { kind: CoreKind, key: String },

    /// A proxy with this name is already registered in the model.
    #[error("Proxy '{0}' is already registered")]
    DuplicateProxy(String),

    /// A mediator with this name is already registered in the view.
    #[error("Mediator '{0}' is already registered")]
    DuplicateMediator(String),

    /// `send_notification` was called before the notifier was bound to a core.
    #[error("Notifier used before initialize_notifier was called")]
    NotifierUninitialized,

    /// The registry a notifier was bound to no longer exists.
    #[error("Core registry for '{0}' has been dropped")]
    RegistryDropped(String),

    /// A mediator, command or lifecycle hook failed.
    #[error("Handler error: {0}")]
    Handler(#[source] BoxError),
}

impl MvcError {
    /// Wrap an application error raised from a handler or lifecycle hook.
    ///
    /// ```
    /// use lattice_mvc_core::MvcError;
    ///
    /// let err = MvcError::handler("balance must not be negative");
    /// assert_eq!(err.to_string(), "Handler error: balance must not be negative");
    /// ```
    pub fn handler(err: impl Into<BoxError>) -> Self {
        Self::Handler(err.into())
    }

    /// Create a duplicate-construction error.
    pub fn duplicate_core(kind: CoreKind, key: impl Into<String>) -> Self {
        Self::DuplicateCore {
            kind,
            key: key.into(),
        }
    }
}
