//! An embeddable mediator base with a name and an optional view component.

use std::fmt;

use parking_lot::RwLock;

use crate::notification::Body;
use crate::notifier::{Notifier, NotifierBase};
use crate::view::Mediator;

/// Name, view component and notifier storage for a mediator.
///
/// Application mediators usually embed a `MediatorBase` and forward
/// [`Mediator::mediator_name`] and [`Notifier::notifier`] to it. On its own
/// it is a mediator with no interests.
///
/// ```
/// use std::sync::Arc;
/// use lattice_mvc_core::{Mediator, MediatorBase};
///
/// let base = MediatorBase::with_view_component("Toolbar", Arc::new("toolbar widget"));
/// assert_eq!(base.mediator_name(), "Toolbar");
/// assert_eq!(base.view_component_as::<&str>().as_deref(), Some(&"toolbar widget"));
/// ```
pub struct MediatorBase {
    name: String,
    view_component: RwLock<Option<Body>>,
    notifier: NotifierBase,
}

impl MediatorBase {
    /// Create a base named `name` with no view component.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            view_component: RwLock::new(None),
            notifier: NotifierBase::new(),
        }
    }

    /// Create a base named `name` wrapping `view_component`.
    pub fn with_view_component(name: impl Into<String>, view_component: Body) -> Self {
        let base = Self::new(name);
        *base.view_component.write() = Some(view_component);
        base
    }

    /// The mediator name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The view component, if set.
    pub fn view_component(&self) -> Option<Body> {
        self.view_component.read().clone()
    }

    /// The view component downcast to `T`.
    pub fn view_component_as<T: Send + Sync + 'static>(&self) -> Option<std::sync::Arc<T>> {
        self.view_component()?.downcast::<T>().ok()
    }

    /// Replace the view component.
    pub fn set_view_component(&self, view_component: Option<Body>) {
        *self.view_component.write() = view_component;
    }
}

impl Notifier for MediatorBase {
    fn notifier(&self) -> &NotifierBase {
        &self.notifier
    }
}

impl Mediator for MediatorBase {
    fn mediator_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for MediatorBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediatorBase")
            .field("name", &self.name)
            .field("has_view_component", &self.view_component.read().is_some())
            .finish()
    }
}
