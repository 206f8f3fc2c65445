//! Notifications carried over the notification bus.
//!
//! A [`Notification`] is a named message with an optional body and an
//! optional type. It is built by the sender, delivered synchronously to every
//! interested observer and dropped afterwards.
//!
//! # Example
//!
//! ```
//! use lattice_mvc_core::Notification;
//!
//! let note = Notification::new("user_selected")
//!     .with_body(42_u32)
//!     .with_type("admin");
//!
//! assert_eq!(note.name(), "user_selected");
//! assert_eq!(note.body_as::<u32>(), Some(&42));
//! assert_eq!(note.notification_type(), Some("admin"));
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Type-erased, shareable notification body.
///
/// Handlers that need to write results back into a body should put the data
/// behind a lock, e.g. `Arc<parking_lot::Mutex<T>>`.
pub type Body = Arc<dyn Any + Send + Sync>;

/// A named message broadcast through a core's [`View`](crate::View).
#[derive(Clone)]
pub struct Notification {
    name: String,
    body: Option<Body>,
    notification_type: Option<String>,
}

impl Notification {
    /// Create a notification with no body and no type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: None,
            notification_type: None,
        }
    }

    /// Attach a body, wrapping it in a shared [`Body`].
    pub fn with_body<T: Any + Send + Sync>(mut self, body: T) -> Self {
        self.body = Some(Arc::new(body));
        self
    }

    /// Attach an already shared body.
    pub fn with_shared_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a type string.
    pub fn with_type(mut self, notification_type: impl Into<String>) -> Self {
        self.notification_type = Some(notification_type.into());
        self
    }

    /// The notification name. Fixed at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The body, if any.
    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// The body downcast to `T`, or `None` if absent or of another type.
    pub fn body_as<T: Any>(&self) -> Option<&T> {
        self.body.as_deref()?.downcast_ref::<T>()
    }

    /// Replace the body.
    pub fn set_body(&mut self, body: Option<Body>) {
        self.body = body;
    }

    /// The type string, if any.
    pub fn notification_type(&self) -> Option<&str> {
        self.notification_type.as_deref()
    }

    /// Replace the type string.
    pub fn set_type(&mut self, notification_type: Option<String>) {
        self.notification_type = notification_type;
    }
}

impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("name", &self.name)
            .field("has_body", &self.body.is_some())
            .field("type", &self.notification_type)
            .finish()
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Notification Name: {}", self.name)?;
        let body = if self.body.is_some() { "(present)" } else { "null" };
        writeln!(f, "Body: {body}")?;
        write!(f, "Type: {}", self.notification_type.as_deref().unwrap_or("null"))
    }
}
