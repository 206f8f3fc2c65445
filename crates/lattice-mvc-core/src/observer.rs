//! Observers: bound callbacks used to deliver notifications.
//!
//! An [`Observer`] pairs a notify method with the context it is invoked on.
//! Two observers are considered the same when their contexts are the same
//! object, regardless of the callback. The [`View`](crate::View) keeps one
//! ordered list of observers per notification name.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use lattice_mvc_core::{Notification, Observer};
//!
//! struct Counter(AtomicUsize);
//!
//! let counter = Arc::new(Counter(AtomicUsize::new(0)));
//! let observer = Observer::new(
//!     |counter: &Counter, _note: &Notification| {
//!         counter.0.fetch_add(1, Ordering::SeqCst);
//!         Ok(())
//!     },
//!     counter.clone(),
//! );
//!
//! observer.notify_observer(&Notification::new("tick")).unwrap();
//! assert_eq!(counter.0.load(Ordering::SeqCst), 1);
//! assert!(observer.compare_notify_context(&*counter));
//! ```

use std::fmt;
use std::sync::{Arc, Weak};

use crate::error::Result;
use crate::notification::Notification;

type NotifyFn = dyn Fn(&Notification) -> Result<()> + Send + Sync;

/// Identity of an observer's notify context.
///
/// Derived from the context's address, so it is only meaningful while the
/// context is alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContextId(usize);

impl ContextId {
    /// The identity of `context`.
    pub fn of<C: ?Sized>(context: &C) -> Self {
        Self((context as *const C).cast::<()>() as usize)
    }

    fn of_weak<C>(context: &Weak<C>) -> Self {
        Self(Weak::as_ptr(context).cast::<()>() as usize)
    }
}

/// A notify method bound to its notify context.
///
/// Cloning an observer is cheap: the callback is shared.
#[derive(Clone)]
pub struct Observer {
    notify: Arc<NotifyFn>,
    context: ContextId,
}

impl Observer {
    /// Bind `notify_method` to a strongly held `notify_context`.
    pub fn new<C, F>(notify_method: F, notify_context: Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&C, &Notification) -> Result<()> + Send + Sync + 'static,
    {
        let context = ContextId::of(&*notify_context);
        Self {
            notify: Arc::new(move |notification: &Notification| {
                notify_method(&*notify_context, notification)
            }),
            context,
        }
    }

    /// Bind `notify_method` to a weakly held `notify_context`.
    ///
    /// Once the context has been dropped, delivery does nothing.
    pub fn new_weak<C, F>(notify_method: F, notify_context: Weak<C>) -> Self
    where
        C: Send + Sync + 'static,
        F: Fn(&C, &Notification) -> Result<()> + Send + Sync + 'static,
    {
        let context = ContextId::of_weak(&notify_context);
        Self {
            notify: Arc::new(move |notification: &Notification| {
                match notify_context.upgrade() {
                    Some(target) => notify_method(&*target, notification),
                    None => Ok(()),
                }
            }),
            context,
        }
    }

    /// Invoke the notify method with `notification`.
    ///
    /// The handler's error is returned unchanged.
    pub fn notify_observer(&self, notification: &Notification) -> Result<()> {
        (self.notify)(notification)
    }

    /// Whether `object` is this observer's notify context.
    pub fn compare_notify_context<C: ?Sized>(&self, object: &C) -> bool {
        self.context == ContextId::of(object)
    }

    /// The identity of the notify context.
    pub fn context(&self) -> ContextId {
        self.context
    }
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MvcError;
    use parking_lot::Mutex;

    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
            })
        }

        fn record(&self, note: &Notification) -> Result<()> {
            self.seen.lock().push(note.name().to_string());
            Ok(())
        }
    }

    #[test]
    fn test_notify_passes_notification() {
        let recorder = Recorder::new();
        let observer = Observer::new(Recorder::record, recorder.clone());

        observer.notify_observer(&Notification::new("a")).unwrap();
        observer.notify_observer(&Notification::new("b")).unwrap();

        assert_eq!(*recorder.seen.lock(), vec!["a", "b"]);
    }

    #[test]
    fn test_compare_context_is_identity() {
        let first = Recorder::new();
        let second = Recorder::new();
        let observer = Observer::new(Recorder::record, first.clone());

        assert!(observer.compare_notify_context(&*first));
        assert!(!observer.compare_notify_context(&*second));
    }

    #[test]
    fn test_same_context_different_callbacks_match() {
        let recorder = Recorder::new();
        let a = Observer::new(Recorder::record, recorder.clone());
        let b = Observer::new(|_: &Recorder, _: &Notification| Ok(()), recorder.clone());
        assert_eq!(a.context(), b.context());
    }

    #[test]
    fn test_error_propagates() {
        let recorder = Recorder::new();
        let observer = Observer::new(
            |_: &Recorder, _: &Notification| Err(MvcError::handler("boom")),
            recorder,
        );

        let err = observer.notify_observer(&Notification::new("x")).unwrap_err();
        assert!(matches!(err, MvcError::Handler(_)));
    }

    #[test]
    fn test_weak_context() {
        let recorder = Recorder::new();
        let observer = Observer::new_weak(Recorder::record, Arc::downgrade(&recorder));

        assert!(observer.compare_notify_context(&*recorder));
        observer.notify_observer(&Notification::new("alive")).unwrap();
        assert_eq!(recorder.seen.lock().len(), 1);

        drop(recorder);
        // Dropped context: silently ignored.
        observer.notify_observer(&Notification::new("gone")).unwrap();
    }
}
