//! # Function-backed handler (`EventFn`)
//!
//! [`EventFn`] wraps a closure `F: Fn(Arc<T>) -> Fut`, producing a fresh
//! future per delivery. The event arrives as an `Arc<T>` so the future can
//! own it.
//!
//! Identity is the `Arc` allocation: two `EventFn` built from the same
//! closure are two different subscribers. Keep the [`EventFnRef`] alive for
//! as long as the subscription should stay live; the registry holds it weakly.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use weakbus::{EventFn, EventFnRef, HandlerError};
//!
//! struct Tick(u64);
//!
//! let on_tick: EventFnRef<Tick> = EventFn::arc("on-tick", |ev: Arc<Tick>| async move {
//!     let _ = ev.0;
//!     Ok::<_, HandlerError>(())
//! });
//!
//! assert_eq!(on_tick.name(), "on-tick");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::HandlerError;
use crate::events::Event;

type BoxHandlerFn<T> =
    Box<dyn Fn(Arc<T>) -> BoxFuture<'static, Result<(), HandlerError>> + Send + Sync>;

/// Shared handle to a function handler; this is what gets subscribed.
pub type EventFnRef<T> = Arc<EventFn<T>>;

/// Function-backed handler for events of type `T`.
pub struct EventFn<T> {
    name: Cow<'static, str>,
    f: BoxHandlerFn<T>,
}

impl<T: Event> EventFn<T> {
    /// Creates a new function handler.
    ///
    /// Prefer [`EventFn::arc`] when you immediately need an [`EventFnRef`].
    pub fn new<F, Fut>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(Arc<T>) -> Fut + Send + Sync + 'static, // Fn, not FnMut
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            f: Box::new(move |ev| f(ev).boxed()),
        }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc<F, Fut>(name: impl Into<Cow<'static, str>>, f: F) -> EventFnRef<T>
    where
        F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        Arc::new(Self::new(name, f))
    }

    /// Returns the handler name (diagnostics only).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn call(&self, event: Arc<T>) -> BoxFuture<'static, Result<(), HandlerError>> {
        (self.f)(event)
    }
}

impl<T> fmt::Debug for EventFn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventFn").field("name", &self.name).finish()
    }
}
