//! # Explicit capability listing for multi-event subscribers.
//!
//! Rust has no runtime reflection over implemented traits, so a type that
//! handles several event types declares them in [`Subscriber::capabilities`].
//! Each [`Capabilities::handles`] call is checked at compile time: listing a
//! type the subscriber does not handle does not compile.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use tokio_util::sync::CancellationToken;
//! use weakbus::{Capabilities, EventHandler, HandlerError, Subscriber};
//!
//! struct Opened;
//! struct Closed;
//!
//! struct Tracker;
//!
//! #[async_trait]
//! impl EventHandler<Opened> for Tracker {
//!     async fn handle(&self, _: &Opened, _: CancellationToken) -> Result<(), HandlerError> { Ok(()) }
//! }
//!
//! #[async_trait]
//! impl EventHandler<Closed> for Tracker {
//!     async fn handle(&self, _: &Closed, _: CancellationToken) -> Result<(), HandlerError> { Ok(()) }
//! }
//!
//! impl Subscriber for Tracker {
//!     fn capabilities(caps: &mut Capabilities<Self>) {
//!         caps.handles::<Opened>().handles::<Closed>();
//!     }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use crate::events::{Event, EventType};
use crate::handlers::EventHandler;
use crate::subscriptions::{Subscription, SubscriptionRef};

/// A type that can list the event types it handles.
///
/// The list is collected on every [`subscribe_all`](crate::EventSystem::subscribe_all)
/// call; the registry keeps no capability cache.
pub trait Subscriber: Send + Sync + 'static {
    /// Declares every event type `Self` handles.
    fn capabilities(caps: &mut Capabilities<Self>)
    where
        Self: Sized;
}

/// One declared capability: the event type and how to bind a subscription for it.
pub(crate) struct Capability<S> {
    pub(crate) event: EventType,
    pub(crate) bind: fn(&Arc<S>) -> SubscriptionRef,
}

/// Collector passed to [`Subscriber::capabilities`].
pub struct Capabilities<S> {
    entries: Vec<Capability<S>>,
}

impl<S: Send + Sync + 'static> Capabilities<S> {
    pub(crate) fn collect() -> Self
    where
        S: Subscriber,
    {
        let mut caps = Self {
            entries: Vec::new(),
        };
        S::capabilities(&mut caps);
        caps
    }

    /// Declares that `S` handles events of type `T`.
    pub fn handles<T: Event>(&mut self) -> &mut Self
    where
        S: EventHandler<T>,
    {
        self.entries.push(Capability {
            event: EventType::of::<T>(),
            bind: bind_handler::<S, T>,
        });
        self
    }

    /// Declared event types, in declaration order.
    pub fn event_types(&self) -> impl Iterator<Item = EventType> + '_ {
        self.entries.iter().map(|c| c.event)
    }

    /// Number of declared capabilities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Capability<S>> {
        self.entries.iter()
    }
}

impl<S> fmt::Debug for Capabilities<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|c| c.event))
            .finish()
    }
}

fn bind_handler<S, T>(subscriber: &Arc<S>) -> SubscriptionRef
where
    S: EventHandler<T>,
    T: Event,
{
    Arc::new(Subscription::<T>::handler(subscriber))
}
