//! # Capability contracts.
//!
//! Collaborators depend on the narrowest capability they need:
//!
//! | Trait            | Surface                                                  |
//! |------------------|----------------------------------------------------------|
//! | [`Publisher`]    | `publish`                                                |
//! | [`Registrar`]    | subscribe / unsubscribe / is-subscribed family           |
//! | [`Maintenance`]  | `cleanup`                                                |
//! | [`EventRegistry`]| all of the above (blanket impl)                          |
//!
//! [`EventSystem`] implements every one of them.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::core::EventSystem;
use crate::error::PublishError;
use crate::events::Event;
use crate::handlers::{EventFnRef, EventHandler, Subscriber};

/// Publishes events to the current subscribers of their type.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// See [`EventSystem::publish`].
    async fn publish<T: Event>(&self, event: T, ctx: &CancellationToken) -> Result<bool, PublishError>;
}

/// Manages subscriptions.
pub trait Registrar: Send + Sync {
    /// See [`EventSystem::subscribe`].
    fn subscribe<T: Event, H: EventHandler<T>>(&self, handler: &Arc<H>) -> bool;
    /// See [`EventSystem::subscribe_dyn`].
    fn subscribe_dyn<T: Event>(&self, handler: &Arc<dyn EventHandler<T>>) -> bool;
    /// See [`EventSystem::subscribe_fn`].
    fn subscribe_fn<T: Event>(&self, f: &EventFnRef<T>) -> bool;
    /// See [`EventSystem::subscribe_all`].
    fn subscribe_all<S: Subscriber>(&self, subscriber: &Arc<S>) -> bool;

    /// See [`EventSystem::unsubscribe`].
    fn unsubscribe<T: Event, H: EventHandler<T>>(&self, handler: &Arc<H>) -> bool;
    /// See [`EventSystem::unsubscribe_dyn`].
    fn unsubscribe_dyn<T: Event>(&self, handler: &Arc<dyn EventHandler<T>>) -> bool;
    /// See [`EventSystem::unsubscribe_fn`].
    fn unsubscribe_fn<T: Event>(&self, f: &EventFnRef<T>) -> bool;
    /// See [`EventSystem::unsubscribe_all`].
    fn unsubscribe_all<S: ?Sized>(&self, subscriber: &Arc<S>) -> bool;

    /// See [`EventSystem::is_subscribed`].
    fn is_subscribed<T: Event, H: EventHandler<T>>(&self, handler: &Arc<H>) -> bool;
    /// See [`EventSystem::is_subscribed_dyn`].
    fn is_subscribed_dyn<T: Event>(&self, handler: &Arc<dyn EventHandler<T>>) -> bool;
    /// See [`EventSystem::is_subscribed_fn`].
    fn is_subscribed_fn<T: Event>(&self, f: &EventFnRef<T>) -> bool;
    /// See [`EventSystem::is_subscribed_for_any`].
    fn is_subscribed_for_any<S: ?Sized>(&self, subscriber: &Arc<S>) -> bool;
    /// See [`EventSystem::any_subscribers_for_event`].
    fn any_subscribers_for_event<T: Event>(&self) -> bool;
}

/// Reclaims dead subscriptions.
pub trait Maintenance: Send + Sync {
    /// See [`EventSystem::cleanup`].
    fn cleanup(&self);
}

/// Full registry surface.
pub trait EventRegistry: Publisher + Registrar + Maintenance {}

impl<R: Publisher + Registrar + Maintenance + ?Sized> EventRegistry for R {}

#[async_trait]
impl Publisher for EventSystem {
    async fn publish<T: Event>(&self, event: T, ctx: &CancellationToken) -> Result<bool, PublishError> {
        EventSystem::publish(self, event, ctx).await
    }
}

impl Registrar for EventSystem {
    fn subscribe<T: Event, H: EventHandler<T>>(&self, handler: &Arc<H>) -> bool {
        EventSystem::subscribe(self, handler)
    }

    fn subscribe_dyn<T: Event>(&self, handler: &Arc<dyn EventHandler<T>>) -> bool {
        EventSystem::subscribe_dyn(self, handler)
    }

    fn subscribe_fn<T: Event>(&self, f: &EventFnRef<T>) -> bool {
        EventSystem::subscribe_fn(self, f)
    }

    fn subscribe_all<S: Subscriber>(&self, subscriber: &Arc<S>) -> bool {
        EventSystem::subscribe_all(self, subscriber)
    }

    fn unsubscribe<T: Event, H: EventHandler<T>>(&self, handler: &Arc<H>) -> bool {
        EventSystem::unsubscribe(self, handler)
    }

    fn unsubscribe_dyn<T: Event>(&self, handler: &Arc<dyn EventHandler<T>>) -> bool {
        EventSystem::unsubscribe_dyn(self, handler)
    }

    fn unsubscribe_fn<T: Event>(&self, f: &EventFnRef<T>) -> bool {
        EventSystem::unsubscribe_fn(self, f)
    }

    fn unsubscribe_all<S: ?Sized>(&self, subscriber: &Arc<S>) -> bool {
        EventSystem::unsubscribe_all(self, subscriber)
    }

    fn is_subscribed<T: Event, H: EventHandler<T>>(&self, handler: &Arc<H>) -> bool {
        EventSystem::is_subscribed(self, handler)
    }

    fn is_subscribed_dyn<T: Event>(&self, handler: &Arc<dyn EventHandler<T>>) -> bool {
        EventSystem::is_subscribed_dyn(self, handler)
    }

    fn is_subscribed_fn<T: Event>(&self, f: &EventFnRef<T>) -> bool {
        EventSystem::is_subscribed_fn(self, f)
    }

    fn is_subscribed_for_any<S: ?Sized>(&self, subscriber: &Arc<S>) -> bool {
        EventSystem::is_subscribed_for_any(self, subscriber)
    }

    fn any_subscribers_for_event<T: Event>(&self) -> bool {
        EventSystem::any_subscribers_for_event::<T>(self)
    }
}

impl Maintenance for EventSystem {
    fn cleanup(&self) {
        EventSystem::cleanup(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::handlers::EventFn;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Ping;

    /// Generic collaborator that only sees the capability traits.
    async fn wire_and_publish<R: EventRegistry>(registry: &R, f: &EventFnRef<Ping>) -> bool {
        assert!(Registrar::subscribe_fn(registry, f));
        assert!(Registrar::any_subscribers_for_event::<Ping>(registry));
        let handled = Publisher::publish(registry, Ping, &CancellationToken::new())
            .await
            .unwrap();
        Maintenance::cleanup(registry);
        handled
    }

    #[tokio::test]
    async fn test_event_system_through_capability_traits() {
        let events = EventSystem::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&hits);
        let f = EventFn::arc("count", move |_: Arc<Ping>| {
            let sink = Arc::clone(&sink);
            async move {
                sink.fetch_add(1, Ordering::SeqCst);
                Ok::<_, HandlerError>(())
            }
        });

        assert!(wire_and_publish(&events, &f).await);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(Registrar::unsubscribe_all(&events, &f));
        assert!(!Registrar::is_subscribed_for_any(&events, &f));
    }
}
