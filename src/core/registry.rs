//! # Event system facade: thread-safe subscription registry and publisher.
//!
//! [`EventSystem`] owns the subscription index behind a reader/writer lock and
//! exposes the whole public surface: subscribe/unsubscribe, introspection,
//! cleanup and publish.
//!
//! ## Architecture
//! ```text
//! subscribe / unsubscribe ──► upgradable read ──► (upgrade) ──► SubscriptionIndex
//! subscribe_all / unsubscribe_all / cleanup ──► write ──────────► SubscriptionIndex
//! is_subscribed* / any_subscribers ──► read ────────────────────► SubscriptionIndex
//!
//! publish(ev):
//!   read lock ─► snapshot Vec<Arc<Subscription<T>>> ─► unlock
//!        │
//!        ├──► sub1.publish() ─┐
//!        ├──► sub2.publish() ─┼── join_all (concurrent) ──► cleanup() ──► result
//!        └──► subN.publish() ─┘
//! ```
//!
//! ## Rules
//! - No lock is held across an `.await`; handlers may freely call back into the registry.
//! - Check-then-insert is atomic: two racing `subscribe` calls for the same
//!   subscriber cannot both succeed.
//! - Every `publish` ends with a cleanup sweep, whatever its outcome, including
//!   when the caller drops the future before it completes.
//! - Cancellation is checked before fan-out (nothing runs) and again right
//!   before each invocation (that subscriber is skipped). Running handlers are
//!   never aborted.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::join_all;
use futures::FutureExt;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use tokio_util::sync::CancellationToken;

use crate::core::Config;
use crate::error::{HandlerError, PublishError};
use crate::events::{Event, EventType};
use crate::handlers::{Capabilities, EventFnRef, EventHandler, Subscriber};
use crate::subscriptions::{Subscription, SubscriptionIndex, SubscriptionRef, Target};

/// Why a single invocation did not complete normally.
enum Failure {
    Handler(HandlerError),
    /// Panic payload kept for re-raising when panic isolation is off.
    Panic(Box<dyn Any + Send>),
}

struct CleanupGuard<'a>(&'a EventSystem);

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        self.0.cleanup();
    }
}

/// Thread-safe, type-routed publish/subscribe registry.
///
/// Subscriptions are weak: dropping the last `Arc` of a subscriber is enough
/// to stop deliveries; the stale entry is swept by [`cleanup`](Self::cleanup),
/// which also runs after every [`publish`](Self::publish).
///
/// Typically created once and shared as `Arc<EventSystem>`.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
/// use weakbus::{EventFn, EventSystem, HandlerError};
///
/// struct Greeting(&'static str);
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let events = EventSystem::new();
///
///     let hello = EventFn::arc("hello", |ev: Arc<Greeting>| async move {
///         println!("got {}", ev.0);
///         Ok::<_, HandlerError>(())
///     });
///     assert!(events.subscribe_fn(&hello));
///
///     let handled = events.publish(Greeting("hi"), &CancellationToken::new()).await?;
///     assert!(handled);
///
///     drop(hello);
///     let handled = events.publish(Greeting("anyone?"), &CancellationToken::new()).await?;
///     assert!(!handled);
///     Ok(())
/// }
/// ```
pub struct EventSystem {
    index: RwLock<SubscriptionIndex>,
    cfg: Config,
}

impl EventSystem {
    /// Creates an empty registry with [`Config::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty registry with the given configuration.
    #[must_use]
    pub fn with_config(cfg: Config) -> Self {
        Self {
            index: RwLock::new(SubscriptionIndex::new()),
            cfg,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    // ---- Subscribe ----

    /// Subscribes `handler` to events of type `T`.
    ///
    /// Returns `false` (and changes nothing) if this handler is already
    /// subscribed to `T`. When `H` handles several event types, name the one
    /// meant: `events.subscribe::<Ping, _>(&h)`.
    pub fn subscribe<T: Event, H: EventHandler<T>>(&self, handler: &Arc<H>) -> bool {
        self.insert_if_absent(EventType::of::<T>(), Target::handler(handler), || {
            Arc::new(Subscription::<T>::handler(handler))
        })
    }

    /// Subscribes a type-erased handler to events of type `T`.
    ///
    /// Identity is the underlying allocation, so this and
    /// [`subscribe`](Self::subscribe) on the concrete `Arc` refer to the same
    /// subscription.
    pub fn subscribe_dyn<T: Event>(&self, handler: &Arc<dyn EventHandler<T>>) -> bool {
        self.insert_if_absent(EventType::of::<T>(), Target::handler(handler), || {
            Arc::new(Subscription::handler_dyn(handler))
        })
    }

    /// Subscribes a function handler to events of type `T`.
    ///
    /// Returns `false` if this exact [`EventFnRef`] is already subscribed.
    pub fn subscribe_fn<T: Event>(&self, f: &EventFnRef<T>) -> bool {
        self.insert_if_absent(EventType::of::<T>(), Target::delegate(f), || {
            Arc::new(Subscription::delegate(f))
        })
    }

    /// Subscribes `subscriber` to every event type it declares in
    /// [`Subscriber::capabilities`] and is not yet subscribed to.
    ///
    /// Returns `true` if at least one subscription was added.
    pub fn subscribe_all<S: Subscriber>(&self, subscriber: &Arc<S>) -> bool {
        let caps = Capabilities::<S>::collect();
        let target = Target::handler(subscriber);

        let mut index = self.index.write();
        let mut subscribed = false;
        for cap in caps.iter() {
            if index.find(cap.event, &target).is_some() {
                continue;
            }
            index.add(cap.event, (cap.bind)(subscriber));
            tracing::debug!(event = %cap.event, kind = "handler", "subscription added");
            subscribed = true;
        }
        subscribed
    }

    // ---- Unsubscribe ----

    /// Removes `handler`'s subscription to `T`. Returns `false` if there was none.
    pub fn unsubscribe<T: Event, H: EventHandler<T>>(&self, handler: &Arc<H>) -> bool {
        self.remove_matching(EventType::of::<T>(), Target::handler(handler))
    }

    /// Removes a type-erased handler's subscription to `T`. Returns `false` if there was none.
    pub fn unsubscribe_dyn<T: Event>(&self, handler: &Arc<dyn EventHandler<T>>) -> bool {
        self.remove_matching(EventType::of::<T>(), Target::handler(handler))
    }

    /// Removes a function handler's subscription to `T`. Returns `false` if there was none.
    pub fn unsubscribe_fn<T: Event>(&self, f: &EventFnRef<T>) -> bool {
        self.remove_matching(EventType::of::<T>(), Target::delegate(f))
    }

    /// Removes, for every event type, the first live subscription that refers
    /// to `subscriber` (handler or function).
    ///
    /// Returns `true` if anything was removed.
    pub fn unsubscribe_all<S: ?Sized>(&self, subscriber: &Arc<S>) -> bool {
        let target = Target::any(subscriber);

        let mut index = self.index.write();
        let found: Vec<(EventType, SubscriptionRef)> = index
            .iter()
            .filter_map(|(ty, list)| {
                list.iter()
                    .find(|s| s.matches(&target))
                    .map(|s| (ty, Arc::clone(s)))
            })
            .collect();

        for (ty, sub) in &found {
            index.remove(*ty, sub);
            tracing::debug!(event = %ty, kind = ?sub.kind(), "subscription removed");
        }
        !found.is_empty()
    }

    // ---- Introspection ----

    /// True if `handler` is live and subscribed to `T`.
    pub fn is_subscribed<T: Event, H: EventHandler<T>>(&self, handler: &Arc<H>) -> bool {
        self.index
            .read()
            .find(EventType::of::<T>(), &Target::handler(handler))
            .is_some()
    }

    /// True if the type-erased handler is live and subscribed to `T`.
    pub fn is_subscribed_dyn<T: Event>(&self, handler: &Arc<dyn EventHandler<T>>) -> bool {
        self.index
            .read()
            .find(EventType::of::<T>(), &Target::handler(handler))
            .is_some()
    }

    /// True if the function handler is live and subscribed to `T`.
    pub fn is_subscribed_fn<T: Event>(&self, f: &EventFnRef<T>) -> bool {
        self.index
            .read()
            .find(EventType::of::<T>(), &Target::delegate(f))
            .is_some()
    }

    /// True if any live subscription, for any event type, refers to `subscriber`.
    pub fn is_subscribed_for_any<S: ?Sized>(&self, subscriber: &Arc<S>) -> bool {
        let target = Target::any(subscriber);
        self.index
            .read()
            .iter()
            .any(|(_, list)| list.iter().any(|s| s.matches(&target)))
    }

    /// True if at least one live subscriber exists for `T`.
    pub fn any_subscribers_for_event<T: Event>(&self) -> bool {
        self.index
            .read()
            .lookup(EventType::of::<T>())
            .any(|s| !s.is_dead())
    }

    /// Number of index entries for `T`, including dead ones not yet swept.
    pub fn subscription_count<T: Event>(&self) -> usize {
        self.index.read().len_for(EventType::of::<T>())
    }

    /// Number of event types that currently have index entries.
    pub fn event_type_count(&self) -> usize {
        self.index.read().type_count()
    }

    // ---- Maintenance ----

    /// Removes every dead subscription and every event type left without entries.
    ///
    /// Idempotent; safe to call at any time.
    pub fn cleanup(&self) {
        let removed = self.index.write().sweep();
        if removed > 0 {
            tracing::debug!(removed, "swept dead subscriptions");
        }
    }

    // ---- Publish ----

    /// Publishes `event` to every live subscriber of `T`, concurrently.
    ///
    /// Returns `Ok(true)` if at least one subscriber was invoked, `Ok(false)`
    /// if none was (no subscribers, all dead, or `ctx` already cancelled).
    ///
    /// A cleanup sweep always runs before returning.
    ///
    /// # Errors
    /// [`PublishError::Handler`] with every failure, once all handlers have
    /// finished. Handlers are never retried.
    ///
    /// # Panics
    /// Re-raises a handler panic (after all siblings finish) when
    /// [`Config::catch_panics`] is `false`.
    pub async fn publish<T: Event>(
        &self,
        event: T,
        ctx: &CancellationToken,
    ) -> Result<bool, PublishError> {
        let ty = EventType::of::<T>();

        // Sweeps even if this future is dropped mid fan-out.
        let sweep = CleanupGuard(self);

        let outcomes = if ctx.is_cancelled() {
            tracing::trace!(event = %ty, "publish cancelled before fan-out");
            Vec::new()
        } else {
            let snapshot = self.snapshot::<T>(ty);
            tracing::trace!(event = %ty, subscribers = snapshot.len(), "fan-out");

            let event = Arc::new(event);
            join_all(snapshot.iter().map(|sub| self.invoke(sub, &event, ctx))).await
        };

        drop(sweep);

        let mut handled = false;
        let mut failures = Vec::new();
        let mut panic = None;
        for outcome in outcomes {
            match outcome {
                Ok(invoked) => handled |= invoked,
                Err(Failure::Handler(err)) => failures.push(err),
                Err(Failure::Panic(payload)) => {
                    panic.get_or_insert(payload);
                }
            }
        }

        if let Some(payload) = panic {
            std::panic::resume_unwind(payload);
        }
        if !failures.is_empty() {
            return Err(PublishError::Handler {
                event: ty.name(),
                failures,
            });
        }
        Ok(handled)
    }

    // ---- Helpers ----

    fn insert_if_absent(
        &self,
        ty: EventType,
        target: Target,
        make: impl FnOnce() -> SubscriptionRef,
    ) -> bool {
        let index = self.index.upgradable_read();
        if index.find(ty, &target).is_some() {
            return false;
        }

        let mut index = RwLockUpgradableReadGuard::upgrade(index);
        index.add(ty, make());
        tracing::debug!(event = %ty, kind = ?target.kind, "subscription added");
        true
    }

    fn remove_matching(&self, ty: EventType, target: Target) -> bool {
        let index = self.index.upgradable_read();
        let Some(sub) = index.find(ty, &target).cloned() else {
            return false;
        };

        let mut index = RwLockUpgradableReadGuard::upgrade(index);
        index.remove(ty, &sub);
        tracing::debug!(event = %ty, kind = ?target.kind, "subscription removed");
        true
    }

    /// Typed copy of the entries for `ty`; the read lock is released on return.
    fn snapshot<T: Event>(&self, ty: EventType) -> Vec<Arc<Subscription<T>>> {
        let index = self.index.read();
        index
            .lookup(ty)
            .filter_map(|s| Arc::clone(s).into_any().downcast::<Subscription<T>>().ok())
            .collect()
    }

    async fn invoke<T: Event>(
        &self,
        sub: &Subscription<T>,
        event: &Arc<T>,
        ctx: &CancellationToken,
    ) -> Result<bool, Failure> {
        let call = AssertUnwindSafe(sub.publish(event, ctx)).catch_unwind();

        let caught = match self.cfg.handler_timeout() {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(caught) => caught,
                Err(_) => return Err(Failure::Handler(HandlerError::Timeout { timeout: limit })),
            },
            None => call.await,
        };

        match caught {
            Ok(Ok(invoked)) => Ok(invoked),
            Ok(Err(err)) => Err(Failure::Handler(err)),
            Err(payload) if self.cfg.catch_panics => Err(Failure::Handler(HandlerError::Panicked {
                message: panic_message(payload.as_ref()),
            })),
            Err(payload) => Err(Failure::Panic(payload)),
        }
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSystem")
            .field("event_types", &self.event_type_count())
            .field("cfg", &self.cfg)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
