//! # Weak subscriptions.
//!
//! A [`Subscription`] never owns its subscriber: it keeps a [`Weak`] and
//! resolves it on every delivery. Once the last strong reference is dropped
//! the subscription is **dead**, matches nothing, and is swept by cleanup.
//!
//! ## Identity
//! Subscribers are compared by the address of their `Arc` allocation. While
//! the `Weak` exists the allocation is not freed, so the address cannot be
//! reused by another subscriber before the entry is removed.
//!
//! ## States
//! ```text
//! Live ──(last Arc dropped)──► Dead ──(cleanup / unsubscribe)──► Removed
//! ```

use std::any::Any;
use std::sync::{Arc, Weak};

use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::events::{Event, EventType};
use crate::handlers::{EventFn, EventHandler};

/// Which kind of subscriber a subscription refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SubscriptionKind {
    /// An object implementing [`EventHandler`].
    Handler,
    /// A function handler ([`EventFn`]).
    Delegate,
}

/// Candidate subscriber identity used for lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Target {
    /// `None` matches either kind.
    pub(crate) kind: Option<SubscriptionKind>,
    addr: usize,
}

impl Target {
    pub(crate) fn handler<H: ?Sized>(handler: &Arc<H>) -> Self {
        Self {
            kind: Some(SubscriptionKind::Handler),
            addr: addr_of(handler),
        }
    }

    pub(crate) fn delegate<T>(f: &Arc<EventFn<T>>) -> Self {
        Self {
            kind: Some(SubscriptionKind::Delegate),
            addr: addr_of(f),
        }
    }

    pub(crate) fn any<S: ?Sized>(subscriber: &Arc<S>) -> Self {
        Self {
            kind: None,
            addr: addr_of(subscriber),
        }
    }
}

fn addr_of<S: ?Sized>(arc: &Arc<S>) -> usize {
    Arc::as_ptr(arc).cast::<()>() as usize
}

/// Non-generic view of a subscription, as stored in the index.
pub(crate) trait ErasedSubscription: Send + Sync + 'static {
    fn event_type(&self) -> EventType;

    fn kind(&self) -> SubscriptionKind;

    /// True only if the referent is live and is `target`.
    fn matches(&self, target: &Target) -> bool;

    /// True once the referent has no strong references left.
    fn is_dead(&self) -> bool;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

pub(crate) type SubscriptionRef = Arc<dyn ErasedSubscription>;

/// Typed registry entry for events of type `T`.
pub(crate) enum Subscription<T: Event> {
    Handler(Weak<dyn EventHandler<T>>),
    Delegate(Weak<EventFn<T>>),
}

impl<T: Event> Subscription<T> {
    pub(crate) fn handler<H: EventHandler<T>>(handler: &Arc<H>) -> Self {
        let weak: Weak<H> = Arc::downgrade(handler);
        Subscription::Handler(weak)
    }

    pub(crate) fn handler_dyn(handler: &Arc<dyn EventHandler<T>>) -> Self {
        Subscription::Handler(Arc::downgrade(handler))
    }

    pub(crate) fn delegate(f: &Arc<EventFn<T>>) -> Self {
        Subscription::Delegate(Arc::downgrade(f))
    }

    fn addr(&self) -> usize {
        match self {
            Subscription::Handler(w) => Weak::as_ptr(w).cast::<()>() as usize,
            Subscription::Delegate(w) => Weak::as_ptr(w).cast::<()>() as usize,
        }
    }

    /// Delivers `event` to the live subscriber.
    ///
    /// Returns `Ok(false)` without invoking anything when `ctx` is already
    /// cancelled or the subscriber is gone. A cancellation that happens while
    /// the handler runs does not interrupt it.
    pub(crate) async fn publish(
        &self,
        event: &Arc<T>,
        ctx: &CancellationToken,
    ) -> Result<bool, HandlerError> {
        if ctx.is_cancelled() {
            return Ok(false);
        }

        match self {
            Subscription::Handler(weak) => {
                let Some(handler) = weak.upgrade() else {
                    return Ok(false);
                };
                handler.handle(event.as_ref(), ctx.clone()).await?;
            }
            Subscription::Delegate(weak) => {
                let Some(f) = weak.upgrade() else {
                    return Ok(false);
                };
                f.call(Arc::clone(event)).await?;
            }
        }
        Ok(true)
    }
}

impl<T: Event> ErasedSubscription for Subscription<T> {
    fn event_type(&self) -> EventType {
        EventType::of::<T>()
    }

    fn kind(&self) -> SubscriptionKind {
        match self {
            Subscription::Handler(_) => SubscriptionKind::Handler,
            Subscription::Delegate(_) => SubscriptionKind::Delegate,
        }
    }

    fn matches(&self, target: &Target) -> bool {
        if self.is_dead() {
            return false;
        }
        if target.kind.is_some_and(|k| k != self.kind()) {
            return false;
        }
        self.addr() == target.addr
    }

    fn is_dead(&self) -> bool {
        match self {
            Subscription::Handler(w) => w.strong_count() == 0,
            Subscription::Delegate(w) => w.strong_count() == 0,
        }
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
