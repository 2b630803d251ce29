//! # weakbus
//!
//! **weakbus** is an in-process, type-routed publish/subscribe registry.
//!
//! Subscribers register interest in an event *type*; publishers broadcast a
//! value of that type to every live subscriber, concurrently, and learn
//! whether anyone actually handled it. The registry only holds **weak**
//! references: dropping a subscriber is enough to stop its deliveries, no
//! explicit unsubscribe is required during teardown.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   Arc<H: EventHandler<T>>     EventFnRef<T>        Arc<S: Subscriber>
//!        (object handler)     (function handler)    (many event types)
//!             │                      │                      │
//!             │ subscribe            │ subscribe_fn         │ subscribe_all
//!             ▼                      ▼                      ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventSystem (facade)                                             │
//! │  - RwLock<SubscriptionIndex>                                      │
//! │      EventType ──► [Subscription, Subscription, ...]              │
//! │                     (Weak<dyn EventHandler<T>> | Weak<EventFn<T>>)│
//! │  - Config (handler timeout, panic isolation)                      │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        │ publish(event: T, ctx)
//!        ▼
//!   read lock ─► snapshot for TypeId::of::<T>() ─► unlock
//!        │
//!        ├──► handler 1 ─┐
//!        ├──► handler 2 ─┼── join_all ──► cleanup() ──► Ok(handled) / Err(PublishError)
//!        └──► handler N ─┘
//! ```
//!
//! ### Subscription lifecycle
//! ```text
//! subscribe ──► Live ──(last Arc dropped)──► Dead ──(cleanup / unsubscribe)──► Removed
//! ```
//! Cleanup runs after every publish and can also be triggered explicitly.
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                         |
//! |-------------------|---------------------------------------------------------------|--------------------------------------------|
//! | **Registry**      | Thread-safe subscribe/unsubscribe/publish/cleanup.            | [`EventSystem`]                            |
//! | **Handlers**      | Object handlers, function handlers, multi-type subscribers.   | [`EventHandler`], [`EventFn`], [`Subscriber`] |
//! | **Capabilities**  | Narrow contracts for collaborators.                           | [`Publisher`], [`Registrar`], [`Maintenance`] |
//! | **Errors**        | Typed handler and publish errors.                             | [`HandlerError`], [`PublishError`]         |
//! | **Configuration** | Per-handler timeout and panic isolation.                      | [`Config`]                                 |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use tokio_util::sync::CancellationToken;
//! use weakbus::{EventHandler, EventSystem, HandlerError};
//!
//! struct OrderPlaced { id: u64 }
//!
//! struct Mailer;
//!
//! #[async_trait]
//! impl EventHandler<OrderPlaced> for Mailer {
//!     async fn handle(&self, ev: &OrderPlaced, _ctx: CancellationToken) -> Result<(), HandlerError> {
//!         println!("mail for order {}", ev.id);
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let events = Arc::new(EventSystem::new());
//!
//!     let mailer = Arc::new(Mailer);
//!     events.subscribe(&mailer);
//!
//!     let handled = events.publish(OrderPlaced { id: 42 }, &CancellationToken::new()).await?;
//!     assert!(handled);
//!
//!     // No unsubscribe needed: dropping the handler ends the subscription.
//!     drop(mailer);
//!     assert!(!events.any_subscribers_for_event::<OrderPlaced>());
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod handlers;
mod subscriptions;

// ---- Public re-exports ----

pub use crate::core::{Config, EventRegistry, EventSystem, Maintenance, Publisher, Registrar};
pub use error::{HandlerError, PublishError};
pub use events::{Event, EventType};
pub use handlers::{Capabilities, EventFn, EventFnRef, EventHandler, Subscriber};
