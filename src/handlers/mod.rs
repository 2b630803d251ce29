//! # Handler capabilities accepted by the registry.
//!
//! Two kinds of subscriber can be registered:
//!
//! - **Object handlers**: any `Arc<H>` where `H` implements [`EventHandler<T>`]
//!   for one or more event types.
//! - **Function handlers**: an [`EventFnRef<T>`] built with [`EventFn::arc`].
//!
//! Objects that handle several event types can list them through
//! [`Subscriber`], which lets [`EventSystem::subscribe_all`](crate::EventSystem::subscribe_all)
//! register every capability at once.
//!
//! ## Lifetime
//! ```text
//! caller ── Arc<H> (strong) ──► H ◄── Weak (registry)
//!                                      │
//!                  drop last Arc ──────┴──► subscription is dead, swept on cleanup
//! ```
//! The registry only ever keeps weak references: dropping the last `Arc` is
//! enough to unsubscribe.

mod handler;
mod handler_fn;
mod subscriber;

pub use handler::EventHandler;
pub use handler_fn::{EventFn, EventFnRef};
pub use subscriber::{Capabilities, Subscriber};
