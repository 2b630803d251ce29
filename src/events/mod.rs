//! Event identity: what may be published and how it is routed.
//!
//! ## Contents
//! - [`Event`] marker trait, implemented for every `Send + Sync + 'static` type
//! - [`EventType`] runtime identity used as the subscription index key
//!
//! Routing is by **exact** type: a subscriber to `Derived` never sees `Base`
//! events and vice versa, and a newtype around an event is a distinct event.

mod event;

pub use event::{Event, EventType};
