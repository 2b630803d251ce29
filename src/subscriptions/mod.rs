//! Subscriptions and the type-keyed index that stores them.
//!
//! ## Contents
//! - `Subscription` weak, typed registry entry (handler or function variant)
//! - `ErasedSubscription` non-generic view stored in the index
//! - `SubscriptionIndex` `EventType -> Vec<SubscriptionRef>`, unsynchronized
//!
//! The facade ([`EventSystem`](crate::EventSystem)) owns the index behind a
//! lock and only downcasts back to `Subscription<T>` at the publish boundary.

mod index;
mod subscription;

pub(crate) use index::SubscriptionIndex;
pub(crate) use subscription::{Subscription, SubscriptionRef, Target};
