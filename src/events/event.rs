//! # Event marker trait and runtime event identity.
//!
//! Any `Send + Sync + 'static` value can be published; [`EventType`] pairs the
//! value's [`TypeId`] with its type name so diagnostics stay readable.
//!
//! ## Example
//! ```rust
//! use weakbus::EventType;
//!
//! struct Ping;
//! struct Pong;
//!
//! assert_eq!(EventType::of::<Ping>(), EventType::of::<Ping>());
//! assert_ne!(EventType::of::<Ping>(), EventType::of::<Pong>());
//! ```

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Anything that can be published through the registry.
pub trait Event: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Event for T {}

/// Runtime identity of an event type.
///
/// Equality and hashing use only the [`TypeId`]; the name is for logs.
#[derive(Clone, Copy)]
pub struct EventType {
    id: TypeId,
    name: &'static str,
}

impl EventType {
    /// Returns the identity of `T`.
    #[inline]
    pub fn of<T: Event>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Underlying [`TypeId`].
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name (diagnostics only, not guaranteed stable).
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventType {}

impl Hash for EventType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
