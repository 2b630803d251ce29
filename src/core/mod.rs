//! Registry core: the thread-safe facade and its capability contracts.
//!
//! The public API from this module is [`EventSystem`] plus the traits it
//! implements ([`Publisher`], [`Registrar`], [`Maintenance`], [`EventRegistry`])
//! and its [`Config`].
//!
//! Internal modules:
//! - [`registry`]: locking discipline, subscribe/unsubscribe, fan-out and cleanup;
//! - [`traits`]: capability traits for collaborators that need only part of the surface;
//! - [`config`]: per-handler timeout and panic isolation.

mod config;
mod registry;
mod traits;

pub use config::Config;
pub use registry::EventSystem;
pub use traits::{EventRegistry, Maintenance, Publisher, Registrar};
