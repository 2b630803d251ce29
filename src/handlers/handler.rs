//! # Object event handler trait.
//!
//! Provides [`EventHandler`], the extension point for plugging stateful
//! handlers into the registry.
//!
//! ## Rules
//! - A handler is invoked concurrently with every other handler of the same event.
//! - The handler receives the publisher's [`CancellationToken`]; the registry
//!   never aborts a running handler, honoring the token is up to the handler.
//! - Errors are returned to the publisher and never retried.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use tokio_util::sync::CancellationToken;
//! use weakbus::{EventHandler, HandlerError};
//!
//! struct UserCreated { id: u64 }
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl EventHandler<UserCreated> for Audit {
//!     async fn handle(&self, ev: &UserCreated, ctx: CancellationToken) -> Result<(), HandlerError> {
//!         if ctx.is_cancelled() {
//!             return Err(HandlerError::Canceled);
//!         }
//!         let _ = ev.id; // write audit record...
//!         Ok(())
//!     }
//! }
//! ```

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::events::Event;

/// Asynchronous handler for events of type `T`.
///
/// A single type may implement `EventHandler` for several event types; see
/// [`Subscriber`](crate::Subscriber) to register all of them at once.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Return [`HandlerError`] rather than panicking. Panics are caught and
///   reported as [`HandlerError::Panicked`] unless disabled in [`Config`](crate::Config).
#[async_trait]
pub trait EventHandler<T: Event>: Send + Sync + 'static {
    /// Handles a single published event.
    async fn handle(&self, event: &T, ctx: CancellationToken) -> Result<(), HandlerError>;
}
