//! Error types used by the registry and by event handlers.
//!
//! This module defines two error enums:
//!
//! - [`HandlerError`]: a failure raised by a single handler invocation.
//! - [`PublishError`]: the error returned to a publisher when one or more
//!   handlers failed during fan-out.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logs/metrics.
//!
//! Subscription management never produces errors: "already subscribed" and
//! "not subscribed" are reported as `false` by the registry methods.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by handler invocations.
///
/// Returned by [`EventHandler::handle`](crate::EventHandler::handle) and by
/// function handlers. Handler failures are never retried by the registry.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The handler reported a failure.
    #[error("handler failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// The handler exceeded the configured per-handler timeout.
    #[error("handler timed out after {timeout:?}")]
    Timeout {
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },

    /// The handler panicked; the panic was caught and converted.
    #[error("handler panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text (when it was a string).
        message: String,
    },

    /// The handler stopped early because its cancellation token fired.
    #[error("handler cancelled")]
    Canceled,
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Failed`].
    ///
    /// # Example
    /// ```
    /// use weakbus::HandlerError;
    ///
    /// let err = HandlerError::fail("disk full");
    /// assert_eq!(err.to_string(), "handler failed: disk full");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        HandlerError::Failed {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use weakbus::HandlerError;
    /// use std::time::Duration;
    ///
    /// let err = HandlerError::Timeout { timeout: Duration::from_secs(1) };
    /// assert_eq!(err.as_label(), "handler_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Failed { .. } => "handler_failed",
            HandlerError::Timeout { .. } => "handler_timeout",
            HandlerError::Panicked { .. } => "handler_panicked",
            HandlerError::Canceled => "handler_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Failed { error } => format!("error: {error}"),
            HandlerError::Timeout { timeout } => format!("timeout: {timeout:?}"),
            HandlerError::Panicked { message } => format!("panic: {message}"),
            HandlerError::Canceled => "context cancelled".to_string(),
        }
    }
}

/// # Errors returned by [`EventSystem::publish`](crate::EventSystem::publish).
///
/// Raised only after every sibling handler has completed and the cleanup
/// sweep has run.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// One or more handlers failed while handling the event.
    #[error("{} handler(s) failed for event `{event}`", failures.len())]
    Handler {
        /// Type name of the published event.
        event: &'static str,
        /// Every failure observed during fan-out (never empty).
        failures: Vec<HandlerError>,
    },
}

impl PublishError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use weakbus::{HandlerError, PublishError};
    ///
    /// let err = PublishError::Handler { event: "Ping", failures: vec![HandlerError::Canceled] };
    /// assert_eq!(err.as_label(), "publish_handler_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PublishError::Handler { .. } => "publish_handler_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            PublishError::Handler { event, failures } => {
                let labels: Vec<&str> = failures.iter().map(HandlerError::as_label).collect();
                format!("event={event}; failures={labels:?}")
            }
        }
    }

    /// Returns the individual handler failures.
    pub fn failures(&self) -> &[HandlerError] {
        match self {
            PublishError::Handler { failures, .. } => failures,
        }
    }
}
