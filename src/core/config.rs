//! # Registry configuration.
//!
//! Provides [`Config`], the settings applied to every fan-out performed by an
//! [`EventSystem`](crate::EventSystem).
//!
//! ## Sentinel values
//! - `timeout = 0s` → no per-handler timeout

use std::time::Duration;

/// Configuration for an [`EventSystem`](crate::EventSystem).
///
/// ## Field semantics
/// - `timeout`: Per-handler time limit (`0s` = unlimited)
/// - `catch_panics`: Convert handler panics into [`HandlerError::Panicked`](crate::HandlerError::Panicked)
///
/// ## Notes
/// All fields are public. Prefer the helper accessors over checking the
/// sentinel (`0`) directly.
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum time a single handler invocation may take.
    ///
    /// - `Duration::ZERO` = no timeout
    /// - `> 0` = the invocation is dropped after this long and reported as
    ///   [`HandlerError::Timeout`](crate::HandlerError::Timeout)
    ///
    /// A non-zero timeout requires a Tokio runtime with the time driver enabled.
    pub timeout: Duration,

    /// Panic isolation for handlers.
    ///
    /// - `true`: a panic becomes [`HandlerError::Panicked`](crate::HandlerError::Panicked);
    ///   sibling handlers still complete
    /// - `false`: siblings still complete, then the panic resumes in the publisher
    pub catch_panics: bool,
}

impl Config {
    /// Returns the per-handler timeout as an `Option`.
    ///
    /// - `None` → no timeout
    /// - `Some(d)` → timeout applied to each invocation
    #[inline]
    pub fn handler_timeout(&self) -> Option<Duration> {
        if self.timeout == Duration::ZERO {
            None
        } else {
            Some(self.timeout)
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `timeout = 0s` (no timeout)
    /// - `catch_panics = true`
    fn default() -> Self {
        Self {
            timeout: Duration::ZERO,
            catch_panics: true,
        }
    }
}
