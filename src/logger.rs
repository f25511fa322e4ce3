// src/logger.rs

//! Diagnostic sinks for negotiation tracing.
//!
//! Responders and the middleware report every protocol decision through a
//! [`Logger`]. The default sink is [`Silent`], so logging is strictly
//! opt-in; [`LogFacade`] routes the trace into the `log` crate for callers
//! that already run a `log`-compatible subscriber.

/// Receiver for debug and diagnostic callbacks.
pub trait Logger: Send + Sync {
    /// Records a debug-level message.
    fn debug(&self, message: &str);

    /// Records an info-level message.
    fn info(&self, message: &str);

    /// Records an error-level message.
    fn error(&self, message: &str);
}

/// A [`Logger`] that ignores every message it gets.
///
/// Used as the default sink when none is set.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl Logger for Silent {
    fn debug(&self, _message: &str) {}

    fn info(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}

/// A [`Logger`] that forwards to the `log` crate at the matching levels.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogFacade;

impl Logger for LogFacade {
    fn debug(&self, message: &str) {
        log::debug!(target: "http_authn", "{message}");
    }

    fn info(&self, message: &str) {
        log::info!(target: "http_authn", "{message}");
    }

    fn error(&self, message: &str) {
        log::error!(target: "http_authn", "{message}");
    }
}
