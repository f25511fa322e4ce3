// src/responder.rs

//! The per-scheme responder contract.

use std::sync::Arc;

use crate::body::{Request, Response};
use crate::error::BoxError;
use crate::logger::Logger;

/// A pluggable credential producer for one authentication scheme.
///
/// The negotiation loop keys responders by [`scheme`](AuthResponder::scheme)
/// (matched case-insensitively against challenge tokens), asks them to
/// attach credentials through [`auth_respond`](AuthResponder::auth_respond),
/// and once a request succeeds asks the winning responder to confirm the
/// response through [`auth_completed`](AuthResponder::auth_completed).
///
/// Responders are stateful: one instance may accumulate credentials across
/// calls within its own lifetime, which is how Basic and Bearer avoid
/// re-prompting on every round trip.
pub trait AuthResponder: Send {
    /// The name of the authorization scheme this responder handles.
    fn scheme(&self) -> &str;

    /// Given the challenge value associated with this responder's scheme,
    /// decides whether the request should be retried.
    ///
    /// Returns `Ok(true)` when the request was mutated — presumably with an
    /// authentication header the server will accept — and should be
    /// retransmitted. `Ok(false)` declines without error, letting the
    /// negotiation move on. An `Err` means producing credentials itself
    /// failed and is fatal to the whole negotiation.
    fn auth_respond(&mut self, challenge: &str, request: &mut Request) -> Result<bool, BoxError>;

    /// Given a (possibly empty) challenge from a successful response,
    /// decides whether the server's reply should be accepted.
    ///
    /// An empty challenge is implicit success; an unexpected non-empty one
    /// is a protocol violation.
    fn auth_completed(&mut self, challenge: &str, response: &Response) -> Result<bool, BoxError>;

    /// Injects the diagnostic sink. Responders default to a silent sink
    /// until this is called.
    fn set_logger(&mut self, logger: Arc<dyn Logger>);
}
