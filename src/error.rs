// src/error.rs

//! Error types surfaced by the negotiation loop.

use thiserror::Error;

/// Boxed error used as the error currency of responders and credential
/// callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The errors produced while negotiating authentication for a request.
///
/// Transport failures pass through untouched; every other variant is a
/// terminal negotiation outcome. Nothing is retried once one of these is
/// returned.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The underlying sender failed. No negotiation is attempted on top of
    /// a transport failure.
    #[error(transparent)]
    Transport(BoxError),

    /// The server answered 401 to an unauthenticated request without
    /// offering any `WWW-Authenticate` challenge.
    #[error("failed to authenticate; server offered no authentication methods")]
    NoMethodsOffered,

    /// Credentials were offered and the server rejected them without
    /// offering a further challenge.
    #[error("failed to authenticate")]
    CredentialsRejected,

    /// A responder failed while producing credentials.
    #[error("{source}; failed to authenticate")]
    Credential {
        /// The responder or callback failure.
        source: BoxError,
    },

    /// Every matching responder declined to produce credentials.
    #[error("unable to attempt to authenticate")]
    NoUsableCredentials,

    /// The winning responder refused to accept the final response.
    #[error("unable to authenticate")]
    NotAuthenticated,

    /// The winning responder failed while validating the final response.
    #[error("{source}; unable to authenticate")]
    Completion {
        /// The responder failure.
        source: BoxError,
    },

    /// A successful response carried a `WWW-Authenticate` challenge the
    /// winning responder did not expect.
    #[error("unexpected WWW-Authenticate header in server response")]
    UnexpectedChallenge,

    /// Produced credentials could not be encoded as an `Authorization`
    /// header value.
    #[error("invalid authorization header")]
    InvalidHeader(#[source] http::header::InvalidHeaderValue),
}

impl Error {
    /// Wraps a transport-level failure from a [`Sender`](crate::Sender).
    pub fn transport(source: impl Into<BoxError>) -> Self {
        Error::Transport(source.into())
    }

    pub(crate) fn credential(source: BoxError) -> Self {
        Error::Credential { source }
    }

    pub(crate) fn completion(source: BoxError) -> Self {
        Error::Completion { source }
    }
}
