// src/lib.rs

//! Client-side HTTP authentication negotiation.
//!
//! This crate wraps a transport-level [`Sender`] with a middleware that
//! answers `401 Unauthorized` challenges transparently: it parses the
//! response's `WWW-Authenticate` headers, picks a registered
//! [`AuthResponder`] for the offered scheme, lets it attach credentials to
//! the request, and resends, over as many round trips as the server asks
//! for. Request bodies are buffered into a rewindable stream so a one-shot
//! body can be replayed on every attempt, fetching each source byte at
//! most once.
//!
//! Responders for the `Basic` and `Bearer` schemes ship with the crate;
//! both obtain credentials from caller-supplied callbacks and cache them
//! for the lifetime of the responder. Additional schemes plug in through
//! the same [`AuthResponder`] trait.
//!
//! # Example
//!
//! ```
//! use http::{header, StatusCode};
//! use http_authn::{AuthMiddleware, Basic, Body, Request, Sender};
//!
//! // A stand-in transport: challenges until credentials arrive.
//! let backend = |request: &mut Request| {
//!     if request.headers().contains_key(header::AUTHORIZATION) {
//!         Ok::<_, http_authn::Error>(
//!             http::Response::builder()
//!                 .status(StatusCode::OK)
//!                 .body(Body::empty())
//!                 .unwrap(),
//!         )
//!     } else {
//!         Ok(http::Response::builder()
//!             .status(StatusCode::UNAUTHORIZED)
//!             .header(header::WWW_AUTHENTICATE, "Basic realm=\"registry\"")
//!             .body(Body::empty())
//!             .unwrap())
//!     }
//! };
//!
//! let basic = Basic::new(|_realm| Ok(("admin".into(), "secret".into())));
//! let mut client = AuthMiddleware::new(backend, vec![Box::new(basic)]);
//!
//! let mut request = http::Request::builder()
//!     .uri("http://registry.test/v2/")
//!     .body(Body::from("payload"))
//!     .unwrap();
//!
//! let response = client.send(&mut request).unwrap();
//! assert_eq!(response.status(), StatusCode::OK);
//! ```
//!
//! # Scope
//!
//! The crate manipulates request and response headers and bodies only. The
//! transport (connections, TLS, timeouts, cancellation) lives behind the
//! wrapped [`Sender`]; credential acquisition (prompting, token services)
//! lives behind the responder callbacks.

mod basic;
mod bearer;
mod body;
mod challenge;
mod error;
mod logger;
mod middleware;
mod responder;
mod rewind;

pub use basic::{Basic, BasicAuthCallback};
pub use bearer::{Bearer, BearerAuthCallback};
pub use body::{Body, Request, Response};
pub use error::{BoxError, Error};
pub use logger::{LogFacade, Logger, Silent};
pub use middleware::{AuthMiddleware, Sender};
pub use responder::AuthResponder;
pub use rewind::Rewinder;

// Commonly used alongside this crate's types.
pub use http::StatusCode;
