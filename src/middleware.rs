// src/middleware.rs

//! The authentication negotiation loop.
//!
//! [`AuthMiddleware`] wraps a [`Sender`], watches its responses for `401`
//! challenges, and drives the registered responders through as many round
//! trips as the server asks for, replaying the request body from its
//! rewind buffer on every attempt.

use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use http::header;
use http::StatusCode;

use crate::body::{Request, Response};
use crate::challenge;
use crate::error::Error;
use crate::logger::{Logger, Silent};
use crate::responder::AuthResponder;

/// The transport capability the middleware wraps: something that accepts a
/// fully-formed request and returns a response or a transport-level error,
/// synchronously.
///
/// The request is borrowed mutably rather than consumed so it can be
/// resent; a sender reads the body through [`io::Read`] and must leave the
/// rest of the request intact.
pub trait Sender {
    /// Sends the request to a remote endpoint.
    fn send(&mut self, request: &mut Request) -> Result<Response, Error>;
}

/// Do()-style senders: any closure from request to response is a sender,
/// which is also how middlewares wrap each other.
impl<F> Sender for F
where
    F: FnMut(&mut Request) -> Result<Response, Error>,
{
    fn send(&mut self, request: &mut Request) -> Result<Response, Error> {
        self(request)
    }
}

/// Middleware which handles any "unauthorized" responses from its inner
/// sender by retrying the same request with authentication.
///
/// Responders are registered once at construction, keyed by their
/// lower-cased scheme name; a later registration for a duplicate scheme
/// silently overrides the earlier one.
pub struct AuthMiddleware<S> {
    responders: HashMap<String, Box<dyn AuthResponder>>,
    logger: Arc<dyn Logger>,
    next: S,
}

impl<S: Sender> AuthMiddleware<S> {
    /// Wraps `next`, handling challenges with `responders` and discarding
    /// diagnostics.
    pub fn new(next: S, responders: Vec<Box<dyn AuthResponder>>) -> AuthMiddleware<S> {
        AuthMiddleware::with_logger(next, Arc::new(Silent), responders)
    }

    /// Wraps `next` with a diagnostic sink, which is also injected into
    /// every responder.
    pub fn with_logger(
        next: S,
        logger: Arc<dyn Logger>,
        responders: Vec<Box<dyn AuthResponder>>,
    ) -> AuthMiddleware<S> {
        let mut registry: HashMap<String, Box<dyn AuthResponder>> = HashMap::new();
        for mut responder in responders {
            responder.set_logger(logger.clone());
            registry.insert(responder.scheme().to_ascii_lowercase(), responder);
        }
        AuthMiddleware {
            responders: registry,
            logger,
            next,
        }
    }

    /// Asks the winning responder whether the final, successful response
    /// should be trusted.
    fn validate(&mut self, scheme: &str, response: Response) -> Result<Response, Error> {
        let challenges = authenticate_challenges(&response);
        let matched = challenges
            .iter()
            .map(|c| challenge::normalize(c))
            .find(|c| challenge::scheme_token(c).eq_ignore_ascii_case(scheme));

        if matched.is_none() && !challenges.is_empty() {
            // The server kept challenging with schemes that never won.
            return Err(Error::NotAuthenticated);
        }
        if challenges.is_empty() {
            self.logger
                .debug("no authentication header in final server response");
        }

        let responder = match self.responders.get_mut(scheme) {
            Some(responder) => responder,
            // The winner was recorded from a registry hit.
            None => return Ok(response),
        };

        match responder.auth_completed(matched.as_deref().unwrap_or(""), &response) {
            Ok(true) => {
                self.logger.debug(&format!("handler for {scheme:?} succeeded"));
                Ok(response)
            }
            Ok(false) => {
                self.logger.debug(&format!("handler for {scheme:?} failed"));
                Err(Error::NotAuthenticated)
            }
            Err(err) => Err(Error::completion(err)),
        }
    }
}

impl<S: Sender> Sender for AuthMiddleware<S> {
    fn send(&mut self, request: &mut Request) -> Result<Response, Error> {
        // We may have to issue the request multiple times, so everything
        // sent must be recoverable from the body's rewind buffer.
        if !request.body().is_empty() {
            let body = std::mem::take(request.body_mut());
            *request.body_mut() = body.into_rewindable();
        }

        let already_authorized = request
            .headers()
            .get(header::AUTHORIZATION)
            .is_some_and(|value| !value.is_empty());

        let mut response = self.next.send(request)?;

        // If the caller authenticated up front, or this isn't an
        // authentication-required response, we're done.
        if already_authorized || response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let mut winner: Option<String> = None;

        while response.status() == StatusCode::UNAUTHORIZED {
            let tried_previously = request.headers().contains_key(header::AUTHORIZATION);
            let challenges = authenticate_challenges(&response);

            if challenges.is_empty() {
                return Err(if tried_previously {
                    Error::CredentialsRejected
                } else {
                    Error::NoMethodsOffered
                });
            }

            let mut retry = false;
            for challenge_value in &challenges {
                let scheme = challenge::scheme_token(challenge_value);
                let responder = match self.responders.get_mut(&scheme.to_ascii_lowercase()) {
                    Some(responder) => responder,
                    None => {
                        self.logger.debug(&format!(
                            "no support for authentication scheme {scheme:?}"
                        ));
                        continue;
                    }
                };
                match responder.auth_respond(challenge_value, request) {
                    Ok(true) => {
                        self.logger
                            .debug(&format!("handler for {scheme:?} produced data"));
                        winner = Some(scheme.to_ascii_lowercase());
                        retry = true;
                        break;
                    }
                    Ok(false) => {
                        self.logger
                            .debug(&format!("handler for {scheme:?} failed to produce data"));
                    }
                    Err(err) => {
                        self.logger.debug(&format!(
                            "{err}; handler for {scheme:?} failed to produce data"
                        ));
                        return Err(Error::credential(err));
                    }
                }
            }

            if !retry {
                return Err(Error::NoUsableCredentials);
            }

            drain(response);
            request.body_mut().rewind();
            response = self.next.send(request)?;
        }

        match winner {
            Some(scheme) => self.validate(&scheme, response),
            // The loop cannot exit cleanly without recording a winner.
            None => Ok(response),
        }
    }
}

fn authenticate_challenges(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::WWW_AUTHENTICATE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_owned)
        .collect()
}

/// Reads an intermediate response body to completion so the transport can
/// reuse the connection.
fn drain(response: Response) {
    let mut body = response.into_body();
    let _ = io::copy(&mut body, &mut io::sink());
}
