// src/bearer.rs

//! Responder for the `Bearer` authentication scheme.

use std::sync::Arc;

use http::header;
use http::HeaderValue;

use crate::body::{Request, Response};
use crate::error::{BoxError, Error};
use crate::logger::{Logger, Silent};
use crate::responder::AuthResponder;

/// Callback which a caller provides for obtaining a token to use in
/// attempting bearer authentication with a server.
///
/// It receives the full challenge value, so it can parse the realm,
/// service, and scope parameters itself (for example to call a token
/// service).
pub type BearerAuthCallback = Box<dyn FnMut(&str) -> Result<String, BoxError> + Send>;

/// An [`AuthResponder`] that handles bearer authentication.
pub struct Bearer {
    logger: Arc<dyn Logger>,
    token: Option<String>,
    callback: BearerAuthCallback,
}

impl Bearer {
    /// Creates a Bearer auth responder with a callback to resolve tokens.
    pub fn new(callback: impl FnMut(&str) -> Result<String, BoxError> + Send + 'static) -> Bearer {
        Bearer {
            logger: Arc::new(Silent),
            token: None,
            callback: Box::new(callback),
        }
    }

    fn attach(&self, request: &mut Request, token: &str) -> Result<(), BoxError> {
        let value = HeaderValue::from_str(&format!("{} {token}", self.scheme()))
            .map_err(Error::InvalidHeader)?;
        request.headers_mut().insert(header::AUTHORIZATION, value);
        Ok(())
    }
}

impl AuthResponder for Bearer {
    fn scheme(&self) -> &str {
        "Bearer"
    }

    fn auth_respond(&mut self, challenge: &str, request: &mut Request) -> Result<bool, BoxError> {
        if let Some(token) = self.token.clone() {
            self.logger.debug("using previously-supplied Bearer token");
            self.attach(request, &token)?;
            return Ok(true);
        }

        let token = (self.callback)(challenge)?;
        if token.is_empty() {
            self.logger.debug("Bearer token not supplied");
            return Ok(false);
        }

        self.attach(request, &token)?;
        self.token = Some(token);
        Ok(true)
    }

    fn auth_completed(&mut self, challenge: &str, _response: &Response) -> Result<bool, BoxError> {
        if challenge.is_empty() {
            return Ok(true);
        }
        Err(Error::UnexpectedChallenge.into())
    }

    fn set_logger(&mut self, logger: Arc<dyn Logger>) {
        self.logger = logger;
    }
}
