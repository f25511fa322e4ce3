// src/basic.rs

//! Responder for the `Basic` authentication scheme.

use std::sync::Arc;

use base64::Engine as _;
use http::header;
use http::HeaderValue;

use crate::body::{Request, Response};
use crate::challenge;
use crate::error::{BoxError, Error};
use crate::logger::{Logger, Silent};
use crate::responder::AuthResponder;

/// Callback which a caller provides for obtaining a user name and password
/// to use when attempting Basic authentication with a server.
///
/// It receives the `realm` parameter extracted from the challenge, and may
/// block (for example to prompt a human).
pub type BasicAuthCallback = Box<dyn FnMut(&str) -> Result<(String, String), BoxError> + Send>;

/// An [`AuthResponder`] that handles Basic authentication.
///
/// The first pair of credentials obtained from the callback is cached for
/// the lifetime of the responder, so later round trips and later requests
/// through the same middleware reuse it without re-prompting.
pub struct Basic {
    logger: Arc<dyn Logger>,
    callback: BasicAuthCallback,
    credentials: Option<(String, String)>,
}

impl Basic {
    /// Creates a Basic auth responder with a callback to resolve
    /// credentials.
    pub fn new(
        callback: impl FnMut(&str) -> Result<(String, String), BoxError> + Send + 'static,
    ) -> Basic {
        Basic {
            logger: Arc::new(Silent),
            callback: Box::new(callback),
            credentials: None,
        }
    }

    fn attach(request: &mut Request, username: &str, password: &str) -> Result<(), BoxError> {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
        let value = HeaderValue::from_str(&format!("Basic {encoded}"))
            .map_err(Error::InvalidHeader)?;
        request.headers_mut().insert(header::AUTHORIZATION, value);
        Ok(())
    }
}

impl AuthResponder for Basic {
    fn scheme(&self) -> &str {
        "Basic"
    }

    fn auth_respond(&mut self, challenge: &str, request: &mut Request) -> Result<bool, BoxError> {
        if let Some((username, password)) = &self.credentials {
            self.logger
                .debug("using previously-supplied Basic username and password");
            Basic::attach(request, username, password)?;
            return Ok(true);
        }

        let realm = challenge::parameter(challenge, "realm").unwrap_or_default();
        let (username, password) = (self.callback)(&realm)?;
        if username.is_empty() {
            self.logger.debug("failed to obtain user name for Basic auth");
            return Ok(false);
        }
        if password.is_empty() {
            self.logger.debug("failed to obtain password for Basic auth");
            return Ok(false);
        }

        Basic::attach(request, &username, &password)?;
        self.credentials = Some((username, password));
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn request() -> Request {
        http::Request::builder()
            .uri("http://example.test/")
            .body(Body::empty())
            .unwrap()
    }

    fn response() -> Response {
        http::Response::builder().body(Body::empty()).unwrap()
    }

    #[test]
    fn attaches_credentials_and_caches_them() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let mut basic = Basic::new(|realm| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            assert_eq!(realm, "registry");
            Ok(("admin".into(), "password".into()))
        });

        let mut req = request();
        assert!(basic
            .auth_respond("Basic realm=\"registry\"", &mut req)
            .unwrap());
        assert_eq!(
            req.headers().get(header::AUTHORIZATION).unwrap(),
            "Basic YWRtaW46cGFzc3dvcmQ="
        );

        // The second round must reuse the cache, not re-prompt.
        let mut retry = request();
        assert!(basic
            .auth_respond("Basic realm=\"registry\"", &mut retry)
            .unwrap());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn declines_on_empty_username() {
        let mut basic = Basic::new(|_| Ok((String::new(), "secret".into())));
        let mut req = request();
        assert!(!basic.auth_respond("Basic realm=\"x\"", &mut req).unwrap());
        assert!(req.headers().get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn declines_on_empty_password() {
        let mut basic = Basic::new(|_| Ok(("admin".into(), String::new())));
        let mut req = request();
        assert!(!basic.auth_respond("Basic realm=\"x\"", &mut req).unwrap());
        assert!(req.headers().get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn propagates_callback_errors() {
        let mut basic = Basic::new(|_| Err("prompt cancelled".into()));
        let mut req = request();
        let err = basic.auth_respond("Basic realm=\"x\"", &mut req).unwrap_err();
        assert_eq!(err.to_string(), "prompt cancelled");
    }

    #[test]
    fn completed_accepts_empty_challenge_only() {
        let mut basic = Basic::new(|_| Ok(("u".into(), "p".into())));
        assert!(basic.auth_completed("", &response()).unwrap());
        let err = basic
            .auth_completed("Basic realm=\"x\"", &response())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected WWW-Authenticate header in server response"
        );
    }
}
