// src/body.rs

//! Request and response body abstraction.
//!
//! The negotiation layer works on plain [`http`] types with [`Body`] as the
//! payload: either nothing, a one-shot byte stream, or a stream that has
//! been made rewindable so the request can be resent.

use std::fmt;
use std::io;

use bytes::Bytes;

use crate::rewind::Rewinder;

/// An HTTP request seen by the negotiation layer.
pub type Request = http::Request<Body>;

/// An HTTP response seen by the negotiation layer.
pub type Response = http::Response<Body>;

/// A request or response body.
pub struct Body(Inner);

enum Inner {
    Empty,
    /// A one-shot stream; reading consumes it for good.
    Once(Box<dyn io::Read + Send>),
    /// A stream that replays from its first byte on demand.
    Rewind(Rewinder),
}

impl Body {
    /// Creates an empty body.
    pub fn empty() -> Body {
        Body(Inner::Empty)
    }

    /// Wraps a one-shot reader as a body.
    pub fn new(reader: impl io::Read + Send + 'static) -> Body {
        Body(Inner::Once(Box::new(reader)))
    }

    /// Returns `true` if there is no payload at all.
    pub fn is_empty(&self) -> bool {
        matches!(self.0, Inner::Empty)
    }

    /// Converts the body into one that can be replayed from the start.
    ///
    /// Empty and already-rewindable bodies pass through unchanged.
    pub(crate) fn into_rewindable(self) -> Body {
        match self.0 {
            Inner::Once(reader) => Body(Inner::Rewind(Rewinder::new(reader))),
            other => Body(other),
        }
    }

    /// Resets a rewindable body to its first byte. One-shot and empty
    /// bodies are left alone.
    pub(crate) fn rewind(&mut self) {
        if let Inner::Rewind(rewinder) = &mut self.0 {
            rewinder.rewind();
        }
    }
}

impl Default for Body {
    fn default() -> Body {
        Body::empty()
    }
}

impl io::Read for Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.0 {
            Inner::Empty => Ok(0),
            Inner::Once(reader) => reader.read(buf),
            Inner::Rewind(rewinder) => rewinder.read(buf),
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Inner::Empty => write!(f, "Body::Empty"),
            Inner::Once(_) => write!(f, "Body::Once(..)"),
            Inner::Rewind(rewinder) => f.debug_tuple("Body::Rewind").field(rewinder).finish(),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Body {
        Body::new(io::Cursor::new(bytes))
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Body {
        Body::from(Bytes::from(bytes))
    }
}

impl From<String> for Body {
    fn from(s: String) -> Body {
        Body::from(Bytes::from(s))
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Body {
        Body::from(Bytes::copy_from_slice(s.as_bytes()))
    }
}
