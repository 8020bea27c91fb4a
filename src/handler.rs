// Application handler interface
use std::fmt;

use bytes::{BufMut, BytesMut};

use crate::http::Request;

/// Structured failure returned by a handler; becomes the response status and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerError {
    pub status: http::StatusCode,
    pub message: String,
}

impl HandlerError {
    pub fn new(status: http::StatusCode, message: impl Into<String>) -> Self {
        HandlerError { status, message: message.into() }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for HandlerError {}

/// Called once per parsed request. Bytes written to `w` become the 200 body
/// unless an error is returned, in which case they are discarded.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, w: &mut BytesMut, req: &Request) -> Result<(), HandlerError>;
}

impl<F> Handler for F
where
    F: Fn(&mut BytesMut, &Request) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    fn handle(&self, w: &mut BytesMut, req: &Request) -> Result<(), HandlerError> {
        self(w, req)
    }
}

/// Handler served by the bundled binary.
pub fn demo(w: &mut BytesMut, req: &Request) -> Result<(), HandlerError> {
    match req.target() {
        "/yourproblem" => Err(HandlerError::new(
            http::StatusCode::BAD_REQUEST,
            "Your problem is not my problem\n",
        )),
        "/myproblem" => Err(HandlerError::new(
            http::StatusCode::INTERNAL_SERVER_ERROR,
            "Woopsie, my bad\n",
        )),
        _ => {
            w.put_slice(b"All good, frfr\n");
            Ok(())
        }
    }
}
