// HTTP response serialization
use std::io::{self, Write};

use bytes::Bytes;

use super::{Headers, CRLF};

/// The status codes this server writes. Anything else is sent as 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    BadRequest,
    InternalServerError,
}

impl StatusCode {
    pub fn from_u16(c: u16) -> Self {
        match c {
            200 => StatusCode::Ok,
            500 => StatusCode::InternalServerError,
            _ => StatusCode::BadRequest,
        }
    }

    pub fn as_u16(self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::InternalServerError => 500,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    fn status_line(self) -> &'static [u8] {
        match self {
            StatusCode::Ok => b"HTTP/1.1 200 OK\r\n",
            StatusCode::BadRequest => b"HTTP/1.1 400 Bad Request\r\n",
            StatusCode::InternalServerError => b"HTTP/1.1 500 Internal Server Error\r\n",
        }
    }
}

impl From<u16> for StatusCode {
    fn from(c: u16) -> Self {
        StatusCode::from_u16(c)
    }
}

impl From<http::StatusCode> for StatusCode {
    fn from(c: http::StatusCode) -> Self {
        StatusCode::from_u16(c.as_u16())
    }
}

pub fn write_status_line<W: Write>(w: &mut W, s: StatusCode) -> io::Result<()> {
    w.write_all(s.status_line())
}

pub fn write_headers<W: Write>(w: &mut W, h: &Headers) -> io::Result<()> {
    let mut o = Vec::new();
    for (k, v) in h.iter() {
        o.extend_from_slice(k.as_bytes());
        o.extend_from_slice(b": ");
        o.extend_from_slice(v.as_bytes());
        o.extend_from_slice(b"\r\n");
    }
    o.extend_from_slice(b"\r\n");
    w.write_all(&o)
}

pub fn default_headers(content_len: usize) -> Headers {
    let mut h = Headers::new();
    h.set("content-length", &content_len.to_string());
    h.set("connection", "close");
    h.set("content-type", "text/plain");
    h
}

#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Headers,
    pub body: Bytes,
}

impl Response {
    /// Response with default headers computed from `body`.
    pub fn new(status: StatusCode, body: Bytes) -> Self {
        Response { status, headers: default_headers(body.len()), body }
    }

    pub fn ok(body: Bytes) -> Self {
        Response::new(StatusCode::Ok, body)
    }

    pub fn error(status: impl Into<StatusCode>, message: &str) -> Self {
        Response::new(status.into(), Bytes::copy_from_slice(message.as_bytes()))
    }

    pub fn bad_request() -> Self {
        Response::new(StatusCode::BadRequest, Bytes::new())
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_status_line(w, self.status)?;
        write_headers(w, &self.headers)?;
        w.write_all(&self.body)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut o = Vec::with_capacity(128 + self.body.len());
        o.extend_from_slice(self.status.status_line());
        for (k, v) in self.headers.iter() {
            o.extend_from_slice(format!("{k}: {v}\r\n").as_bytes());
        }
        o.extend_from_slice(CRLF);
        o.extend_from_slice(&self.body);
        o
    }
}
