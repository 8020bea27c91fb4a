// HTTP/1.1 message parsing and serialization over raw bytes
mod headers;
mod request;
mod response;
pub use headers::Headers;
pub use request::{request_from_reader, ParseState, Request, RequestLine, RequestParser};
pub use response::{default_headers, write_headers, write_status_line, Response, StatusCode};

pub const CRLF: &[u8] = b"\r\n";
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Offset of the first CRLF in `d`, if any.
pub fn find_crlf(d: &[u8]) -> Option<usize> {
    d.windows(CRLF.len()).position(|w| w == CRLF)
}
