// Incremental HTTP/1.1 request parsing
use tokio::io::{AsyncRead, AsyncReadExt};

use super::{find_crlf, Headers, CRLF};
use crate::error::ParseError;

const VERSION_PREFIX: &str = "HTTP/";
const SUPPORTED_VERSION: &str = "1.1";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub target: String,
    /// Version without the "HTTP/" prefix, always "1.1".
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParseState {
    Initialized,
    ParsingHeaders,
    ParsingBody,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub request_line: RequestLine,
    pub headers: Headers,
    pub body: Vec<u8>,
    pub content_length: usize,
    pub state: ParseState,
}

impl Default for Request {
    fn default() -> Self {
        Request::new()
    }
}

impl Request {
    pub fn new() -> Self {
        Request {
            request_line: RequestLine::default(),
            headers: Headers::new(),
            body: Vec::new(),
            content_length: 0,
            state: ParseState::Initialized,
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == ParseState::Done
    }

    pub fn method(&self) -> &str {
        &self.request_line.method
    }

    pub fn target(&self) -> &str {
        &self.request_line.target
    }

    /// Run state steps over `d` until one needs more data or the request is
    /// done. Returns the number of bytes consumed from the front of `d`.
    pub fn parse(&mut self, d: &[u8]) -> Result<usize, ParseError> {
        let mut total = 0;
        while self.state != ParseState::Done {
            let n = self.parse_single(&d[total..])?;
            total += n;
            if n == 0 {
                break;
            }
        }
        Ok(total)
    }

    fn parse_single(&mut self, d: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParseState::Initialized => {
                let (rl, n) = match parse_request_line(d)? {
                    Some(parsed) => parsed,
                    None => return Ok(0),
                };
                self.request_line = rl;
                self.state = ParseState::ParsingHeaders;
                Ok(n)
            }
            ParseState::ParsingHeaders => {
                let (n, done) = self.headers.parse(d)?;
                if done {
                    self.state = ParseState::ParsingBody;
                }
                Ok(n)
            }
            ParseState::ParsingBody => {
                let declared = match self.headers.get("content-length") {
                    Some(v) => v,
                    None => {
                        self.state = ParseState::Done;
                        return Ok(0);
                    }
                };
                self.content_length = declared
                    .parse::<usize>()
                    .map_err(|_| ParseError::InvalidContentLength(declared.to_string()))?;
                self.body.extend_from_slice(d);
                if self.body.len() > self.content_length {
                    return Err(ParseError::BodyTooLarge { declared: self.content_length });
                }
                if self.body.len() == self.content_length {
                    self.state = ParseState::Done;
                }
                Ok(d.len())
            }
            ParseState::Done => Err(ParseError::AlreadyDone),
        }
    }

    /// Apply the end-of-stream policy once the source has no more bytes.
    pub fn finish(&mut self) -> Result<(), ParseError> {
        match self.state {
            ParseState::Done => Ok(()),
            ParseState::ParsingBody => {
                if self.body.len() < self.content_length {
                    return Err(ParseError::BodyTruncated {
                        declared: self.content_length,
                        received: self.body.len(),
                    });
                }
                self.state = ParseState::Done;
                Ok(())
            }
            s => Err(ParseError::UnexpectedEof(s)),
        }
    }
}

/// Parse the request line at the front of `d`. `Ok(None)` means no full line yet.
fn parse_request_line(d: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let idx = match find_crlf(d) {
        Some(i) => i,
        None => return Ok(None),
    };
    let line = &d[..idx];
    let lossy = |b: &[u8]| String::from_utf8_lossy(b).into_owned();

    let parts: Vec<&[u8]> = line.split(|&b| b == b' ').collect();
    let [method, target, version] = parts[..] else {
        return Err(ParseError::MalformedRequestLine(lossy(line)));
    };

    if method.is_empty() || !method.iter().all(|b| b.is_ascii_uppercase()) {
        return Err(ParseError::InvalidMethod(lossy(method)));
    }
    match version.strip_prefix(VERSION_PREFIX.as_bytes()) {
        Some(v) if v == SUPPORTED_VERSION.as_bytes() => {}
        _ => return Err(ParseError::InvalidVersion(lossy(version))),
    }

    let rl = RequestLine {
        method: lossy(method),
        target: lossy(target),
        version: SUPPORTED_VERSION.to_string(),
    };
    Ok(Some((rl, idx + CRLF.len())))
}

/// Owns the read buffer for one request and feeds it through the state machine.
///
/// Unconsumed bytes always sit at the front of `buf`; `filled` marks their end.
/// The buffer doubles whenever incoming data would not fit.
#[derive(Debug)]
pub struct RequestParser {
    buf: Vec<u8>,
    filled: usize,
    request: Request,
}

impl Default for RequestParser {
    fn default() -> Self {
        RequestParser::with_capacity(super::DEFAULT_BUFFER_SIZE)
    }
}

impl RequestParser {
    pub fn new() -> Self {
        RequestParser::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        RequestParser { buf: vec![0; cap.max(1)], filled: 0, request: Request::new() }
    }

    pub(crate) fn state(&self) -> ParseState {
        self.request.state
    }

    pub fn is_done(&self) -> bool {
        self.request.is_done()
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn into_request(self) -> Request {
        self.request
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes received but not yet consumed by the state machine.
    pub(crate) fn buffered(&self) -> &[u8] {
        &self.buf[..self.filled]
    }

    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), ParseError> {
        if self.is_done() {
            return Err(ParseError::AlreadyDone);
        }
        self.grow_for(bytes.len());
        self.buf[self.filled..self.filled + bytes.len()].copy_from_slice(bytes);
        self.filled += bytes.len();
        self.advance()
    }

    /// Read once from `r` straight into spare capacity. Returns the byte count;
    /// zero means the source reached end-of-stream.
    pub async fn read_from<R: AsyncRead + Unpin>(&mut self, r: &mut R) -> Result<usize, ParseError> {
        if self.is_done() {
            return Err(ParseError::AlreadyDone);
        }
        self.grow_for(1);
        let n = r.read(&mut self.buf[self.filled..]).await?;
        if n > 0 {
            self.filled += n;
            self.advance()?;
        }
        Ok(n)
    }

    /// Signal end-of-stream.
    pub fn finish(&mut self) -> Result<(), ParseError> {
        self.request.finish()
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        let consumed = self.request.parse(&self.buf[..self.filled])?;
        if consumed > 0 {
            self.buf.copy_within(consumed..self.filled, 0);
            self.filled -= consumed;
        }
        Ok(())
    }

    fn grow_for(&mut self, incoming: usize) {
        let mut cap = self.buf.len().max(1);
        while self.filled + incoming > cap {
            cap *= 2;
        }
        if cap != self.buf.len() {
            self.buf.resize(cap, 0);
        }
    }
}

/// Read from `r` until a complete request has been parsed.
pub async fn request_from_reader<R: AsyncRead + Unpin>(r: &mut R, buf_size: usize) -> Result<Request, ParseError> {
    let mut p = RequestParser::with_capacity(buf_size);
    while !p.is_done() {
        if p.read_from(r).await? == 0 {
            p.finish()?;
        }
    }
    Ok(p.into_request())
}
