// Error types for request parsing, server startup, and configuration
use std::io;

use thiserror::Error;

use crate::http::ParseState;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),
    #[error("invalid method in request line: {0:?}")]
    InvalidMethod(String),
    #[error("invalid HTTP version in request line: {0:?}")]
    InvalidVersion(String),
    #[error("malformed header line: {0:?}")]
    MalformedHeaderLine(String),
    #[error("invalid header key: {0:?}")]
    InvalidHeaderKey(String),
    #[error("invalid content-length: {0:?}")]
    InvalidContentLength(String),
    #[error("request body larger than declared content-length of {declared} bytes")]
    BodyTooLarge { declared: usize },
    #[error("request body shorter than declared content-length ({received} of {declared} bytes)")]
    BodyTruncated { declared: usize, received: usize },
    #[error("stream ended before the request was complete (state: {0:?})")]
    UnexpectedEof(ParseState),
    #[error("error reading from source: {0}")]
    Io(#[from] io::Error),
    #[error("data fed to a request that is already done")]
    AlreadyDone,
}

impl ParseError {
    /// True for failures of the byte source rather than of the request itself.
    pub fn is_io(&self) -> bool {
        matches!(self, ParseError::Io(_))
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("parse error in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}
