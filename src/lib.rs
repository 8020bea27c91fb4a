// HTTP/1.1 request parsing and a one-shot response server over raw TCP
pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod http;
pub mod log;
pub mod server;

pub use error::{ConfigError, ParseError, ServerError};
pub use handler::{Handler, HandlerError};
pub use crate::http::{Headers, ParseState, Request, RequestLine, RequestParser, Response, StatusCode};
pub use server::Server;
