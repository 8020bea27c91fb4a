// TCP server: accept loop, one task per connection, one response per connection
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::config::Srv;
use crate::context::Context;
use crate::error::ServerError;
use crate::handler::Handler;
use crate::http::{request_from_reader, Response};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// A running server. Dropping it does not stop the accept loop; call `close`.
pub struct Server {
    local_addr: SocketAddr,
    closed: Arc<AtomicBool>,
    wake: Arc<Notify>,
    accept_task: JoinHandle<()>,
}

impl Server {
    /// Bind `cfg.listen_addr` and start accepting connections in the background.
    pub async fn serve<H: Handler>(cfg: &Srv, handler: H) -> Result<Server, ServerError> {
        let listener = TcpListener::bind(&cfg.listen_addr).await.map_err(|source| ServerError::Bind {
            addr: cfg.listen_addr.clone(),
            source,
        })?;
        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
            addr: cfg.listen_addr.clone(),
            source,
        })?;
        tracing::info!(addr = %local_addr, buffer_size = cfg.buffer_size, "listening");

        let closed = Arc::new(AtomicBool::new(false));
        let wake = Arc::new(Notify::new());
        let accept_task = tokio::spawn(accept_loop(
            listener,
            Arc::new(handler),
            Arc::clone(&closed),
            Arc::clone(&wake),
            cfg.buffer_size,
        ));

        Ok(Server { local_addr, closed, wake, accept_task })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Stop accepting. In-flight connections run to completion. Idempotent.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.wake.notify_one();
    }

    /// Wait for the accept loop to exit and the listening socket to be released.
    pub async fn wait(self) {
        if let Err(e) = self.accept_task.await {
            tracing::error!("accept loop panicked: {e}");
        }
    }
}

async fn accept_loop<H: Handler>(
    listener: TcpListener,
    handler: Arc<H>,
    closed: Arc<AtomicBool>,
    wake: Arc<Notify>,
    buf_size: usize,
) {
    loop {
        tokio::select! {
            _ = wake.notified() => break,
            res = listener.accept() => match res {
                Ok((stream, peer)) => {
                    tokio::spawn(handle_connection(stream, peer, Arc::clone(&handler), buf_size));
                }
                Err(e) => {
                    if closed.load(Ordering::Acquire) {
                        break;
                    }
                    tracing::error!("accept error: {e}");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            },
        }
    }
    drop(listener);
    tracing::debug!("accept loop stopped");
}

async fn handle_connection<H: Handler>(mut stream: TcpStream, peer: SocketAddr, handler: Arc<H>, buf_size: usize) {
    let ctx = Context::new(peer);
    tracing::debug!(conn = ctx.id, peer = %ctx.peer, "connection accepted");

    let resp = match request_from_reader(&mut stream, buf_size).await {
        Ok(req) => {
            crate::log::request(ctx.id, req.method(), req.target(), &ctx.peer_ip());
            let mut body = BytesMut::new();
            match handler.handle(&mut body, &req) {
                Ok(()) => Response::ok(body.freeze()),
                Err(e) => Response::error(e.status, &e.message),
            }
        }
        Err(e) if e.is_io() => {
            tracing::warn!(conn = ctx.id, peer = %ctx.peer, "connection aborted: {e}");
            return;
        }
        Err(e) => {
            tracing::warn!(conn = ctx.id, peer = %ctx.peer, "bad request: {e}");
            Response::bad_request()
        }
    };

    crate::log::response(ctx.id, resp.status, ctx.elapsed_ms(), resp.body.len());
    if let Err(e) = stream.write_all(&resp.to_bytes()).await {
        tracing::warn!(conn = ctx.id, "failed to write response: {e}");
    }
    let _ = stream.shutdown().await;
}
