// Per-connection context for logging and timing
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

pub struct Context {
    pub id: u64,
    pub peer: SocketAddr,
    pub started_at: Instant,
}

impl Context {
    pub fn new(peer: SocketAddr) -> Self {
        Context {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            peer,
            started_at: Instant::now(),
        }
    }

    pub fn peer_ip(&self) -> String {
        self.peer.ip().to_string()
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }
}
