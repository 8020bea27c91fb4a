// Logging setup and access-log helpers
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::http::StatusCode;

/// Map a configured level name to a filter. Unknown names fall back to info.
pub fn level(name: &str) -> LevelFilter {
    match name.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" | "warning" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `lvl`.
/// Safe to call more than once; later calls are ignored.
pub fn init(enabled: bool, lvl: &str) {
    let filter = if enabled {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::default().add_directive(level(lvl).into()))
    } else {
        EnvFilter::default().add_directive(LevelFilter::OFF.into())
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub fn request(conn: u64, method: &str, target: &str, ip: &str) {
    tracing::info!(conn, %method, %target, %ip, "→ request");
}

pub fn response(conn: u64, status: StatusCode, ms: u128, body_len: usize) {
    let (code, reason) = (status.as_u16(), status.reason());
    if status == StatusCode::InternalServerError {
        tracing::warn!(conn, status = code, %reason, ms = ms as u64, body_len, "← response");
    } else {
        tracing::info!(conn, status = code, %reason, ms = ms as u64, body_len, "← response");
    }
}
