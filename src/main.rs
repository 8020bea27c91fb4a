use rawhttp::config::{self, Config, Source};
use rawhttp::{handler, log, Server};

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    let path = config::path(&args);
    let loaded = config::load(&path);
    let mut cfg = match &loaded {
        Ok((c, _)) => c.clone(),
        Err(_) => Config::default(),
    };

    log::init(cfg.server.logging, &cfg.server.log_level);
    match loaded {
        Ok((_, Source::File(p))) => tracing::info!("loaded {p}"),
        Ok((_, Source::Generated(p))) => tracing::info!("generated {p}"),
        Err(e) => tracing::warn!("{e}; using defaults"),
    }
    if !cfg.server.validate() {
        tracing::warn!(listen_addr = %cfg.server.listen_addr, "invalid server settings replaced with defaults");
    }

    let server = match Server::serve(&cfg.server, handler::demo).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("server failed: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(addr = %server.local_addr(), "server started");

    shutdown_signal().await;
    server.close();
    server.wait().await;
    tracing::info!("server gracefully stopped");
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
                return;
            }
            Err(e) => tracing::warn!("cannot install SIGTERM handler: {e}"),
        }
    }
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("cannot listen for ctrl-c: {e}");
    }
}
