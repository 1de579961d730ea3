//! chatmock-server – entry point.
//!
//! Startup order:
//! 1. Layer configuration from defaults, config file, environment and flags.
//! 2. Initialise structured tracing.
//! 3. Make sure the upload directory exists.
//! 4. Build the Axum router and serve it with graceful shutdown.

mod config;
mod error;
mod logging;
mod middleware;
mod routes;
mod schemas;
mod sse;
mod state;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use crate::config::{Cli, Config};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Configuration ───────────────────────────────────────────────────────
    let cli = Cli::parse();
    let cfg = Config::load(&cli);

    // ── 2. Tracing ─────────────────────────────────────────────────────────────
    let _log_guard = logging::init(&cfg);
    info!(version = env!("CARGO_PKG_VERSION"), "chatmock-server starting");

    // ── 3. Upload directory ────────────────────────────────────────────────────
    tokio::fs::create_dir_all(&cfg.upload_dir)
        .await
        .with_context(|| format!("creating upload dir {}", cfg.upload_dir.display()))?;
    info!(
        upload_dir = %cfg.upload_dir.display(),
        max_upload_bytes = cfg.max_upload_bytes,
        pacing = cfg.pacing,
        seeded = cfg.seed.is_some(),
        "configuration loaded"
    );
    if !cfg.frontend_dir.join("index.html").is_file() {
        warn!(dir = %cfg.frontend_dir.display(), "no built web client found; serving the API only");
    }

    // ── 4. HTTP server with graceful shutdown ──────────────────────────────────
    let addr = format!("{}:{}", cfg.host, cfg.port);
    let state = Arc::new(AppState::from_config(cfg));
    let app = routes::build(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %listener.local_addr()?, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("chatmock-server stopped");
    Ok(())
}

/// Returns a future that resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}
