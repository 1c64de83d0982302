//! crashboard gateway
//!
//! - `GET /get-crashes`       : daily crash rate chart (PNG)
//! - `GET /movingavg/crashes` : week-over-week user-weighted crash rate (JSON)
//! - `GET /healthz`, `GET /metrics`

use tracing_subscriber::{fmt, EnvFilter};

use crashboard_core::error::{CrashboardError, Result};
use crashboard_gateway::{app_state, config, router};

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = config::load()?;
    let listen = cfg.server.listen_addr()?;
    tracing::info!(project = %cfg.reporting.project, timezone = %cfg.reporting.timezone, "config loaded");

    let state = app_state::AppState::connect(cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, "crashboard-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| CrashboardError::Internal(format!("bind {listen}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CrashboardError::Internal(format!("server failed: {e}")))?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
