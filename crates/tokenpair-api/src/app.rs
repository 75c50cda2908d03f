//! Application builder: wires store, notifier, and token services into an Axum app.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;
use tracing::{info, warn};

use tokenpair_auth::{AccessTokenSigner, RefreshTokenHasher, SessionManager};
use tokenpair_core::config::AppConfig;
use tokenpair_core::error::{AppError, ErrorKind};
use tokenpair_core::result::AppResult;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Constructs every service the handlers need from configuration.
pub async fn build_state(config: AppConfig) -> AppResult<AppState> {
    // ── Step 1: Session store ────────────────────────────────────
    info!(provider = %config.database.provider, "Initializing session store...");
    let store = tokenpair_database::build_session_store(&config.database).await?;

    // ── Step 2: Warning channel ──────────────────────────────────
    let notifier = tokenpair_notify::build_notifier(&config.notify)?;

    // ── Step 3: Token services ───────────────────────────────────
    let signer = Arc::new(AccessTokenSigner::from_config(&config.auth));
    let hasher = Arc::new(RefreshTokenHasher::from_config(&config.auth)?);

    let session_manager = Arc::new(SessionManager::new(
        signer,
        hasher,
        store,
        notifier,
        &config.auth,
        &config.notify,
    )?);

    Ok(AppState::new(Arc::new(config), session_manager))
}

/// Runs the TokenPair server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    info!("Starting TokenPair v{}", env!("CARGO_PKG_VERSION"));

    let addr = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = build_state(config).await?;
    let app = build_app(state);

    // ── Step 4: Bind and serve ───────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Configuration, format!("Failed to bind {addr}"), e)
    })?;
    info!("TokenPair server listening on {}", addr);

    // ── Step 5: Graceful shutdown ────────────────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, draining in-flight requests...");
        let _ = shutdown_tx.send(true);
    });

    tokio::select! {
        result = server.into_future() => {
            result.map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;
        }
        _ = async {
            let _ = shutdown_rx.wait_for(|stopping| *stopping).await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(grace_seconds = grace.as_secs(), "Grace period elapsed, dropping open connections");
        }
    }

    info!("TokenPair server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
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
}
