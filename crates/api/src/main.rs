//! `flowbridge-api` -- the task relay server.
//!
//! Accepts task submissions over HTTP, forwards them to the single
//! connected executor over WebSocket and returns the executor's reply.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flowbridge_api::config::ServerConfig;
use flowbridge_api::router::build_app_router;
use flowbridge_api::state::AppState;
use flowbridge_api::ws;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowbridge_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid server configuration");
        std::process::exit(1);
    });
    tracing::info!(
        host = %config.host,
        port = %config.port,
        relay_timeout_secs = config.relay_timeout.as_secs(),
        "Loaded server configuration",
    );

    // --- State ---
    let state = AppState::new(config.clone());
    let registry = Arc::clone(&state.registry);

    // --- Background tasks ---
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&registry));
    let monitor_handle = ws::start_monitor(&registry);

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = match config.host.parse() {
        Ok(ip) => SocketAddr::new(ip, config.port),
        Err(e) => {
            tracing::error!(host = %config.host, error = %e, "Invalid HOST address");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "Starting server");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind to address");
            std::process::exit(1);
        }
    };

    // The executor socket is closed as soon as the signal arrives, then
    // in-flight requests get `SHUTDOWN_TIMEOUT_SECS` to drain.
    let (stopping_tx, stopping_rx) = tokio::sync::oneshot::channel::<()>();
    let signal_registry = Arc::clone(&registry);
    let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        signal_registry.shutdown();
        let _ = stopping_tx.send(());
    });
    let mut server = tokio::spawn(async move { serve.await });

    tokio::select! {
        outcome = &mut server => report_server_exit(outcome),
        _ = stopping_rx => {
            let drain = Duration::from_secs(config.shutdown_timeout_secs);
            match tokio::time::timeout(drain, &mut server).await {
                Ok(outcome) => report_server_exit(outcome),
                Err(_) => {
                    tracing::warn!(drain_secs = drain.as_secs(), "In-flight requests did not drain in time");
                    server.abort();
                }
            }
        }
    }

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    registry.shutdown();
    heartbeat_handle.abort();
    monitor_handle.abort();
    tracing::info!("Graceful shutdown complete");
}

fn report_server_exit(outcome: Result<std::io::Result<()>, tokio::task::JoinError>) {
    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "Server error"),
        Err(e) => tracing::error!(error = %e, "Server task failed"),
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
