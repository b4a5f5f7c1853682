//! `flowbridge-agent` -- the task executor.
//!
//! Connects to the relay over WebSocket, executes the page-editing tasks
//! it forwards against the live document and replies with per-operation
//! results. A heartbeat frame is sent on a fixed interval while connected.
//!
//! # Environment variables
//!
//! | Variable                  | Required | Default | Description                                   |
//! |---------------------------|----------|---------|-----------------------------------------------|
//! | `BACKEND_WS_URL`          | yes      | --      | Relay endpoint, e.g. `ws://host:3000/api/v1/ws` |
//! | `HEARTBEAT_INTERVAL_SECS` | no       | `30`    | Seconds between heartbeat frames              |
//! | `RECONNECT_DELAY_SECS`    | no       | `5`     | Seconds to wait before reconnecting           |
//! | `ASSET_TIMEOUT_SECS`      | no       | `20`    | Timeout for image asset downloads             |

use std::sync::Arc;

use flowbridge_agent::assets::HttpAssetSource;
use flowbridge_agent::config::AgentConfig;
use flowbridge_agent::document::Designer;
use flowbridge_agent::interpreter::Interpreter;
use flowbridge_agent::session;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowbridge_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AgentConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid agent configuration");
        std::process::exit(1);
    });

    tracing::info!(
        ws_url = %config.ws_url,
        heartbeat_secs = config.heartbeat_interval.as_secs(),
        "Starting flowbridge-agent",
    );

    let assets = HttpAssetSource::new(config.asset_timeout).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build asset HTTP client");
        std::process::exit(1);
    });

    let mut interpreter = Interpreter::new(Designer::default(), Arc::new(assets));

    session::run(&config, &mut interpreter).await;
}
