use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::Message;

use crate::ws::registry::ConnectionRegistry;

/// Interval between keep-alive pings (in seconds).
const PING_INTERVAL_SECS: u64 = 30;

/// Spawn a background task that sends periodic Ping frames to the active
/// executor connection.
///
/// The returned `JoinHandle` is aborted during shutdown.
pub fn start_heartbeat(registry: Arc<ConnectionRegistry>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(PING_INTERVAL_SECS));

        loop {
            interval.tick().await;
            if let Some(peer) = registry.current() {
                tracing::debug!(conn_id = %peer.id(), "WebSocket heartbeat ping");
                let _ = peer.send(Message::Ping(Bytes::new()));
            }
        }
    })
}
