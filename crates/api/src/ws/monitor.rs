use std::sync::Arc;

use crate::ws::registry::ConnectionRegistry;

/// Spawn a task logging every executor availability change.
///
/// Ends when the registry is dropped.
pub fn start_monitor(registry: &ConnectionRegistry) -> tokio::task::JoinHandle<()> {
    let mut rx = registry.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let current = rx.borrow_and_update().as_ref().map(Arc::clone);
            match current {
                Some(peer) => tracing::info!(conn_id = %peer.id(), "Executor available"),
                None => tracing::warn!("Executor unavailable, tasks will be rejected"),
            }
        }
    })
}
