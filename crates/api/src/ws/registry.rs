use std::sync::Arc;

use tokio::sync::watch;

use crate::ws::peer::PeerConnection;

/// Tracks the single executor connection.
///
/// At most one peer is active at a time. Registering a new one displaces
/// the previous handle unconditionally; observers see every transition
/// through [`ConnectionRegistry::subscribe`].
pub struct ConnectionRegistry {
    current: watch::Sender<Option<Arc<PeerConnection>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self { current }
    }

    /// Make `peer` the active connection.
    ///
    /// The displaced connection, if any, is sent a Close frame and returned.
    pub fn register(&self, peer: Arc<PeerConnection>) -> Option<Arc<PeerConnection>> {
        let conn_id = peer.id().to_string();
        let previous = self.current.send_replace(Some(peer));

        if let Some(old) = &previous {
            tracing::info!(
                conn_id = %conn_id,
                replaced = %old.id(),
                "Executor reconnected, closing previous connection",
            );
            old.close();
        } else {
            tracing::info!(conn_id = %conn_id, "Executor registered");
        }

        previous
    }

    /// The active connection, if any.
    pub fn current(&self) -> Option<Arc<PeerConnection>> {
        self.current.borrow().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Clear the registry only if `conn_id` is still the active connection.
    ///
    /// Returns `false` for a stale close of an already displaced handle.
    pub fn unregister_if_current(&self, conn_id: &str) -> bool {
        let cleared = self.current.send_if_modified(|slot| match slot {
            Some(peer) if peer.id() == conn_id => {
                *slot = None;
                true
            }
            _ => false,
        });

        if cleared {
            tracing::info!(conn_id = %conn_id, "Executor unregistered");
        } else {
            tracing::debug!(conn_id = %conn_id, "Ignoring close of a displaced connection");
        }
        cleared
    }

    /// Observe connection-state transitions.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<PeerConnection>>> {
        self.current.subscribe()
    }

    /// Send a Close frame to the active connection and clear the registry.
    ///
    /// Used during graceful shutdown.
    pub fn shutdown(&self) {
        if let Some(peer) = self.current.send_replace(None) {
            tracing::info!(conn_id = %peer.id(), "Closing executor connection");
            peer.close();
        }
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
