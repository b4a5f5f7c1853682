use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::state::AppState;
use crate::ws::peer::PeerConnection;
use crate::ws::registry::ConnectionRegistry;

/// HTTP handler that upgrades the executor connection to WebSocket.
///
/// After the upgrade the connection becomes the registry's active peer,
/// displacing any earlier one.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.registry))
}

/// Manage a single executor connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with the `ConnectionRegistry`.
///   2. Spawns a sender task that forwards messages from the peer channel.
///   3. Routes inbound text frames to the peer (heartbeat or reply).
///   4. Unregisters on disconnect, unless a newer connection took over.
async fn handle_socket(socket: WebSocket, registry: Arc<ConnectionRegistry>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "Executor WebSocket connected");

    let (peer, mut rx) = PeerConnection::new(conn_id.clone());
    registry.register(Arc::clone(&peer));

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
            if closing {
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let delivery = peer.deliver(text.as_str()).await;
                tracing::trace!(conn_id = %conn_id, ?delivery, "Inbound frame routed");
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    registry.unregister_if_current(&conn_id);
    // Wakes a submission still waiting on this connection.
    peer.disarm().await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "Executor WebSocket disconnected");
}
