//! WebSocket connection to the relay and the task loop.
//!
//! Connects to the relay, executes every task frame it receives and
//! answers with a task response. Independently of any task, a heartbeat
//! frame is pushed on a fixed interval while the connection is open.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::time::Instant;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};

use flowbridge_core::protocol::heartbeat_task;
use flowbridge_core::result::TaskResponse;
use flowbridge_core::task::Task;

use crate::config::AgentConfig;
use crate::interpreter::Interpreter;

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Serve the relay indefinitely, reconnecting with a fixed delay whenever
/// the connection drops. The interpreter, and with it the document, lives
/// across reconnects.
pub async fn run(config: &AgentConfig, interpreter: &mut Interpreter) {
    loop {
        tracing::info!(url = %config.ws_url, "Connecting to relay WebSocket");

        match serve(&config.ws_url, config.heartbeat_interval, interpreter).await {
            Ok(()) => tracing::warn!("WebSocket session ended, reconnecting"),
            Err(e) => tracing::error!(error = %e, "WebSocket connection failed"),
        }

        tokio::time::sleep(config.reconnect_delay).await;
    }
}

/// Connect once and drive the session until the relay closes it.
pub async fn serve(
    url: &str,
    heartbeat_interval: Duration,
    interpreter: &mut Interpreter,
) -> Result<(), tungstenite::Error> {
    let (ws_stream, _response) = connect_async(url).await?;
    tracing::info!("WebSocket connected");

    run_session(ws_stream, heartbeat_interval, interpreter).await;
    Ok(())
}

/// Push heartbeats on a timer and execute inbound tasks via `tokio::select!`.
///
/// Tasks are handled one at a time; the next frame is not read until the
/// current task's response has been sent.
async fn run_session(ws_stream: WsStream, heartbeat_interval: Duration, interpreter: &mut Interpreter) {
    let (mut sink, mut stream) = ws_stream.split();
    let mut ticker =
        tokio::time::interval_at(Instant::now() + heartbeat_interval, heartbeat_interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = send_heartbeat(&mut sink).await {
                    tracing::error!(error = %e, "Failed to send heartbeat");
                    break;
                }
            }
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_frame(interpreter, &text).await;
                        if let Err(e) = sink.send(Message::Text(reply)).await {
                            tracing::error!(error = %e, "Failed to send task response");
                            break;
                        }
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                        // Handled automatically by tungstenite.
                    }
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(?frame, "Relay closed WebSocket");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Binary / Frame -- ignore.
                    }
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "WebSocket receive error");
                        break;
                    }
                    None => {
                        tracing::info!("WebSocket stream exhausted");
                        break;
                    }
                }
            }
        }
    }
}

/// Execute one inbound frame and return the serialized response.
///
/// A frame that is not a task is answered with `ok: false` so the relay
/// still gets a structured reply.
pub async fn handle_frame(interpreter: &mut Interpreter, text: &str) -> String {
    let response = match serde_json::from_str::<Task>(text) {
        Ok(task) => {
            tracing::info!(ops = task.ops.len(), "Received task");
            interpreter.execute(&task).await
        }
        Err(e) => {
            tracing::warn!(error = %e, raw = %text, "Malformed task frame");
            TaskResponse::rejected(format!("invalid task: {e}"))
        }
    };

    serde_json::to_string(&response).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to encode task response");
        r#"{"ok":false,"error":"failed to encode response"}"#.to_string()
    })
}

async fn send_heartbeat<S>(sink: &mut S) -> Result<(), tungstenite::Error>
where
    S: SinkExt<Message, Error = tungstenite::Error> + Unpin,
{
    let json = serde_json::to_string(&heartbeat_task())
        .map_err(|e| tungstenite::Error::Io(std::io::Error::other(e)))?;
    tracing::debug!("Sending heartbeat");
    sink.send(Message::Text(json)).await
}
