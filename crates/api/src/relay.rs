//! Forwards tasks to the executor and correlates its reply.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use flowbridge_core::result::TaskResponse;
use flowbridge_core::task::Task;
use tokio::time::Instant;

use crate::ws::ConnectionRegistry;

/// Default time to wait for the executor's reply.
pub const DEFAULT_RELAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Protocol-level failures that abort a submission.
///
/// Timeouts and unparseable replies are not errors; they come back as
/// [`TaskResponse::pending`] and [`TaskResponse::invalid_reply`].
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("no executor connected")]
    NoPeerAvailable,

    #[error("executor disconnected before replying")]
    PeerDisconnected,

    #[error("failed to encode task: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct TaskRelay {
    registry: Arc<ConnectionRegistry>,
    timeout: Duration,
}

impl TaskRelay {
    pub fn new(registry: Arc<ConnectionRegistry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `task` to the active executor and wait for its reply.
    ///
    /// Submissions on the same connection are serialized: the next task is
    /// not sent until the previous one has received its reply or timed out.
    /// The relay timeout covers the wait for the connection as well as the
    /// wait for the reply; a task still queued at the deadline is never sent.
    pub async fn submit(&self, task: &Task) -> Result<TaskResponse, RelayError> {
        let peer = self.registry.current().ok_or(RelayError::NoPeerAvailable)?;
        let payload = serde_json::to_string(task)?;
        let deadline = Instant::now() + self.timeout;

        let lock = tokio::time::timeout_at(deadline, peer.lock_submissions()).await;
        // The lock can be granted in the same tick the deadline passes.
        let _in_flight = match lock {
            Ok(guard) if Instant::now() < deadline => guard,
            _ => {
                tracing::warn!(
                    conn_id = %peer.id(),
                    timeout_secs = self.timeout.as_secs_f64(),
                    "Executor busy for the whole timeout, task not sent",
                );
                return Ok(TaskResponse::pending());
            }
        };
        let reply = peer.arm().await;

        if peer.send(Message::Text(payload.into())).is_err() {
            peer.disarm().await;
            tracing::warn!(conn_id = %peer.id(), "Executor channel closed before send");
            return Err(RelayError::PeerDisconnected);
        }
        tracing::debug!(conn_id = %peer.id(), ops = task.ops.len(), "Task forwarded to executor");

        match tokio::time::timeout_at(deadline, reply).await {
            Ok(Ok(text)) => Ok(parse_reply(peer.id(), &text)),
            Ok(Err(_)) => {
                tracing::warn!(conn_id = %peer.id(), "Executor disconnected while task was pending");
                Err(RelayError::PeerDisconnected)
            }
            Err(_) => {
                peer.disarm().await;
                tracing::warn!(
                    conn_id = %peer.id(),
                    timeout_secs = self.timeout.as_secs_f64(),
                    "No executor reply within timeout",
                );
                Ok(TaskResponse::pending())
            }
        }
    }
}

fn parse_reply(conn_id: &str, text: &str) -> TaskResponse {
    match serde_json::from_str::<TaskResponse>(text) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(conn_id = %conn_id, error = %e, "Executor sent an invalid response");
            TaskResponse::invalid_reply()
        }
    }
}
