use axum::extract::ws::Message;
use flowbridge_core::protocol::is_heartbeat;
use flowbridge_core::task::Task;
use flowbridge_core::types::Timestamp;
use tokio::sync::{mpsc, oneshot, Mutex, MutexGuard};

/// Channel sender half for pushing messages to the executor socket.
pub type PeerSender = mpsc::UnboundedSender<Message>;

/// The outbound channel to the executor is gone.
#[derive(Debug, thiserror::Error)]
#[error("executor connection closed")]
pub struct PeerClosed;

/// What happened to an inbound text frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Unsolicited executor heartbeat; recorded, never treated as a reply.
    Heartbeat,
    /// Handed to the submission waiting for a reply.
    Reply,
    /// Nobody was waiting (e.g. a reply arriving after its timeout); dropped.
    Unsolicited,
}

/// One live executor WebSocket.
///
/// Besides the outbound channel, the connection owns the correlation state
/// for the relay: a submission lock (one in-flight task per connection) and
/// a single reply slot armed for the next non-heartbeat inbound frame.
pub struct PeerConnection {
    id: String,
    sender: PeerSender,
    connected_at: Timestamp,
    last_heartbeat: Mutex<Option<Timestamp>>,
    reply_slot: Mutex<Option<oneshot::Sender<String>>>,
    submissions: Mutex<()>,
}

impl PeerConnection {
    /// Create a connection handle.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink.
    pub fn new(id: impl Into<String>) -> (std::sync::Arc<Self>, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = Self {
            id: id.into(),
            sender: tx,
            connected_at: chrono::Utc::now(),
            last_heartbeat: Mutex::new(None),
            reply_slot: Mutex::new(None),
            submissions: Mutex::new(()),
        };
        (std::sync::Arc::new(conn), rx)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn connected_at(&self) -> Timestamp {
        self.connected_at
    }

    pub async fn last_heartbeat(&self) -> Option<Timestamp> {
        *self.last_heartbeat.lock().await
    }

    pub fn send(&self, message: Message) -> Result<(), PeerClosed> {
        self.sender.send(message).map_err(|_| PeerClosed)
    }

    /// Ask the socket task to close the connection.
    pub fn close(&self) {
        let _ = self.sender.send(Message::Close(None));
    }

    /// Hold this guard for the whole send-and-wait cycle of a submission.
    pub async fn lock_submissions(&self) -> MutexGuard<'_, ()> {
        self.submissions.lock().await
    }

    /// Arm the reply slot for the next inbound frame.
    pub async fn arm(&self) -> oneshot::Receiver<String> {
        let (tx, rx) = oneshot::channel();
        *self.reply_slot.lock().await = Some(tx);
        rx
    }

    /// Clear the reply slot so a late frame cannot resolve it. Dropping the
    /// sender also wakes any waiter with a closed-channel error.
    pub async fn disarm(&self) {
        self.reply_slot.lock().await.take();
    }

    /// Route one inbound text frame from the executor.
    pub async fn deliver(&self, text: &str) -> Delivery {
        if serde_json::from_str::<Task>(text).is_ok_and(|task| is_heartbeat(&task)) {
            *self.last_heartbeat.lock().await = Some(chrono::Utc::now());
            tracing::trace!(conn_id = %self.id, "Executor heartbeat");
            return Delivery::Heartbeat;
        }

        let waiter = self.reply_slot.lock().await.take();
        match waiter.map(|tx| tx.send(text.to_string())) {
            Some(Ok(())) => Delivery::Reply,
            _ => {
                tracing::warn!(conn_id = %self.id, "Dropping executor message with no pending task");
                Delivery::Unsolicited
            }
        }
    }
}

impl std::fmt::Debug for PeerConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeerConnection")
            .field("id", &self.id)
            .field("connected_at", &self.connected_at)
            .finish_non_exhaustive()
    }
}
