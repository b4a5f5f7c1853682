//! End-to-end tests for the agent WebSocket session.
//!
//! A throwaway tungstenite server plays the relay: it accepts the agent's
//! connection, sends frames and inspects what comes back.

mod common;

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

use flowbridge_agent::session;
use flowbridge_core::protocol::is_heartbeat;
use flowbridge_core::result::TaskResponse;
use flowbridge_core::task::Task;

/// Bind a local listener and return it with its `ws://` URL.
async fn relay_listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    (listener, url)
}

/// Read frames until a text frame arrives.
async fn next_text<S>(ws: &mut S) -> String
where
    S: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        match ws.next().await.expect("stream ended").expect("receive error") {
            Message::Text(text) => return text,
            _ => continue,
        }
    }
}

// ---------------------------------------------------------------------------
// Test: a task frame is executed and answered
// ---------------------------------------------------------------------------

#[tokio::test]
async fn task_frame_is_answered_with_results() {
    let (listener, url) = relay_listener().await;

    let agent = tokio::spawn(async move {
        let (mut interpreter, _) = common::interpreter();
        session::serve(&url, Duration::from_secs(3600), &mut interpreter).await
    });

    let (tcp, _) = listener.accept().await.unwrap();
    let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();

    ws.send(Message::Text(
        r#"{"ops":[{"type":"CREATE_PAGE","name":"Landing","slug":"landing"},{"type":"SET_TEXT","oid":"nope","text":"x"}]}"#.into(),
    ))
    .await
    .unwrap();

    let reply: TaskResponse = serde_json::from_str(&next_text(&mut ws).await).unwrap();
    let results = reply.result.unwrap();
    assert!(reply.ok);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].op, "CREATE_PAGE");
    assert!(results[0].success);
    assert!(results[0].result.as_ref().unwrap()["pageId"].is_string());
    assert!(!results[1].success);

    ws.close(None).await.unwrap();
    let outcome = tokio::time::timeout(Duration::from_secs(5), agent)
        .await
        .expect("agent should stop after close")
        .unwrap();
    assert!(outcome.is_ok());
}

// ---------------------------------------------------------------------------
// Test: malformed frames get a structured rejection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_frame_is_rejected_not_dropped() {
    let (listener, url) = relay_listener().await;

    tokio::spawn(async move {
        let (mut interpreter, _) = common::interpreter();
        let _ = session::serve(&url, Duration::from_secs(3600), &mut interpreter).await;
    });

    let (tcp, _) = listener.accept().await.unwrap();
    let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();

    ws.send(Message::Text("not json".into())).await.unwrap();

    let reply: TaskResponse = serde_json::from_str(&next_text(&mut ws).await).unwrap();
    assert!(!reply.ok);
    assert!(reply.error.unwrap().starts_with("invalid task"));
}

// ---------------------------------------------------------------------------
// Test: heartbeats are pushed unsolicited on the configured interval
// ---------------------------------------------------------------------------

#[tokio::test]
async fn heartbeat_is_sent_without_any_request() {
    let (listener, url) = relay_listener().await;

    tokio::spawn(async move {
        let (mut interpreter, _) = common::interpreter();
        let _ = session::serve(&url, Duration::from_millis(50), &mut interpreter).await;
    });

    let (tcp, _) = listener.accept().await.unwrap();
    let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();

    let frame = tokio::time::timeout(Duration::from_secs(5), next_text(&mut ws))
        .await
        .expect("heartbeat should arrive");
    let task: Task = serde_json::from_str(&frame).unwrap();
    assert!(is_heartbeat(&task));
}

// ---------------------------------------------------------------------------
// Test: connecting to a closed port fails instead of hanging
// ---------------------------------------------------------------------------

#[tokio::test]
async fn serve_reports_connection_failure() {
    let (listener, url) = relay_listener().await;
    drop(listener);

    let (mut interpreter, _) = common::interpreter();
    let result = session::serve(&url, Duration::from_secs(3600), &mut interpreter).await;

    assert!(result.is_err());
}
