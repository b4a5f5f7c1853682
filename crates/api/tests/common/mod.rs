#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::ws::Message;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tokio::sync::mpsc;
use tower::ServiceExt;

use flowbridge_api::config::{ServerConfig, SiteApiConfig};
use flowbridge_api::router::build_app_router;
use flowbridge_api::state::AppState;
use flowbridge_api::ws::{ConnectionRegistry, PeerConnection};
use flowbridge_core::result::{OperationResult, TaskResponse};
use flowbridge_core::task::{Operation, Task};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and the default 10-second relay timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        relay_timeout: Duration::from_secs(10),
        shutdown_timeout_secs: 30,
        site_api: SiteApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..SiteApiConfig::default()
        },
    }
}

/// Build the full application router with the production middleware stack.
///
/// The state is returned too so tests can register fake executors.
pub fn build_test_app() -> (Router, AppState) {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> (Router, AppState) {
    let state = AppState::new(config.clone());
    (build_app_router(state.clone(), &config), state)
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// A task holding one `CREATE_PAGE`, used to tell submissions apart.
pub fn page_task(name: &str) -> Task {
    Task::new(vec![Operation::CreatePage {
        name: name.to_string(),
        slug: None,
    }])
}

/// The reply an executor would send for [`page_task`], echoing the page
/// name as the page id.
pub fn page_reply(task: &Task) -> TaskResponse {
    let results = task
        .ops
        .iter()
        .map(|op| match op {
            Operation::CreatePage { name, .. } => {
                OperationResult::succeeded(op.name(), serde_json::json!({ "pageId": name }))
            }
            other => OperationResult::failed(other.name(), "unsupported in test executor"),
        })
        .collect();
    TaskResponse::completed(results)
}

/// Wait for the next task frame sent to the peer.
pub async fn next_task(rx: &mut mpsc::UnboundedReceiver<Message>) -> Task {
    loop {
        match rx.recv().await.expect("peer channel closed") {
            Message::Text(text) => return serde_json::from_str(text.as_str()).unwrap(),
            _ => continue,
        }
    }
}

/// Register a fake executor that answers every task with `respond`.
///
/// Replies go through `PeerConnection::deliver`, the same path inbound
/// WebSocket frames take.
pub fn spawn_executor<F>(registry: &ConnectionRegistry, id: &str, respond: F) -> Arc<PeerConnection>
where
    F: Fn(Task) -> String + Send + 'static,
{
    let (peer, mut rx) = PeerConnection::new(id);
    registry.register(Arc::clone(&peer));

    let executor = Arc::clone(&peer);
    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Message::Text(text) = message {
                let task: Task = serde_json::from_str(text.as_str()).unwrap();
                executor.deliver(&respond(task)).await;
            }
        }
    });

    peer
}

/// Register a fake executor that replies with [`page_reply`].
pub fn spawn_page_executor(registry: &ConnectionRegistry, id: &str) -> Arc<PeerConnection> {
    spawn_executor(registry, id, |task| {
        serde_json::to_string(&page_reply(&task)).unwrap()
    })
}
