pub mod health;
pub mod site;
pub mod tasks;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                 executor WebSocket
///
/// /tasks                              submit a task (POST)
///
/// /auth/callback                      OAuth code exchange (GET)
/// /sites/{site_id}/publish            publish a site (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/tasks", tasks::router())
        .merge(site::router())
}
