//! Route definitions for task submission.

use axum::routing::post;
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Task routes mounted at `/tasks`.
///
/// ```text
/// POST /  -> submit_task
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(tasks::submit_task))
}
