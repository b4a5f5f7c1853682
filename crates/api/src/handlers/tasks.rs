//! Handler for task submission.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use flowbridge_core::result::TaskResponse;
use flowbridge_core::task::Task;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/tasks
///
/// Forward a task to the connected executor and return its response
/// verbatim. Answers 503 when no executor is connected and 400 with the
/// usual error body when the task cannot be decoded.
pub async fn submit_task(
    State(state): State<AppState>,
    payload: Result<Json<Task>, JsonRejection>,
) -> AppResult<Json<TaskResponse>> {
    let Json(task) = payload?;
    task.validate()?;

    let ops: Vec<&str> = task.ops.iter().map(|op| op.name()).collect();
    tracing::info!(?ops, "Task submitted");

    let response = state.relay.submit(&task).await?;

    if response.is_pending() {
        tracing::info!("Task still pending at relay timeout");
    }
    Ok(Json(response))
}
