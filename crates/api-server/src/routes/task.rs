use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use super::{from_body, parse_uuid};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct EnqueueTaskRequest {
    #[serde(default)]
    params: Option<String>,
    #[serde(default)]
    priority: Option<i64>,
}

/// POST /queue/{id}/task - submit a new task to a queue's pending set.
pub async fn enqueue_task(
    State(state): State<Arc<AppState>>,
    Path(queue_id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<(StatusCode, Json<queue_core::Task>)> {
    let queue_id = parse_uuid(&queue_id)?;
    let request: EnqueueTaskRequest = from_body(body)?;
    let task = state
        .service
        .enqueue_task(Some(queue_id), request.params, request.priority)?;
    info!(queue_id = %queue_id, task_id = %task.id, "task enqueued");
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /queue/{id}/task - claim the next-highest-priority pending task.
///
/// Returns 204 with no body when the queue has nothing pending; a worker
/// polling in a loop treats that the same as "try again later".
pub async fn dequeue_task(
    State(state): State<Arc<AppState>>,
    Path(queue_id): Path<String>,
) -> ApiResult<Response> {
    let queue_id = parse_uuid(&queue_id)?;
    let task = state.service.dequeue_task(Some(queue_id))?;
    Ok(match task {
        Some(task) => (StatusCode::OK, Json(task)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}
