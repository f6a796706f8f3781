use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use queue_core::ResultStatus;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::{from_body, parse_uuid};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct SubmitResultRequest {
    #[serde(default)]
    task_id: Option<String>,
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// POST /queue/{id}/result - record the outcome of a claimed task.
pub async fn submit_result(
    State(state): State<Arc<AppState>>,
    Path(queue_id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<(StatusCode, Json<queue_core::TaskResult>)> {
    let queue_id = parse_uuid(&queue_id)?;
    let request: SubmitResultRequest = from_body(body)?;

    let task_id = match request.task_id {
        Some(raw) => Some(
            Uuid::parse_str(&raw).map_err(|_| ApiError::BadRequest(format!("'{raw}' is not a valid identifier")))?,
        ),
        None => None,
    };
    let status = match request.status {
        Some(raw) => Some(
            raw.parse::<ResultStatus>()
                .map_err(|_| ApiError::BadRequest(format!("'{raw}' is not a known result status")))?,
        ),
        None => None,
    };

    let result = state
        .service
        .submit_result(Some(queue_id), task_id, request.output, status)?;
    info!(queue_id = %queue_id, task_id = %result.task_id, "result submitted");
    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /queue/{id}/result/{taskId} - fetch a previously submitted result.
pub async fn get_result(
    State(state): State<Arc<AppState>>,
    Path((queue_id, task_id)): Path<(String, String)>,
) -> ApiResult<Json<queue_core::TaskResult>> {
    let queue_id = parse_uuid(&queue_id)?;
    let task_id = parse_uuid(&task_id)?;
    let result = state.service.get_result(Some(queue_id), Some(task_id))?;
    match result {
        Some(result) => Ok(Json(result)),
        None => Err(ApiError::NotFound(format!("no result for task {task_id}"))),
    }
}
