use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use super::from_body;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct CreateQueueRequest {
    #[serde(default)]
    name: Option<String>,
}

/// POST /queue - create a new, empty queue.
pub async fn create_queue(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<(StatusCode, Json<queue_core::QueueSummary>)> {
    let request: CreateQueueRequest = from_body(body)?;
    let summary = state.service.create_queue(request.name)?;
    info!(queue_id = %summary.id, "queue created");
    Ok((StatusCode::CREATED, Json(summary)))
}
