use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use super::parse_uuid;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /queue/{id}/status - point-in-time counts for a queue.
pub async fn queue_status(
    State(state): State<Arc<AppState>>,
    Path(queue_id): Path<String>,
) -> ApiResult<Json<queue_core::QueueStatus>> {
    let queue_id = parse_uuid(&queue_id)?;
    let status = state.service.queue_status(Some(queue_id))?;
    Ok(Json(status))
}
