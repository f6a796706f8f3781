use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClearResponse {
    message: String,
    queues_cleared: usize,
}

/// DELETE /queue/admin/clear - drop every queue and its contents.
pub async fn clear_all(State(state): State<Arc<AppState>>) -> Json<ClearResponse> {
    let queues_cleared = state.service.clear_all();
    info!(queues_cleared, "admin clear invoked");
    Json(ClearResponse {
        message: "all queues cleared".to_string(),
        queues_cleared,
    })
}
