use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// GET /healthz - liveness probe. No dependency checks: the service has no
/// external dependencies to report on, only its own in-memory state.
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
