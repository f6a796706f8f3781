use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use queue_core::CoreError;

/// HTTP-facing error type. Unlike a JSON-enveloped API error, 4xx bodies
/// here are plain text carrying the core's message verbatim rather than a
/// structured envelope.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "bad request: {msg}"),
            ApiError::NotFound(msg) => write!(f, "not found: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };
        (status, message).into_response()
    }
}

/// Translates the core's error taxonomy onto the HTTP boundary's two
/// client-facing variants. `io-failure` and `serialization-failure` never
/// reach here — the facade never returns them to a handler.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidArgument(msg) => ApiError::BadRequest(msg),
            CoreError::NotFound(msg) => ApiError::NotFound(msg),
            CoreError::PreconditionFailed(msg) => ApiError::BadRequest(msg),
            CoreError::IoFailure(msg) | CoreError::SerializationFailure(msg) => {
                tracing::error!(error = %msg, "internal error leaked to HTTP boundary");
                ApiError::BadRequest("internal error".to_string())
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
