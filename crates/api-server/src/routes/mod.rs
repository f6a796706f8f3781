use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::ApiError;

pub mod admin;
pub mod health;
pub mod queue;
pub mod result;
pub mod status;
pub mod task;

/// Parses a path segment as a `Uuid`, producing a client-facing 400 rather
/// than axum's typed-path 404 on a malformed identifier — an id that isn't
/// a valid identifier literal is an argument error, not absence.
pub(crate) fn parse_uuid(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("'{raw}' is not a valid identifier")))
}

/// Deserializes a request body already captured as a loose JSON value into
/// a concrete type, reporting the mismatch as 400 instead of axum's default
/// 422 for a failed `Json<T>` extraction.
pub(crate) fn from_body<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::BadRequest(format!("invalid request body: {e}")))
}
