use thiserror::Error;

/// Core error taxonomy for the queue service.
///
/// Each variant corresponds to one of the error kinds in the service's
/// stable taxonomy; the HTTP boundary maps these to status codes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("io failure: {0}")]
    IoFailure(String),

    #[error("serialization failure: {0}")]
    SerializationFailure(String),
}

impl CoreError {
    /// Client-side faults are everything except io/serialization failures,
    /// which are internal and never surfaced verbatim to HTTP clients.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidArgument(_) | CoreError::NotFound(_) | CoreError::PreconditionFailed(_)
        )
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
