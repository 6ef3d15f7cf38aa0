/// Failure taxonomy for core tree and collaboration operations.
///
/// Persistence failures are deliberately absent: a failed save is logged by
/// the caller and the in-memory state is left as-is, so they never surface
/// through this type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Permission denied")]
    PermissionDenied,
}
