//! Service-level error taxonomy.

use crate::domain::UnknownSortMode;
use crate::interfaces::StorageError;

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ForumError>;

/// Errors returned by [`ForumService`](super::ForumService) operations.
///
/// Storage constraint failures never reach callers raw: each operation
/// reclassifies them into `NotFound` or `Conflict`, and anything left over is
/// `Internal`.
#[derive(Debug, thiserror::Error)]
pub enum ForumError {
    /// Malformed request field or query parameter.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced user, forum, thread or post does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// A write collided with existing state that could not be reconciled.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Unclassified storage failure.
    #[error("internal error: {0}")]
    Internal(#[from] StorageError),
}

impl ForumError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        ForumError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Transport status for the delivery layer.
    pub fn status_code(&self) -> u16 {
        match self {
            ForumError::InvalidInput(_) => 400,
            ForumError::NotFound { .. } => 404,
            ForumError::Conflict(_) => 409,
            ForumError::Internal(_) => 500,
        }
    }

    /// Reclassify the storage errors that carry a domain meaning regardless
    /// of the operation.
    pub(crate) fn from_storage(err: StorageError) -> Self {
        match err {
            StorageError::MissingReference { entity, key } => ForumError::NotFound { entity, key },
            StorageError::ParentNotFound { parent, thread } => ForumError::Conflict(format!(
                "parent post {} does not exist in thread {}",
                parent, thread
            )),
            other => ForumError::Internal(other),
        }
    }
}

impl From<UnknownSortMode> for ForumError {
    fn from(err: UnknownSortMode) -> Self {
        ForumError::InvalidInput(err.to_string())
    }
}
