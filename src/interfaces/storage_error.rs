//! Storage error type shared by every backend.

use crate::domain::TreePathError;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
///
/// Constraint failures are classified here, once, so callers match on
/// variants instead of driver error codes.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Unique constraint violated: {}", .constraint.as_deref().unwrap_or("unknown"))]
    UniqueViolation { constraint: Option<String> },

    #[error("Foreign key constraint violated: {}", .constraint.as_deref().unwrap_or("unknown"))]
    ForeignKeyViolation { constraint: Option<String> },

    #[error("Referenced {entity} not found: {key}")]
    MissingReference { entity: &'static str, key: String },

    #[error("Parent post {parent} not found in thread {thread}")]
    ParentNotFound { parent: i64, thread: i64 },

    #[error("Invalid stored path: {0}")]
    InvalidPath(#[from] TreePathError),

    #[error("Invalid stored timestamp {value:?}: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[cfg(feature = "sql")]
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[cfg(feature = "sql")]
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StorageError {
    pub fn missing(entity: &'static str, key: impl ToString) -> Self {
        StorageError::MissingReference {
            entity,
            key: key.to_string(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StorageError::UniqueViolation { .. })
    }
}

#[cfg(feature = "sql")]
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        if let sqlx::Error::Database(db) = &err {
            let constraint = db.constraint().map(str::to_string);
            match db.kind() {
                ErrorKind::UniqueViolation => {
                    return StorageError::UniqueViolation { constraint };
                }
                ErrorKind::ForeignKeyViolation => {
                    return StorageError::ForeignKeyViolation { constraint };
                }
                _ => {}
            }
        }
        StorageError::Database(err)
    }
}
