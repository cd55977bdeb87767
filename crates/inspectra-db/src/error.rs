//! Database-specific error types and conversions.

use inspectra_core::error::InspectraError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Row decoding failed: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Duplicate {entity} name: {name}")]
    Conflict { entity: String, name: String },
}

impl DbError {
    /// Map a statement error from a write into either `Conflict` (when
    /// a unique index rejected the record) or a generic error. The
    /// unique indexes are the source of truth for the name-uniqueness
    /// invariants; no read-then-insert probe precedes the write.
    pub(crate) fn from_write(entity: &str, name: &str, err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        if msg.contains("already contains") {
            DbError::Conflict {
                entity: entity.into(),
                name: name.into(),
            }
        } else {
            DbError::Surreal(err)
        }
    }
}

impl From<DbError> for InspectraError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => InspectraError::NotFound { entity, id },
            DbError::Conflict { entity, name } => InspectraError::Conflict { entity, name },
            other => InspectraError::Database(other.to_string()),
        }
    }
}
