//! Storage-layer error types and conversions.

use inspectra_core::error::InspectraError;

/// Storage-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("stored object not found: {path}")]
    NotFound { path: String },

    #[error("invalid filename: {filename}")]
    InvalidName { filename: String },

    #[error("{backend} storage failed for {path}: {message}")]
    Backend {
        backend: String,
        path: String,
        message: String,
    },
}

impl StorageError {
    pub(crate) fn backend(
        backend: &str,
        path: &str,
        err: impl std::fmt::Display,
    ) -> Self {
        StorageError::Backend {
            backend: backend.into(),
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl From<StorageError> for InspectraError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { path } => InspectraError::NotFound {
                entity: "stored object".into(),
                id: path,
            },
            StorageError::InvalidName { filename } => {
                InspectraError::validation(format!("invalid filename: {filename}"))
            }
            StorageError::Backend {
                backend,
                path,
                message,
            } => InspectraError::Storage {
                backend,
                key: path,
                message,
            },
        }
    }
}
