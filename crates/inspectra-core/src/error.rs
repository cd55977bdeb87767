//! Error types for the Inspectra platform.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InspectraError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Duplicate {entity} name: {name}")]
    Conflict { entity: String, name: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Authentication required")]
    Unauthorized,

    #[error("Not authorized to access this resource")]
    Forbidden,

    #[error("Storage backend '{backend}' failed for key {key}: {message}")]
    Storage {
        backend: String,
        key: String,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl InspectraError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

pub type InspectraResult<T> = Result<T, InspectraError>;
