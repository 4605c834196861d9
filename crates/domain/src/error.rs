//! Domain error types.

use thiserror::Error;

/// Failure reported by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backend failed (connection, query, serialization).
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Errors surfaced by domain services.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The caller's role does not permit the operation.
    #[error("{0}")]
    Forbidden(String),

    /// The target does not exist or lies outside the caller's scope.
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl DomainError {
    pub fn task_not_found() -> Self {
        DomainError::NotFound("Task not found".to_string())
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    let msg = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{}: {}", field, msg)
                })
            })
            .collect();

        DomainError::Validation(messages.join(", "))
    }
}
