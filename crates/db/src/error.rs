use std::time::Duration;

use cinedex_core::error::CoreError;
use cinedex_core::types::{DbId, Version};

/// Failure of a repository operation.
///
/// `NotFound` and `EditConflict` are expected outcomes a caller can act on;
/// the remaining variants are opaque infrastructure failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// No row matched both the id and the presented version.
    #[error("edit conflict on {entity} {id}: version {version} is no longer current")]
    EditConflict {
        entity: &'static str,
        id: DbId,
        version: Version,
    },

    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("operation cancelled")]
    Cancelled,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => CoreError::NotFound { entity, id },
            StoreError::EditConflict { entity, id, .. } => CoreError::EditConflict { entity, id },
            other => {
                tracing::error!(error = %other, "Store error");
                CoreError::Internal(other.to_string())
            }
        }
    }
}
