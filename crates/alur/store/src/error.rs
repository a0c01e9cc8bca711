use alur_types::WorkflowError;
use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer errors.
///
/// A missing or empty backing file is not an error — the catalog starts
/// empty and self-heals. Only genuine backend failures surface here, and a
/// failed write always propagates: silently losing a workflow edit is
/// unacceptable.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        WorkflowError::Storage(err.to_string())
    }
}
