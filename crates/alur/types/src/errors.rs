//! Error taxonomy for the workflow engine.
//!
//! Every variant is recoverable at request scope: lookup failures abort the
//! attempted transition, protected-delete is a hard rejection, and storage
//! write failures propagate so a lost catalog edit is never silent.

use crate::{StepKey, WorkflowId};
use thiserror::Error;

/// Result type for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Errors surfaced by the workflow catalog, resolver, and engine
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("workflow not found: {0}")]
    WorkflowNotFound(WorkflowId),

    #[error("step not found: {0}")]
    StepNotFound(StepKey),

    #[error("action '{action}' is not declared on step {step}")]
    InvalidAction { action: String, step: StepKey },

    #[error("step {0} is terminal and declares no transitions")]
    TerminalStep(StepKey),

    #[error("workflow {0} is protected and cannot be deleted")]
    ProtectedWorkflow(WorkflowId),

    #[error("stale write: expected version {expected}, found {actual}")]
    Conflict { expected: u64, actual: u64 },

    #[error("invalid workflow definition: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl WorkflowError {
    /// Whether retrying the same request may succeed.
    ///
    /// Only version conflicts qualify: the caller re-reads the project
    /// and re-submits. Lookup and validation failures are deterministic.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Whether this is a missing-record condition (workflow or step)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::WorkflowNotFound(_) | Self::StepNotFound(_))
    }
}
