use crate::StoreResult;
use alur_types::{Workflow, WorkflowId};
use async_trait::async_trait;

/// Storage interface for workflow records.
///
/// The engine only ever needs get/put/delete over whole `Workflow`
/// documents, so any backend satisfying that shape is interchangeable:
/// a flat JSON file, a document database, or a relational table with a
/// JSON column.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// All persisted workflow records
    async fn list(&self) -> StoreResult<Vec<Workflow>>;

    /// One record by id, `None` when absent
    async fn get(&self, id: &WorkflowId) -> StoreResult<Option<Workflow>>;

    /// Insert or replace a record by id
    async fn put(&self, workflow: Workflow) -> StoreResult<()>;

    /// Remove a record; removing an absent id is a no-op
    async fn delete(&self, id: &WorkflowId) -> StoreResult<()>;
}
