//! In-memory reference implementation of the workflow store.
//!
//! Deterministic and test-friendly. Insertion order is preserved so the
//! catalog lists workflows the way an operator entered them.

use crate::{StoreError, StoreResult, WorkflowStore};
use alur_types::{Workflow, WorkflowId};
use async_trait::async_trait;
use std::sync::RwLock;

/// In-memory workflow store adapter
#[derive(Default)]
pub struct MemoryWorkflowStore {
    records: RwLock<Vec<Workflow>>,
}

impl MemoryWorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the store, replacing any existing contents
    pub fn with_records(records: Vec<Workflow>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl WorkflowStore for MemoryWorkflowStore {
    async fn list(&self) -> StoreResult<Vec<Workflow>> {
        let guard = self
            .records
            .read()
            .map_err(|_| StoreError::Backend("records lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    async fn get(&self, id: &WorkflowId) -> StoreResult<Option<Workflow>> {
        let guard = self
            .records
            .read()
            .map_err(|_| StoreError::Backend("records lock poisoned".to_string()))?;
        Ok(guard.iter().find(|w| &w.id == id).cloned())
    }

    async fn put(&self, workflow: Workflow) -> StoreResult<()> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| StoreError::Backend("records lock poisoned".to_string()))?;
        match guard.iter_mut().find(|w| w.id == workflow.id) {
            Some(existing) => *existing = workflow,
            None => guard.push(workflow),
        }
        Ok(())
    }

    async fn delete(&self, id: &WorkflowId) -> StoreResult<()> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| StoreError::Backend("records lock poisoned".to_string()))?;
        guard.retain(|w| &w.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alur_types::seed;

    #[tokio::test]
    async fn test_put_get_list_delete() {
        let store = MemoryWorkflowStore::new();
        assert!(store.list().await.unwrap().is_empty());

        let wf = seed::default_workflow();
        let id = wf.id.clone();
        store.put(wf).await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 1);
        assert!(store.get(&id).await.unwrap().is_some());
        assert!(store
            .get(&WorkflowId::new("missing"))
            .await
            .unwrap()
            .is_none());

        store.delete(&id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_replaces_by_id() {
        let store = MemoryWorkflowStore::new();
        let mut wf = seed::default_workflow();
        store.put(wf.clone()).await.unwrap();

        wf.name = "Renamed".into();
        store.put(wf.clone()).await.unwrap();

        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Renamed");
    }

    #[tokio::test]
    async fn test_delete_absent_is_noop() {
        let store = MemoryWorkflowStore::new();
        store.delete(&WorkflowId::new("missing")).await.unwrap();
    }
}
