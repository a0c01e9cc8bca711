//! Flat-file JSON adapter: the whole catalog as one JSON array in one file.
//!
//! Concurrency model is last-write-wins over the single file, matching the
//! durability promise of the system (see the catalog's version stamps for
//! project-level conflict detection). Reads distinguish three conditions:
//! a missing file starts the catalog empty, an unparseable file is logged
//! and treated as empty rather than poisoning every request, and a failed
//! write always propagates. Within a parseable file, records deserialize
//! one at a time, so a single bad record is skipped instead of discarding
//! its siblings.

use crate::{StoreError, StoreResult, WorkflowStore};
use alur_types::{Workflow, WorkflowId};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// JSON flat-file workflow store
pub struct JsonWorkflowStore {
    path: PathBuf,
}

impl JsonWorkflowStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_catalog(&self) -> StoreResult<Vec<Workflow>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(StoreError::Backend(format!(
                    "read {}: {}",
                    self.path.display(),
                    err
                )))
            }
        };

        let values: Vec<serde_json::Value> = match serde_json::from_slice(&bytes) {
            Ok(values) => values,
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "catalog file is unparseable; treating as empty"
                );
                return Ok(Vec::new());
            }
        };

        // Records parse individually so one bad entry cannot take the
        // rest of the catalog down with it
        let mut records = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value::<Workflow>(value) {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %err,
                        "skipping unreadable catalog record"
                    );
                }
            }
        }
        Ok(records)
    }

    async fn write_catalog(&self, records: &[Workflow]) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|err| StoreError::Serialization(err.to_string()))?;

        // Temp file + rename so a crashed write never truncates the catalog
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await.map_err(|err| {
            StoreError::Backend(format!("write {}: {}", tmp.display(), err))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|err| {
            StoreError::Backend(format!("rename {}: {}", self.path.display(), err))
        })?;
        Ok(())
    }
}

#[async_trait]
impl WorkflowStore for JsonWorkflowStore {
    async fn list(&self) -> StoreResult<Vec<Workflow>> {
        self.read_catalog().await
    }

    async fn get(&self, id: &WorkflowId) -> StoreResult<Option<Workflow>> {
        let records = self.read_catalog().await?;
        Ok(records.into_iter().find(|w| &w.id == id))
    }

    async fn put(&self, workflow: Workflow) -> StoreResult<()> {
        let mut records = self.read_catalog().await?;
        match records.iter_mut().find(|w| w.id == workflow.id) {
            Some(existing) => *existing = workflow,
            None => records.push(workflow),
        }
        self.write_catalog(&records).await
    }

    async fn delete(&self, id: &WorkflowId) -> StoreResult<()> {
        let mut records = self.read_catalog().await?;
        let before = records.len();
        records.retain(|w| &w.id != id);
        if records.len() == before {
            return Ok(());
        }
        self.write_catalog(&records).await
    }
}
