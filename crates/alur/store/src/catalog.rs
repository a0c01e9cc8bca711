//! The workflow catalog: the single authority over workflow definitions.
//!
//! Wraps an injected [`WorkflowStore`] with:
//! - self-healing reads carried over from the legacy flat-file data
//!   (seed the default workflow when absent, repair records whose `steps`
//!   array is empty or missing),
//! - validate-on-write so malformed definitions are rejected at the edge
//!   instead of repaired later,
//! - an in-memory cache invalidated on every write — catalog reads are hot
//!   on every transition, writes are a rare admin path.

use crate::WorkflowStore;
use alur_types::{
    seed, Workflow, WorkflowError, WorkflowId, WorkflowResult, WorkflowStep,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Partial update for a workflow record; `None` fields are left untouched.
/// The id is immutable and is not part of the patch.
#[derive(Clone, Debug, Default)]
pub struct WorkflowPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub steps: Option<Vec<WorkflowStep>>,
}

/// Catalog of workflow definitions over an injected store
pub struct WorkflowCatalog {
    store: Arc<dyn WorkflowStore>,
    cache: RwLock<Option<Vec<Workflow>>>,
}

impl WorkflowCatalog {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self {
            store,
            cache: RwLock::new(None),
        }
    }

    /// All workflows, self-healed.
    ///
    /// Persists only what it actually repaired: a well-formed catalog
    /// produces no writes, so repeated calls are idempotent.
    pub async fn all(&self) -> WorkflowResult<Vec<Workflow>> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let mut cache = self.cache.write().await;
        // Lost the race: someone filled the cache while we waited
        if let Some(cached) = cache.as_ref() {
            return Ok(cached.clone());
        }

        let mut workflows = self.store.list().await?;

        if !workflows
            .iter()
            .any(|w| w.id.0 == seed::DEFAULT_WORKFLOW_ID)
        {
            let default = seed::default_workflow();
            tracing::info!(workflow_id = %default.id, "seeding default workflow");
            self.store.put(default.clone()).await?;
            workflows.insert(0, default);
        }

        for workflow in &mut workflows {
            if workflow.steps.is_empty() {
                tracing::warn!(
                    workflow_id = %workflow.id,
                    "workflow has no steps; repairing with the canonical sequence"
                );
                workflow.steps = seed::default_steps();
                self.store.put(workflow.clone()).await?;
            }
        }

        *cache = Some(workflows.clone());
        Ok(workflows)
    }

    /// One workflow by id. A missing id is non-fatal for the process but an
    /// explicit error for the caller.
    pub async fn get(&self, id: &WorkflowId) -> WorkflowResult<Workflow> {
        let workflows = self.all().await?;
        workflows
            .into_iter()
            .find(|w| &w.id == id)
            .ok_or_else(|| {
                tracing::warn!(workflow_id = %id, "workflow not found");
                WorkflowError::WorkflowNotFound(id.clone())
            })
    }

    /// Create a workflow seeded with a fresh copy of the canonical steps
    pub async fn add(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> WorkflowResult<Workflow> {
        let workflow = Workflow::new(WorkflowId::generate(), name, description)
            .with_steps(seed::default_steps());
        workflow.validate()?;

        self.store.put(workflow.clone()).await?;
        self.invalidate().await;
        tracing::info!(workflow_id = %workflow.id, name = %workflow.name, "workflow added");
        Ok(workflow)
    }

    /// Merge a patch onto an existing workflow. The id cannot change, and
    /// the merged result must validate before anything is written.
    pub async fn update(&self, id: &WorkflowId, patch: WorkflowPatch) -> WorkflowResult<Workflow> {
        let mut workflow = self.get(id).await?;

        if let Some(name) = patch.name {
            workflow.name = name;
        }
        if let Some(description) = patch.description {
            workflow.description = description;
        }
        if let Some(steps) = patch.steps {
            workflow.steps = steps;
        }
        workflow.validate()?;

        self.store.put(workflow.clone()).await?;
        self.invalidate().await;
        tracing::info!(workflow_id = %id, "workflow updated");
        Ok(workflow)
    }

    /// Delete a workflow. Protected records (the system default, or anything
    /// explicitly marked) are rejected and the catalog is left unchanged.
    pub async fn delete(&self, id: &WorkflowId) -> WorkflowResult<()> {
        let workflow = self.get(id).await?;
        if workflow.protected || id.0 == seed::DEFAULT_WORKFLOW_ID {
            return Err(WorkflowError::ProtectedWorkflow(id.clone()));
        }

        self.store.delete(id).await?;
        self.invalidate().await;
        tracing::info!(workflow_id = %id, "workflow deleted");
        Ok(())
    }

    async fn invalidate(&self) {
        *self.cache.write().await = None;
    }
}
