//! The workflow engine facade.
//!
//! Id-addressed entry points over the catalog for resolving steps and
//! transitions, plus [`WorkflowEngine::advance`] — the one mutation path a
//! project service calls. A lookup failure is always an explicit error;
//! the project is never silently left half-advanced.

use crate::{apply_transition, render, Notifier, ResolvedNotification};
use alur_store::WorkflowCatalog;
use alur_types::{
    ProjectState, StepKey, StepTransition, WorkflowError, WorkflowId, WorkflowResult, WorkflowStep,
};
use std::collections::HashMap;
use std::sync::Arc;

/// One advancement request from the project service
#[derive(Clone, Debug)]
pub struct AdvanceRequest {
    /// The declared action key to fire, e.g. `"submitted"`, `"approved"`
    pub action: String,
    /// The division of the acting user, recorded in history
    pub actor_division: String,
    /// Free text for the history entry; the action key when empty
    pub action_note: String,
    /// The project version the caller read; mismatch is a retryable conflict
    pub expected_version: u64,
    /// Placeholder values for notification templates
    pub values: HashMap<String, String>,
}

impl AdvanceRequest {
    pub fn new(
        action: impl Into<String>,
        actor_division: impl Into<String>,
        expected_version: u64,
    ) -> Self {
        Self {
            action: action.into(),
            actor_division: actor_division.into(),
            action_note: String::new(),
            expected_version,
            values: HashMap::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.action_note = note.into();
        self
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

/// The outcome of a successful advancement
#[derive(Clone, Debug)]
pub struct AdvanceReceipt {
    /// The step the project left
    pub from: StepKey,
    /// The step the project now sits on
    pub to: StepKey,
    /// The action that fired
    pub action: String,
    /// Notifications resolved for this transition (already dispatched)
    pub notifications: Vec<ResolvedNotification>,
}

/// The workflow engine: catalog reads plus one mutation path
pub struct WorkflowEngine {
    catalog: Arc<WorkflowCatalog>,
    notifier: Arc<dyn Notifier>,
}

impl WorkflowEngine {
    pub fn new(catalog: Arc<WorkflowCatalog>, notifier: Arc<dyn Notifier>) -> Self {
        Self { catalog, notifier }
    }

    /// The entry step of a workflow, `None` when it has no steps
    pub async fn first_step(&self, id: &WorkflowId) -> WorkflowResult<Option<WorkflowStep>> {
        let workflow = self.catalog.get(id).await?;
        Ok(workflow.first_step().cloned())
    }

    /// The unique step at (status, progress)
    pub async fn current_step(
        &self,
        id: &WorkflowId,
        status: &str,
        progress: u8,
    ) -> WorkflowResult<WorkflowStep> {
        let workflow = self.catalog.get(id).await?;
        workflow.find_step(status, progress).cloned()
    }

    /// The transition an action would fire from (status, progress)
    pub async fn transition_info(
        &self,
        id: &WorkflowId,
        status: &str,
        progress: u8,
        action: &str,
    ) -> WorkflowResult<StepTransition> {
        let workflow = self.catalog.get(id).await?;
        workflow.transition_for(status, progress, action).cloned()
    }

    /// Start a new project at the first step of a workflow
    pub async fn start_project(&self, id: &WorkflowId) -> WorkflowResult<ProjectState> {
        let workflow = self.catalog.get(id).await?;
        ProjectState::new_for(&workflow).ok_or_else(|| {
            WorkflowError::Validation(format!("workflow '{}' has no steps", workflow.id))
        })
    }

    /// Advance a project by firing an action from its current step.
    ///
    /// Ordering matters: the stale-version check and both lookups happen
    /// before any mutation, so a failed request leaves the project exactly
    /// as it was. Notification delivery failures are logged but do not roll
    /// back an applied transition.
    pub async fn advance(
        &self,
        project: &mut ProjectState,
        request: AdvanceRequest,
    ) -> WorkflowResult<AdvanceReceipt> {
        if request.expected_version != project.version {
            return Err(WorkflowError::Conflict {
                expected: request.expected_version,
                actual: project.version,
            });
        }

        let workflow = self.catalog.get(&project.workflow_id).await?;
        let from = project.step_key();
        let transition = workflow
            .transition_for(&project.status, project.progress, &request.action)?
            .clone();

        let note = if request.action_note.is_empty() {
            request.action.clone()
        } else {
            request.action_note.clone()
        };
        apply_transition(project, &transition, &request.actor_division, &note);

        let mut notifications = Vec::new();
        if let Some(template) = &transition.notification {
            if let Some(resolved) = render(template, &request.values) {
                for division in &resolved.recipients {
                    if let Err(err) = self.notifier.deliver(division, &resolved.message).await {
                        tracing::warn!(
                            division,
                            error = %err,
                            "notification delivery failed"
                        );
                    }
                }
                notifications.push(resolved);
            }
        }

        let to = project.step_key();
        tracing::info!(
            workflow_id = %project.workflow_id,
            action = %request.action,
            from = %from,
            to = %to,
            version = project.version,
            "project advanced"
        );

        Ok(AdvanceReceipt {
            from,
            to,
            action: request.action,
            notifications,
        })
    }
}
