//! Workflow definitions: named step sequences over (status, progress) nodes.
//!
//! A Workflow is a directed graph. Lookup is always by the composite
//! (status, progress) key — array order of `steps` is not load-bearing.
//! Definitions are immutable from the engine's perspective during a
//! transition; edits go through the catalog, which validates on write.

use crate::{StepKey, StepTransition, WorkflowError, WorkflowResult, WorkflowStep};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ── Identifier ───────────────────────────────────────────────────────

/// Unique identifier for a workflow definition
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowId(pub String);

impl WorkflowId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl std::fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Workflow ─────────────────────────────────────────────────────────

/// A workflow definition — one entry in the catalog
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// Unique identifier; immutable once created
    pub id: WorkflowId,
    /// Human-readable name
    pub name: String,
    /// What this pipeline is for
    pub description: String,
    /// Protected workflows cannot be deleted (the system default)
    #[serde(default)]
    pub protected: bool,
    /// The step graph; lookup goes by (status, progress), not index.
    /// Legacy records may lack the key entirely; they deserialize empty
    /// and the catalog repairs them on read.
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
}

impl Workflow {
    pub fn new(id: WorkflowId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            protected: false,
            steps: Vec::new(),
        }
    }

    pub fn with_steps(mut self, steps: Vec<WorkflowStep>) -> Self {
        self.steps = steps;
        self
    }

    pub fn protect(mut self) -> Self {
        self.protected = true;
        self
    }

    /// The entry step for newly created projects
    pub fn first_step(&self) -> Option<&WorkflowStep> {
        self.steps.first()
    }

    /// Find the unique step matching both status and progress.
    ///
    /// There is deliberately no status-only fallback: a near-miss where the
    /// status exists at a different progress is a data-consistency problem in
    /// either the project record or the definition, and masking it would let
    /// a project advance from the wrong node. It is logged and surfaced as
    /// `StepNotFound`.
    pub fn find_step(&self, status: &str, progress: u8) -> WorkflowResult<&WorkflowStep> {
        if let Some(step) = self
            .steps
            .iter()
            .find(|s| s.status == status && s.progress == progress)
        {
            return Ok(step);
        }

        let same_status: Vec<u8> = self
            .steps
            .iter()
            .filter(|s| s.status == status)
            .map(|s| s.progress)
            .collect();
        if !same_status.is_empty() {
            tracing::warn!(
                workflow_id = %self.id,
                status,
                progress,
                candidates = ?same_status,
                "status matches other progress checkpoints; refusing status-only fallback"
            );
        }

        Err(WorkflowError::StepNotFound(StepKey::new(status, progress)))
    }

    /// Find a step by its composite key
    pub fn step_at(&self, key: &StepKey) -> WorkflowResult<&WorkflowStep> {
        self.find_step(&key.status, key.progress)
    }

    /// Resolve the transition for an action on the step at (status, progress).
    ///
    /// Terminal steps and undeclared action names both fail explicitly;
    /// there is no implicit default action.
    pub fn transition_for(
        &self,
        status: &str,
        progress: u8,
        action: &str,
    ) -> WorkflowResult<&StepTransition> {
        let step = self.find_step(status, progress)?;
        if step.is_terminal() {
            return Err(WorkflowError::TerminalStep(step.key()));
        }
        step.transition(action)
            .ok_or_else(|| WorkflowError::InvalidAction {
                action: action.to_string(),
                step: step.key(),
            })
    }

    /// Validate the definition for structural correctness.
    ///
    /// Enforced on every catalog write so malformed records are rejected
    /// instead of repaired later:
    /// - at least one step
    /// - progress within 0–100
    /// - (status, progress) unique across all steps
    /// - terminal steps own no division and describe no next action
    /// - every transition target resolves to a step of this workflow
    pub fn validate(&self) -> WorkflowResult<()> {
        if self.steps.is_empty() {
            return Err(WorkflowError::Validation(format!(
                "workflow '{}' has no steps",
                self.id
            )));
        }

        let mut seen = HashSet::new();
        for step in &self.steps {
            if step.progress > 100 {
                return Err(WorkflowError::Validation(format!(
                    "step '{}' has progress {} outside 0-100",
                    step.step_name, step.progress
                )));
            }
            if !seen.insert(step.key()) {
                return Err(WorkflowError::Validation(format!(
                    "duplicate step identity {}",
                    step.key()
                )));
            }
            if step.is_terminal() {
                if !step.assigned_division.is_empty() {
                    return Err(WorkflowError::Validation(format!(
                        "terminal step {} must not own a division",
                        step.key()
                    )));
                }
                if step.next_action_description.is_some() {
                    return Err(WorkflowError::Validation(format!(
                        "terminal step {} must not declare a next action",
                        step.key()
                    )));
                }
            }
        }

        for step in &self.steps {
            let Some(transitions) = &step.transitions else {
                continue;
            };
            for (action, transition) in transitions {
                let target = transition.target_key();
                if !seen.contains(&target) {
                    return Err(WorkflowError::Validation(format!(
                        "transition '{}' on step {} targets unknown step {}",
                        action,
                        step.key(),
                        target
                    )));
                }
            }
        }

        Ok(())
    }

    /// Terminal steps of this workflow (Completed, Canceled checkpoints)
    pub fn terminal_steps(&self) -> Vec<&WorkflowStep> {
        self.steps.iter().filter(|s| s.is_terminal()).collect()
    }

    /// Total number of steps
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}
