//! Project runtime state: the mutable half of the workflow contract.
//!
//! The workflow definition is immutable during a transition; what moves is
//! the project's (status, progress, assigned division, next action) tuple,
//! its history, and its version stamp. The project record itself is owned by
//! the external project service — this is the shape the engine writes to.

use crate::{StepKey, Workflow, WorkflowId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The workflow-owned slice of a project record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectState {
    /// The workflow definition this project runs under
    pub workflow_id: WorkflowId,
    pub status: String,
    pub progress: u8,
    pub assigned_division: String,
    pub next_action: Option<String>,
    /// Optimistic concurrency stamp, bumped on every applied transition
    #[serde(default)]
    pub version: u64,
    /// Append-only record of every applied transition
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl ProjectState {
    /// Start a project at the workflow's first step
    pub fn new_for(workflow: &Workflow) -> Option<Self> {
        let first = workflow.first_step()?;
        Some(Self {
            workflow_id: workflow.id.clone(),
            status: first.status.clone(),
            progress: first.progress,
            assigned_division: first.assigned_division.clone(),
            next_action: first.next_action_description.clone(),
            version: 0,
            history: Vec::new(),
        })
    }

    /// The step this project currently sits on
    pub fn step_key(&self) -> StepKey {
        StepKey::new(self.status.clone(), self.progress)
    }

    /// Append a history entry stamped now
    pub fn record(&mut self, division: impl Into<String>, action: impl Into<String>) {
        self.history.push(HistoryEntry {
            division: division.into(),
            action: action.into(),
            timestamp: Utc::now(),
        });
    }
}

/// One applied transition: who did what, when
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The division the acting user belongs to
    pub division: String,
    /// Free text derived from the action name and context
    pub action: String,
    pub timestamp: DateTime<Utc>,
}
