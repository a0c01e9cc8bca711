//! Workflow steps and transitions.
//!
//! A step is one node in the workflow graph, identified by its
//! (status, progress) pair — never by status alone, since the same status
//! label legitimately appears at multiple progress checkpoints. Transitions
//! are named edges: an action key maps to the full replacement state the
//! project takes when that action fires.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Step identity ────────────────────────────────────────────────────

/// Composite step identity: (status, progress).
///
/// Status alone is not unique — "Pending Approval" exists at progress 20
/// (offer approval) and 30 (DP-invoice approval) in the canonical pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepKey {
    pub status: String,
    pub progress: u8,
}

impl StepKey {
    pub fn new(status: impl Into<String>, progress: u8) -> Self {
        Self {
            status: status.into(),
            progress,
        }
    }
}

impl std::fmt::Display for StepKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.status, self.progress)
    }
}

// ── Workflow Step ────────────────────────────────────────────────────

/// A node in the workflow graph, owned by one division
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    /// Human label, descriptive only
    pub step_name: String,
    /// Where a project is — part of step identity together with `progress`
    pub status: String,
    /// The division currently responsible; empty string means "no one"
    pub assigned_division: String,
    /// Integer checkpoint 0–100, the other half of step identity
    pub progress: u8,
    /// Human-readable instruction; `None` at terminal steps
    pub next_action_description: Option<String>,
    /// Action name → transition outcome; `None` marks a terminal step
    pub transitions: Option<BTreeMap<String, StepTransition>>,
}

impl WorkflowStep {
    /// Create a non-terminal step with an empty transition table
    pub fn new(
        step_name: impl Into<String>,
        status: impl Into<String>,
        assigned_division: impl Into<String>,
        progress: u8,
    ) -> Self {
        Self {
            step_name: step_name.into(),
            status: status.into(),
            assigned_division: assigned_division.into(),
            progress,
            next_action_description: None,
            transitions: Some(BTreeMap::new()),
        }
    }

    /// Create a terminal step: no transitions, no owner, no next action
    pub fn terminal(step_name: impl Into<String>, status: impl Into<String>, progress: u8) -> Self {
        Self {
            step_name: step_name.into(),
            status: status.into(),
            assigned_division: String::new(),
            progress,
            next_action_description: None,
            transitions: None,
        }
    }

    pub fn with_next_action(mut self, description: impl Into<String>) -> Self {
        self.next_action_description = Some(description.into());
        self
    }

    /// Declare a named transition out of this step
    pub fn with_transition(mut self, action: impl Into<String>, transition: StepTransition) -> Self {
        self.transitions
            .get_or_insert_with(BTreeMap::new)
            .insert(action.into(), transition);
        self
    }

    /// The composite identity of this step
    pub fn key(&self) -> StepKey {
        StepKey::new(self.status.clone(), self.progress)
    }

    /// Terminal steps declare no transitions at all
    pub fn is_terminal(&self) -> bool {
        self.transitions.is_none()
    }

    /// Look up a declared transition by action name
    pub fn transition(&self, action: &str) -> Option<&StepTransition> {
        self.transitions.as_ref().and_then(|t| t.get(action))
    }

    /// Action names declared on this step, in stable order
    pub fn actions(&self) -> Vec<&str> {
        self.transitions
            .as_ref()
            .map(|t| t.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

// ── Step Transition ──────────────────────────────────────────────────

/// The full replacement state a project takes when a transition fires
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepTransition {
    pub target_status: String,
    pub target_assigned_division: String,
    pub target_next_action_description: Option<String>,
    pub target_progress: u8,
    /// Template to deliver to one or more divisions when this fires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
}

impl StepTransition {
    pub fn to(
        target_status: impl Into<String>,
        target_assigned_division: impl Into<String>,
        target_progress: u8,
    ) -> Self {
        Self {
            target_status: target_status.into(),
            target_assigned_division: target_assigned_division.into(),
            target_next_action_description: None,
            target_progress,
            notification: None,
        }
    }

    pub fn with_next_action(mut self, description: impl Into<String>) -> Self {
        self.target_next_action_description = Some(description.into());
        self
    }

    pub fn notify(mut self, division: Recipients, message: impl Into<String>) -> Self {
        self.notification = Some(Notification {
            division: Some(division),
            message: message.into(),
        });
        self
    }

    /// The (status, progress) node this transition lands on
    pub fn target_key(&self) -> StepKey {
        StepKey::new(self.target_status.clone(), self.target_progress)
    }
}

// ── Notification ─────────────────────────────────────────────────────

/// A notification template attached to a transition.
///
/// The message carries `{placeholder}` tokens resolved at dispatch time
/// against a caller-supplied value map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// One division, several, or none at all
    #[serde(default)]
    pub division: Option<Recipients>,
    pub message: String,
}

impl Notification {
    /// Recipient divisions as a flat list (empty when addressed to no one)
    pub fn recipients(&self) -> Vec<&str> {
        match &self.division {
            Some(Recipients::One(d)) => vec![d.as_str()],
            Some(Recipients::Many(ds)) => ds.iter().map(String::as_str).collect(),
            None => Vec::new(),
        }
    }
}

/// Persisted recipient shape: a single role string or an array of roles
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for Recipients {
    fn from(division: &str) -> Self {
        Self::One(division.to_string())
    }
}

impl From<Vec<&str>> for Recipients {
    fn from(divisions: Vec<&str>) -> Self {
        Self::Many(divisions.into_iter().map(String::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_key_display() {
        let key = StepKey::new("Pending Approval", 20);
        assert_eq!(format!("{}", key), "Pending Approval@20");
    }

    #[test]
    fn test_step_identity() {
        let offer_approval = WorkflowStep::new("Offer Approval", "Pending Approval", "Owner", 20);
        let dp_approval = WorkflowStep::new("DP Approval", "Pending Approval", "Owner", 30);

        assert_eq!(offer_approval.status, dp_approval.status);
        assert_ne!(offer_approval.key(), dp_approval.key());
    }

    #[test]
    fn test_terminal_step() {
        let done = WorkflowStep::terminal("Completed", "Completed", 100);
        assert!(done.is_terminal());
        assert!(done.assigned_division.is_empty());
        assert!(done.next_action_description.is_none());
        assert!(done.transition("submitted").is_none());
        assert!(done.actions().is_empty());
    }

    #[test]
    fn test_transition_lookup() {
        let step = WorkflowStep::new("Offer Submission", "Pending Offer", "Admin Proyek", 10)
            .with_next_action("Prepare and submit the offer")
            .with_transition(
                "submitted",
                StepTransition::to("Pending Approval", "Owner", 20)
                    .with_next_action("Review the submitted offer")
                    .notify("Owner".into(), "Offer for '{projectName}' submitted."),
            );

        assert!(!step.is_terminal());
        assert_eq!(step.actions(), vec!["submitted"]);

        let transition = step.transition("submitted").unwrap();
        assert_eq!(transition.target_key(), StepKey::new("Pending Approval", 20));
        assert!(step.transition("bogus").is_none());
    }

    #[test]
    fn test_notification_recipients() {
        let single = Notification {
            division: Some("Owner".into()),
            message: "m".into(),
        };
        assert_eq!(single.recipients(), vec!["Owner"]);

        let many = Notification {
            division: Some(vec!["Owner", "Admin Proyek"].into()),
            message: "m".into(),
        };
        assert_eq!(many.recipients(), vec!["Owner", "Admin Proyek"]);

        let nobody = Notification {
            division: None,
            message: "m".into(),
        };
        assert!(nobody.recipients().is_empty());
    }

    #[test]
    fn test_wire_shape_camel_case() {
        let step = WorkflowStep::new("Offer Submission", "Pending Offer", "Admin Proyek", 10)
            .with_next_action("Prepare and submit the offer")
            .with_transition(
                "submitted",
                StepTransition::to("Pending Approval", "Owner", 20),
            );

        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["stepName"], "Offer Submission");
        assert_eq!(json["assignedDivision"], "Admin Proyek");
        assert_eq!(json["nextActionDescription"], "Prepare and submit the offer");
        assert_eq!(
            json["transitions"]["submitted"]["targetStatus"],
            "Pending Approval"
        );
        assert_eq!(json["transitions"]["submitted"]["targetProgress"], 20);
    }

    #[test]
    fn test_recipients_deserialize_all_persisted_shapes() {
        let one: Notification =
            serde_json::from_str(r#"{"division":"Owner","message":"m"}"#).unwrap();
        assert_eq!(one.recipients(), vec!["Owner"]);

        let many: Notification =
            serde_json::from_str(r#"{"division":["Owner","Keuangan"],"message":"m"}"#).unwrap();
        assert_eq!(many.recipients(), vec!["Owner", "Keuangan"]);

        let null: Notification =
            serde_json::from_str(r#"{"division":null,"message":"m"}"#).unwrap();
        assert!(null.recipients().is_empty());

        let absent: Notification = serde_json::from_str(r#"{"message":"m"}"#).unwrap();
        assert!(absent.recipients().is_empty());
    }

    #[test]
    fn test_terminal_serializes_with_null_transitions() {
        let done = WorkflowStep::terminal("Completed", "Completed", 100);
        let json = serde_json::to_value(&done).unwrap();
        assert!(json["transitions"].is_null());
        assert!(json["nextActionDescription"].is_null());

        let back: WorkflowStep = serde_json::from_value(json).unwrap();
        assert!(back.is_terminal());
    }
}
