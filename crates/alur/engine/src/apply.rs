//! Transition application: copying a resolved transition onto a project.
//!
//! The transition carries the *full* replacement state; nothing is merged
//! or inferred. The version stamp bumps on every application so stale
//! writers are caught at the engine boundary.

use alur_types::{ProjectState, StepTransition};

/// Apply a resolved transition to a project.
///
/// Copies the four target fields wholesale, bumps the version stamp, and
/// appends a history entry attributed to the acting division.
pub fn apply_transition(
    project: &mut ProjectState,
    transition: &StepTransition,
    actor_division: &str,
    action_note: &str,
) {
    project.status = transition.target_status.clone();
    project.assigned_division = transition.target_assigned_division.clone();
    project.progress = transition.target_progress;
    project.next_action = transition.target_next_action_description.clone();
    project.version += 1;
    project.record(actor_division, action_note);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alur_types::{seed, StepKey};

    #[test]
    fn test_apply_copies_full_target_state() {
        let wf = seed::default_workflow();
        let mut project = ProjectState::new_for(&wf).unwrap();
        let transition = wf
            .transition_for("Pending Offer", 10, "submitted")
            .unwrap()
            .clone();

        apply_transition(&mut project, &transition, "Admin Proyek", "Offer submitted");

        assert_eq!(project.step_key(), StepKey::new("Pending Approval", 20));
        assert_eq!(project.assigned_division, "Owner");
        assert_eq!(
            project.next_action.as_deref(),
            Some("Review the submitted offer")
        );
        assert_eq!(project.version, 1);
        assert_eq!(project.history.len(), 1);
        assert_eq!(project.history[0].division, "Admin Proyek");
        assert_eq!(project.history[0].action, "Offer submitted");
    }

    #[test]
    fn test_apply_clears_next_action_on_terminal_target() {
        let wf = seed::default_workflow();
        let mut project = ProjectState::new_for(&wf).unwrap();

        // Walk to offer approval, then take the rejection branch
        let submit = wf
            .transition_for("Pending Offer", 10, "submitted")
            .unwrap()
            .clone();
        apply_transition(&mut project, &submit, "Admin Proyek", "Offer submitted");

        let reject = wf
            .transition_for("Pending Approval", 20, "rejected")
            .unwrap()
            .clone();
        apply_transition(&mut project, &reject, "Owner", "Offer rejected");

        assert_eq!(project.status, "Canceled");
        assert_eq!(project.assigned_division, "");
        assert!(project.next_action.is_none());
        assert_eq!(project.version, 2);
    }
}
