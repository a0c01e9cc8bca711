//! The canonical default pipeline.
//!
//! One workflow definition covering the full production path:
//! offer → owner approval → DP invoice → survey → file submission →
//! sidang → revision/cancellation branches → final invoice → completion.
//! Every catalog auto-seeds this definition, and `add` seeds new
//! workflows with a fresh copy of these steps.
//!
//! Rework cycles are intentional: `revise_offer`, `revise_dp`,
//! `reschedule_survey`, and `reschedule_sidang` send the project backward
//! to an earlier node, then forward again. Cancellation is terminal and
//! keeps the progress of the point where it happened.

use crate::{StepTransition, Workflow, WorkflowId, WorkflowStep};

/// Reserved identifier of the protected system default workflow
pub const DEFAULT_WORKFLOW_ID: &str = "workflow-default";

/// Division names used by the canonical pipeline
pub mod division {
    pub const ADMIN_PROYEK: &str = "Admin Proyek";
    pub const OWNER: &str = "Owner";
    pub const KEUANGAN: &str = "Keuangan";
    pub const SURVEYOR: &str = "Surveyor";
    pub const DRAFTER: &str = "Drafter";
}

/// The protected default workflow, ready to persist
pub fn default_workflow() -> Workflow {
    Workflow::new(
        WorkflowId::new(DEFAULT_WORKFLOW_ID),
        "Standard Project Pipeline",
        "Offer, approval, invoicing, survey, file submission, sidang, and completion",
    )
    .with_steps(default_steps())
    .protect()
}

/// The canonical step sequence.
///
/// Each call builds a fresh value, so callers can hand the result to a new
/// workflow without aliasing the template or any other catalog entry.
pub fn default_steps() -> Vec<WorkflowStep> {
    use division::*;

    vec![
        WorkflowStep::new("Offer Submission", "Pending Offer", ADMIN_PROYEK, 10)
            .with_next_action("Prepare and submit the offer to the owner")
            .with_transition(
                "submitted",
                StepTransition::to("Pending Approval", OWNER, 20)
                    .with_next_action("Review the submitted offer")
                    .notify(OWNER.into(), "Offer for '{projectName}' submitted."),
            ),
        WorkflowStep::new("Offer Approval", "Pending Approval", OWNER, 20)
            .with_next_action("Approve or reject the offer")
            .with_transition(
                "approved",
                StepTransition::to("Pending DP Invoice", KEUANGAN, 25)
                    .with_next_action("Issue the down-payment invoice")
                    .notify(
                        KEUANGAN.into(),
                        "Offer for '{projectName}' approved by {actorUsername}. Prepare the DP invoice.",
                    ),
            )
            .with_transition(
                "rejected",
                StepTransition::to("Canceled", "", 20).notify(
                    ADMIN_PROYEK.into(),
                    "Offer for '{projectName}' was rejected by the owner. Reason: {reasonNote}",
                ),
            )
            .with_transition(
                "revise_offer",
                StepTransition::to("Pending Offer", ADMIN_PROYEK, 10)
                    .with_next_action("Revise the offer per the owner's feedback")
                    .notify(
                        ADMIN_PROYEK.into(),
                        "Owner requested an offer revision for '{projectName}'. Reason: {reasonNote}",
                    ),
            ),
        WorkflowStep::new("DP Invoice Issuance", "Pending DP Invoice", KEUANGAN, 25)
            .with_next_action("Issue the down-payment invoice to the owner")
            .with_transition(
                "submitted",
                StepTransition::to("Pending Approval", OWNER, 30)
                    .with_next_action("Confirm the down-payment invoice")
                    .notify(OWNER.into(), "DP invoice for '{projectName}' issued."),
            ),
        WorkflowStep::new("DP Invoice Approval", "Pending Approval", OWNER, 30)
            .with_next_action("Confirm or return the down-payment invoice")
            .with_transition(
                "approved",
                StepTransition::to("Pending Survey", SURVEYOR, 40)
                    .with_next_action("Schedule the site survey")
                    .notify(
                        SURVEYOR.into(),
                        "DP for '{projectName}' confirmed. Schedule the site survey.",
                    ),
            )
            .with_transition(
                "revise_dp",
                StepTransition::to("Pending DP Invoice", KEUANGAN, 25)
                    .with_next_action("Revise the down-payment invoice")
                    .notify(
                        KEUANGAN.into(),
                        "Owner requested a DP invoice revision for '{projectName}'. Reason: {reasonNote}",
                    ),
            ),
        WorkflowStep::new("Site Survey", "Pending Survey", SURVEYOR, 40)
            .with_next_action("Agree on a survey date with the owner")
            .with_transition(
                "scheduled",
                StepTransition::to("Survey Scheduled", SURVEYOR, 45)
                    .with_next_action("Conduct the survey on the agreed date")
                    .notify(
                        vec![ADMIN_PROYEK, OWNER].into(),
                        "Survey for '{projectName}' scheduled on {surveyDate}.",
                    ),
            ),
        WorkflowStep::new("Survey Execution", "Survey Scheduled", SURVEYOR, 45)
            .with_next_action("Conduct the survey and file the results")
            .with_transition(
                "completed",
                StepTransition::to("Pending File Submission", DRAFTER, 60)
                    .with_next_action("Upload the required drawing and document files")
                    .notify(
                        vec![DRAFTER, ADMIN_PROYEK].into(),
                        "Survey for '{projectName}' completed. Upload the required files.",
                    ),
            )
            .with_transition(
                "reschedule_survey",
                StepTransition::to("Pending Survey", SURVEYOR, 40)
                    .with_next_action("Agree on a new survey date")
                    .notify(
                        vec![ADMIN_PROYEK, OWNER].into(),
                        "Survey for '{projectName}' was rescheduled. Reason: {reasonNote}",
                    ),
            ),
        WorkflowStep::new("File Submission", "Pending File Submission", DRAFTER, 60)
            .with_next_action("Upload and confirm all required files")
            .with_transition(
                "all_files_confirmed",
                StepTransition::to("Pending Sidang Schedule", ADMIN_PROYEK, 70)
                    .with_next_action("Schedule the sidang hearing")
                    .notify(
                        ADMIN_PROYEK.into(),
                        "All files for '{projectName}' are confirmed. Schedule the sidang.",
                    ),
            ),
        WorkflowStep::new("Sidang Scheduling", "Pending Sidang Schedule", ADMIN_PROYEK, 70)
            .with_next_action("Schedule the sidang hearing")
            .with_transition(
                "scheduled",
                StepTransition::to("Sidang Scheduled", ADMIN_PROYEK, 80)
                    .with_next_action("Attend the sidang and record the outcome")
                    .notify(
                        vec![OWNER, DRAFTER].into(),
                        "Sidang for '{projectName}' has been scheduled.",
                    ),
            ),
        WorkflowStep::new("Sidang", "Sidang Scheduled", ADMIN_PROYEK, 80)
            .with_next_action("Record the sidang outcome")
            .with_transition(
                "approved",
                StepTransition::to("Pending Final Invoice", KEUANGAN, 90)
                    .with_next_action("Issue the final invoice")
                    .notify(
                        KEUANGAN.into(),
                        "'{projectName}' passed the sidang. Issue the final invoice.",
                    ),
            )
            .with_transition(
                "revise_after_sidang",
                StepTransition::to("Pending Revision", DRAFTER, 85)
                    .with_next_action("Apply the revisions requested at the sidang")
                    .notify(
                        vec![DRAFTER, ADMIN_PROYEK].into(),
                        "Sidang requested revisions for '{projectName}'. Reason: {reasonNote}",
                    ),
            )
            .with_transition(
                "canceled_after_sidang",
                StepTransition::to("Canceled", "", 80).notify(
                    vec![ADMIN_PROYEK, OWNER].into(),
                    "'{projectName}' was canceled after the sidang. Reason: {reasonNote}",
                ),
            )
            .with_transition(
                "reschedule_sidang",
                StepTransition::to("Pending Sidang Schedule", ADMIN_PROYEK, 70)
                    .with_next_action("Schedule a new sidang date")
                    .notify(
                        vec![OWNER, DRAFTER].into(),
                        "Sidang for '{projectName}' was rescheduled. Reason: {reasonNote}",
                    ),
            ),
        WorkflowStep::new("Post-Sidang Revision", "Pending Revision", DRAFTER, 85)
            .with_next_action("Apply the requested revisions")
            .with_transition(
                "revision_completed_and_finish",
                StepTransition::to("Pending Final Invoice", KEUANGAN, 90)
                    .with_next_action("Issue the final invoice")
                    .notify(
                        KEUANGAN.into(),
                        "Revisions for '{projectName}' are complete. Issue the final invoice.",
                    ),
            ),
        WorkflowStep::new("Final Invoice", "Pending Final Invoice", KEUANGAN, 90)
            .with_next_action("Issue the final invoice and confirm payment")
            .with_transition(
                "completed",
                StepTransition::to("Completed", "", 100).notify(
                    vec![OWNER, ADMIN_PROYEK].into(),
                    "'{projectName}' is complete. Thank you.",
                ),
            ),
        WorkflowStep::terminal("Completed", "Completed", 100),
        WorkflowStep::terminal("Canceled (offer rejected)", "Canceled", 20),
        WorkflowStep::terminal("Canceled (after sidang)", "Canceled", 80),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorkflowError;
    use std::collections::BTreeSet;

    #[test]
    fn test_default_workflow_is_valid() {
        let wf = default_workflow();
        assert_eq!(wf.id, WorkflowId::new(DEFAULT_WORKFLOW_ID));
        assert!(wf.protected);
        wf.validate().unwrap();
    }

    #[test]
    fn test_declares_full_action_vocabulary() {
        let wf = default_workflow();
        let declared: BTreeSet<String> = wf
            .steps
            .iter()
            .flat_map(|s| s.actions())
            .map(String::from)
            .collect();

        let expected = [
            "submitted",
            "approved",
            "rejected",
            "revise_offer",
            "revise_dp",
            "scheduled",
            "completed",
            "revise_after_sidang",
            "canceled_after_sidang",
            "reschedule_sidang",
            "revision_completed_and_finish",
            "all_files_confirmed",
            "reschedule_survey",
        ];
        for action in expected {
            assert!(declared.contains(action), "missing action '{}'", action);
        }
        assert_eq!(declared.len(), expected.len());
    }

    #[test]
    fn test_pending_approval_exists_at_two_checkpoints() {
        let wf = default_workflow();

        let offer = wf.find_step("Pending Approval", 20).unwrap();
        assert_eq!(offer.step_name, "Offer Approval");

        let dp = wf.find_step("Pending Approval", 30).unwrap();
        assert_eq!(dp.step_name, "DP Invoice Approval");
    }

    #[test]
    fn test_offer_submitted_scenario() {
        let wf = default_workflow();
        let transition = wf.transition_for("Pending Offer", 10, "submitted").unwrap();

        assert_eq!(transition.target_status, "Pending Approval");
        assert_eq!(transition.target_assigned_division, "Owner");
        assert_eq!(transition.target_progress, 20);

        let notification = transition.notification.as_ref().unwrap();
        assert_eq!(notification.recipients(), vec!["Owner"]);
        assert_eq!(notification.message, "Offer for '{projectName}' submitted.");

        assert!(matches!(
            wf.transition_for("Pending Offer", 10, "bogus"),
            Err(WorkflowError::InvalidAction { .. })
        ));
    }

    #[test]
    fn test_offer_rejected_is_terminal_branch() {
        let wf = default_workflow();
        let transition = wf.transition_for("Pending Approval", 20, "rejected").unwrap();

        assert_eq!(transition.target_status, "Canceled");
        assert_eq!(transition.target_assigned_division, "");
        let notification = transition.notification.as_ref().unwrap();
        assert_eq!(notification.recipients(), vec!["Admin Proyek"]);

        let canceled = wf.step_at(&transition.target_key()).unwrap();
        assert!(canceled.is_terminal());
    }

    #[test]
    fn test_rework_cycles_return_to_earlier_nodes() {
        let wf = default_workflow();

        let revise = wf
            .transition_for("Pending Approval", 20, "revise_offer")
            .unwrap();
        assert_eq!(revise.target_progress, 10);

        let resurvey = wf
            .transition_for("Survey Scheduled", 45, "reschedule_survey")
            .unwrap();
        assert_eq!(resurvey.target_progress, 40);

        let residang = wf
            .transition_for("Sidang Scheduled", 80, "reschedule_sidang")
            .unwrap();
        assert_eq!(residang.target_progress, 70);
    }

    #[test]
    fn test_terminal_checkpoints() {
        let wf = default_workflow();
        let terminals = wf.terminal_steps();
        assert_eq!(terminals.len(), 3);
        assert!(terminals.iter().all(|s| s.assigned_division.is_empty()));

        // Cancellation keeps the progress of the point where it happened
        assert!(wf.find_step("Canceled", 20).unwrap().is_terminal());
        assert!(wf.find_step("Canceled", 80).unwrap().is_terminal());
        assert!(wf.find_step("Completed", 100).unwrap().is_terminal());
    }

    #[test]
    fn test_default_steps_do_not_alias() {
        let mut a = default_steps();
        a[0].step_name = "Mutated".into();
        let b = default_steps();
        assert_eq!(b[0].step_name, "Offer Submission");
    }
}
