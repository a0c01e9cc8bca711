//! Alur Workflow Engine
//!
//! The engine resolves steps and transitions over catalog definitions and
//! applies them to project state. It owns no storage and performs no
//! delivery itself: the catalog store and the notification sink are both
//! injected collaborators.
//!
//! Advancing a project is: resolve the current step by its composite
//! (status, progress) key, resolve the named action on that step, copy the
//! transition's target state onto the project, append history, and fan the
//! resolved notification out to its recipient divisions.

#![deny(unsafe_code)]

mod apply;
mod engine;
mod notify;

pub use apply::apply_transition;
pub use engine::{AdvanceReceipt, AdvanceRequest, WorkflowEngine};
pub use notify::{render, Notifier, ResolvedNotification, TracingNotifier};
