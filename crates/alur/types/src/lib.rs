//! Workflow Domain Types for Alur
//!
//! A project pipeline in Alur is a **data-driven state machine**: a catalog
//! of workflow definitions, each a sequence of steps identified by their
//! (status, progress) pair, with named transitions carrying the full
//! replacement state and an optional notification template.
//!
//! # Key Concepts
//!
//! - **Workflow**: A catalog entry — named, described, and a list of steps.
//! - **WorkflowStep**: One node of the graph, owned by a single division.
//!   Identity is the composite `StepKey` (status, progress); status alone is
//!   deliberately ambiguous ("Pending Approval" appears at progress 20 and 30).
//! - **StepTransition**: A named edge. Firing it replaces the project's
//!   status, division, progress, and next-action text wholesale.
//! - **Notification**: A `{placeholder}` message template addressed to one
//!   or more divisions, resolved and fanned out when the transition fires.
//! - **ProjectState**: The mutable runtime tuple the engine advances, with a
//!   version stamp for optimistic concurrency and an append-only history.
//!
//! # Design Principles
//!
//! 1. Variation is data: one engine, many catalog entries — never
//!    duplicated code paths per pipeline variant.
//! 2. Step lookup is by composite key. There is no status-only fallback;
//!    a near-miss is a diagnostic, not a match.
//! 3. A failed lookup is an explicit error. The engine never silently
//!    no-ops a project, which would corrupt the progress/history invariant.

#![deny(unsafe_code)]

mod errors;
mod project;
pub mod seed;
mod step;
mod workflow;

pub use errors::*;
pub use project::*;
pub use step::*;
pub use workflow::*;
