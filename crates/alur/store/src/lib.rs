//! Catalog storage for Alur.
//!
//! The engine never touches a filesystem directly: it talks to the
//! [`WorkflowStore`] trait, and swapping the flat-file adapter for a real
//! database requires no logic changes. The [`WorkflowCatalog`] layers the
//! domain rules on top — default-workflow seeding, repair of legacy records,
//! validate-on-write, protected deletes, and read caching.

#![deny(unsafe_code)]

mod catalog;
mod error;
mod json_file;
mod memory;
mod traits;

pub use catalog::{WorkflowCatalog, WorkflowPatch};
pub use error::{StoreError, StoreResult};
pub use json_file::JsonWorkflowStore;
pub use memory::MemoryWorkflowStore;
pub use traits::WorkflowStore;
