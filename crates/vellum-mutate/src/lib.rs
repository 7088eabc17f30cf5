//! Mutation engine for Vellum.
//!
//! Implements create, update, rename/move, and delete — for single files
//! and whole subtrees — over the injected [`ContentStore`] capability,
//! enforcing hash-based optimistic concurrency throughout.
//!
//! Recursive operations are never transactional: the remote store has no
//! multi-blob commit, so a subtree move or delete runs best-effort off an
//! explicit [`PendingMutation`] work queue and reports per-descendant
//! failures in an aggregate [`MutationReport`] instead of rolling back.
//!
//! # Key Types
//!
//! - [`MutationEngine`] — the operations
//! - [`PendingMutation`] — explicit queue of per-file sub-operations
//! - [`MutationReport`] / [`MutateError::PartialFailure`] — aggregates
//!
//! [`ContentStore`]: vellum_store::ContentStore

pub mod engine;
pub mod error;
pub mod pending;
pub mod report;

pub use engine::{MutationEngine, FOLDER_MARKER};
pub use error::{MutateError, MutateResult};
pub use pending::{FileOp, PendingMutation};
pub use report::{FailedPath, MutationReport};
