use vellum_store::StoreError;
use vellum_tree::TreeError;
use vellum_types::{TypeError, VaultPath};

use crate::report::MutationReport;

/// Errors from mutation operations.
#[derive(Debug, thiserror::Error)]
pub enum MutateError {
    /// Store failure on a single-file operation; surfaced directly with no
    /// local recovery.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Listing phase of a recursive operation failed.
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    /// Malformed path input.
    #[error("invalid path: {0}")]
    InvalidPath(#[from] TypeError),

    /// The operation does not apply to this path (wrong kind of entry,
    /// non-text content where a document was expected, and similar).
    #[error("unsupported operation on {path}: {reason}")]
    Unsupported { path: VaultPath, reason: String },

    /// A recursive operation processed some descendants and failed others.
    /// The report names every failed sub-path.
    #[error("partial failure: {0}")]
    PartialFailure(MutationReport),
}

impl MutateError {
    pub(crate) fn unsupported(path: VaultPath, reason: impl Into<String>) -> Self {
        Self::Unsupported {
            path,
            reason: reason.into(),
        }
    }
}

/// Result alias for mutation operations.
pub type MutateResult<T> = Result<T, MutateError>;
