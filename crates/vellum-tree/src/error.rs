use vellum_store::StoreError;
use vellum_types::VaultPath;

/// Errors from tree walks.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// The walk was rooted at something that is not a directory.
    #[error("expected a directory at {0}")]
    ExpectedDirectory(VaultPath),

    /// Store failure during listing.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result alias for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
