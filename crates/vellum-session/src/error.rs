use vellum_mutate::MutateError;
use vellum_store::StoreError;
use vellum_types::VaultPath;

/// Errors from editing sessions.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The document's bytes are not UTF-8 text; it cannot be edited as a
    /// frontmatter document.
    #[error("document at {0} is not UTF-8 text")]
    NotText(VaultPath),

    /// Store failure while opening or deleting.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Mutation failure while saving or renaming.
    #[error("mutation error: {0}")]
    Mutate(#[from] MutateError),
}

/// Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
