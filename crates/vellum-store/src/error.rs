use vellum_types::{ContentHash, TypeError, VaultPath};

/// Errors from remote-store operations.
///
/// The taxonomy separates semantic outcomes (`NotFound`, `Conflict`,
/// path-shape errors) from `Transient` network failures, which are the only
/// kind eligible for retry — and then only for idempotent reads.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The path was absent at read time.
    #[error("not found: {0}")]
    NotFound(VaultPath),

    /// Hash precondition failed: the remote content has advanced since the
    /// caller last read it. The stored content is left untouched.
    #[error("conflict at {path}: expected {expected}, store has {actual}")]
    Conflict {
        path: VaultPath,
        expected: ContentHash,
        actual: ContentHash,
    },

    /// A file operation addressed a directory.
    #[error("not a file: {0}")]
    NotAFile(VaultPath),

    /// A directory operation addressed a file.
    #[error("not a directory: {0}")]
    NotADirectory(VaultPath),

    /// Malformed path.
    #[error("invalid path: {0}")]
    InvalidPath(#[from] TypeError),

    /// Network-level failure; safe to retry for reads only.
    #[error("transient store failure at {path}: {reason}")]
    Transient { path: VaultPath, reason: String },
}

impl StoreError {
    /// Whether a single retry of an idempotent read is warranted.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// The path the failure concerns, where one exists.
    pub fn path(&self) -> Option<&VaultPath> {
        match self {
            Self::NotFound(p) | Self::NotAFile(p) | Self::NotADirectory(p) => Some(p),
            Self::Conflict { path, .. } | Self::Transient { path, .. } => Some(path),
            Self::InvalidPath(_) => None,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
