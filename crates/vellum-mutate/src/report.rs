use std::fmt;

use serde::{Deserialize, Serialize};
use vellum_types::VaultPath;

/// One descendant that a recursive operation failed to process.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedPath {
    pub path: VaultPath,
    pub reason: String,
}

/// Aggregate outcome of a recursive move or delete.
///
/// Recursive operations process descendants independently: one failure is
/// recorded and the operation continues with the remainder. The report
/// names every failed sub-path so the caller can reconcile by re-listing
/// the tree — there is no rollback.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationReport {
    /// Number of descendant files processed successfully.
    pub succeeded: usize,
    /// Descendants that failed, with the reason each one failed.
    pub failed: Vec<FailedPath>,
}

impl MutationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A report for a single successful file operation.
    pub fn single() -> Self {
        Self {
            succeeded: 1,
            failed: Vec::new(),
        }
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, path: VaultPath, reason: impl fmt::Display) {
        self.failed.push(FailedPath {
            path,
            reason: reason.to_string(),
        });
    }

    /// Whether every descendant was processed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// The failed paths alone, for error surfaces.
    pub fn failed_paths(&self) -> Vec<VaultPath> {
        self.failed.iter().map(|f| f.path.clone()).collect()
    }
}

impl fmt::Display for MutationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            write!(f, "{} succeeded", self.succeeded)
        } else {
            let paths: Vec<String> = self.failed.iter().map(|p| p.path.to_string()).collect();
            write!(
                f,
                "{} succeeded, {} failed: {}",
                self.succeeded,
                self.failed.len(),
                paths.join(", ")
            )
        }
    }
}
