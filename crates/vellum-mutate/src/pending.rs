use std::collections::VecDeque;

use vellum_types::VaultPath;

use crate::engine::MutationEngine;
use crate::report::MutationReport;

/// One blob-level sub-operation of a recursive mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileOp {
    Move { from: VaultPath, to: VaultPath },
    Delete { path: VaultPath },
}

impl FileOp {
    /// The descendant path this operation concerns, as reported on failure.
    pub fn subject(&self) -> &VaultPath {
        match self {
            Self::Move { from, .. } => from,
            Self::Delete { path } => path,
        }
    }
}

/// An in-flight recursive move or delete.
///
/// The full subtree listing happens before this queue is built, so every
/// per-descendant operation is known up front; the queue then drains
/// sequentially, recording each outcome in the accumulator. One failed
/// descendant never stops the remainder.
///
/// A `PendingMutation` holds no store resources. Dropping the `drain`
/// future abandons the remaining queue: already-issued operations are not
/// retracted, and the remote tree may be left mixed — an accepted property
/// of a store without multi-blob transactions.
#[derive(Debug, Default)]
pub struct PendingMutation {
    queue: VecDeque<FileOp>,
    report: MutationReport,
}

impl PendingMutation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: FileOp) {
        self.queue.push_back(op);
    }

    /// Record a descendant that failed before reaching the queue (e.g. an
    /// opaque entry, or a path that would not rebase).
    pub fn reject(&mut self, path: VaultPath, reason: impl std::fmt::Display) {
        self.report.record_failure(path, reason);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Drain the queue best-effort and return the aggregate report.
    pub async fn drain(mut self, engine: &MutationEngine) -> MutationReport {
        while let Some(op) = self.queue.pop_front() {
            match engine.apply_file_op(&op).await {
                Ok(()) => self.report.record_success(),
                Err(err) => {
                    tracing::warn!(path = %op.subject(), error = %err, "descendant operation failed");
                    self.report.record_failure(op.subject().clone(), err);
                }
            }
        }
        self.report
    }
}
