use std::sync::Arc;

use vellum_frontmatter::{parse, serialize, Frontmatter};
use vellum_store::{with_read_retry, ContentStore};
use vellum_tree::{collect_files, collect_opaque, list_tree};
use vellum_types::{ContentHash, VaultPath};

use crate::error::{MutateError, MutateResult};
use crate::pending::{FileOp, PendingMutation};
use crate::report::MutationReport;

/// Marker blob written to represent an otherwise-empty folder.
///
/// Directories are not first-class in the remote store — they exist only as
/// a prefix of at least one blob, so creating an empty folder means
/// creating this zero-length blob under it.
pub const FOLDER_MARKER: &str = ".placeholder";

/// The mutation engine: conflict-safe writes against the injected store.
///
/// Single-file operations surface store errors directly. Subtree
/// operations list fully first, then drain a [`PendingMutation`] queue
/// best-effort and aggregate per-descendant failures — see the crate docs
/// for the no-rollback contract.
#[derive(Clone)]
pub struct MutationEngine {
    store: Arc<dyn ContentStore>,
}

impl MutationEngine {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    /// Create a file, or a folder via its marker blob.
    ///
    /// This is create-or-replace, NOT create-only: writing an existing path
    /// overwrites it without error. Callers that must not clobber existing
    /// content probe with `get` first and check `NotFound`.
    pub async fn create(
        &self,
        path: &VaultPath,
        content: Vec<u8>,
        as_folder: bool,
    ) -> MutateResult<ContentHash> {
        let hash = if as_folder {
            let marker = path.join(FOLDER_MARKER)?;
            self.store.put(&marker, Vec::new(), None).await?
        } else {
            self.store.put(path, content, None).await?
        };
        tracing::info!(path = %path, as_folder, "created");
        Ok(hash)
    }

    /// Overwrite a file's content, authorized by the hash the caller read.
    ///
    /// Fails `Conflict` if the remote hash has advanced since that read;
    /// the stored content is untouched in that case and the caller must
    /// re-read before retrying.
    pub async fn update(
        &self,
        path: &VaultPath,
        content: Vec<u8>,
        expected: &ContentHash,
    ) -> MutateResult<ContentHash> {
        let hash = self.store.put(path, content, Some(expected)).await?;
        tracing::info!(path = %path, hash = %hash.short_hex(), "updated");
        Ok(hash)
    }

    /// Replace a document's frontmatter wholesale, keeping its body.
    ///
    /// Read-modify-write: the write carries the hash obtained from the same
    /// read, so an intervening writer — including a concurrent body save —
    /// turns this into a `Conflict` instead of a lost update.
    pub async fn update_frontmatter(
        &self,
        path: &VaultPath,
        fields: Frontmatter,
    ) -> MutateResult<ContentHash> {
        let blob = with_read_retry(|| self.store.get(path)).await?;
        let text = blob
            .text()
            .ok_or_else(|| MutateError::unsupported(path.clone(), "content is not UTF-8 text"))?;

        let mut doc = parse(text);
        doc.frontmatter = fields;
        let raw = serialize(&doc);

        let hash = self.store.put(path, raw.into_bytes(), Some(&blob.hash)).await?;
        tracing::info!(path = %path, hash = %hash.short_hex(), "frontmatter replaced");
        Ok(hash)
    }

    /// Move a single file: read, write at the destination, delete the
    /// source with the hash from the read. A file already at the
    /// destination is silently overwritten (merge semantics).
    pub async fn move_file(&self, old: &VaultPath, new: &VaultPath) -> MutateResult<()> {
        let blob = with_read_retry(|| self.store.get(old)).await?;
        self.store.put(new, blob.content, None).await?;
        self.store.delete(old, &blob.hash).await?;
        tracing::info!(from = %old, to = %new, "moved file");
        Ok(())
    }

    /// Move a whole subtree from `old` to `new`.
    ///
    /// Lists `old` completely, then moves every descendant file to its
    /// rebased path, best-effort. Directories are never explicitly created
    /// or deleted; they follow their blobs. Opaque descendants cannot be
    /// moved and are reported as failed paths. Returns the clean report, or
    /// `PartialFailure` carrying it when any descendant failed.
    pub async fn move_tree(
        &self,
        old: &VaultPath,
        new: &VaultPath,
    ) -> MutateResult<MutationReport> {
        if new.starts_with(old) {
            return Err(MutateError::unsupported(
                new.clone(),
                "destination is inside the source subtree",
            ));
        }
        let tree = list_tree(self.store.as_ref(), old).await?;

        let mut pending = PendingMutation::new();
        for file in collect_files(&tree) {
            match file.rebase(old, new) {
                Ok(to) => pending.push(FileOp::Move { from: file, to }),
                Err(err) => pending.reject(file, err),
            }
        }
        for opaque in collect_opaque(&tree) {
            pending.reject(opaque, "opaque entry cannot be moved");
        }

        tracing::info!(from = %old, to = %new, files = pending.remaining(), "moving subtree");
        finish(pending.drain(self).await)
    }

    /// Delete a single file, authorized by a fresh read of its hash.
    pub async fn delete_file(&self, path: &VaultPath) -> MutateResult<()> {
        let blob = with_read_retry(|| self.store.get(path)).await?;
        self.store.delete(path, &blob.hash).await?;
        tracing::info!(path = %path, "deleted file");
        Ok(())
    }

    /// Delete a whole subtree.
    ///
    /// Lists `path` completely, then deletes every descendant file —
    /// exactly one delete per file, none naming a directory, since
    /// directories vanish once empty of blobs. Best-effort, aggregated
    /// like [`move_tree`](Self::move_tree).
    pub async fn delete_tree(&self, path: &VaultPath) -> MutateResult<MutationReport> {
        let tree = list_tree(self.store.as_ref(), path).await?;

        let mut pending = PendingMutation::new();
        for file in collect_files(&tree) {
            pending.push(FileOp::Delete { path: file });
        }
        for opaque in collect_opaque(&tree) {
            pending.reject(opaque, "opaque entry cannot be deleted");
        }

        tracing::info!(path = %path, files = pending.remaining(), "deleting subtree");
        finish(pending.drain(self).await)
    }

    /// Rename an entry in place: the new path is the old parent plus
    /// `new_name`. Dispatches to the file move or the subtree move by
    /// probing what the path currently is.
    pub async fn rename(
        &self,
        old_path: &VaultPath,
        new_name: &str,
    ) -> MutateResult<MutationReport> {
        let parent = old_path
            .parent()
            .ok_or_else(|| MutateError::unsupported(old_path.clone(), "cannot rename the root"))?;
        let new_path = parent.join(new_name)?;

        match with_read_retry(|| self.store.get(old_path)).await {
            Ok(_) => {
                self.move_file(old_path, &new_path).await?;
                Ok(MutationReport::single())
            }
            Err(err) if matches!(err, vellum_store::StoreError::NotAFile(_)) => {
                self.move_tree(old_path, &new_path).await
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Remove an entry, dispatching to the file delete or the subtree
    /// delete by probing what the path currently is.
    pub async fn remove(&self, path: &VaultPath) -> MutateResult<MutationReport> {
        match with_read_retry(|| self.store.get(path)).await {
            Ok(_) => {
                self.delete_file(path).await?;
                Ok(MutationReport::single())
            }
            Err(err) if matches!(err, vellum_store::StoreError::NotAFile(_)) => {
                self.delete_tree(path).await
            }
            Err(err) => Err(err.into()),
        }
    }

    pub(crate) async fn apply_file_op(&self, op: &FileOp) -> MutateResult<()> {
        match op {
            FileOp::Move { from, to } => self.move_file(from, to).await,
            FileOp::Delete { path } => self.delete_file(path).await,
        }
    }
}

fn finish(report: MutationReport) -> MutateResult<MutationReport> {
    if report.is_clean() {
        Ok(report)
    } else {
        Err(MutateError::PartialFailure(report))
    }
}
