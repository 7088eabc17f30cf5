use async_trait::async_trait;
use vellum_types::{ContentHash, VaultPath};

use crate::blob::{Blob, ListEntry};
use crate::error::StoreResult;

/// The remote blob-store capability.
///
/// All implementations must satisfy these invariants:
/// - The store is the sole owner of persisted state; everything built on a
///   read is a transient projection.
/// - Hashes are opaque version tokens that change deterministically with
///   content. A write or delete presenting a stale hash fails `Conflict`
///   and leaves the stored content untouched.
/// - Directories are not first-class. They exist exactly while at least one
///   blob carries their path as a prefix, and they never have a hash.
/// - All operations are single-shot request/response. Network failures
///   surface as `Transient`, distinct from the semantic kinds.
///
/// Instances are constructed explicitly and passed in (no ambient client);
/// the serving process owns the lifecycle.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Read the blob at `path`, returning its content and current hash.
    ///
    /// Fails `NotFound` if the path is absent and `NotAFile` if it names a
    /// directory.
    async fn get(&self, path: &VaultPath) -> StoreResult<Blob>;

    /// List the entries directly under `path`, in the store's native order.
    ///
    /// The reference backend lists lexically by name; callers inherit
    /// whatever order their backend produces. Fails `NotADirectory` if
    /// `path` names a file.
    async fn list(&self, path: &VaultPath) -> StoreResult<Vec<ListEntry>>;

    /// Write `content` at `path` and return the new hash.
    ///
    /// With `expected` set, the write succeeds only while the stored hash
    /// still equals it (`Conflict` otherwise, `NotFound` if the path has
    /// vanished). Without `expected` this is create-or-replace: the store
    /// does NOT enforce create-only semantics, so callers that need them
    /// must first `get` and check `NotFound`.
    async fn put(
        &self,
        path: &VaultPath,
        content: Vec<u8>,
        expected: Option<&ContentHash>,
    ) -> StoreResult<ContentHash>;

    /// Delete the blob at `path`. The hash precondition is mandatory:
    /// deletion is always authorized by the version the caller read.
    async fn delete(&self, path: &VaultPath, expected: &ContentHash) -> StoreResult<()>;
}
