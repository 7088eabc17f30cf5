use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use vellum_types::{ContentHash, EntryKind, VaultPath};

use crate::blob::{Blob, ListEntry};
use crate::error::{StoreError, StoreResult};
use crate::traits::ContentStore;

/// In-memory, BTreeMap-based content store.
///
/// Intended for tests and embedding. Blobs are held in memory behind a
/// `RwLock`; directories are derived from blob-path prefixes exactly as the
/// trait contract describes, so the backend doubles as the reference
/// implementation of the directory convention. Listing order is lexical by
/// name (BTreeMap iteration order).
pub struct MemoryStore {
    blobs: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// All blob paths, in lexical order.
    pub fn paths(&self) -> Vec<String> {
        self.blobs
            .read()
            .expect("lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Remove every blob.
    pub fn clear(&self) {
        self.blobs.write().expect("lock poisoned").clear();
    }

    fn child_prefix(path: &VaultPath) -> String {
        if path.is_root() {
            String::new()
        } else {
            format!("{}/", path.as_str())
        }
    }

    fn has_children(map: &BTreeMap<String, Vec<u8>>, path: &VaultPath) -> bool {
        let prefix = Self::child_prefix(path);
        map.range(prefix.clone()..)
            .next()
            .is_some_and(|(key, _)| key.starts_with(&prefix))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn get(&self, path: &VaultPath) -> StoreResult<Blob> {
        if path.is_root() {
            return Err(StoreError::NotAFile(path.clone()));
        }
        let map = self.blobs.read().expect("lock poisoned");
        match map.get(path.as_str()) {
            Some(content) => Ok(Blob {
                path: path.clone(),
                content: content.clone(),
                hash: ContentHash::of(content),
            }),
            None if Self::has_children(&map, path) => Err(StoreError::NotAFile(path.clone())),
            None => Err(StoreError::NotFound(path.clone())),
        }
    }

    async fn list(&self, path: &VaultPath) -> StoreResult<Vec<ListEntry>> {
        let map = self.blobs.read().expect("lock poisoned");
        if !path.is_root() && map.contains_key(path.as_str()) {
            return Err(StoreError::NotADirectory(path.clone()));
        }
        let prefix = Self::child_prefix(path);

        // One entry per distinct first segment below the prefix; files carry
        // their content hash, derived directories carry none.
        let mut entries: BTreeMap<String, ListEntry> = BTreeMap::new();
        for (key, content) in map.range(prefix.clone()..) {
            if !key.starts_with(&prefix) {
                break;
            }
            let remainder = &key[prefix.len()..];
            let (name, is_file) = match remainder.split_once('/') {
                Some((first, _)) => (first, false),
                None => (remainder, true),
            };
            if entries.contains_key(name) {
                continue;
            }
            let entry_path = path.join(name)?;
            entries.insert(
                name.to_string(),
                if is_file {
                    ListEntry {
                        name: name.to_string(),
                        path: entry_path,
                        kind: EntryKind::File,
                        hash: Some(ContentHash::of(content)),
                    }
                } else {
                    ListEntry {
                        name: name.to_string(),
                        path: entry_path,
                        kind: EntryKind::Directory,
                        hash: None,
                    }
                },
            );
        }

        if entries.is_empty() && !path.is_root() {
            return Err(StoreError::NotFound(path.clone()));
        }
        Ok(entries.into_values().collect())
    }

    async fn put(
        &self,
        path: &VaultPath,
        content: Vec<u8>,
        expected: Option<&ContentHash>,
    ) -> StoreResult<ContentHash> {
        if path.is_root() {
            return Err(StoreError::NotAFile(path.clone()));
        }
        let mut map = self.blobs.write().expect("lock poisoned");
        if Self::has_children(&map, path) {
            return Err(StoreError::NotAFile(path.clone()));
        }
        // A blob at any ancestor would make `path` a file's child.
        let mut ancestor = path.parent();
        while let Some(dir) = ancestor {
            if !dir.is_root() && map.contains_key(dir.as_str()) {
                return Err(StoreError::NotADirectory(dir));
            }
            ancestor = dir.parent();
        }
        if let Some(expected) = expected {
            match map.get(path.as_str()) {
                None => return Err(StoreError::NotFound(path.clone())),
                Some(current) => {
                    let actual = ContentHash::of(current);
                    if actual != *expected {
                        return Err(StoreError::Conflict {
                            path: path.clone(),
                            expected: *expected,
                            actual,
                        });
                    }
                }
            }
        }
        let hash = ContentHash::of(&content);
        map.insert(path.as_str().to_string(), content);
        Ok(hash)
    }

    async fn delete(&self, path: &VaultPath, expected: &ContentHash) -> StoreResult<()> {
        if path.is_root() {
            return Err(StoreError::NotAFile(path.clone()));
        }
        let mut map = self.blobs.write().expect("lock poisoned");
        match map.get(path.as_str()) {
            None if Self::has_children(&map, path) => Err(StoreError::NotAFile(path.clone())),
            None => Err(StoreError::NotFound(path.clone())),
            Some(current) => {
                let actual = ContentHash::of(current);
                if actual != *expected {
                    return Err(StoreError::Conflict {
                        path: path.clone(),
                        expected: *expected,
                        actual,
                    });
                }
                map.remove(path.as_str());
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("blob_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> VaultPath {
        VaultPath::new(s).unwrap()
    }

    async fn seeded(entries: &[(&str, &str)]) -> MemoryStore {
        let store = MemoryStore::new();
        for (path, content) in entries {
            store
                .put(&p(path), content.as_bytes().to_vec(), None)
                .await
                .unwrap();
        }
        store
    }

    // -----------------------------------------------------------------------
    // Get
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn get_returns_content_and_hash() {
        let store = seeded(&[("a.md", "hello")]).await;
        let blob = store.get(&p("a.md")).await.unwrap();
        assert_eq!(blob.content, b"hello");
        assert_eq!(blob.hash, ContentHash::of(b"hello"));
        assert_eq!(blob.path, p("a.md"));
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get(&p("nope.md")).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn get_directory_is_not_a_file() {
        let store = seeded(&[("dir/a.md", "x")]).await;
        assert!(matches!(
            store.get(&p("dir")).await.unwrap_err(),
            StoreError::NotAFile(_)
        ));
    }

    #[tokio::test]
    async fn get_root_is_not_a_file() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get(&VaultPath::root()).await.unwrap_err(),
            StoreError::NotAFile(_)
        ));
    }

    // -----------------------------------------------------------------------
    // Put
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn put_without_precondition_is_create_or_replace() {
        let store = MemoryStore::new();
        let h1 = store.put(&p("a.md"), b"one".to_vec(), None).await.unwrap();
        let h2 = store.put(&p("a.md"), b"two".to_vec(), None).await.unwrap();
        assert_ne!(h1, h2);
        assert_eq!(store.get(&p("a.md")).await.unwrap().content, b"two");
    }

    #[tokio::test]
    async fn put_same_content_twice_is_idempotent() {
        let store = MemoryStore::new();
        let h1 = store.put(&p("a.md"), b"same".to_vec(), None).await.unwrap();
        let h2 = store.put(&p("a.md"), b"same".to_vec(), None).await.unwrap();
        assert_eq!(h1, h2);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn put_with_matching_precondition_succeeds() {
        let store = seeded(&[("a.md", "old")]).await;
        let current = store.get(&p("a.md")).await.unwrap().hash;
        store
            .put(&p("a.md"), b"new".to_vec(), Some(&current))
            .await
            .unwrap();
        assert_eq!(store.get(&p("a.md")).await.unwrap().content, b"new");
    }

    #[tokio::test]
    async fn put_with_stale_precondition_conflicts_and_preserves_content() {
        let store = seeded(&[("a.md", "current")]).await;
        let stale = ContentHash::of(b"something else");
        let err = store
            .put(&p("a.md"), b"clobber".to_vec(), Some(&stale))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
        // Stored content must be untouched after a conflict.
        assert_eq!(store.get(&p("a.md")).await.unwrap().content, b"current");
    }

    #[tokio::test]
    async fn put_with_precondition_on_missing_path_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .put(&p("gone.md"), b"x".to_vec(), Some(&ContentHash::of(b"y")))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn put_onto_directory_path_is_rejected() {
        let store = seeded(&[("dir/a.md", "x")]).await;
        assert!(matches!(
            store.put(&p("dir"), b"y".to_vec(), None).await.unwrap_err(),
            StoreError::NotAFile(_)
        ));
    }

    #[tokio::test]
    async fn put_under_file_path_is_rejected() {
        let store = seeded(&[("file.md", "x")]).await;
        assert!(matches!(
            store
                .put(&p("file.md/child.md"), b"y".to_vec(), None)
                .await
                .unwrap_err(),
            StoreError::NotADirectory(_)
        ));
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn delete_with_matching_hash_removes_blob() {
        let store = seeded(&[("a.md", "x")]).await;
        let hash = store.get(&p("a.md")).await.unwrap().hash;
        store.delete(&p("a.md"), &hash).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn delete_with_stale_hash_conflicts() {
        let store = seeded(&[("a.md", "x")]).await;
        let err = store
            .delete(&p("a.md"), &ContentHash::of(b"stale"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .delete(&p("gone.md"), &ContentHash::of(b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn directory_vanishes_when_last_blob_deleted() {
        let store = seeded(&[("dir/only.md", "x")]).await;
        let hash = store.get(&p("dir/only.md")).await.unwrap().hash;
        store.delete(&p("dir/only.md"), &hash).await.unwrap();
        assert!(matches!(
            store.list(&p("dir")).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    // -----------------------------------------------------------------------
    // List
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn list_root_of_empty_store() {
        let store = MemoryStore::new();
        assert!(store.list(&VaultPath::root()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_derives_directories_from_prefixes() {
        let store = seeded(&[("posts/a.md", "a"), ("posts/sub/b.md", "b"), ("top.md", "t")]).await;
        let entries = store.list(&VaultPath::root()).await.unwrap();
        let names: Vec<(&str, EntryKind)> = entries
            .iter()
            .map(|e| (e.name.as_str(), e.kind))
            .collect();
        assert_eq!(
            names,
            vec![("posts", EntryKind::Directory), ("top.md", EntryKind::File)]
        );

        let posts = store.list(&p("posts")).await.unwrap();
        let names: Vec<(&str, EntryKind)> = posts
            .iter()
            .map(|e| (e.name.as_str(), e.kind))
            .collect();
        assert_eq!(
            names,
            vec![("a.md", EntryKind::File), ("sub", EntryKind::Directory)]
        );
    }

    #[tokio::test]
    async fn list_is_lexical_by_name() {
        let store = seeded(&[("d/z.md", "z"), ("d/a.md", "a"), ("d/m.md", "m")]).await;
        let names: Vec<String> = store
            .list(&p("d"))
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["a.md", "m.md", "z.md"]);
    }

    #[tokio::test]
    async fn list_files_carry_hashes_directories_do_not() {
        let store = seeded(&[("d/a.md", "a"), ("d/sub/b.md", "b")]).await;
        let entries = store.list(&p("d")).await.unwrap();
        assert_eq!(entries[0].hash, Some(ContentHash::of(b"a")));
        assert_eq!(entries[1].hash, None);
    }

    #[tokio::test]
    async fn list_file_is_not_a_directory() {
        let store = seeded(&[("a.md", "x")]).await;
        assert!(matches!(
            store.list(&p("a.md")).await.unwrap_err(),
            StoreError::NotADirectory(_)
        ));
    }

    #[tokio::test]
    async fn list_missing_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.list(&p("nowhere")).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn sibling_prefix_does_not_leak() {
        // "ab/x" must not appear under a listing of "a".
        let store = seeded(&[("a/x.md", "1"), ("ab/y.md", "2")]).await;
        let names: Vec<String> = store
            .list(&p("a"))
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["x.md"]);
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn paths_and_clear() {
        let store = seeded(&[("b.md", "2"), ("a.md", "1")]).await;
        assert_eq!(store.paths(), vec!["a.md".to_string(), "b.md".to_string()]);
        store.clear();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn concurrent_reads_are_safe() {
        use std::sync::Arc;

        let store = Arc::new(seeded(&[("a.md", "shared")]).await);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    let blob = store.get(&p("a.md")).await.unwrap();
                    assert_eq!(blob.content, b"shared");
                })
            })
            .collect();
        for h in handles {
            h.await.unwrap();
        }
    }

    #[tokio::test]
    async fn debug_format() {
        let store = seeded(&[("a.md", "x")]).await;
        let debug = format!("{store:?}");
        assert!(debug.contains("MemoryStore"));
        assert!(debug.contains("blob_count"));
    }
}
