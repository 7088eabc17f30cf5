use serde::{Deserialize, Serialize};
use vellum_types::{ContentHash, EntryKind, VaultPath};

/// A blob read from the store: content bytes plus the hash they were read
/// at. The hash is the precondition token for a later update or delete of
/// the same path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    pub path: VaultPath,
    pub content: Vec<u8>,
    pub hash: ContentHash,
}

impl Blob {
    /// The content as UTF-8 text, if it is valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// One row of a directory listing.
///
/// `hash` is present for files only; directories are virtual (derived from
/// blob-path prefixes) and carry no version token of their own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    pub name: String,
    pub path: VaultPath,
    pub kind: EntryKind,
    pub hash: Option<ContentHash>,
}
