use serde::{Deserialize, Serialize};

/// Classification of a listed vault entry.
///
/// The remote store has no first-class directories: a `Directory` entry
/// exists exactly while at least one blob carries its path as a prefix.
/// `Opaque` covers symlink- and submodule-like entries the store may list;
/// they are surfaced as leaves and never descended into or mutated
/// recursively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
    Opaque,
}

impl EntryKind {
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory)
    }
}
