use serde::{Deserialize, Serialize};
use vellum_types::{ContentHash, VaultPath};

/// A virtual filesystem element derived from the remote store's listing.
///
/// Invariants: a child's path is its parent's path plus `/` plus its name;
/// sibling names are unique; only directories carry children. Opaque nodes
/// (symlink- and submodule-like entries) are leaves that the walker never
/// descends into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub path: VaultPath,
    #[serde(flatten)]
    pub kind: NodeKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    File {
        /// Listing-time hash, when the backend supplies one. Mutations
        /// never rely on it — they re-read for a fresh precondition.
        hash: Option<ContentHash>,
    },
    Directory {
        children: Vec<Node>,
    },
    Opaque,
}

impl Node {
    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    /// The node's children; empty for files and opaque leaves.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Directory { children } => children,
            _ => &[],
        }
    }

    /// Total number of file leaves in this subtree.
    pub fn file_count(&self) -> usize {
        match &self.kind {
            NodeKind::File { .. } => 1,
            NodeKind::Directory { children } => children.iter().map(Node::file_count).sum(),
            NodeKind::Opaque => 0,
        }
    }
}
