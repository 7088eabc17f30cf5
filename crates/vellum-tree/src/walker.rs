use std::future::Future;
use std::pin::Pin;

use vellum_store::{with_read_retry, ContentStore, StoreError};
use vellum_types::{EntryKind, VaultPath};

use crate::error::{TreeError, TreeResult};
use crate::node::{Node, NodeKind};

/// Recursively list `root` into a fully materialized tree.
///
/// Every directory entry is descended before the call returns; child order
/// follows the store's listing order. Each directory is one independent
/// store round-trip, retried once on transient failure. Opaque entries
/// (symlink/submodule-like) become leaves and are never descended — the
/// guard against listing cycles. A file at `root` is `ExpectedDirectory`.
pub async fn list_tree(store: &dyn ContentStore, root: &VaultPath) -> TreeResult<Node> {
    let children = walk(store, root.clone()).await?;
    tracing::debug!(path = %root, "materialized tree");
    Ok(Node {
        name: root.name().unwrap_or_default().to_string(),
        path: root.clone(),
        kind: NodeKind::Directory { children },
    })
}

fn walk<'a>(
    store: &'a dyn ContentStore,
    path: VaultPath,
) -> Pin<Box<dyn Future<Output = TreeResult<Vec<Node>>> + Send + 'a>> {
    Box::pin(async move {
        let entries = with_read_retry(|| store.list(&path)).await.map_err(|err| {
            match err {
                StoreError::NotADirectory(p) => TreeError::ExpectedDirectory(p),
                other => TreeError::Store(other),
            }
        })?;

        let mut children = Vec::with_capacity(entries.len());
        for entry in entries {
            let kind = match entry.kind {
                EntryKind::File => NodeKind::File { hash: entry.hash },
                EntryKind::Directory => NodeKind::Directory {
                    children: walk(store, entry.path.clone()).await?,
                },
                EntryKind::Opaque => NodeKind::Opaque,
            };
            children.push(Node {
                name: entry.name,
                path: entry.path,
                kind,
            });
        }
        Ok(children)
    })
}

/// Pre-order enumeration of the file leaves in a subtree.
///
/// This is the per-descendant work list for recursive mutations: the full
/// listing is always complete before any of the returned paths is touched.
pub fn collect_files(node: &Node) -> Vec<VaultPath> {
    let mut files = Vec::new();
    collect(node, &mut files, |kind| matches!(kind, NodeKind::File { .. }));
    files
}

/// Pre-order enumeration of the opaque leaves in a subtree.
pub fn collect_opaque(node: &Node) -> Vec<VaultPath> {
    let mut opaque = Vec::new();
    collect(node, &mut opaque, |kind| matches!(kind, NodeKind::Opaque));
    opaque
}

fn collect(node: &Node, out: &mut Vec<VaultPath>, wanted: fn(&NodeKind) -> bool) {
    if wanted(&node.kind) {
        out.push(node.path.clone());
    }
    for child in node.children() {
        collect(child, out, wanted);
    }
}
