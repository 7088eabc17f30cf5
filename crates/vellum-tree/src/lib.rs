//! Tree walker for Vellum.
//!
//! Recursively lists a vault path into a fully materialized [`Node`] graph
//! mirroring the remote namespace. Nodes are transient projections rebuilt
//! on every walk — the remote store stays the sole source of truth.
//!
//! # Key Types
//!
//! - [`Node`] / [`NodeKind`] — virtual filesystem element
//! - [`list_tree`] — recursive walk, one store round-trip per directory
//! - [`collect_files`] / [`collect_opaque`] — pre-order leaf enumeration

pub mod error;
pub mod node;
pub mod walker;

pub use error::{TreeError, TreeResult};
pub use node::{Node, NodeKind};
pub use walker::{collect_files, collect_opaque, list_tree};
