//! The remote-store capability for Vellum.
//!
//! Persistence lives in a remote, version-controlled blob store addressed
//! by path and content hash. This crate defines the one capability the rest
//! of the system consumes — [`ContentStore`] — together with its data types
//! and error taxonomy, and ships [`MemoryStore`], the in-memory reference
//! backend used for tests and embedding.
//!
//! # Key Types
//!
//! - [`ContentStore`] — get/list/put/delete with hash preconditions
//! - [`Blob`] — content bytes plus the hash they were read at
//! - [`ListEntry`] — one directory-listing row
//! - [`MemoryStore`] — BTreeMap-backed reference implementation
//! - [`with_read_retry`] — single-retry wrapper for idempotent reads

pub mod blob;
pub mod error;
pub mod memory;
pub mod retry;
pub mod traits;

pub use blob::{Blob, ListEntry};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use retry::with_read_retry;
pub use traits::ContentStore;
