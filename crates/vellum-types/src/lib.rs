//! Foundation types for Vellum.
//!
//! This crate provides the core identifier and path types used throughout
//! the Vellum document vault. Every other Vellum crate depends on
//! `vellum-types`.
//!
//! # Key Types
//!
//! - [`ContentHash`] — Opaque content-version token (BLAKE3 hash)
//! - [`VaultPath`] — Validated, '/'-separated path inside the vault
//! - [`EntryKind`] — File / Directory / Opaque classification

pub mod entry;
pub mod error;
pub mod hash;
pub mod path;

pub use entry::EntryKind;
pub use error::TypeError;
pub use hash::ContentHash;
pub use path::VaultPath;
