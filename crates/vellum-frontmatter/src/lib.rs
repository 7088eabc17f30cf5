//! Frontmatter codec for Vellum documents.
//!
//! A document is a structured header (an ordered map of string keys to
//! scalar-or-list values, delimited by `---` lines) followed by opaque body
//! text. This crate defines the [`Document`] model and the
//! [`parse`]/[`serialize`] pair with its round-trip contract.
//!
//! Parsing is total: input without a well-formed header block is a document
//! with empty frontmatter and the whole input as body, never an error.
//!
//! # Key Types
//!
//! - [`Document`] — frontmatter plus body
//! - [`Frontmatter`] — insertion-ordered key/value map
//! - [`FieldValue`] — tagged scalar-or-list variant

pub mod codec;
pub mod document;

pub use codec::{parse, serialize};
pub use document::{Document, FieldValue, Frontmatter};
