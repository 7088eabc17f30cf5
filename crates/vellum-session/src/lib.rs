//! Editing sessions for Vellum.
//!
//! An [`EditSession`] holds one open document — parsed frontmatter plus
//! body — together with the hash it was read at, mediates edits, and issues
//! save/rename/delete through the mutation engine. A conflicting save never
//! disturbs the session's view: the caller decides whether to `reload` and
//! re-apply or surface the conflict.

pub mod error;
pub mod session;

pub use error::{SessionError, SessionResult};
pub use session::EditSession;
