//! HTTP surface for Vellum.
//!
//! A thin axum layer over the core crates: tree listing, document reads,
//! and the mutation endpoints, all running against one injected
//! [`ContentStore`] whose lifecycle is owned by the serving process — no
//! ambient clients.
//!
//! Error responses carry a `{kind, message, failed_paths?}` envelope;
//! partial failures of recursive operations map to `207 Multi-Status` so
//! callers can reconcile by re-listing.
//!
//! [`ContentStore`]: vellum_store::ContentStore

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorKind, ServerError, ServerResult};
pub use router::build_router;
pub use server::VellumServer;
pub use state::AppState;
