use std::sync::Arc;

use tokio::net::TcpListener;
use vellum_store::ContentStore;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// The Vellum document-vault server.
///
/// Owns the injected store capability for the lifetime of the serving
/// process.
pub struct VellumServer {
    config: ServerConfig,
    state: AppState,
}

impl VellumServer {
    pub fn new(store: Arc<dyn ContentStore>, config: ServerConfig) -> Self {
        let state = AppState::new(store, config.clone());
        Self { config, state }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing without binding a socket).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("vellum server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
