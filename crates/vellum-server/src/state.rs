use std::sync::Arc;

use vellum_mutate::MutationEngine;
use vellum_store::ContentStore;

use crate::config::ServerConfig;

/// Shared handler state: the injected store capability, the engine built
/// over it, and the effective configuration.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ContentStore>,
    engine: MutationEngine,
    config: ServerConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn ContentStore>, config: ServerConfig) -> Self {
        let engine = MutationEngine::new(store.clone());
        Self {
            store,
            engine,
            config,
        }
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    pub fn engine(&self) -> &MutationEngine {
        &self.engine
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
