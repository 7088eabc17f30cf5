use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all Vellum endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/tree", get(handler::tree_handler))
        .route("/v1/file", get(handler::file_handler))
        .route("/v1/document", get(handler::document_handler))
        .route(
            "/v1/files",
            post(handler::create_handler).delete(handler::remove_handler),
        )
        .route("/v1/frontmatter", post(handler::frontmatter_handler))
        .route("/v1/rename", put(handler::rename_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
