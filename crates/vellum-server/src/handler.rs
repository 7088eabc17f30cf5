use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use vellum_frontmatter::Frontmatter;
use vellum_mutate::MutationReport;
use vellum_session::EditSession;
use vellum_store::with_read_retry;
use vellum_tree::{list_tree, Node};
use vellum_types::{ContentHash, VaultPath};

use crate::error::{ApiError, ErrorKind};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TreeQuery {
    #[serde(default)]
    pub path: Option<VaultPath>,
}

/// `GET /v1/tree?path=` — the fully materialized subtree at `path`
/// (default: the vault root).
pub async fn tree_handler(
    State(state): State<AppState>,
    Query(query): Query<TreeQuery>,
) -> Result<Json<Node>, ApiError> {
    let root = query.path.unwrap_or_else(VaultPath::root);
    let node = list_tree(state.store().as_ref(), &root).await?;
    Ok(Json(node))
}

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub path: VaultPath,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FileResponse {
    pub content: String,
    pub hash: ContentHash,
}

/// `GET /v1/file?path=` — raw document text plus the hash to precondition
/// a later write on.
pub async fn file_handler(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> Result<Json<FileResponse>, ApiError> {
    let store = state.store();
    let blob = with_read_retry(|| store.get(&query.path)).await?;
    let content = blob
        .text()
        .ok_or_else(|| {
            ApiError::new(
                ErrorKind::UnsupportedOperation,
                format!("document at {} is not UTF-8 text", query.path),
            )
        })?
        .to_string();
    Ok(Json(FileResponse {
        content,
        hash: blob.hash,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub frontmatter: Frontmatter,
    pub body: String,
    pub hash: ContentHash,
}

/// `GET /v1/document?path=` — the document parsed into frontmatter + body,
/// the shape an editor binds to.
pub async fn document_handler(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let session = EditSession::open(state.engine().clone(), query.path).await?;
    Ok(Json(DocumentResponse {
        frontmatter: session.document().frontmatter.clone(),
        body: session.body().to_string(),
        hash: *session.hash(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub path: VaultPath,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub as_folder: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HashResponse {
    pub hash: ContentHash,
}

/// `POST /v1/files` — create a file (create-or-replace) or a folder via
/// its marker blob.
pub async fn create_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> Result<Json<HashResponse>, ApiError> {
    let content = req.content.unwrap_or_default().into_bytes();
    if content.len() > state.config().max_document_bytes {
        return Err(ApiError::new(
            ErrorKind::UnsupportedOperation,
            format!(
                "document exceeds the configured limit of {} bytes",
                state.config().max_document_bytes
            ),
        ));
    }
    let hash = state
        .engine()
        .create(&req.path, content, req.as_folder)
        .await?;
    Ok(Json(HashResponse { hash }))
}

#[derive(Debug, Deserialize)]
pub struct FrontmatterRequest {
    pub path: VaultPath,
    pub fields: Frontmatter,
}

/// `POST /v1/frontmatter` — replace a document's frontmatter wholesale,
/// keeping its body.
pub async fn frontmatter_handler(
    State(state): State<AppState>,
    Json(req): Json<FrontmatterRequest>,
) -> Result<Json<HashResponse>, ApiError> {
    let hash = state
        .engine()
        .update_frontmatter(&req.path, req.fields)
        .await?;
    Ok(Json(HashResponse { hash }))
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub old_path: VaultPath,
    pub new_name: String,
}

/// `PUT /v1/rename` — rename a file or a whole directory in place.
pub async fn rename_handler(
    State(state): State<AppState>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<MutationReport>, ApiError> {
    let report = state.engine().rename(&req.old_path, &req.new_name).await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    pub path: VaultPath,
}

/// `DELETE /v1/files` — delete a file or a whole directory.
pub async fn remove_handler(
    State(state): State<AppState>,
    Json(req): Json<RemoveRequest>,
) -> Result<Json<MutationReport>, ApiError> {
    let report = state.engine().remove(&req.path).await?;
    Ok(Json(report))
}

/// `GET /v1/health` — liveness.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "name": "vellum-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
