use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use vellum_mutate::MutateError;
use vellum_session::SessionError;
use vellum_store::StoreError;
use vellum_tree::TreeError;
use vellum_types::VaultPath;

/// Process-level server errors (startup, config, bind).
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("internal: {0}")]
    Internal(String),
}

/// Result alias for server lifecycle operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Wire-visible error kinds, one per row of the taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidPath,
    UnsupportedOperation,
    PartialFailure,
    Transient,
    Internal,
}

/// The error envelope every failing endpoint returns.
///
/// `failed_paths` is present exactly for partial failures, naming which
/// descendants of a recursive operation failed so the caller can reconcile
/// by re-listing the tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_paths: Option<Vec<VaultPath>>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            failed_paths: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::InvalidPath | ErrorKind::UnsupportedOperation => StatusCode::BAD_REQUEST,
            ErrorKind::PartialFailure => StatusCode::MULTI_STATUS,
            ErrorKind::Transient => StatusCode::BAD_GATEWAY,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let kind = match &err {
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::Conflict { .. } => ErrorKind::Conflict,
            StoreError::NotAFile(_) | StoreError::NotADirectory(_) => {
                ErrorKind::UnsupportedOperation
            }
            StoreError::InvalidPath(_) => ErrorKind::InvalidPath,
            StoreError::Transient { .. } => ErrorKind::Transient,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<TreeError> for ApiError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::ExpectedDirectory(_) => {
                Self::new(ErrorKind::UnsupportedOperation, err.to_string())
            }
            TreeError::Store(inner) => inner.into(),
        }
    }
}

impl From<MutateError> for ApiError {
    fn from(err: MutateError) -> Self {
        match err {
            MutateError::Store(inner) => inner.into(),
            MutateError::Tree(inner) => inner.into(),
            MutateError::InvalidPath(inner) => Self::new(ErrorKind::InvalidPath, inner.to_string()),
            MutateError::Unsupported { .. } => {
                Self::new(ErrorKind::UnsupportedOperation, err.to_string())
            }
            MutateError::PartialFailure(report) => Self {
                kind: ErrorKind::PartialFailure,
                message: report.to_string(),
                failed_paths: Some(report.failed_paths()),
            },
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotText(_) => Self::new(ErrorKind::UnsupportedOperation, err.to_string()),
            SessionError::Store(inner) => inner.into(),
            SessionError::Mutate(inner) => inner.into(),
        }
    }
}
