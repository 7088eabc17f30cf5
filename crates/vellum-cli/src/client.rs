use anyhow::bail;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::json;
use vellum_mutate::MutationReport;
use vellum_server::handler::{DocumentResponse, FileResponse, HashResponse};
use vellum_server::ApiError;
use vellum_tree::Node;

/// Minimal client for the Vellum HTTP surface.
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    pub async fn tree(&self, path: Option<&str>) -> anyhow::Result<Node> {
        let mut request = self.http.get(format!("{}/v1/tree", self.base));
        if let Some(path) = path {
            request = request.query(&[("path", path)]);
        }
        Ok(send(request).await?.json().await?)
    }

    pub async fn file(&self, path: &str) -> anyhow::Result<FileResponse> {
        let request = self
            .http
            .get(format!("{}/v1/file", self.base))
            .query(&[("path", path)]);
        Ok(send(request).await?.json().await?)
    }

    pub async fn document(&self, path: &str) -> anyhow::Result<DocumentResponse> {
        let request = self
            .http
            .get(format!("{}/v1/document", self.base))
            .query(&[("path", path)]);
        Ok(send(request).await?.json().await?)
    }

    pub async fn create(
        &self,
        path: &str,
        content: Option<String>,
        as_folder: bool,
    ) -> anyhow::Result<HashResponse> {
        let request = self
            .http
            .post(format!("{}/v1/files", self.base))
            .json(&json!({ "path": path, "content": content, "as_folder": as_folder }));
        Ok(send(request).await?.json().await?)
    }

    pub async fn rename(&self, old_path: &str, new_name: &str) -> anyhow::Result<MutationReport> {
        let request = self
            .http
            .put(format!("{}/v1/rename", self.base))
            .json(&json!({ "old_path": old_path, "new_name": new_name }));
        Ok(send(request).await?.json().await?)
    }

    pub async fn remove(&self, path: &str) -> anyhow::Result<MutationReport> {
        let request = self
            .http
            .delete(format!("{}/v1/files", self.base))
            .json(&json!({ "path": path }));
        Ok(send(request).await?.json().await?)
    }
}

/// Issue the request and surface the server's error envelope as a readable
/// failure. `207 Multi-Status` carries the envelope too — a recursive
/// operation that lost some descendants is an error at the command line.
async fn send(request: RequestBuilder) -> anyhow::Result<Response> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() && status != StatusCode::MULTI_STATUS {
        return Ok(response);
    }
    match response.json::<ApiError>().await {
        Ok(envelope) => {
            let mut message = format!("{:?}: {}", envelope.kind, envelope.message);
            if let Some(paths) = envelope.failed_paths {
                let paths: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
                message.push_str(&format!(" (failed: {})", paths.join(", ")));
            }
            bail!(message)
        }
        Err(_) => bail!("server returned {status}"),
    }
}
