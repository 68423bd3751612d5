use crate::error::{AcquisitionError, Result};
use crate::source::ModelSource;
use async_trait::async_trait;
use common::ModelId;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use std::path::Path;
use tokio::io::AsyncWriteExt;

pub const HUGGINGFACE_BASE: &str = "https://huggingface.co";

const PROVIDER: &str = "model hub";

/// Downloads published `.pt` checkpoints from a HuggingFace-style hub.
///
/// Files are fetched from `{base_url}/{repo}/resolve/main/{model}.pt`.
/// Published checkpoints already hold CPU tensors, so the bytes are stored
/// as received.
pub struct HubSource {
    client: Client,
    base_url: String,
    repo: String,
    auth_token: Option<String>,
}

impl HubSource {
    pub fn new(repo: impl Into<String>) -> Result<Self> {
        let repo = repo.into();
        if !Self::is_valid_repo_id(&repo) {
            return Err(AcquisitionError::InvalidSource(format!(
                "Invalid repo_id format: '{}'. Expected 'owner/repo'",
                repo
            )));
        }

        let client = Client::builder()
            .user_agent(concat!("forge-model-cache/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        // Priority: explicit token (set later) > ENV variable
        let auth_token = std::env::var("HF_TOKEN")
            .or_else(|_| std::env::var("HUGGINGFACE_TOKEN"))
            .ok()
            .filter(|token| !token.is_empty());

        Ok(Self {
            client,
            base_url: HUGGINGFACE_BASE.to_string(),
            repo,
            auth_token,
        })
    }

    /// Point at a different hub (mirrors, local test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn url_for(&self, model: &ModelId) -> String {
        format!("{}/{}/resolve/main/{}.pt", self.base_url, self.repo, model)
    }

    /// Validate repo_id format (owner/repo)
    fn is_valid_repo_id(repo_id: &str) -> bool {
        let parts: Vec<&str> = repo_id.split('/').collect();

        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            return false;
        }

        if repo_id.contains("..") {
            return false;
        }

        repo_id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '/')
    }
}

#[async_trait]
impl ModelSource for HubSource {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(&self, model: &ModelId, destination: &Path) -> Result<()> {
        let url = self.url_for(model);
        log::info!("Downloading {} from {}", model, url);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.auth_token {
            log::debug!("Using hub token for authentication");
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                AcquisitionError::ProviderUnreachable {
                    provider: PROVIDER,
                    detail: e.to_string(),
                }
            } else {
                AcquisitionError::Network(e)
            }
        })?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(AcquisitionError::UnknownModel {
                    model: model.clone(),
                    provider: PROVIDER,
                    detail: format!("HTTP 404 for {}", url),
                });
            }
            status => {
                return Err(AcquisitionError::ProviderFailed {
                    model: model.clone(),
                    provider: PROVIDER,
                    detail: format!("HTTP {} for {}", status, url),
                });
            }
        }

        let mut file = tokio::fs::File::create(destination).await?;
        let mut downloaded = 0u64;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
        }
        file.flush().await?;

        log::info!("Downloaded {} ({} bytes)", model, downloaded);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_id_validation() {
        assert!(HubSource::is_valid_repo_id("Ultralytics/YOLOv8"));
        assert!(HubSource::is_valid_repo_id("owner/repo.name"));
        assert!(!HubSource::is_valid_repo_id("no-owner"));
        assert!(!HubSource::is_valid_repo_id("a/b/c"));
        assert!(!HubSource::is_valid_repo_id("/repo"));
        assert!(!HubSource::is_valid_repo_id("owner/.."));
        assert!(HubSource::new("bad repo").is_err());
    }

    #[test]
    fn test_url_for() {
        let source = HubSource::new("Ultralytics/YOLOv8")
            .unwrap()
            .with_base_url("http://127.0.0.1:9000/");
        let model = ModelId::new("yolov8n").unwrap();
        assert_eq!(
            source.url_for(&model),
            "http://127.0.0.1:9000/Ultralytics/YOLOv8/resolve/main/yolov8n.pt"
        );
    }
}
