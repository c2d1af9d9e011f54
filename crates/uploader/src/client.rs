//! Paperless-ngx HTTP client

use crate::request::UploadRequest;
use crate::{Result, UploadError};
use paperlink_core::{Config, UPLOAD_TIMEOUT};
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, info};

/// Response of an accepted upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub status: u16,
    pub body: String,
}

/// Client for `POST /api/documents/post_document/`
#[derive(Debug, Clone)]
pub struct PaperlessClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PaperlessClient {
    pub fn new(base_url: &str, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("paperlink/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(UploadError::Client)?;

        Ok(Self {
            http,
            endpoint: format!("{}/api/documents/post_document/", base_url.trim_end_matches('/')),
            token: token.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.base_url, config.token.clone(), UPLOAD_TIMEOUT)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one document; any non-2xx status is an error
    pub async fn post_document(&self, request: &UploadRequest) -> Result<UploadOutcome> {
        let content = tokio::fs::read(&request.upload_path)
            .await
            .map_err(|source| UploadError::Read {
                path: request.upload_path.clone(),
                source,
            })?;
        let body_bytes = content.len();

        debug!(mime = %request.content_type, "document part mime type");
        let document = Part::bytes(content)
            .file_name(request.file_name())
            .mime_str(&request.content_type)
            .map_err(UploadError::Client)?;
        let form = Form::new()
            .part("document", document)
            .text("title", request.title.clone());

        debug!(
            endpoint = %self.endpoint,
            title = %request.title,
            body_bytes,
            "posting to paperless"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Token {}", self.token))
            .multipart(form)
            .send()
            .await
            .map_err(|source| UploadError::Transport {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        info!(status = status.as_u16(), body = %body, "paperless response");

        if !status.is_success() {
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(UploadOutcome {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = PaperlessClient::new("https://paperless.local/", "t", UPLOAD_TIMEOUT).unwrap();
        assert_eq!(client.endpoint(), "https://paperless.local/api/documents/post_document/");

        let client = PaperlessClient::new("http://10.0.0.5:8000", "t", UPLOAD_TIMEOUT).unwrap();
        assert_eq!(client.endpoint(), "http://10.0.0.5:8000/api/documents/post_document/");
    }
}
