use super::AnalyzeTransport;
use crate::domain::error::error_chain;
use crate::domain::outcome::UploadFailure;
use crate::domain::upload::{UploadRequest, FILE_FIELD};
use crate::infrastructure::config::UploaderConfig;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::debug;

/// Client side of `POST /api/analyze`.
pub struct RelayClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RelayClient {
    pub fn new(config: &UploaderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.relay_url.clone(),
        }
    }
}

#[async_trait]
impl AnalyzeTransport for RelayClient {
    async fn analyze(&self, request: &UploadRequest) -> Result<Value, UploadFailure> {
        let part = Part::bytes(request.bytes().to_vec())
            .file_name(request.file_name().to_string())
            .mime_str(request.content_type())
            .map_err(|e| UploadFailure::Transport(error_chain(&e)))?;
        let form = Form::new().part(FILE_FIELD, part);

        debug!(
            endpoint = %self.endpoint,
            file_name = request.file_name(),
            size = request.size(),
            "Posting file to relay"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadFailure::Transport(error_chain(&e)))?;

        if !response.status().is_success() {
            return Err(UploadFailure::Status(response.status().as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| UploadFailure::Decode(error_chain(&e)))
    }
}
