use crate::domain::error::RelayError;
use crate::domain::upload::{CSV_CONTENT_TYPE, FILE_FIELD};
use crate::infrastructure::config::RelayConfig;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, warn};

/// Relay side of the downstream `upload-dataset` call.
///
/// Holds the shared `reqwest::Client`. Requests run with the client's
/// default settings: no retry and no timeout.
pub struct AnalysisServiceClient {
    client: reqwest::Client,
    upload_url: String,
}

impl AnalysisServiceClient {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url: config.downstream_upload_url(),
        }
    }

    /// Re-packages the file as a fresh single-part form tagged `text/csv`
    /// and returns the decoded JSON answer.
    pub async fn upload_dataset(&self, file_name: &str, bytes: Vec<u8>) -> Result<Value, RelayError> {
        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(CSV_CONTENT_TYPE)
            .map_err(RelayError::transport)?;
        let form = Form::new().part(FILE_FIELD, part);

        debug!(url = %self.upload_url, file_name, size, "Forwarding dataset");

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(RelayError::transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(%status, body = %text, "Analysis service rejected dataset");
            return Err(RelayError::Downstream);
        }

        let body = response.text().await.map_err(RelayError::transport)?;
        serde_json::from_str(&body).map_err(RelayError::transport)
    }
}
