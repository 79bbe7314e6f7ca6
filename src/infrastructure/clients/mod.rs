pub mod analysis;
pub mod relay;

use crate::domain::outcome::UploadFailure;
use crate::domain::upload::UploadRequest;
use async_trait::async_trait;
use serde_json::Value;

pub use analysis::AnalysisServiceClient;
pub use relay::RelayClient;

/// Sends one selected file for analysis and hands back the decoded answer.
#[async_trait]
pub trait AnalyzeTransport: Send + Sync {
    async fn analyze(&self, request: &UploadRequest) -> Result<Value, UploadFailure>;
}
