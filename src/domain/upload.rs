use std::path::Path;

use crate::domain::error::{AppError, Result};

/// Multipart field name the file travels under, on both hops.
pub const FILE_FIELD: &str = "file";

/// Content type every forwarded part carries, whatever the file declared.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Extension filter handed to file pickers. Advisory only.
pub const ACCEPTED_EXTENSION: &str = ".csv";

/// A file chosen by the user, waiting to be sent for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    file_name: String,
    bytes: Vec<u8>,
}

impl UploadRequest {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk, naming the request after the path's final component.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| {
                AppError::ValidationError(format!("Not a file path: {}", path.display()))
            })?;
        let bytes = tokio::fs::read(path).await?;
        Ok(Self { file_name, bytes })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn content_type(&self) -> &'static str {
        CSV_CONTENT_TYPE
    }

    pub fn formatted_size(&self) -> String {
        format_file_size(self.size())
    }
}

/// Formats a byte count as `B`, `KB` or `MB` with one decimal place above bytes.
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1_048_576 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    }
}
