use std::fmt;

use serde_json::Value;

/// The only failure text a user ever sees.
pub const GENERIC_FAILURE_MESSAGE: &str = "Upload failed. Please try again.";

/// Why a client-side upload attempt failed. Kept for logs; never shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadFailure {
    /// The request never produced a response (connection refused, reset, ...).
    Transport(String),
    /// The relay answered with a non-success status.
    Status(u16),
    /// The relay's success body was not valid JSON.
    Decode(String),
}

impl fmt::Display for UploadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadFailure::Transport(msg) => write!(f, "transport failure: {}", msg),
            UploadFailure::Status(code) => write!(f, "relay responded with status {}", code),
            UploadFailure::Decode(msg) => write!(f, "invalid response body: {}", msg),
        }
    }
}

impl std::error::Error for UploadFailure {}

/// An upload was refused locally, before any request was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientValidationError {
    NoFileSelected,
    UploadInProgress,
}

impl fmt::Display for ClientValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientValidationError::NoFileSelected => write!(f, "no file selected"),
            ClientValidationError::UploadInProgress => write!(f, "an upload is already running"),
        }
    }
}

impl std::error::Error for ClientValidationError {}

/// Result of one upload attempt, held until the next attempt replaces it.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Success(Value),
    Failure(UploadFailure),
}

impl AnalysisOutcome {
    pub fn from_result(result: std::result::Result<Value, UploadFailure>) -> Self {
        match result {
            Ok(payload) => AnalysisOutcome::Success(payload),
            Err(failure) => AnalysisOutcome::Failure(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Success(_))
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            AnalysisOutcome::Success(payload) => Some(payload),
            AnalysisOutcome::Failure(_) => None,
        }
    }

    /// User-facing error text, `None` on success.
    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            AnalysisOutcome::Success(_) => None,
            AnalysisOutcome::Failure(_) => Some(GENERIC_FAILURE_MESSAGE),
        }
    }

    /// Text shown for this outcome: indented JSON on success, the fixed
    /// message on any failure.
    pub fn render(&self) -> String {
        match self {
            AnalysisOutcome::Success(payload) => {
                serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
            }
            AnalysisOutcome::Failure(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}
