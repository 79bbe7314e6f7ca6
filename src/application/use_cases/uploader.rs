// ============================================================
// UPLOADER USE CASE
// ============================================================
// Client-side state for picking a CSV, sending it, and showing the answer

use crate::domain::outcome::{AnalysisOutcome, ClientValidationError, UploadFailure};
use crate::domain::upload::{UploadRequest, ACCEPTED_EXTENSION};
use crate::infrastructure::clients::AnalyzeTransport;
use serde_json::Value;
use tracing::{info, warn};

pub const UPLOAD_LABEL: &str = "Upload & Analyze";
pub const PROCESSING_LABEL: &str = "Processing...";

/// Name and human-readable size of the selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: String,
}

/// Everything a front end needs to draw the uploader.
#[derive(Debug, Clone, PartialEq)]
pub struct UploaderView {
    /// Extension filter for the file picker.
    pub accept: &'static str,
    pub file: Option<FileInfo>,
    pub button_label: &'static str,
    pub button_enabled: bool,
    pub is_drag_over: bool,
    pub result: Option<String>,
    pub error: Option<&'static str>,
}

/// One uploader widget. Holds at most one selected file and at most one
/// outcome; only one upload runs at a time.
pub struct Uploader<T: AnalyzeTransport> {
    transport: T,
    selected_file: Option<UploadRequest>,
    outcome: Option<AnalysisOutcome>,
    is_uploading: bool,
    is_drag_over: bool,
}

impl<T: AnalyzeTransport> Uploader<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            selected_file: None,
            outcome: None,
            is_uploading: false,
            is_drag_over: false,
        }
    }

    pub fn selected_file(&self) -> Option<&UploadRequest> {
        self.selected_file.as_ref()
    }

    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        self.is_uploading
    }

    pub fn is_drag_over(&self) -> bool {
        self.is_drag_over
    }

    /// Replaces the selection and clears the previous outcome. No
    /// extension, type or size checks happen here.
    pub fn select(&mut self, file: UploadRequest) {
        self.selected_file = Some(file);
        self.reset_results();
    }

    /// Takes the first file a picker returned. A cancelled picker leaves
    /// everything as it was.
    pub fn select_from_picker(&mut self, files: Vec<UploadRequest>) {
        if let Some(file) = files.into_iter().next() {
            self.select(file);
        }
    }

    pub fn drag_over(&mut self) {
        self.is_drag_over = true;
    }

    pub fn drag_leave(&mut self) {
        self.is_drag_over = false;
    }

    pub fn drop_files(&mut self, files: Vec<UploadRequest>) {
        self.is_drag_over = false;
        if let Some(file) = files.into_iter().next() {
            self.select(file);
        }
    }

    /// Sends the selected file and records the outcome.
    ///
    /// Without a selection, or while another upload is running, nothing is
    /// sent and the state stays as it was.
    pub async fn upload(&mut self) -> Result<&AnalysisOutcome, ClientValidationError> {
        let request = self.begin_upload()?;
        let result = {
            // Clears the busy flag even if this future is dropped mid-request.
            let _busy = BusyGuard(&mut self.is_uploading);
            self.transport.analyze(&request).await
        };
        Ok(self.finish_upload(result))
    }

    /// Enters the busy state and returns a copy of the file to send. For
    /// front ends that drive the request on their own task; pair with
    /// [`Uploader::finish_upload`].
    pub fn begin_upload(&mut self) -> Result<UploadRequest, ClientValidationError> {
        if self.is_uploading {
            return Err(ClientValidationError::UploadInProgress);
        }
        let request = self
            .selected_file
            .clone()
            .ok_or(ClientValidationError::NoFileSelected)?;

        info!(
            file_name = request.file_name(),
            size = request.size(),
            "Uploading file for analysis"
        );
        self.is_uploading = true;
        Ok(request)
    }

    /// Leaves the busy state, whatever the result was.
    pub fn finish_upload(&mut self, result: Result<Value, UploadFailure>) -> &AnalysisOutcome {
        self.is_uploading = false;
        if let Err(failure) = &result {
            warn!(error = %failure, "Upload failed");
        }
        self.outcome.insert(AnalysisOutcome::from_result(result))
    }

    pub fn render(&self) -> Option<String> {
        self.outcome.as_ref().map(AnalysisOutcome::render)
    }

    pub fn view(&self) -> UploaderView {
        let (result, error) = match &self.outcome {
            Some(outcome) if outcome.is_success() => (Some(outcome.render()), None),
            Some(outcome) => (None, outcome.error_message()),
            None => (None, None),
        };
        UploaderView {
            accept: ACCEPTED_EXTENSION,
            file: self.selected_file.as_ref().map(|file| FileInfo {
                name: file.file_name().to_string(),
                size: file.formatted_size(),
            }),
            button_label: if self.is_uploading {
                PROCESSING_LABEL
            } else {
                UPLOAD_LABEL
            },
            button_enabled: !self.is_uploading,
            is_drag_over: self.is_drag_over,
            result,
            error,
        }
    }

    fn reset_results(&mut self) {
        self.outcome = None;
    }
}

struct BusyGuard<'a>(&'a mut bool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
