// src/state/upload_state.rs
use crate::file::UploadedFile;

// Holds the file the user picked or dropped until they press Analyze
#[derive(Debug, Default)]
pub struct UploadState {
    pub staged: Option<UploadedFile>,
    pub error: Option<String>,
}

impl UploadState {
    pub fn stage(&mut self, file: UploadedFile) {
        tracing::debug!(file = %file.name, "staged file for upload");
        self.staged = Some(file);
        self.error = None;
    }

    pub fn stage_failed(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn take_for_analysis(&mut self) -> Option<UploadedFile> {
        self.error = None;
        self.staged.take()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
