// src/state/mod.rs
use crate::analysis::AnalysisResult;
use crate::api::ApiError;
use crate::file::UploadedFile;

pub mod chat_state;
pub mod upload_state;

pub use chat_state::{ChatMessage, ChatSession, PendingChat, Sender};
pub use upload_state::UploadState;

// What the left-hand panel shows; exactly one at a time
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnalysisPanel {
    #[default]
    Idle,
    Loading,
    Failed(String),
    Complete(AnalysisResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

// Core application state
#[derive(Debug, Default)]
pub struct AppState {
    pub panel: AnalysisPanel,
    pub uploaded_image: Option<UploadedFile>,
    pub upload: UploadState,
    pub chat: ChatSession,
    last_ticket: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves to `Loading` with `file` as the current image. The returned
    /// ticket must accompany the outcome passed to [`Self::finish_analysis`].
    pub fn begin_analysis(&mut self, file: UploadedFile) -> RequestTicket {
        self.last_ticket += 1;
        tracing::info!(file = %file.name, ticket = self.last_ticket, "analysis started");

        self.uploaded_image = Some(file);
        self.upload.clear();
        self.panel = AnalysisPanel::Loading;
        RequestTicket(self.last_ticket)
    }

    /// Stores the outcome of an analysis. Returns `false` when the ticket
    /// belongs to a request the user has since abandoned.
    pub fn finish_analysis(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<AnalysisResult, ApiError>,
    ) -> bool {
        if ticket.0 != self.last_ticket || self.panel != AnalysisPanel::Loading {
            tracing::debug!(ticket = ticket.0, "ignoring stale analysis result");
            return false;
        }

        match outcome {
            Ok(result) => {
                tracing::info!(ticket = ticket.0, "analysis complete");
                self.panel = AnalysisPanel::Complete(result);
                self.chat.reset_session();
                tracing::debug!(context = %self.analysis_context(), "chat context updated");
            }
            Err(e) => {
                tracing::warn!(ticket = ticket.0, error = %e, "analysis failed");
                self.panel = AnalysisPanel::Failed(e.to_string());
            }
        }
        true
    }

    /// "Start Over": back to the upload form with a fresh chat.
    pub fn reset(&mut self) {
        // Invalidate whatever is still in flight
        self.last_ticket += 1;
        self.panel = AnalysisPanel::Idle;
        self.uploaded_image = None;
        self.upload.clear();
        self.chat.reset_session();
        tracing::debug!("state reset, chat context cleared");
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.panel {
            AnalysisPanel::Complete(result) => Some(result),
            _ => None,
        }
    }

    pub fn analysis_context(&self) -> String {
        self.result().map(AnalysisResult::to_context).unwrap_or_default()
    }

    pub fn can_start_over(&self) -> bool {
        matches!(self.panel, AnalysisPanel::Failed(_) | AnalysisPanel::Complete(_))
    }

    pub fn submit_chat(&mut self) -> Option<PendingChat> {
        let context = self.analysis_context();
        self.chat.submit_input(&context)
    }
}
