// src/app.rs
use eframe::egui;
use eframe::epaint::ColorImage;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use crate::analysis::AnalysisResult;
use crate::api::{ApiClient, ApiError};
use crate::file::UploadedFile;
use crate::state::{AnalysisPanel, AppState, PendingChat, RequestTicket};
use crate::ui::results::{self, ImagePreview};
use crate::ui::{chat, upload};

// Completed background work, delivered back to the UI thread
pub enum AppEvent {
    AnalysisFinished {
        ticket: RequestTicket,
        outcome: Result<AnalysisResult, ApiError>,
    },
    ChatReplied {
        generation: u64,
        outcome: Result<String, ApiError>,
    },
    PreviewDecoded {
        ticket: RequestTicket,
        image: Option<ColorImage>,
    },
}

pub struct XrayApp {
    state: AppState,
    api: ApiClient,
    runtime: tokio::runtime::Runtime,
    tx: mpsc::Sender<AppEvent>,
    rx: Receiver<AppEvent>,
    preview: ImagePreview,
}

impl XrayApp {
    pub fn new(api: ApiClient, runtime: tokio::runtime::Runtime) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            state: AppState::new(),
            api,
            runtime,
            tx,
            rx,
            preview: ImagePreview::default(),
        }
    }

    fn submit_for_analysis(&mut self, ctx: &egui::Context, file: UploadedFile) {
        let ticket = self.state.begin_analysis(file.clone());
        self.preview.expect(ticket);
        self.decode_preview(ctx, ticket, &file);

        let api = self.api.clone();
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let outcome = api.analyze(&file).await;
            if tx.send(AppEvent::AnalysisFinished { ticket, outcome }).is_err() {
                tracing::debug!("ui closed before analysis finished");
            }
            ctx.request_repaint();
        });
    }

    fn decode_preview(&self, ctx: &egui::Context, ticket: RequestTicket, file: &UploadedFile) {
        let max_side = ctx.input(|i| i.max_texture_side);
        let bytes = file.bytes.clone();
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn_blocking(move || {
            let image = results::decode_preview(&bytes, max_side);
            if tx.send(AppEvent::PreviewDecoded { ticket, image }).is_err() {
                tracing::debug!("ui closed before preview was decoded");
            }
            ctx.request_repaint();
        });
    }

    fn send_chat(&mut self, ctx: &egui::Context, pending: PendingChat) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let outcome = api.chat(&pending.request).await;
            let event = AppEvent::ChatReplied {
                generation: pending.generation,
                outcome,
            };
            if tx.send(event).is_err() {
                tracing::debug!("ui closed before chat reply arrived");
            }
            ctx.request_repaint();
        });
    }

    fn start_over(&mut self) {
        self.state.reset();
        self.preview.clear();
    }

    fn drain_events(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::AnalysisFinished { ticket, outcome } => {
                self.state.finish_analysis(ticket, outcome);
            }
            AppEvent::ChatReplied { generation, outcome } => {
                self.state.chat.receive(generation, outcome);
            }
            AppEvent::PreviewDecoded { ticket, image } => {
                if !self.preview.deliver(ticket, image) {
                    tracing::debug!("ignoring preview for a replaced upload");
                }
            }
        }
    }

    fn show_header(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(8.0);
            ui.heading(egui::RichText::new("Pneumonia Detection using X-Ray Analysis").size(26.0).strong());
            ui.label(egui::RichText::new("An AI-powered tool to assist with preliminary diagnosis.").weak());
            ui.add_space(8.0);
        });
    }

    fn show_analysis_panel(&mut self, ui: &mut egui::Ui, hovering: bool) -> Option<UploadedFile> {
        let mut start_over = false;
        ui.horizontal(|ui| {
            ui.heading("📄 X-Ray Analysis");
            if self.state.can_start_over() {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    start_over = ui.button("Start Over").clicked();
                });
            }
        });
        ui.separator();

        let mut confirmed = None;
        match &self.state.panel {
            AnalysisPanel::Loading => results::show_loading(ui),
            AnalysisPanel::Failed(message) => results::show_failed(ui, message),
            AnalysisPanel::Complete(result) => {
                results::show_results(ui, result, self.state.uploaded_image.as_ref(), &mut self.preview);
            }
            AnalysisPanel::Idle => {
                confirmed = upload::show_upload_view(ui, &mut self.state.upload, hovering);
            }
        }

        if start_over {
            self.start_over();
        }
        confirmed
    }

    fn show_chat_panel(&mut self, ui: &mut egui::Ui) -> Option<PendingChat> {
        ui.heading("💬 AI Assistant");
        ui.separator();
        chat::show_chat_view(ui, &mut self.state)
    }
}

impl eframe::App for XrayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        // Drops only count while the upload form is showing
        let (hovering, dropped) = ctx.input(|i| (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone()));
        let idle = self.state.panel == AnalysisPanel::Idle;
        if idle && !dropped.is_empty() {
            upload::stage_dropped(&mut self.state.upload, &dropped);
        }

        egui::TopBottomPanel::top("header_panel").show(ctx, |ui| {
            self.show_header(ui);
        });

        let mut confirmed = None;
        let mut pending_chat = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                confirmed = self.show_analysis_panel(&mut columns[0], idle && hovering);
                pending_chat = self.show_chat_panel(&mut columns[1]);
            });
        });

        if let Some(file) = confirmed {
            self.submit_for_analysis(ctx, file);
        }
        if let Some(pending) = pending_chat {
            self.send_chat(ctx, pending);
        }
    }
}
