// src/ui/results.rs
use eframe::egui;
use eframe::epaint::{ColorImage, TextureHandle};

use crate::analysis::AnalysisResult;
use crate::file::UploadedFile;
use crate::state::RequestTicket;

// Largest edge uploaded to the GPU for the thumbnail beside the findings
pub const PREVIEW_MAX_SIDE: usize = 1024;

enum PreviewState {
    Empty,
    Pending,
    Decoded(ColorImage),
    Ready(TextureHandle),
    Unavailable,
}

// Preview of the image under analysis. Decoding happens off the UI thread;
// the result is matched against the analysis ticket it was started for.
pub struct ImagePreview {
    ticket: Option<RequestTicket>,
    state: PreviewState,
}

impl Default for ImagePreview {
    fn default() -> Self {
        Self {
            ticket: None,
            state: PreviewState::Empty,
        }
    }
}

impl ImagePreview {
    pub fn expect(&mut self, ticket: RequestTicket) {
        self.ticket = Some(ticket);
        self.state = PreviewState::Pending;
    }

    /// Stores a finished decode. Returns `false` when it belongs to an
    /// upload that has since been replaced or cleared.
    pub fn deliver(&mut self, ticket: RequestTicket, image: Option<ColorImage>) -> bool {
        if self.ticket != Some(ticket) {
            return false;
        }

        self.state = match image {
            Some(image) => PreviewState::Decoded(image),
            None => PreviewState::Unavailable,
        };
        true
    }

    pub fn clear(&mut self) {
        self.ticket = None;
        self.state = PreviewState::Empty;
    }

    fn is_pending(&self) -> bool {
        matches!(self.state, PreviewState::Pending)
    }

    fn texture(&mut self, ctx: &egui::Context, name: &str) -> Option<&TextureHandle> {
        if let PreviewState::Decoded(_) = self.state {
            if let PreviewState::Decoded(image) = std::mem::replace(&mut self.state, PreviewState::Pending) {
                let texture = ctx.load_texture(format!("preview-{name}"), image, egui::TextureOptions::LINEAR);
                self.state = PreviewState::Ready(texture);
            }
        }

        match &self.state {
            PreviewState::Ready(texture) => Some(texture),
            _ => None,
        }
    }
}

/// Decodes `bytes` for display, shrinking the image so neither edge exceeds
/// `max_side` or [`PREVIEW_MAX_SIDE`].
pub fn decode_preview(bytes: &[u8], max_side: usize) -> Option<ColorImage> {
    let mut image = match image::load_from_memory(bytes) {
        Ok(image) => image,
        Err(e) => {
            tracing::debug!(error = %e, "no preview available for upload");
            return None;
        }
    };

    let limit = max_side.clamp(1, PREVIEW_MAX_SIDE) as u32;
    if image.width() > limit || image.height() > limit {
        image = image.thumbnail(limit, limit);
    }

    let size = [image.width() as usize, image.height() as usize];
    let buffer = image.to_rgba8();
    let pixels = buffer.as_flat_samples();
    Some(ColorImage::from_rgba_unmultiplied(size, pixels.as_slice()))
}

pub fn show_loading(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.3);
        ui.add(egui::Spinner::new().size(48.0));
        ui.add_space(12.0);
        ui.label(egui::RichText::new("Analyzing Image").size(18.0).strong());
        ui.label(egui::RichText::new("Please wait while the AI processes the X-ray...").weak());
    });
}

pub fn show_failed(ui: &mut egui::Ui, message: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.3);
        egui::Frame::none()
            .fill(egui::Color32::from_rgb(254, 226, 226))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(239, 68, 68)))
            .rounding(6.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                let text_color = egui::Color32::from_rgb(185, 28, 28);
                ui.label(egui::RichText::new("Analysis Failed").strong().color(text_color));
                ui.label(egui::RichText::new(message).color(text_color));
            });
    });
}

pub fn show_results(
    ui: &mut egui::Ui,
    result: &AnalysisResult,
    uploaded: Option<&UploadedFile>,
    preview: &mut ImagePreview,
) {
    ui.heading("Analysis Complete");
    ui.separator();

    egui::ScrollArea::vertical()
        .id_source("results_scroll")
        .show(ui, |ui| {
            if let Some(file) = uploaded {
                if preview.is_pending() {
                    ui.vertical_centered(|ui| ui.spinner());
                } else if let Some(texture) = preview.texture(ui.ctx(), &file.name) {
                    let image = egui::Image::new(egui::load::SizedTexture::from_handle(texture))
                        .max_height(256.0)
                        .max_width(ui.available_width());
                    ui.vertical_centered(|ui| ui.add(image));
                } else {
                    ui.label(egui::RichText::new(format!("Preview unavailable for {}", file.name)).italics().weak());
                }
                ui.add_space(8.0);
            }

            ui.group(|ui| {
                ui.set_width(ui.available_width());
                ui.label(egui::RichText::new("Potential Findings:").strong());
                for finding in result.findings_list() {
                    ui.label(format!("• {}", finding));
                }

                if let Some(confidence) = result.confidence_text() {
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new("Confidence:").strong());
                        ui.label(confidence);
                    });
                }
            });

            ui.add_space(8.0);
            ui.label(egui::RichText::new(&result.disclaimer).small().italics().weak());
        });
}
