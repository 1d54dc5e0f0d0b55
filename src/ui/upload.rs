// src/ui/upload.rs
use eframe::egui;
use rfd::FileDialog;

use crate::file::{UploadedFile, ACCEPTED_EXTENSIONS};
use crate::state::UploadState;

// Returns the staged file once the user presses "Analyze Image"
pub fn show_upload_view(ui: &mut egui::Ui, upload: &mut UploadState, hovering: bool) -> Option<UploadedFile> {
    let mut confirmed = None;

    ui.vertical_centered(|ui| {
        let stroke_color = if hovering {
            ui.visuals().selection.stroke.color
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke.color
        };

        let drop_zone = egui::Frame::none()
            .stroke(egui::Stroke::new(2.0, stroke_color))
            .rounding(8.0)
            .inner_margin(egui::Margin::symmetric(16.0, 48.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new("⬆").size(40.0).weak());
                    ui.add_space(8.0);
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new("Click to upload").strong().color(ui.visuals().hyperlink_color));
                        ui.label("or drag and drop");
                    });
                    ui.label(egui::RichText::new("PNG, JPG, or DICOM").small().weak());
                });
            });

        let response = ui.interact(drop_zone.response.rect, ui.id().with("drop_zone"), egui::Sense::click());
        if response.on_hover_cursor(egui::CursorIcon::PointingHand).clicked() {
            browse_for_file(upload);
        }

        if let Some(error) = &upload.error {
            ui.add_space(8.0);
            ui.colored_label(ui.visuals().error_fg_color, error);
        }

        if let Some(file) = &upload.staged {
            ui.add_space(16.0);
            ui.colored_label(egui::Color32::from_rgb(22, 163, 74), format!("File selected: {}", file.name));
            ui.add_space(8.0);

            let button = egui::Button::new(egui::RichText::new("Analyze Image").strong())
                .min_size(egui::vec2(ui.available_width(), 36.0));
            if ui.add(button).clicked() {
                confirmed = upload.take_for_analysis();
            }
        }
    });

    confirmed
}

fn browse_for_file(upload: &mut UploadState) {
    let file_dialog = FileDialog::new()
        .add_filter("X-ray images", ACCEPTED_EXTENSIONS)
        .set_title("Select X-Ray Image");

    if let Some(path) = file_dialog.pick_file() {
        match UploadedFile::from_path(&path) {
            Ok(file) => upload.stage(file),
            Err(e) => {
                tracing::warn!(error = %e, "could not read selected file");
                upload.stage_failed(format!("Could not read file: {e}"));
            }
        }
    }
}

// Only the first of several dropped files is kept
pub fn stage_dropped(upload: &mut UploadState, dropped: &[egui::DroppedFile]) {
    let Some(first) = dropped.first() else {
        return;
    };

    match UploadedFile::from_dropped(first) {
        Ok(file) => upload.stage(file),
        Err(e) => {
            tracing::warn!(error = %e, "could not read dropped file");
            upload.stage_failed(format!("Could not read file: {e}"));
        }
    }
}
