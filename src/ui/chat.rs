// src/ui/chat.rs
use eframe::egui;

use crate::state::{AppState, ChatMessage, PendingChat, Sender};

pub fn show_chat_view(ui: &mut egui::Ui, state: &mut AppState) -> Option<PendingChat> {
    let context = state.analysis_context();

    egui::CollapsingHeader::new("Context")
        .id_source("chat_context")
        .default_open(false)
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .id_source("chat_context_scroll")
                .max_height(120.0)
                .show(ui, |ui| {
                    let shown = if context.is_empty() { "Empty" } else { context.as_str() };
                    ui.label(egui::RichText::new(shown).monospace().small());
                });
        });
    ui.separator();

    let typing = state.chat.is_typing();
    let input_height = 40.0;

    egui::ScrollArea::vertical()
        .id_source("chat_log_scroll")
        .auto_shrink([false, false])
        .max_height((ui.available_height() - input_height).max(0.0))
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in state.chat.messages() {
                show_message(ui, message);
            }
            if typing {
                bubble(ui, Sender::Ai, |ui| {
                    ui.label(egui::RichText::new("Typing...").weak());
                });
            }
        });

    ui.separator();

    let mut send = false;
    ui.horizontal(|ui| {
        let button_width = 64.0;
        let input = egui::TextEdit::singleline(&mut state.chat.input)
            .hint_text("Ask a question...")
            .desired_width(ui.available_width() - button_width);
        let response = ui.add_enabled(!typing, input);
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            send = true;
            response.request_focus();
        }

        if ui.add_enabled(!typing, egui::Button::new("Send")).clicked() {
            send = true;
        }
    });

    if send {
        state.submit_chat()
    } else {
        None
    }
}

fn show_message(ui: &mut egui::Ui, message: &ChatMessage) {
    ui.push_id(message.id, |ui| {
        bubble(ui, message.sender, |ui| {
            ui.label(&message.text);
            ui.label(egui::RichText::new(message.sent_at.format("%H:%M").to_string()).small().weak());
        });
    });
}

fn bubble(ui: &mut egui::Ui, sender: Sender, add_contents: impl FnOnce(&mut egui::Ui)) {
    let (layout, fill) = match sender {
        Sender::User => (
            egui::Layout::right_to_left(egui::Align::TOP),
            egui::Color32::from_rgb(59, 130, 246),
        ),
        Sender::Ai => (
            egui::Layout::left_to_right(egui::Align::TOP),
            ui.visuals().faint_bg_color,
        ),
    };

    ui.with_layout(layout, |ui| {
        egui::Frame::none()
            .fill(fill)
            .rounding(8.0)
            .inner_margin(egui::Margin::symmetric(10.0, 6.0))
            .show(ui, |ui| {
                ui.set_max_width(ui.available_width() * 0.75);
                if sender == Sender::User {
                    ui.visuals_mut().override_text_color = Some(egui::Color32::WHITE);
                }
                ui.vertical(add_contents);
            });
    });
    ui.add_space(6.0);
}
