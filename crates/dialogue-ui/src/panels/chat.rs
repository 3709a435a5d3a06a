//! Chat panel: the two characters' lines as bubbles, plus inline notices.

use egui::{self, Align, Layout, RichText, ScrollArea};
use dialogue_types::message::Role;
use crate::state::{ChatEntry, EntryKind, UiState};
use crate::theme::*;

/// Render the dialogue so far and the line currently being generated.
pub fn chat_panel(ui: &mut egui::Ui, state: &UiState) {
    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.heading(RichText::new("Dialogue").color(TEXT_PRIMARY).strong());
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let status_color = if state.is_busy() { WARNING } else { SUCCESS };
                    ui.label(RichText::new(&state.status_text).color(status_color).small());
                });
            });

            ui.separator();

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    if state.entries.is_empty() && state.streaming_role.is_none() {
                        ui.label(
                            RichText::new("Describe both characters, pick a topic, then press Start.")
                                .color(TEXT_SECONDARY)
                                .italics(),
                        );
                    }

                    for entry in &state.entries {
                        render_entry(ui, state, entry);
                        ui.add_space(4.0);
                    }

                    if let Some(role) = state.streaming_role {
                        let mut text = state.streaming_text.clone();
                        text.push('▌');
                        render_bubble(ui, role, &state.speaker_name(role), &text);
                    }
                });
        });
}

fn render_entry(ui: &mut egui::Ui, state: &UiState, entry: &ChatEntry) {
    match entry.kind {
        EntryKind::Line(role) => {
            render_bubble(ui, role, &state.speaker_name(role), &entry.content);
        }
        EntryKind::Warning => render_notice(ui, "Warning", WARNING, BUBBLE_WARNING, &entry.content),
        EntryKind::Error => render_notice(ui, "Error", ERROR, BUBBLE_ERROR, &entry.content),
    }
}

fn render_bubble(ui: &mut egui::Ui, role: Role, name: &str, text: &str) {
    let layout = match role {
        Role::User => Layout::top_down(Align::Max),
        Role::Assistant => Layout::top_down(Align::Min),
    };
    let max_width = ui.available_width() * 0.75;

    ui.with_layout(layout, |ui| {
        ui.set_max_width(max_width);
        egui::Frame::default()
            .fill(bubble_fill(role))
            .corner_radius(PANEL_ROUNDING)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(name).color(speaker_color(role)).strong().small());
                ui.label(RichText::new(text).color(TEXT_PRIMARY));
            });
    });
}

fn render_notice(ui: &mut egui::Ui, label: &str, color: egui::Color32, fill: egui::Color32, text: &str) {
    egui::Frame::default()
        .fill(fill)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(6.0)
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new(label).color(color).strong().small());
                ui.label(RichText::new(text).color(TEXT_PRIMARY).small());
            });
        });
}
