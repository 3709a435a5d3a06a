//! Controls: topic, round count and the Start / Clear / Download buttons.

use egui::{self, RichText, Vec2};
use dialogue_types::session::{MAX_ROUNDS, MIN_ROUNDS};
use crate::state::UiState;
use crate::theme::*;

#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    TopicChanged(String),
    RoundsChanged(u32),
    Start,
    ClearHistory,
    Download,
}

pub fn controls_panel(ui: &mut egui::Ui, state: &mut UiState) -> Vec<ControlAction> {
    let mut actions = Vec::new();
    let busy = state.is_busy();

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.label(RichText::new("Topic").color(TEXT_SECONDARY).small());
            let topic = ui.add_enabled(
                !busy,
                egui::TextEdit::singleline(&mut state.topic_input)
                    .hint_text("What should they talk about?")
                    .desired_width(f32::INFINITY),
            );
            if topic.changed() {
                actions.push(ControlAction::TopicChanged(state.topic_input.trim().to_string()));
            }

            ui.add_space(4.0);

            ui.horizontal(|ui| {
                ui.label(RichText::new("Rounds").color(TEXT_SECONDARY).small());
                let rounds = ui.add_enabled(
                    !busy,
                    egui::DragValue::new(&mut state.rounds_input)
                        .range(MIN_ROUNDS..=MAX_ROUNDS)
                        .speed(0.2),
                );
                if rounds.changed() {
                    actions.push(ControlAction::RoundsChanged(state.rounds_input));
                }
            });

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let can_start = state.can_start();
                let start = ui
                    .add_enabled(
                        can_start,
                        egui::Button::new(RichText::new("Start").color(TEXT_PRIMARY).strong())
                            .fill(if can_start { ACCENT } else { BG_SURFACE })
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(80.0, 28.0)),
                    )
                    .on_disabled_hover_text("Both characters need an appearance summary and a topic");
                if start.clicked() {
                    actions.push(ControlAction::Start);
                }

                if ui
                    .add_enabled(!busy, egui::Button::new("Clear history"))
                    .clicked()
                {
                    actions.push(ControlAction::ClearHistory);
                }

                let has_lines = state.line_count() > 0;
                if ui
                    .add_enabled(!busy && has_lines, egui::Button::new("Download"))
                    .clicked()
                {
                    actions.push(ControlAction::Download);
                }
            });
        });

    actions
}
