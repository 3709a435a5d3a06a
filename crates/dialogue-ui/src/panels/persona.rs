//! Persona panel: name and free-text description for each character.
//! Leaving a description field after editing it asks for a new summary.

use egui::{self, RichText};
use dialogue_core::driver::DriverState;
use dialogue_types::persona::PersonaSide;
use crate::state::UiState;
use crate::theme::*;

pub enum PersonaAction {
    NameChanged(PersonaSide, String),
    /// Description edited and committed (focus left the field)
    DescriptionCommitted(PersonaSide, String),
}

pub fn persona_panel(ui: &mut egui::Ui, state: &mut UiState) -> Vec<PersonaAction> {
    let mut actions = Vec::new();
    let busy = state.is_busy();

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Characters").color(TEXT_PRIMARY));
            ui.separator();

            for side in [PersonaSide::User, PersonaSide::Bot] {
                persona_card(ui, state, side, busy, &mut actions);
                ui.add_space(8.0);
            }
        });

    actions
}

fn persona_card(
    ui: &mut egui::Ui,
    state: &mut UiState,
    side: PersonaSide,
    busy: bool,
    actions: &mut Vec<PersonaAction>,
) {
    let resolving = state.driver_status == DriverState::Resolving(side);
    ui.label(RichText::new(side.label()).color(ACCENT).strong());

    ui.label(RichText::new("Name").color(TEXT_SECONDARY).small());
    let card = state.card_mut(side);
    let name = ui.add_enabled(
        !busy,
        egui::TextEdit::singleline(&mut card.name).hint_text("Character name"),
    );
    if name.changed() {
        actions.push(PersonaAction::NameChanged(side, card.name.trim().to_string()));
    }

    ui.label(RichText::new("Description").color(TEXT_SECONDARY).small());
    let description = ui.add_enabled(
        !busy,
        egui::TextEdit::multiline(&mut card.description)
            .hint_text("Who is this character? Looks, personality, background...")
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );
    if description.lost_focus() {
        if let Some(text) = state.commit_description(side) {
            actions.push(PersonaAction::DescriptionCommitted(side, text));
        }
    }

    let card = state.card(side);
    if resolving {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(RichText::new("Generating appearance...").color(WARNING).small());
        });
    } else if card.info.is_empty() {
        ui.label(
            RichText::new("No appearance summary yet")
                .color(TEXT_SECONDARY)
                .small()
                .italics(),
        );
    } else {
        egui::Frame::default()
            .fill(BG_SURFACE)
            .corner_radius(PANEL_ROUNDING)
            .inner_margin(6.0)
            .show(ui, |ui| {
                ui.label(RichText::new(&card.info).color(TEXT_PRIMARY).small());
            });
    }
}
