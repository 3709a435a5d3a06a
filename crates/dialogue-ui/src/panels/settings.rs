//! Settings panel: LLM provider, models, credential, sampling, storage and
//! the dialogue templates. Explicit Save button with visual feedback.

use egui::{self, RichText, Vec2};
use dialogue_types::config::{AppConfig, LlmProvider, StorageBackendType};
use dialogue_types::session::{MAX_ROUNDS, MIN_ROUNDS};
use crate::theme::*;

/// What the caller should do after rendering the settings panel
#[derive(Debug, PartialEq, Eq)]
pub enum SettingsAction {
    None,
    /// A field was changed; the LLM adapter should be rebuilt
    Changed,
    /// The user clicked the explicit Save button
    SaveClicked,
}

/// Save feedback passed in from the app layer
#[derive(Clone)]
pub struct SaveFeedback {
    pub message: String,
    pub success: bool,
}

/// Render the settings panel. Returns an action for the caller to handle.
pub fn settings_panel(
    ui: &mut egui::Ui,
    config: &mut AppConfig,
    save_feedback: Option<&SaveFeedback>,
) -> SettingsAction {
    let mut changed = false;
    let mut save_clicked = false;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Settings").color(TEXT_PRIMARY));
            ui.separator();

            // ── LLM Section ──────────────────────────────────
            ui.label(RichText::new("LLM").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Provider").color(TEXT_SECONDARY).small());
            egui::ComboBox::from_id_salt("llm_provider")
                .selected_text(config.llm.provider.label())
                .show_ui(ui, |ui| {
                    for p in LlmProvider::all() {
                        if ui
                            .selectable_value(&mut config.llm.provider, p.clone(), p.label())
                            .changed()
                        {
                            changed = true;
                        }
                    }
                });
            if !config.llm.provider.supports_meta() {
                ui.label(
                    RichText::new("Personas are sent as a system prompt for this provider.")
                        .color(TEXT_SECONDARY)
                        .small()
                        .italics(),
                );
            }

            ui.add_space(4.0);

            ui.label(RichText::new("Dialogue model").color(TEXT_SECONDARY).small());
            changed |= ui.text_edit_singleline(&mut config.llm.chat_model).changed();

            ui.label(RichText::new("Persona model").color(TEXT_SECONDARY).small());
            changed |= ui.text_edit_singleline(&mut config.llm.generate_model).changed();

            ui.add_space(4.0);

            // API Key (masked)
            ui.label(RichText::new("API Key").color(TEXT_SECONDARY).small());
            let api_key_edit = egui::TextEdit::singleline(&mut config.llm.api_key)
                .password(true)
                .hint_text("your API key");
            changed |= ui.add(api_key_edit).changed();

            ui.add_space(4.0);

            ui.label(RichText::new("API Base URL (optional)").color(TEXT_SECONDARY).small());
            let mut base_url = config.llm.api_base.clone().unwrap_or_default();
            if ui
                .add(
                    egui::TextEdit::singleline(&mut base_url)
                        .hint_text(config.llm.provider.default_base_url()),
                )
                .changed()
            {
                config.llm.api_base = if base_url.trim().is_empty() {
                    None
                } else {
                    Some(base_url)
                };
                changed = true;
            }

            ui.add_space(4.0);

            ui.label(RichText::new("Temperature").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::Slider::new(&mut config.llm.temperature, 0.0..=2.0))
                .changed();

            ui.label(RichText::new("Top P").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::Slider::new(&mut config.llm.top_p, 0.0..=1.0))
                .changed();

            ui.label(RichText::new("Max Tokens").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::Slider::new(&mut config.llm.max_tokens, 64..=8192))
                .changed();

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            // ── Dialogue Section ─────────────────────────────
            ui.label(RichText::new("Dialogue").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Opening line ({topic} is replaced)").color(TEXT_SECONDARY).small());
            changed |= ui
                .text_edit_singleline(&mut config.dialogue.opening_template)
                .changed();

            ui.label(RichText::new("Default rounds").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::DragValue::new(&mut config.dialogue.default_rounds).range(MIN_ROUNDS..=MAX_ROUNDS))
                .changed();

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            // ── Storage Section ──────────────────────────────
            ui.label(RichText::new("Storage").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Backend").color(TEXT_SECONDARY).small());
            egui::ComboBox::from_id_salt("storage_backend")
                .selected_text(storage_label(&config.storage.backend))
                .show_ui(ui, |ui| {
                    for backend in storage_options() {
                        let label = storage_label(&backend);
                        if ui
                            .selectable_value(&mut config.storage.backend, backend, label)
                            .changed()
                        {
                            changed = true;
                        }
                    }
                });

            ui.add_space(4.0);
            ui.label(
                RichText::new(storage_description(&config.storage.backend))
                    .color(TEXT_SECONDARY)
                    .small()
                    .italics(),
            );

            // ── Save Button ──────────────────────────────────
            ui.add_space(16.0);
            ui.separator();
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let btn = ui.add(
                    egui::Button::new(RichText::new("Save Settings").color(TEXT_PRIMARY).strong())
                        .fill(ACCENT)
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(120.0, 28.0)),
                );
                if btn.clicked() {
                    save_clicked = true;
                }

                if let Some(fb) = save_feedback {
                    let color = if fb.success { SUCCESS } else { ERROR };
                    ui.label(RichText::new(&fb.message).color(color).small());
                }
            });
        });

    if save_clicked {
        SettingsAction::SaveClicked
    } else if changed {
        SettingsAction::Changed
    } else {
        SettingsAction::None
    }
}

pub fn storage_label(backend: &StorageBackendType) -> &'static str {
    match backend {
        StorageBackendType::Auto => "Auto-detect",
        StorageBackendType::Memory => "Memory",
        StorageBackendType::IndexedDb => "IndexedDB",
    }
}

fn storage_description(backend: &StorageBackendType) -> &'static str {
    match backend {
        StorageBackendType::Auto => "Tries IndexedDB first, falls back to Memory.",
        StorageBackendType::Memory => "The last dialogue is not kept across page reloads.",
        StorageBackendType::IndexedDb => "Settings and the last dialogue survive page reloads.",
    }
}

fn storage_options() -> [StorageBackendType; 3] {
    [
        StorageBackendType::Auto,
        StorageBackendType::Memory,
        StorageBackendType::IndexedDb,
    ]
}
