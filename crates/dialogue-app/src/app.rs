//! Main egui application: composes the panels and drives the dialogue.

use std::cell::RefCell;
use std::rc::Rc;

use egui::{self, CentralPanel, RichText, ScrollArea, SidePanel, TopBottomPanel};

use dialogue_core::driver::{DialogueDriver, DriverState};
use dialogue_core::event_bus::EventBus;
use dialogue_core::persistence::{load_json, save_json, CONFIG_STORAGE_KEY, SESSION_STORAGE_KEY};
use dialogue_core::ports::{DownloadPort, LlmPort, StoragePort};
use dialogue_core::transcript::TRANSCRIPT_FILE_NAME;
use dialogue_platform::download::BrowserDownload;
use dialogue_platform::llm::OpenAiCompatProvider;
use dialogue_platform::storage::{open_storage, MemoryStorage};
use dialogue_types::config::{AppConfig, LlmConfig, StorageBackendType};
use dialogue_types::event::DialogueEvent;
use dialogue_types::message::Role;
use dialogue_types::persona::PersonaSide;
use dialogue_types::session::SessionState;
use dialogue_ui::panels::controls::{self, ControlAction};
use dialogue_ui::panels::persona::{self, PersonaAction};
use dialogue_ui::panels::settings::{self, SaveFeedback, SettingsAction};
use dialogue_ui::panels::chat;
use dialogue_ui::state::UiState;
use dialogue_ui::theme;

const CJK_FONT_URL: &str = "NotoSansSC-Regular.otf";
const CJK_FONT_NAME: &str = "noto_sans_sc";

/// What the startup task read back from storage
struct Restored {
    storage: Rc<dyn StoragePort>,
    config: Option<AppConfig>,
    session: Option<SessionState>,
}

/// The main application state
pub struct DialogueApp {
    ui_state: UiState,
    config: AppConfig,
    event_bus: EventBus,
    driver: Rc<RefCell<DialogueDriver>>,
    llm: Rc<dyn LlmPort>,
    /// Holds the config; IndexedDB when available
    storage: Rc<dyn StoragePort>,
    /// Holds the session snapshot; memory-only when the config asks for it
    session_storage: Rc<dyn StoragePort>,
    restore_slot: Rc<RefCell<Option<Restored>>>,
    save_feedback: Option<SaveFeedback>,
    /// Dialogue settings edited while a task held the driver
    config_pending: bool,
    first_frame: bool,
}

impl DialogueApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = AppConfig::default();
        let event_bus = EventBus::new();
        let driver = DialogueDriver::new(config.dialogue.clone(), event_bus.clone());

        let llm = Rc::new(OpenAiCompatProvider::new(config.llm.clone()));
        let storage: Rc<dyn StoragePort> = Rc::new(MemoryStorage::new());

        let mut ui_state = UiState::new();
        ui_state.rounds_input = driver.session.rounds();

        let app = Self {
            ui_state,
            config,
            event_bus,
            driver: Rc::new(RefCell::new(driver)),
            llm,
            storage: storage.clone(),
            session_storage: storage,
            restore_slot: Rc::new(RefCell::new(None)),
            save_feedback: None,
            config_pending: false,
            first_frame: true,
        };

        Self::restore(app.restore_slot.clone());
        app
    }

    /// Open persistent storage and read back config and session (async)
    fn restore(slot: Rc<RefCell<Option<Restored>>>) {
        wasm_bindgen_futures::spawn_local(async move {
            let storage = open_storage(&StorageBackendType::Auto).await;

            let config = match load_json::<AppConfig>(storage.as_ref(), CONFIG_STORAGE_KEY).await {
                Ok(config) => config,
                Err(e) => {
                    log::error!("Stored config discarded: {}", e);
                    None
                }
            };

            let keep_session = config
                .as_ref()
                .map_or(true, |c| c.storage.backend != StorageBackendType::Memory);
            let session = if keep_session {
                match load_json::<SessionState>(storage.as_ref(), SESSION_STORAGE_KEY).await {
                    Ok(session) => session,
                    Err(e) => {
                        log::error!("Stored session discarded: {}", e);
                        None
                    }
                }
            } else {
                None
            };

            *slot.borrow_mut() = Some(Restored { storage, config, session });
        });
    }

    /// Apply the restored snapshot once the startup task has finished
    fn apply_restored(&mut self) {
        let restored = match self.restore_slot.borrow_mut().take() {
            Some(r) => r,
            None => return,
        };
        log::info!("Storage ready: {}", restored.storage.backend_name());
        self.storage = restored.storage;

        if let Some(mut config) = restored.config {
            if !config.llm.has_api_key() {
                config.llm.api_key = LlmConfig::default().api_key;
            }
            self.config = config;
            log::info!("Config restored from storage");
        }
        self.apply_config();

        let session = match restored.session {
            Some(session) => session,
            None => return,
        };
        if self.ui_state.is_busy() {
            log::warn!("Dialogue already running, stored session not restored");
            return;
        }
        match self.driver.try_borrow_mut() {
            Ok(mut driver) => {
                *driver = DialogueDriver::with_session(
                    self.config.dialogue.clone(),
                    session,
                    self.event_bus.clone(),
                );
                self.ui_state.load_session(&driver.session);
                log::info!("Session restored ({} messages)", driver.session.history.len());
            }
            Err(_) => log::warn!("Driver busy, stored session not restored"),
        }
    }

    /// Push the current config into the LLM adapter, driver and session store
    fn apply_config(&mut self) {
        self.llm = Rc::new(OpenAiCompatProvider::new(self.config.llm.clone()));
        match self.driver.try_borrow_mut() {
            Ok(mut driver) => {
                self.ui_state.rounds_input = driver.set_config(self.config.dialogue.clone());
                self.config_pending = false;
            }
            Err(_) => {
                log::info!("Dialogue running, template changes apply when it ends");
                self.config_pending = true;
            }
        }
        self.session_storage = if self.config.storage.backend == StorageBackendType::Memory {
            Rc::new(MemoryStorage::new())
        } else {
            self.storage.clone()
        };
    }

    /// Save config to storage (async, fire-and-forget)
    fn save_config(storage: Rc<dyn StoragePort>, config: AppConfig) {
        wasm_bindgen_futures::spawn_local(async move {
            match save_json(storage.as_ref(), CONFIG_STORAGE_KEY, &config).await {
                Ok(()) => log::info!("Config saved to {}", storage.backend_name()),
                Err(e) => log::error!("Config save failed: {}", e),
            }
        });
    }

    /// Save a session snapshot (async, fire-and-forget)
    fn save_session(storage: Rc<dyn StoragePort>, session: SessionState) {
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = save_json(storage.as_ref(), SESSION_STORAGE_KEY, &session).await {
                log::error!("Session save failed: {}", e);
            }
        });
    }

    /// Fetch CJK font from server and install into egui
    fn load_cjk_font(ctx: egui::Context) {
        wasm_bindgen_futures::spawn_local(async move {
            let window = match web_sys::window() {
                Some(w) => w,
                None => return,
            };
            let resp = match wasm_bindgen_futures::JsFuture::from(window.fetch_with_str(CJK_FONT_URL)).await {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("Failed to fetch CJK font: {:?}", e);
                    return;
                }
            };
            let resp: web_sys::Response = resp.into();
            if !resp.ok() {
                log::warn!("CJK font not served (HTTP {})", resp.status());
                return;
            }
            let buf = match resp.array_buffer() {
                Ok(p) => match wasm_bindgen_futures::JsFuture::from(p).await {
                    Ok(b) => b,
                    Err(_) => return,
                },
                Err(_) => return,
            };
            let bytes = js_sys::Uint8Array::new(&buf).to_vec();

            let mut fonts = egui::FontDefinitions::default();
            fonts.font_data.insert(
                CJK_FONT_NAME.to_owned(),
                egui::FontData::from_owned(bytes).into(),
            );
            fonts
                .families
                .entry(egui::FontFamily::Proportional)
                .or_default()
                .push(CJK_FONT_NAME.to_owned());
            fonts
                .families
                .entry(egui::FontFamily::Monospace)
                .or_default()
                .push(CJK_FONT_NAME.to_owned());

            ctx.set_fonts(fonts);
            ctx.request_repaint();
            log::info!("CJK font loaded");
        });
    }
}

impl eframe::App for DialogueApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            Self::load_cjk_font(ctx.clone());
            self.first_frame = false;
        }

        self.apply_restored();

        // Drain events from the driver
        let events = self.event_bus.drain();
        if !events.is_empty() {
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }

        if self.config_pending && !self.ui_state.is_busy() {
            self.apply_config();
        }

        if self.ui_state.is_busy() {
            ctx.request_repaint();
        }

        // ── Top bar ──────────────────────────────────────────
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("Persona Dialogue")
                        .strong()
                        .color(theme::ACCENT)
                        .size(16.0),
                );
                ui.separator();
                ui.label(
                    RichText::new(format!(
                        "Provider: {} | Model: {}",
                        self.config.llm.provider.label(),
                        self.config.llm.chat_model
                    ))
                    .color(theme::TEXT_SECONDARY)
                    .small(),
                );
                if !self.llm.is_configured() {
                    ui.separator();
                    ui.label(
                        RichText::new("API key is not set")
                            .color(theme::WARNING)
                            .small(),
                    );
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .selectable_label(self.ui_state.show_settings, "Settings")
                        .clicked()
                    {
                        self.ui_state.show_settings = !self.ui_state.show_settings;
                    }
                });
            });
        });

        // ── Settings side panel ──────────────────────────────
        if self.ui_state.show_settings {
            SidePanel::right("settings_panel")
                .min_width(280.0)
                .max_width(350.0)
                .show(ctx, |ui| {
                    ScrollArea::vertical().show(ui, |ui| {
                        let action = settings::settings_panel(
                            ui,
                            &mut self.config,
                            self.save_feedback.as_ref(),
                        );
                        self.handle_settings(action);
                    });
                });
        }

        // ── Persona editors and controls ─────────────────────
        let mut persona_actions = Vec::new();
        let mut control_actions = Vec::new();
        SidePanel::left("persona_panel")
            .min_width(300.0)
            .max_width(420.0)
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| {
                    persona_actions = persona::persona_panel(ui, &mut self.ui_state);
                    ui.add_space(8.0);
                    control_actions = controls::controls_panel(ui, &mut self.ui_state);
                });
            });

        // ── Dialogue ─────────────────────────────────────────
        CentralPanel::default().show(ctx, |ui| {
            chat::chat_panel(ui, &self.ui_state);
        });

        for action in persona_actions {
            self.handle_persona(action, ctx);
        }
        for action in control_actions {
            self.handle_control(action, ctx);
        }
    }
}

impl DialogueApp {
    fn handle_settings(&mut self, action: SettingsAction) {
        match action {
            SettingsAction::None => {}
            SettingsAction::Changed => {
                self.apply_config();
                self.save_feedback = None;
            }
            SettingsAction::SaveClicked => {
                self.apply_config();
                Self::save_config(self.storage.clone(), self.config.clone());
                self.save_feedback = Some(SaveFeedback {
                    message: format!("Saved to {}", self.storage.backend_name()),
                    success: true,
                });
            }
        }
    }

    fn handle_persona(&mut self, action: PersonaAction, ctx: &egui::Context) {
        match action {
            PersonaAction::NameChanged(side, name) => {
                self.with_session(|session| session.set_persona_name(side, name));
            }
            PersonaAction::DescriptionCommitted(side, description) => {
                self.dispatch_resolve(side, description, ctx);
            }
        }
    }

    fn handle_control(&mut self, action: ControlAction, ctx: &egui::Context) {
        match action {
            ControlAction::TopicChanged(topic) => {
                self.with_session(|session| session.set_topic(topic));
            }
            ControlAction::RoundsChanged(rounds) => {
                if let Some(clamped) = self.with_session(|session| session.set_rounds(rounds)) {
                    self.ui_state.rounds_input = clamped;
                }
            }
            ControlAction::Start => self.dispatch_run(ctx),
            ControlAction::ClearHistory => {
                let session = match self.driver.try_borrow_mut() {
                    Ok(mut driver) => {
                        driver.clear_history();
                        driver.session.clone()
                    }
                    Err(_) => return,
                };
                self.ui_state.clear_chat();
                Self::save_session(self.session_storage.clone(), session);
            }
            ControlAction::Download => self.download_transcript(),
        }
    }

    /// Apply a handler to the session unless a task currently owns the driver
    fn with_session<T>(&self, f: impl FnOnce(&mut SessionState) -> T) -> Option<T> {
        match self.driver.try_borrow_mut() {
            Ok(mut driver) => Some(f(&mut driver.session)),
            Err(_) => {
                log::warn!("Driver busy, input ignored");
                None
            }
        }
    }

    /// Run a whole dialogue (async)
    fn dispatch_run(&mut self, ctx: &egui::Context) {
        self.ui_state.driver_status = DriverState::Talking {
            role: Role::Assistant,
            remaining: self.ui_state.rounds_input,
        };

        let driver = self.driver.clone();
        let llm = self.llm.clone();
        let storage = self.session_storage.clone();
        let event_bus = self.event_bus.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let session = match driver.try_borrow_mut() {
                Ok(mut driver) => {
                    if let Err(e) = driver.run(llm.as_ref()).await {
                        log::warn!("Dialogue stopped: {}", e);
                    }
                    driver.session.clone()
                }
                Err(_) => {
                    event_bus.emit(DialogueEvent::Error {
                        message: "A dialogue is already running".to_string(),
                    });
                    event_bus.emit(DialogueEvent::DialogueEnd);
                    ctx.request_repaint();
                    return;
                }
            };
            Self::save_session(storage, session);
            ctx.request_repaint();
        });
    }

    /// Regenerate one side's appearance summary (async)
    fn dispatch_resolve(&mut self, side: PersonaSide, description: String, ctx: &egui::Context) {
        self.ui_state.driver_status = DriverState::Resolving(side);

        let driver = self.driver.clone();
        let llm = self.llm.clone();
        let storage = self.session_storage.clone();
        let event_bus = self.event_bus.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let session = match driver.try_borrow_mut() {
                Ok(mut driver) => {
                    if let Err(e) = driver.resolve_persona(side, &description, llm.as_ref()).await {
                        log::warn!("{} left without a summary: {}", side.label(), e);
                    }
                    driver.session.clone()
                }
                Err(_) => {
                    event_bus.emit(DialogueEvent::Error {
                        message: format!("{} was not regenerated, the driver is busy", side.label()),
                    });
                    ctx.request_repaint();
                    return;
                }
            };
            Self::save_session(storage, session);
            ctx.request_repaint();
        });
    }

    /// Offer the transcript as a file, then mark the session finished
    fn download_transcript(&mut self) {
        let mut driver = match self.driver.try_borrow_mut() {
            Ok(driver) => driver,
            Err(_) => return,
        };
        let text = driver.transcript();
        if let Err(e) = BrowserDownload.offer_text(TRANSCRIPT_FILE_NAME, &text) {
            log::error!("Download failed: {}", e);
            self.event_bus.emit(DialogueEvent::Error {
                message: format!("Download failed: {}", e),
            });
            return;
        }
        driver.session.finish();
        Self::save_session(self.session_storage.clone(), driver.session.clone());
    }
}
