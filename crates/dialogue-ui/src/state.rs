//! UI-level state that drives rendering.
//! Form fields are owned here; everything else is a read-only projection
//! of the dialogue session, updated each frame by draining the EventBus.

use dialogue_types::{
    event::DialogueEvent,
    message::{Message, Role},
    persona::PersonaSide,
    session::{SessionState, DEFAULT_ROUNDS},
};
use dialogue_core::driver::DriverState;

pub const GENERATION_FAILED: &str = "Generation failed";

/// State visible to UI panels
pub struct UiState {
    /// Chat bubbles and inline notices, in display order
    pub entries: Vec<ChatEntry>,
    /// Current driver status
    pub driver_status: DriverState,
    /// Speaker of the turn being generated
    pub streaming_role: Option<Role>,
    /// Text of that turn so far
    pub streaming_text: String,
    pub role_a: PersonaCard,
    pub role_b: PersonaCard,
    pub topic_input: String,
    pub rounds_input: u32,
    /// Whether settings panel is open
    pub show_settings: bool,
    /// Status line text
    pub status_text: String,
}

/// Editable persona fields plus the summary derived from the description
#[derive(Clone, Default)]
pub struct PersonaCard {
    pub name: String,
    pub description: String,
    /// Last description sent for generation
    pub committed_description: String,
    pub info: String,
}

impl PersonaCard {
    /// The description was edited since the last generation
    pub fn is_dirty(&self) -> bool {
        self.description.trim() != self.committed_description.trim()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Line(Role),
    Warning,
    Error,
}

/// A chat entry for display
#[derive(Clone)]
pub struct ChatEntry {
    pub kind: EntryKind,
    pub content: String,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            driver_status: DriverState::Idle,
            streaming_role: None,
            streaming_text: String::new(),
            role_a: PersonaCard::default(),
            role_b: PersonaCard::default(),
            topic_input: String::new(),
            rounds_input: DEFAULT_ROUNDS,
            show_settings: false,
            status_text: "Ready".to_string(),
        }
    }

    pub fn card(&self, side: PersonaSide) -> &PersonaCard {
        match side {
            PersonaSide::User => &self.role_a,
            PersonaSide::Bot => &self.role_b,
        }
    }

    pub fn card_mut(&mut self, side: PersonaSide) -> &mut PersonaCard {
        match side {
            PersonaSide::User => &mut self.role_a,
            PersonaSide::Bot => &mut self.role_b,
        }
    }

    /// Mark a side's description as sent for generation.
    /// Returns the text to send, or None if it did not change since last time.
    pub fn commit_description(&mut self, side: PersonaSide) -> Option<String> {
        let card = self.card_mut(side);
        if !card.is_dirty() {
            return None;
        }
        card.committed_description = card.description.clone();
        log::debug!("{} description committed", side.label());
        Some(card.description.trim().to_string())
    }

    /// Name shown on a speaker's bubbles
    pub fn speaker_name(&self, role: Role) -> String {
        let (card, fallback) = match role {
            Role::User => (&self.role_a, PersonaSide::User.label()),
            Role::Assistant => (&self.role_b, PersonaSide::Bot.label()),
        };
        if card.name.trim().is_empty() {
            fallback.to_string()
        } else {
            card.name.trim().to_string()
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<DialogueEvent>) {
        for event in events {
            match event {
                DialogueEvent::DialogueStart { rounds } => {
                    self.entries.clear();
                    self.clear_streaming();
                    self.driver_status = DriverState::Talking {
                        role: Role::Assistant,
                        remaining: rounds,
                    };
                    self.status_text = format!("Talking: {} rounds left", rounds);
                }
                DialogueEvent::TurnStart { role } => {
                    self.driver_status = DriverState::Talking {
                        role,
                        remaining: self.remaining_rounds(),
                    };
                    self.streaming_role = Some(role);
                    self.streaming_text.clear();
                }
                DialogueEvent::LlmDelta { token } => {
                    self.streaming_text.push_str(&token);
                }
                DialogueEvent::MessageAppended { message } => {
                    self.clear_streaming();
                    self.push_line(message);
                }
                DialogueEvent::TurnFailed { .. } => {
                    self.clear_streaming();
                    self.push_notice(EntryKind::Error, GENERATION_FAILED);
                }
                DialogueEvent::RoundEnd { remaining } => {
                    if let DriverState::Talking { remaining: left, .. } = &mut self.driver_status {
                        *left = remaining;
                    }
                    self.status_text = format!("Talking: {} rounds left", remaining);
                }
                DialogueEvent::ValidationFailed { message } => {
                    self.driver_status = DriverState::Error(message.clone());
                    self.push_notice(EntryKind::Error, &message);
                }
                DialogueEvent::DialogueEnd => {
                    self.clear_streaming();
                    if let DriverState::Error(message) = &self.driver_status {
                        self.status_text = format!("Stopped: {}", message);
                    } else {
                        self.driver_status = DriverState::Idle;
                        self.status_text = "Ready".to_string();
                    }
                }
                DialogueEvent::PersonaResolving { side } => {
                    self.driver_status = DriverState::Resolving(side);
                    self.status_text = format!("Generating {}...", side.label());
                }
                DialogueEvent::PersonaResolved { side, info } => {
                    self.driver_status = DriverState::Idle;
                    self.status_text = if info.is_empty() {
                        format!("{} summary is empty", side.label())
                    } else {
                        "Ready".to_string()
                    };
                    self.card_mut(side).info = info;
                }
                DialogueEvent::Warning { message } => {
                    self.push_notice(EntryKind::Warning, &message);
                }
                DialogueEvent::Error { message } => {
                    self.status_text = format!("Error: {}", message);
                    self.push_notice(EntryKind::Error, &message);
                }
            }
        }
    }

    /// Mirror a restored session into the form and the chat view
    pub fn load_session(&mut self, session: &SessionState) {
        for side in [PersonaSide::User, PersonaSide::Bot] {
            let card = self.card_mut(side);
            card.name = session.persona.name(side).to_string();
            card.info = session.persona.info(side).to_string();
        }
        self.topic_input = session.topic.clone();
        self.rounds_input = session.rounds();
        self.entries.clear();
        for message in &session.history {
            self.push_line(message.clone());
        }
    }

    /// "Clear history" click
    pub fn clear_chat(&mut self) {
        self.entries.clear();
        self.clear_streaming();
        self.driver_status = DriverState::Idle;
        self.status_text = "Ready".to_string();
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self.driver_status, DriverState::Idle | DriverState::Error(_))
    }

    /// Both persona summaries and a topic are present
    pub fn can_start(&self) -> bool {
        !self.is_busy()
            && !self.role_a.info.is_empty()
            && !self.role_b.info.is_empty()
            && !self.topic_input.trim().is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.kind, EntryKind::Line(_)))
            .count()
    }

    fn push_line(&mut self, message: Message) {
        self.entries.push(ChatEntry {
            kind: EntryKind::Line(message.role),
            content: message.content,
        });
    }

    fn push_notice(&mut self, kind: EntryKind, text: &str) {
        self.entries.push(ChatEntry {
            kind,
            content: text.to_string(),
        });
    }

    fn clear_streaming(&mut self) {
        self.streaming_role = None;
        self.streaming_text.clear();
    }

    fn remaining_rounds(&self) -> u32 {
        match self.driver_status {
            DriverState::Talking { remaining, .. } => remaining,
            _ => self.rounds_input,
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
