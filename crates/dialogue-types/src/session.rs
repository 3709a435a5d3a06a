use serde::{Deserialize, Serialize};

use crate::error::DialogueError;
use crate::message::Message;
use crate::persona::{PersonaMeta, PersonaSide};
use crate::Result;

pub const MIN_ROUNDS: u32 = 1;
pub const MAX_ROUNDS: u32 = 100;
pub const DEFAULT_ROUNDS: u32 = 10;

/// Per-session dialogue state.
///
/// Mutated only through the handlers below (edit and click events from the
/// UI) and by the dialogue driver while a run is in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub id: String,
    pub history: Vec<Message>,
    pub persona: PersonaMeta,
    pub topic: String,
    rounds: u32,
    pub started: bool,
    pub updated_at: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            history: Vec::new(),
            persona: PersonaMeta::default(),
            topic: String::new(),
            rounds: DEFAULT_ROUNDS,
            started: false,
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Set the round count, clamped into `[MIN_ROUNDS, MAX_ROUNDS]`.
    /// Returns the value actually stored.
    pub fn set_rounds(&mut self, rounds: u32) -> u32 {
        self.rounds = rounds.clamp(MIN_ROUNDS, MAX_ROUNDS);
        self.touch();
        self.rounds
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.topic = topic.into();
        self.touch();
    }

    pub fn set_persona_name(&mut self, side: PersonaSide, name: impl Into<String>) {
        self.persona.set_name(side, name);
        self.touch();
    }

    pub fn set_persona_info(&mut self, side: PersonaSide, info: impl Into<String>) {
        self.persona.set_info(side, info);
        self.touch();
    }

    /// "Start" click: wipe the history and arm the dialogue loop
    pub fn start(&mut self) {
        self.history.clear();
        self.started = true;
        self.touch();
    }

    /// "Clear history" click. Always leaves an empty, stopped session.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.started = false;
        self.touch();
    }

    /// The loop ran to completion or was aborted
    pub fn finish(&mut self) {
        self.started = false;
        self.touch();
    }

    pub fn push(&mut self, message: Message) {
        self.history.push(message);
        self.touch();
    }

    /// Check the preconditions of a dialogue turn
    pub fn validate(&self) -> Result<()> {
        if !self.persona.is_complete() {
            return Err(DialogueError::Validation(
                "both role descriptions must be resolved before talking".to_string(),
            ));
        }
        if self.topic.trim().is_empty() {
            return Err(DialogueError::Validation(
                "the conversation topic must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
