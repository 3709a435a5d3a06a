//! Dialogue driver: the turn-taking loop between the two characters.
//!
//! One run:
//! 1. Clear the history and seed it with the opening line about the topic
//! 2. For each round, check the preconditions (abort the run if they fail)
//! 3. Ask the LLM for the assistant side's line, then for the user side's line
//! 4. Append non-empty replies; a reply with no text is dropped and the run goes on
//! 5. Mark the session as finished

use dialogue_types::{
    Result,
    config::DialogueConfig,
    event::DialogueEvent,
    message::{Message, Role},
    persona::PersonaSide,
    session::SessionState,
};
use crate::event_bus::EventBus;
use crate::persona::resolve_appearance;
use crate::ports::{drain_text, ChatRequest, LlmPort};
use crate::transcript::export_transcript;

/// The dialogue driver state
pub struct DialogueDriver {
    pub config: DialogueConfig,
    pub session: SessionState,
    pub event_bus: EventBus,
    pub state: DriverState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Resolving(PersonaSide),
    Talking { role: Role, remaining: u32 },
    Error(String),
}

impl DialogueDriver {
    pub fn new(config: DialogueConfig, event_bus: EventBus) -> Self {
        let mut session = SessionState::new();
        session.set_rounds(config.default_rounds);
        Self::with_session(config, session, event_bus)
    }

    /// Resume from a previously saved session. A stale `started` flag is dropped.
    pub fn with_session(config: DialogueConfig, mut session: SessionState, event_bus: EventBus) -> Self {
        session.set_rounds(session.rounds());
        session.started = false;
        Self {
            config,
            session,
            event_bus,
            state: DriverState::Idle,
        }
    }

    /// Swap in new templates and defaults.
    ///
    /// A changed default round count is carried into the session; returns
    /// the session's round count afterwards.
    pub fn set_config(&mut self, config: DialogueConfig) -> u32 {
        if config.default_rounds != self.config.default_rounds {
            let rounds = self.session.set_rounds(config.default_rounds);
            log::debug!("Default rounds now {}", rounds);
        }
        self.config = config;
        self.session.rounds()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, DriverState::Talking { .. } | DriverState::Resolving(_))
    }

    /// Run a whole dialogue of `session.rounds()` rounds.
    ///
    /// Returns the validation error when the preconditions fail; the history
    /// then holds only the opening line and no LLM call has been made.
    pub async fn run(&mut self, llm: &dyn LlmPort) -> Result<()> {
        self.session.start();
        let rounds = self.session.rounds();
        log::info!("Dialogue starting: {} rounds about {:?}", rounds, self.session.topic);
        self.event_bus.emit(DialogueEvent::DialogueStart { rounds });

        let opening = Message::user(self.config.opening_line(&self.session.topic));
        self.commit(opening);

        let mut remaining = rounds;
        while remaining > 0 {
            if let Err(e) = self.session.validate() {
                log::warn!("Dialogue aborted: {}", e);
                self.event_bus.emit(DialogueEvent::ValidationFailed {
                    message: e.to_string(),
                });
                self.state = DriverState::Error(e.to_string());
                self.end();
                return Err(e);
            }

            if !llm.is_configured() {
                self.event_bus.emit(DialogueEvent::Warning {
                    message: "API key is not set".to_string(),
                });
            }

            // Both sides are generated from the same persona payload.
            self.take_turn(Role::Assistant, remaining, llm).await;
            self.take_turn(Role::User, remaining, llm).await;

            remaining -= 1;
            log::debug!("Round done, {} left, history: {:?}", remaining, self.session.history);
            self.event_bus.emit(DialogueEvent::RoundEnd { remaining });
        }

        self.state = DriverState::Idle;
        self.end();
        Ok(())
    }

    /// Ask the LLM for one line spoken by `role`.
    ///
    /// The reply is committed to the history only when it is non-empty, so a
    /// failed turn leaves the history exactly as it was before the call.
    async fn take_turn(&mut self, role: Role, remaining: u32, llm: &dyn LlmPort) -> bool {
        self.state = DriverState::Talking { role, remaining };
        self.event_bus.emit(DialogueEvent::TurnStart { role });

        let req = ChatRequest {
            messages: self.session.history.clone(),
            persona: self.session.persona.clone(),
        };

        let bus = self.event_bus.clone();
        let drained = drain_text(llm.stream_chat(req), |token| {
            bus.emit(DialogueEvent::LlmDelta {
                token: token.to_string(),
            });
        })
        .await;

        if let Some(e) = drained.error {
            log::error!("{} turn stream error: {}", role, e);
            self.event_bus.emit(DialogueEvent::Error { message: e });
        }

        if drained.text.is_empty() {
            log::warn!("{} turn produced no text, discarding it", role);
            self.event_bus.emit(DialogueEvent::TurnFailed { role });
            return false;
        }

        self.commit(Message::new(role, drained.text));
        true
    }

    fn commit(&mut self, message: Message) {
        self.session.push(message.clone());
        self.event_bus.emit(DialogueEvent::MessageAppended { message });
    }

    fn end(&mut self) {
        self.session.finish();
        self.event_bus.emit(DialogueEvent::DialogueEnd);
        log::info!("Dialogue ended with {} messages", self.session.history.len());
    }

    /// Derive the appearance summary for one side from its description and
    /// store it. The previous summary is always overwritten, with an empty
    /// string when generation fails.
    pub async fn resolve_persona(
        &mut self,
        side: PersonaSide,
        description: &str,
        llm: &dyn LlmPort,
    ) -> Result<()> {
        self.state = DriverState::Resolving(side);
        self.event_bus.emit(DialogueEvent::PersonaResolving { side });

        let outcome = resolve_appearance(llm, &self.config, description).await;
        let info = match &outcome {
            Ok(info) => info.clone(),
            Err(e) => {
                log::error!("{} persona generation failed: {}", side.label(), e);
                self.event_bus.emit(DialogueEvent::Error {
                    message: e.to_string(),
                });
                String::new()
            }
        };
        log::debug!("{} info = {:?}", side.label(), info);

        self.session.set_persona_info(side, info.clone());
        self.event_bus.emit(DialogueEvent::PersonaResolved { side, info });
        self.state = DriverState::Idle;
        outcome.map(|_| ())
    }

    /// Text of the downloadable transcript for the current history
    pub fn transcript(&self) -> String {
        export_transcript(&self.session.history)
    }

    /// "Clear history" click
    pub fn clear_history(&mut self) {
        self.session.clear_history();
        self.state = DriverState::Idle;
    }
}
