#[cfg(test)]
mod tests {
    use crate::state::*;
    use dialogue_core::driver::DriverState;
    use dialogue_types::event::DialogueEvent;
    use dialogue_types::message::{Message, Role};
    use dialogue_types::persona::PersonaSide;
    use dialogue_types::session::{SessionState, DEFAULT_ROUNDS};

    fn ready_state() -> UiState {
        let mut state = UiState::new();
        state.role_a.info = "tall, red scarf".to_string();
        state.role_b.info = "short, green hat".to_string();
        state.topic_input = "the weather".to_string();
        state
    }

    // ─── UiState Tests ───────────────────────────────────────

    #[test]
    fn test_ui_state_initial() {
        let state = UiState::new();
        assert!(state.entries.is_empty());
        assert_eq!(state.driver_status, DriverState::Idle);
        assert!(state.streaming_text.is_empty());
        assert!(state.streaming_role.is_none());
        assert_eq!(state.rounds_input, DEFAULT_ROUNDS);
        assert!(!state.show_settings);
        assert_eq!(state.status_text, "Ready");
        assert!(!state.is_busy());
        assert!(!state.can_start());
    }

    #[test]
    fn test_dialogue_start_clears_previous_run() {
        let mut state = ready_state();
        state.process_events(vec![DialogueEvent::MessageAppended {
            message: Message::user("old"),
        }]);

        state.process_events(vec![DialogueEvent::DialogueStart { rounds: 3 }]);

        assert!(state.entries.is_empty());
        assert!(state.is_busy());
        assert_eq!(state.status_text, "Talking: 3 rounds left");
    }

    #[test]
    fn test_streaming_deltas_then_commit() {
        let mut state = UiState::new();
        state.process_events(vec![
            DialogueEvent::TurnStart { role: Role::Assistant },
            DialogueEvent::LlmDelta { token: "Hel".to_string() },
            DialogueEvent::LlmDelta { token: "lo".to_string() },
        ]);
        assert_eq!(state.streaming_role, Some(Role::Assistant));
        assert_eq!(state.streaming_text, "Hello");

        state.process_events(vec![DialogueEvent::MessageAppended {
            message: Message::assistant("Hello"),
        }]);
        assert!(state.streaming_role.is_none());
        assert!(state.streaming_text.is_empty());
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.entries[0].kind, EntryKind::Line(Role::Assistant));
        assert_eq!(state.entries[0].content, "Hello");
    }

    #[test]
    fn test_turn_failed_shows_notice_not_line() {
        let mut state = UiState::new();
        state.process_events(vec![
            DialogueEvent::TurnStart { role: Role::User },
            DialogueEvent::TurnFailed { role: Role::User },
        ]);

        assert_eq!(state.line_count(), 0);
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.entries[0].kind, EntryKind::Error);
        assert_eq!(state.entries[0].content, GENERATION_FAILED);
        assert!(state.streaming_role.is_none());
    }

    #[test]
    fn test_round_end_updates_status() {
        let mut state = UiState::new();
        state.process_events(vec![
            DialogueEvent::DialogueStart { rounds: 2 },
            DialogueEvent::RoundEnd { remaining: 1 },
        ]);
        assert_eq!(state.status_text, "Talking: 1 rounds left");
        assert_eq!(
            state.driver_status,
            DriverState::Talking { role: Role::Assistant, remaining: 1 }
        );
    }

    #[test]
    fn test_dialogue_end_returns_to_ready() {
        let mut state = UiState::new();
        state.process_events(vec![
            DialogueEvent::DialogueStart { rounds: 1 },
            DialogueEvent::TurnStart { role: Role::Assistant },
            DialogueEvent::DialogueEnd,
        ]);
        assert_eq!(state.driver_status, DriverState::Idle);
        assert_eq!(state.status_text, "Ready");
        assert!(!state.is_busy());
    }

    #[test]
    fn test_validation_failure_keeps_error_after_end() {
        let mut state = UiState::new();
        state.process_events(vec![
            DialogueEvent::DialogueStart { rounds: 5 },
            DialogueEvent::ValidationFailed { message: "topic is empty".to_string() },
            DialogueEvent::DialogueEnd,
        ]);

        assert!(matches!(state.driver_status, DriverState::Error(_)));
        assert!(!state.is_busy());
        assert!(state.status_text.contains("topic is empty"));
        assert_eq!(state.entries.last().map(|e| e.kind), Some(EntryKind::Error));
    }

    #[test]
    fn test_warning_event_is_listed() {
        let mut state = UiState::new();
        state.process_events(vec![DialogueEvent::Warning {
            message: "API key is not set".to_string(),
        }]);
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.entries[0].kind, EntryKind::Warning);
    }

    #[test]
    fn test_error_event_sets_status() {
        let mut state = UiState::new();
        state.process_events(vec![DialogueEvent::Error {
            message: "HTTP 401".to_string(),
        }]);
        assert!(state.status_text.contains("HTTP 401"));
        assert_eq!(state.entries[0].kind, EntryKind::Error);
    }

    #[test]
    fn test_persona_resolution_lifecycle() {
        let mut state = UiState::new();
        state.process_events(vec![DialogueEvent::PersonaResolving { side: PersonaSide::Bot }]);
        assert!(state.is_busy());
        assert_eq!(state.driver_status, DriverState::Resolving(PersonaSide::Bot));

        state.process_events(vec![DialogueEvent::PersonaResolved {
            side: PersonaSide::Bot,
            info: "green hat".to_string(),
        }]);
        assert!(!state.is_busy());
        assert_eq!(state.role_b.info, "green hat");
        assert!(state.role_a.info.is_empty());
    }

    #[test]
    fn test_failed_resolution_clears_previous_summary() {
        let mut state = ready_state();
        state.process_events(vec![DialogueEvent::PersonaResolved {
            side: PersonaSide::User,
            info: String::new(),
        }]);
        assert!(state.role_a.info.is_empty());
        assert!(state.status_text.contains("Role A"));
        assert!(!state.can_start());
    }

    #[test]
    fn test_commit_description_only_when_changed() {
        let mut state = UiState::new();
        assert_eq!(state.commit_description(PersonaSide::User), None);

        state.role_a.description = "  a pirate  ".to_string();
        assert_eq!(state.commit_description(PersonaSide::User), Some("a pirate".to_string()));
        assert_eq!(state.commit_description(PersonaSide::User), None);

        state.role_a.description = "a pirate ".to_string();
        assert_eq!(state.commit_description(PersonaSide::User), None);

        state.role_a.description.clear();
        assert_eq!(state.commit_description(PersonaSide::User), Some(String::new()));
    }

    #[test]
    fn test_speaker_name_falls_back_to_side_label() {
        let mut state = UiState::new();
        assert_eq!(state.speaker_name(Role::User), "Role A");
        assert_eq!(state.speaker_name(Role::Assistant), "Role B");

        state.role_b.name = " Bob ".to_string();
        assert_eq!(state.speaker_name(Role::Assistant), "Bob");
    }

    #[test]
    fn test_can_start_requirements() {
        let mut state = ready_state();
        assert!(state.can_start());

        state.topic_input = "   ".to_string();
        assert!(!state.can_start());

        state.topic_input = "tea".to_string();
        state.driver_status = DriverState::Talking { role: Role::User, remaining: 1 };
        assert!(!state.can_start());
    }

    #[test]
    fn test_clear_chat() {
        let mut state = ready_state();
        state.process_events(vec![
            DialogueEvent::MessageAppended { message: Message::user("hi") },
            DialogueEvent::Error { message: "boom".to_string() },
        ]);
        state.clear_chat();
        assert!(state.entries.is_empty());
        assert_eq!(state.status_text, "Ready");
        assert_eq!(state.driver_status, DriverState::Idle);
        // persona and topic survive
        assert!(state.can_start());
    }

    #[test]
    fn test_load_session_mirrors_fields() {
        let mut session = SessionState::new();
        session.set_persona_name(PersonaSide::User, "Alice");
        session.set_persona_info(PersonaSide::Bot, "green hat");
        session.set_topic("tea");
        session.set_rounds(4);
        session.push(Message::user("let's start"));
        session.push(Message::assistant("sure"));

        let mut state = UiState::new();
        state.load_session(&session);

        assert_eq!(state.role_a.name, "Alice");
        assert_eq!(state.role_b.info, "green hat");
        assert_eq!(state.topic_input, "tea");
        assert_eq!(state.rounds_input, 4);
        assert_eq!(state.line_count(), 2);
        assert_eq!(state.entries[1].kind, EntryKind::Line(Role::Assistant));
    }

    #[test]
    fn test_is_busy_states() {
        let mut state = UiState::new();

        state.driver_status = DriverState::Idle;
        assert!(!state.is_busy());

        state.driver_status = DriverState::Resolving(PersonaSide::User);
        assert!(state.is_busy());

        state.driver_status = DriverState::Talking { role: Role::Assistant, remaining: 2 };
        assert!(state.is_busy());

        state.driver_status = DriverState::Error("err".to_string());
        assert!(!state.is_busy());
    }

    #[test]
    fn test_ui_state_default() {
        let state = UiState::default();
        assert!(state.entries.is_empty());
        assert!(!state.is_busy());
    }
}
