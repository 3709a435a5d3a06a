//! WASM-target tests for dialogue-core.
//!
//! Runs EventBus, transcript export and DialogueDriver tests
//! under wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use dialogue_core::driver::DialogueDriver;
use dialogue_core::event_bus::EventBus;
use dialogue_core::ports::*;
use dialogue_core::transcript::export_transcript;
use dialogue_types::config::DialogueConfig;
use dialogue_types::event::DialogueEvent;
use dialogue_types::message::*;
use dialogue_types::persona::PersonaSide;

use std::cell::Cell;

/// Answers every turn with the same text
struct EchoLlm {
    text: &'static str,
    calls: Cell<usize>,
}

impl EchoLlm {
    fn new(text: &'static str) -> Self {
        Self { text, calls: Cell::new(0) }
    }

    fn stream(&self) -> LlmStream {
        self.calls.set(self.calls.get() + 1);
        let mut events = Vec::new();
        if !self.text.is_empty() {
            events.push(LlmStreamEvent::Delta(self.text.to_string()));
        }
        events.push(LlmStreamEvent::Done);
        Box::pin(futures::stream::iter(events))
    }
}

impl LlmPort for EchoLlm {
    fn stream_chat(&self, _req: ChatRequest) -> LlmStream {
        self.stream()
    }

    fn stream_generate(&self, _req: GenerateRequest) -> LlmStream {
        self.stream()
    }

    fn is_configured(&self) -> bool {
        true
    }
}

fn ready_driver(bus: &EventBus) -> DialogueDriver {
    let mut driver = DialogueDriver::new(DialogueConfig::default(), bus.clone());
    driver.session.set_persona_info(PersonaSide::User, "u");
    driver.session.set_persona_info(PersonaSide::Bot, "b");
    driver.session.set_topic("snow");
    driver
}

// ─── EventBus Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn event_bus_emit_and_drain() {
    let bus = EventBus::new();
    bus.emit(DialogueEvent::DialogueEnd);
    assert!(bus.has_pending());
    assert_eq!(bus.drain().len(), 1);
    assert!(!bus.has_pending());
}

// ─── Transcript Tests ────────────────────────────────────

#[wasm_bindgen_test]
fn transcript_format() {
    let history = vec![Message::user("hi"), Message::assistant("yo")];
    assert_eq!(export_transcript(&history), "A：hi\nB：yo\n");
}

// ─── Driver Tests ────────────────────────────────────────

#[wasm_bindgen_test]
async fn driver_full_run() {
    let bus = EventBus::new();
    let mut driver = ready_driver(&bus);
    driver.session.set_rounds(4);
    let llm = EchoLlm::new("ok");

    driver.run(&llm).await.unwrap();

    assert_eq!(driver.session.history.len(), 9);
    assert_eq!(llm.calls.get(), 8);
}

#[wasm_bindgen_test]
async fn driver_empty_replies_are_dropped() {
    let bus = EventBus::new();
    let mut driver = ready_driver(&bus);
    driver.session.set_rounds(2);
    let llm = EchoLlm::new("");

    driver.run(&llm).await.unwrap();

    assert_eq!(driver.session.history.len(), 1);
    let failed = bus
        .drain()
        .iter()
        .filter(|e| matches!(e, DialogueEvent::TurnFailed { .. }))
        .count();
    assert_eq!(failed, 4);
}

#[wasm_bindgen_test]
async fn driver_validation_blocks_calls() {
    let bus = EventBus::new();
    let mut driver = ready_driver(&bus);
    driver.session.set_topic("");
    let llm = EchoLlm::new("ok");

    assert!(driver.run(&llm).await.is_err());
    assert_eq!(llm.calls.get(), 0);
    assert_eq!(driver.session.history.len(), 1);
}

#[wasm_bindgen_test]
async fn driver_resolve_persona() {
    let bus = EventBus::new();
    let mut driver = DialogueDriver::new(DialogueConfig::default(), bus.clone());
    let llm = EchoLlm::new("green eyes");

    driver
        .resolve_persona(PersonaSide::User, "a painter", &llm)
        .await
        .unwrap();

    assert_eq!(driver.session.persona.user_info, "green eyes");
}
