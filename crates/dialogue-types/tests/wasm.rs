//! WASM-target tests for dialogue-types.
//!
//! Mirrors the native unit tests but runs under wasm32-unknown-unknown
//! via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use dialogue_types::config::*;
use dialogue_types::error::*;
use dialogue_types::message::*;
use dialogue_types::persona::*;
use dialogue_types::session::*;

// ─── Message Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn message_constructors() {
    assert_eq!(Message::user("a").role, Role::User);
    assert_eq!(Message::assistant("b").role, Role::Assistant);
}

#[wasm_bindgen_test]
fn role_rejects_unknown_value() {
    assert!(matches!("tool".parse::<Role>(), Err(DialogueError::InvalidRole(_))));
}

// ─── Session Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn session_new_has_id_and_timestamp() {
    // uuid (js feature) and chrono (wasmbind feature) both need the JS runtime
    let s = SessionState::new();
    assert_eq!(s.id.len(), 36);
    assert!(!s.updated_at.is_empty());
}

#[wasm_bindgen_test]
fn session_rounds_clamped() {
    let mut s = SessionState::new();
    assert_eq!(s.set_rounds(0), MIN_ROUNDS);
    assert_eq!(s.set_rounds(500), MAX_ROUNDS);
}

#[wasm_bindgen_test]
fn session_clear_history() {
    let mut s = SessionState::new();
    s.start();
    s.push(Message::user("x"));
    s.clear_history();
    assert!(s.history.is_empty());
    assert!(!s.started);
}

#[wasm_bindgen_test]
fn session_validation() {
    let mut s = SessionState::new();
    assert!(s.validate().is_err());
    s.set_persona_info(PersonaSide::User, "u");
    s.set_persona_info(PersonaSide::Bot, "b");
    s.set_topic("t");
    assert!(s.validate().is_ok());
}

// ─── Config Tests ────────────────────────────────────────

#[wasm_bindgen_test]
fn config_roundtrip() {
    let config = AppConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let back: AppConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.llm.provider, LlmProvider::Zhipu);
    assert_eq!(back.llm.chat_model, config.llm.chat_model);
}
