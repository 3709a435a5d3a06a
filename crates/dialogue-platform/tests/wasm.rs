//! WASM-target tests for dialogue-platform (Node.js runtime).
//!
//! Tests MemoryStorage, SSE decoding and the persistence helpers under
//! wasm32-unknown-unknown via `wasm-pack test --node`.
//!
//! IndexedDB and the anchor click need a browser and are not covered here.

use wasm_bindgen_test::*;

use dialogue_core::persistence::{load_json, save_json, SESSION_STORAGE_KEY};
use dialogue_core::ports::{LlmStreamEvent, StoragePort};
use dialogue_platform::download::revoke_object_url_later;
use dialogue_platform::llm::sse::parse_sse_body;
use dialogue_platform::storage::MemoryStorage;
use dialogue_types::message::Message;
use dialogue_types::session::SessionState;

// ─── MemoryStorage Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn memory_storage_backend_name() {
    assert_eq!(MemoryStorage::new().backend_name(), "memory");
}

#[wasm_bindgen_test]
async fn memory_storage_set_get_overwrite() {
    let storage = MemoryStorage::new();
    assert!(storage.get("key").await.unwrap().is_none());
    storage.set("key", b"v1").await.unwrap();
    storage.set("key", b"v2").await.unwrap();
    assert_eq!(storage.get("key").await.unwrap(), Some(b"v2".to_vec()));
    assert!(storage.exists("key").await.unwrap());
}

#[wasm_bindgen_test]
async fn memory_storage_list_keys() {
    let storage = MemoryStorage::new();
    storage.set("prefix:b", b"2").await.unwrap();
    storage.set("prefix:a", b"1").await.unwrap();
    storage.set("other:c", b"3").await.unwrap();
    let keys = storage.list_keys("prefix:").await.unwrap();
    assert_eq!(keys, vec!["prefix:a", "prefix:b"]);
}

// ─── Persistence Tests ───────────────────────────────────

#[wasm_bindgen_test]
async fn session_snapshot_through_memory_storage() {
    let storage = MemoryStorage::new();
    let mut session = SessionState::new();
    session.push(Message::assistant("hello"));

    save_json(&storage, SESSION_STORAGE_KEY, &session).await.unwrap();
    let back: SessionState = load_json(&storage, SESSION_STORAGE_KEY).await.unwrap().unwrap();
    assert_eq!(back.history, session.history);
}

// ─── SSE Tests ───────────────────────────────────────────

#[wasm_bindgen_test]
fn sse_body_decodes() {
    let body = "data: {\"choices\":[{\"delta\":{\"content\":\"hi\"}}]}\ndata: [DONE]\n";
    assert_eq!(
        parse_sse_body(body),
        vec![LlmStreamEvent::Delta("hi".to_string()), LlmStreamEvent::Done]
    );
}

// ─── Download Tests ──────────────────────────────────────

#[wasm_bindgen_test]
async fn object_url_revoked_after_current_task() {
    use std::cell::Cell;
    use std::rc::Rc;

    let parts = js_sys::Array::of1(&wasm_bindgen::JsValue::from_str("A：hi\n"));
    let blob = web_sys::Blob::new_with_str_sequence(&parts).unwrap();
    let url = web_sys::Url::create_object_url_with_blob(&blob).unwrap();

    let fired = Rc::new(Cell::new(false));
    let seen = fired.clone();
    revoke_object_url_later(url.clone()).forget();
    gloo_timers::callback::Timeout::new(0, move || seen.set(true)).forget();

    // nothing runs until this task yields
    assert!(!fired.get());
    gloo_timers::future::TimeoutFuture::new(10).await;
    assert!(fired.get());

    // revoking twice is harmless
    web_sys::Url::revoke_object_url(&url).unwrap();
}
