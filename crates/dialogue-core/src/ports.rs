//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `dialogue-core` (pure Rust).
//! Implementations live in `dialogue-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use std::pin::Pin;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use dialogue_types::{
    Result,
    message::Message,
    persona::PersonaMeta,
};

// ─── LLM Port ────────────────────────────────────────────────

/// Streaming event from an LLM response
#[derive(Debug, Clone, PartialEq)]
pub enum LlmStreamEvent {
    /// A partial chunk of text
    Delta(String),
    /// Stream finished
    Done,
    /// Error during streaming
    Error(String),
}

pub type LlmStream = Pin<Box<dyn Stream<Item = LlmStreamEvent>>>;

/// One dialogue turn: the history so far plus the character payload
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub persona: PersonaMeta,
}

/// Plain single-prompt generation, used to derive persona summaries
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// The chat-completion service.
///
/// Both calls return lazy, finite streams that cannot be restarted.
/// Callers drain them completely with [`drain_text`].
pub trait LlmPort {
    /// Persona-aware chat completion
    fn stream_chat(&self, req: ChatRequest) -> LlmStream;

    /// Non-chat generation from a single instruction
    fn stream_generate(&self, req: GenerateRequest) -> LlmStream;

    /// Whether a credential is present. Calls are still allowed without one.
    fn is_configured(&self) -> bool;
}

/// Result of draining an [`LlmStream`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrainedText {
    pub text: String,
    pub error: Option<String>,
}

/// Concatenate every delta of `stream` until `Done`, an error, or the end.
/// `on_delta` sees each chunk as it arrives.
pub async fn drain_text(mut stream: LlmStream, mut on_delta: impl FnMut(&str)) -> DrainedText {
    let mut drained = DrainedText::default();
    while let Some(event) = stream.next().await {
        match event {
            LlmStreamEvent::Delta(chunk) => {
                if chunk.is_empty() {
                    continue;
                }
                on_delta(&chunk);
                drained.text.push_str(&chunk);
            }
            LlmStreamEvent::Done => break,
            LlmStreamEvent::Error(e) => {
                drained.error = Some(e);
                break;
            }
        }
    }
    drained
}

// ─── Storage Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a value
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete a value
    async fn delete(&self, key: &str) -> Result<()>;

    /// List keys with a given prefix
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Check if a key exists
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Download Port ───────────────────────────────────────────

/// Hands a finished file to the user (browser download, disk write, ...)
pub trait DownloadPort {
    fn offer_text(&self, file_name: &str, content: &str) -> Result<()>;
}
