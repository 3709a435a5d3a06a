//! OpenAI-compatible LLM adapter.
//!
//! Works with Zhipu (CharacterGLM), OpenAI, DeepSeek, and any provider using
//! the OpenAI chat completions API format with `"stream": true`.
//! Uses browser `fetch()` via gloo-net for WASM compatibility.

use futures::stream::{self, StreamExt};
use gloo_net::http::Request;
use serde_json::{json, Value};

use dialogue_core::ports::*;
use dialogue_types::{
    Result, DialogueError,
    config::LlmConfig,
    message::Message,
    persona::PersonaMeta,
};

use super::sse::parse_sse_body;

/// Provider that speaks the OpenAI chat completions protocol.
///
/// Owns its copy of the config, so each app instance carries its own
/// credential. Rebuild the provider when the config changes.
pub struct OpenAiCompatProvider {
    config: LlmConfig,
    endpoint: String,
}

impl OpenAiCompatProvider {
    pub fn new(config: LlmConfig) -> Self {
        let endpoint = format!("{}/chat/completions", config.base_url().trim_end_matches('/'));
        Self { config, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Body of a persona-aware dialogue turn.
    ///
    /// Providers that understand CharacterGLM get the persona as `meta`;
    /// the rest get it folded into a leading system message.
    pub fn build_chat_body(&self, req: &ChatRequest) -> Value {
        let mut messages: Vec<Value> = Vec::with_capacity(req.messages.len() + 1);
        if !self.config.provider.supports_meta() {
            messages.push(json!({
                "role": "system",
                "content": persona_system_prompt(&req.persona),
            }));
        }
        messages.extend(req.messages.iter().map(message_to_json));

        let mut body = json!({
            "model": self.config.chat_model,
            "messages": messages,
            "stream": true,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "top_p": self.config.top_p,
        });

        if self.config.provider.supports_meta() {
            body["meta"] = json!(req.persona);
        }
        body
    }

    /// Body of a single-instruction generation
    pub fn build_generate_body(&self, req: &GenerateRequest) -> Value {
        json!({
            "model": self.config.generate_model,
            "messages": [{ "role": "user", "content": req.prompt }],
            "stream": true,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "top_p": self.config.top_p,
        })
    }

    fn stream_request(&self, body: Value) -> LlmStream {
        let url = self.endpoint.clone();
        let api_key = self.config.api_key.clone();

        let events = async move {
            match post_streaming(&url, &api_key, &body).await {
                Ok(text) => parse_sse_body(&text),
                Err(e) => {
                    log::error!("LLM request failed: {}", e);
                    vec![LlmStreamEvent::Error(e.to_string())]
                }
            }
        };
        Box::pin(stream::once(events).flat_map(stream::iter))
    }
}

impl LlmPort for OpenAiCompatProvider {
    fn stream_chat(&self, req: ChatRequest) -> LlmStream {
        log::debug!("chat turn with {} messages", req.messages.len());
        self.stream_request(self.build_chat_body(&req))
    }

    fn stream_generate(&self, req: GenerateRequest) -> LlmStream {
        self.stream_request(self.build_generate_body(&req))
    }

    fn is_configured(&self) -> bool {
        self.config.has_api_key()
    }
}

/// POST `body` and return the raw (SSE) response text
async fn post_streaming(url: &str, api_key: &str, body: &Value) -> Result<String> {
    let response = Request::post(url)
        .header("Content-Type", "application/json")
        .header("Accept", "text/event-stream")
        .header("Authorization", &format!("Bearer {}", api_key))
        .json(body)
        .map_err(|e| DialogueError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| DialogueError::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(DialogueError::Llm(format!("HTTP {}: {}", status, text)));
    }

    response
        .text()
        .await
        .map_err(|e| DialogueError::Network(e.to_string()))
}

// ─── Serialization helpers ───────────────────────────────────

fn message_to_json(msg: &Message) -> Value {
    json!({
        "role": msg.role.as_str(),
        "content": msg.content,
    })
}

/// Persona instructions for providers without native `meta` support
pub fn persona_system_prompt(meta: &PersonaMeta) -> String {
    let bot = display_name(&meta.bot_name, "B");
    let user = display_name(&meta.user_name, "A");
    format!(
        "You are role-playing {bot}. Appearance of {bot}: {}\n\
         You are talking with {user}. Appearance of {user}: {}\n\
         Stay in character and answer with a single line of dialogue.",
        meta.bot_info, meta.user_info,
    )
}

fn display_name<'a>(name: &'a str, fallback: &'a str) -> &'a str {
    if name.trim().is_empty() {
        fallback
    } else {
        name
    }
}
