//! Server-Sent Events decoding for OpenAI-style streaming responses.
//!
//! Each event line looks like `data: {"choices":[{"delta":{"content":"..."}}]}`
//! and the stream ends with `data: [DONE]`.

use serde::Deserialize;

use dialogue_core::ports::LlmStreamEvent;

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Deserialize, Default)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Non-streaming body, for servers that ignore `"stream": true`
#[derive(Deserialize)]
struct CompleteResponse {
    choices: Vec<CompleteChoice>,
}

#[derive(Deserialize)]
struct CompleteChoice {
    message: CompleteMessage,
}

#[derive(Deserialize)]
struct CompleteMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Decode a full SSE body into stream events, always ending with `Done`.
///
/// Malformed `data:` lines are skipped with a warning. A body without any
/// `data:` line is tried as a plain chat completion response.
pub fn parse_sse_body(body: &str) -> Vec<LlmStreamEvent> {
    let mut events = Vec::new();
    let mut saw_data = false;

    for line in body.lines() {
        let Some(data) = line.trim().strip_prefix("data:") else {
            continue;
        };
        saw_data = true;
        let data = data.trim();
        if data == "[DONE]" {
            break;
        }
        match serde_json::from_str::<StreamChunk>(data) {
            Ok(chunk) => {
                let text: String = chunk
                    .choices
                    .into_iter()
                    .filter_map(|c| c.delta.content)
                    .collect();
                if !text.is_empty() {
                    events.push(LlmStreamEvent::Delta(text));
                }
            }
            Err(e) => log::warn!("Skipping malformed SSE chunk ({}): {}", e, data),
        }
    }

    if !saw_data {
        match serde_json::from_str::<CompleteResponse>(body.trim()) {
            Ok(resp) => {
                if let Some(text) = resp.choices.into_iter().next().and_then(|c| c.message.content) {
                    events.push(LlmStreamEvent::Delta(text));
                }
            }
            Err(e) => {
                if !body.trim().is_empty() {
                    events.push(LlmStreamEvent::Error(format!("Unreadable response: {}", e)));
                }
            }
        }
    }

    events.push(LlmStreamEvent::Done);
    events
}
