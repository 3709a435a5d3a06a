//! Persona resolver: turns a free-text character description into the
//! short appearance summary that conditions every chat turn.

use dialogue_types::{config::DialogueConfig, DialogueError, Result};

use crate::ports::{drain_text, GenerateRequest, LlmPort};

/// Generate an appearance summary for `description`.
///
/// The stream is drained fully; there is no retry. An empty description
/// yields an empty summary without calling the LLM. A stream error with
/// no text at all is returned as `Err`; partial text wins over the error.
pub async fn resolve_appearance(
    llm: &dyn LlmPort,
    config: &DialogueConfig,
    description: &str,
) -> Result<String> {
    let description = description.trim();
    if description.is_empty() {
        return Ok(String::new());
    }

    let req = GenerateRequest {
        prompt: config.appearance_instruction(description),
    };
    let drained = drain_text(llm.stream_generate(req), |_| {}).await;

    match drained.error {
        Some(e) if drained.text.is_empty() => Err(DialogueError::Llm(e)),
        Some(e) => {
            log::warn!("Persona generation ended early: {}", e);
            Ok(drained.text.trim().to_string())
        }
        None => Ok(drained.text.trim().to_string()),
    }
}
