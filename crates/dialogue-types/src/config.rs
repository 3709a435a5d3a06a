use serde::{Deserialize, Serialize};

use crate::session::DEFAULT_ROUNDS;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub dialogue: DialogueConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    /// Model used for dialogue turns (persona-aware)
    pub chat_model: String,
    /// Model used for persona generation
    pub generate_model: String,
    pub api_key: String,
    pub api_base: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Zhipu,
            chat_model: "charglm-3".to_string(),
            generate_model: "glm-4-flash".to_string(),
            api_key: BUILD_TIME_API_KEY.unwrap_or_default().to_string(),
            api_base: None,
            max_tokens: 1024,
            temperature: 0.9,
            top_p: 0.7,
        }
    }
}

impl LlmConfig {
    /// Base URL the adapter talks to, honouring the override
    pub fn base_url(&self) -> &str {
        self.api_base
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Key baked in at build time for local runs. Leave unset for public builds.
const BUILD_TIME_API_KEY: Option<&str> = option_env!("DIALOGUE_API_KEY");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LlmProvider {
    Zhipu,
    OpenAI,
    DeepSeek,
    Custom,
}

impl LlmProvider {
    /// Base URL including the API version segment; `/chat/completions` is appended
    pub fn default_base_url(&self) -> &str {
        match self {
            LlmProvider::Zhipu => "https://open.bigmodel.cn/api/paas/v4",
            LlmProvider::OpenAI => "https://api.openai.com/v1",
            LlmProvider::DeepSeek => "https://api.deepseek.com/v1",
            LlmProvider::Custom => "",
        }
    }

    pub fn all() -> &'static [LlmProvider] {
        &[
            LlmProvider::Zhipu,
            LlmProvider::OpenAI,
            LlmProvider::DeepSeek,
            LlmProvider::Custom,
        ]
    }

    pub fn label(&self) -> &str {
        match self {
            LlmProvider::Zhipu => "Zhipu (CharacterGLM)",
            LlmProvider::OpenAI => "OpenAI",
            LlmProvider::DeepSeek => "DeepSeek",
            LlmProvider::Custom => "Custom",
        }
    }

    /// Whether the provider understands the CharacterGLM `meta` field
    pub fn supports_meta(&self) -> bool {
        matches!(self, LlmProvider::Zhipu | LlmProvider::Custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackendType,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendType::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// Auto-detect best available backend
    Auto,
    Memory,
    IndexedDb,
}

/// Prompt templates and defaults for the dialogue loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueConfig {
    /// Opening line of every run; `{topic}` is substituted
    pub opening_template: String,
    /// Instruction for persona generation; `{description}` is substituted
    pub appearance_prompt: String,
    pub default_rounds: u32,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            opening_template: DEFAULT_OPENING_TEMPLATE.to_string(),
            appearance_prompt: DEFAULT_APPEARANCE_PROMPT.to_string(),
            default_rounds: DEFAULT_ROUNDS,
        }
    }
}

impl DialogueConfig {
    pub fn opening_line(&self, topic: &str) -> String {
        self.opening_template.replace("{topic}", topic)
    }

    pub fn appearance_instruction(&self, description: &str) -> String {
        self.appearance_prompt
            .replace("{description}", description)
            .trim()
            .to_string()
    }
}

const DEFAULT_OPENING_TEMPLATE: &str = "let's start talking about {topic}";

const DEFAULT_APPEARANCE_PROMPT: &str = r#"
Extract the description of the character's appearance from the text below.
If the text contains no appearance description, infer the character's gender and age and write one. Requirements:
1. Only describe the appearance, add nothing else.
2. No sensitive words; the character must look decent.
3. Prefer short phrases over full sentences.
4. No more than 50 words.

Text:
{description}
"#;
