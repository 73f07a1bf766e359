use serde::{Deserialize, Serialize};

pub const DEFAULT_CHAT_ENDPOINT: &str = "https://api.deepseek.com/chat/completions";
pub const DEFAULT_CHAT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_KEY_ENV: &str = "ARCANA_API_KEY";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Any OpenAI-compatible `chat/completions` endpoint.
    #[default]
    ChatCompletions,
    Gemini,
}

/// The `[oracle]` table of the config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OracleConfig {
    pub provider: ProviderKind,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            endpoint: None,
            model: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: 1.1,
            max_tokens: 2000,
            timeout_secs: 60,
        }
    }
}

impl OracleConfig {
    pub fn endpoint(&self) -> &str {
        match (&self.endpoint, self.provider) {
            (Some(endpoint), _) => endpoint.trim_end_matches('/'),
            (None, ProviderKind::ChatCompletions) => DEFAULT_CHAT_ENDPOINT,
            (None, ProviderKind::Gemini) => DEFAULT_GEMINI_ENDPOINT,
        }
    }

    pub fn model(&self) -> &str {
        match (&self.model, self.provider) {
            (Some(model), _) => model,
            (None, ProviderKind::ChatCompletions) => DEFAULT_CHAT_MODEL,
            (None, ProviderKind::Gemini) => DEFAULT_GEMINI_MODEL,
        }
    }

    /// Reads the key from the configured environment variable. Blank counts
    /// as missing.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}
