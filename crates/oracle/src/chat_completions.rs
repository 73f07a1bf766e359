use crate::provider::read_success_body;
use crate::{OracleConfig, OracleError, Prompt, Provider};
use async_trait::async_trait;
use serde_json::{json, Value};

/// OpenAI-compatible `chat/completions` endpoint in JSON mode (DeepSeek by
/// default).
#[derive(Debug, Clone)]
pub struct ChatCompletions {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
}

impl ChatCompletions {
    pub fn new(client: reqwest::Client, config: &OracleConfig, api_key: String) -> Self {
        Self {
            client,
            endpoint: config.endpoint().to_string(),
            model: config.model().to_string(),
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    pub fn request_body(&self, prompt: &Prompt) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.user }
            ],
            "response_format": { "type": "json_object" },
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": false
        })
    }
}

#[async_trait]
impl Provider for ChatCompletions {
    fn name(&self) -> &'static str {
        "chat_completions"
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, OracleError> {
        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "chat completion request");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;
        let body = read_success_body(response).await?;
        let data: Value = serde_json::from_str(&body)?;
        data["choices"][0]["message"]["content"]
            .as_str()
            .filter(|content| !content.trim().is_empty())
            .map(str::to_string)
            .ok_or(OracleError::EmptyContent)
    }
}
