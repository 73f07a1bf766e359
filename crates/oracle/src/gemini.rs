use crate::provider::read_success_body;
use crate::{OracleConfig, OracleError, Prompt, Provider};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Gemini `generateContent`, non-streaming, with a JSON response type.
#[derive(Debug, Clone)]
pub struct Gemini {
    client: reqwest::Client,
    url: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
}

impl Gemini {
    pub fn new(client: reqwest::Client, config: &OracleConfig, api_key: String) -> Self {
        Self {
            client,
            url: format!("{}/models/{}:generateContent", config.endpoint(), config.model()),
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn request_body(&self, prompt: &Prompt) -> Value {
        json!({
            "systemInstruction": { "parts": [{ "text": prompt.system }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt.user }] }],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_tokens,
                "responseMimeType": "application/json"
            }
        })
    }
}

#[async_trait]
impl Provider for Gemini {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, OracleError> {
        tracing::debug!(url = %self.url, "gemini request");
        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;
        let body = read_success_body(response).await?;
        let data: Value = serde_json::from_str(&body)?;
        let text = data["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part["text"].as_str())
                    .collect::<String>()
            })
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(OracleError::EmptyContent);
        }
        Ok(text)
    }
}
