use crate::{ChatCompletions, Gemini, OracleConfig, OracleError, Prompt, ProviderKind};
use async_trait::async_trait;
use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const MAX_ERROR_BODY_BYTES: usize = 4 * 1024;

/// One upstream language model. Returns the raw text of the reply.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn complete(&self, prompt: &Prompt) -> Result<String, OracleError>;
}

pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client, OracleError> {
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(timeout_secs.max(1))))
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()?;
    Ok(client)
}

/// Builds the configured provider. Fails when the API key variable is unset.
pub fn build_provider(config: &OracleConfig) -> Result<Box<dyn Provider>, OracleError> {
    let api_key = config
        .api_key()
        .ok_or_else(|| OracleError::MissingCredentials(config.api_key_env.clone()))?;
    build_provider_with_key(config, api_key)
}

pub fn build_provider_with_key(
    config: &OracleConfig,
    api_key: String,
) -> Result<Box<dyn Provider>, OracleError> {
    let client = http_client(config.timeout_secs)?;
    let provider: Box<dyn Provider> = match config.provider {
        ProviderKind::ChatCompletions => Box::new(ChatCompletions::new(client, config, api_key)),
        ProviderKind::Gemini => Box::new(Gemini::new(client, config, api_key)),
    };
    Ok(provider)
}

/// Fails with [`OracleError::Status`] on a non-2xx reply, otherwise returns
/// the body text.
pub(crate) async fn read_success_body(response: reqwest::Response) -> Result<String, OracleError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.text().await?);
    }
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY_BYTES {
        let mut cut = MAX_ERROR_BODY_BYTES;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...(truncated)");
    }
    Err(OracleError::Status {
        status: status.as_u16(),
        body,
    })
}
