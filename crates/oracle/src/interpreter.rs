use crate::{
    build_prompt, build_provider, fallback_interpretation, parse_interpretation, OracleConfig,
    OracleError, Provider,
};
use arcana_core::{Interpretation, InterpretationRequest};

/// Interpretation client. Without a provider every call yields the fallback.
pub struct Interpreter {
    provider: Option<Box<dyn Provider>>,
}

impl Interpreter {
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn offline() -> Self {
        Self { provider: None }
    }

    /// Builds the configured provider. Missing credentials are not fatal; the
    /// interpreter falls back to offline.
    pub fn from_config(config: &OracleConfig) -> Self {
        match build_provider(config) {
            Ok(provider) => {
                tracing::info!(provider = provider.name(), model = config.model(), "interpretation provider ready");
                Self::new(provider)
            }
            Err(err) => {
                tracing::warn!(%err, "no interpretation provider, readings will use fallback text");
                Self::offline()
            }
        }
    }

    pub fn provider_name(&self) -> Option<&'static str> {
        self.provider.as_ref().map(|provider| provider.name())
    }

    /// Always returns one analysis entry per drawn card, in draw order.
    pub async fn interpret(&self, request: &InterpretationRequest) -> Interpretation {
        match self.try_interpret(request).await {
            Ok(interpretation) => interpretation,
            Err(err) => {
                tracing::warn!(%err, cards = request.cards.len(), "interpretation failed, using fallback");
                fallback_interpretation(&request.cards, request.locale)
            }
        }
    }

    async fn try_interpret(&self, request: &InterpretationRequest) -> Result<Interpretation, OracleError> {
        let provider = self.provider.as_ref().ok_or(OracleError::NoProvider)?;
        let prompt = build_prompt(request);
        let content = provider.complete(&prompt).await?;
        parse_interpretation(&content, &request.cards, request.locale)
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("provider", &self.provider_name())
            .finish()
    }
}
