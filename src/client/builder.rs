use crate::client::core::GenAiClient;
use crate::config::ClientConfig;
use crate::provider::{GeminiProvider, ModelProvider};
use crate::retry::RetryPolicy;
use crate::Result;
use std::sync::Arc;
use tracing::info;

/// Builder for [`GenAiClient`].
///
/// Without an explicit configuration the builder reads
/// [`ClientConfig::from_env`]. Without an explicit provider it connects to
/// Gemini, which requires an API key.
#[derive(Debug, Default)]
pub struct GenAiClientBuilder {
    config: Option<ClientConfig>,
    provider: Option<Arc<dyn ModelProvider>>,
    retry: Option<RetryPolicy>,
    model: Option<String>,
}

impl GenAiClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this provider instead of Gemini (tests, alternative backends).
    pub fn provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Override the configured retry policy.
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Override the configured model id.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn build(self) -> Result<GenAiClient> {
        let config = match self.config {
            Some(config) => config,
            None => ClientConfig::from_env()?,
        };

        let provider: Arc<dyn ModelProvider> = match self.provider {
            Some(provider) => provider,
            None => Arc::new(GeminiProvider::from_config(&config)?),
        };

        let client = GenAiClient {
            provider,
            model: self.model.unwrap_or(config.model),
            retry: self.retry.unwrap_or(config.retry),
        };

        info!(
            provider = client.provider_name(),
            model = %client.model,
            max_retries = client.retry.max_retries,
            initial_delay_ms = client.retry.initial_delay_ms,
            "generation client ready"
        );

        Ok(client)
    }
}
