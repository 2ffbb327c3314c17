use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::provider::{GenerateRequest, ModelProvider, RawGeneration};
use crate::retry::{with_retry, RetryPolicy};
use crate::transport::TransportFailure;
use crate::Result;

use super::GenAiClientBuilder;

/// Long-lived handle to the model provider.
///
/// Cheap to share behind an `Arc`; holds no per-request state.
#[derive(Debug)]
pub struct GenAiClient {
    pub(crate) provider: Arc<dyn ModelProvider>,
    pub(crate) model: String,
    pub(crate) retry: RetryPolicy,
}

impl GenAiClient {
    pub fn builder() -> GenAiClientBuilder {
        GenAiClientBuilder::new()
    }

    /// Gemini client from configuration.
    ///
    /// Fails with a configuration error, before any network activity, when
    /// the credential is absent.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        GenAiClientBuilder::new().config(config.clone()).build()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Request skeleton for this client's model.
    pub fn request(&self, prompt: impl Into<String>) -> GenerateRequest {
        GenerateRequest::new(self.model.clone(), prompt)
    }

    /// One provider call under the client's retry policy.
    ///
    /// Failures come back raw; callers classify them with their own default message.
    pub async fn generate(
        &self,
        request: &GenerateRequest,
        cancel: &CancellationToken,
    ) -> std::result::Result<RawGeneration, TransportFailure> {
        let provider = &self.provider;
        with_retry(&self.retry, cancel, move || provider.generate(request)).await
    }
}
