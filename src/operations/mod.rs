//! Travel operations.
//!
//! Each operation is a prompt template, a static output contract from
//! [`schemas`] and a typed result from [`types`], run through the
//! [`GenerationPipeline`]. Failures are always classified [`Error`](crate::Error)s.

pub mod prompts;
pub mod schemas;
pub mod types;

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::client::GenAiClient;
use crate::pipeline::{GenerationPipeline, OperationRequest};
use crate::Result;

use schemas::RegisteredOperation;
pub use types::*;

type Resolver = Arc<dyn Fn() -> Result<Arc<GenAiClient>> + Send + Sync>;

#[derive(Clone)]
enum ClientSource {
    Injected(Arc<GenAiClient>),
    Resolved(Resolver),
}

/// Entry point for the travel operations.
#[derive(Clone)]
pub struct TravelPlanner {
    source: ClientSource,
}

impl std::fmt::Debug for TravelPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match &self.source {
            ClientSource::Injected(_) => "injected",
            ClientSource::Resolved(_) => "resolved",
        };
        f.debug_struct("TravelPlanner")
            .field("client", &source)
            .finish()
    }
}

impl TravelPlanner {
    pub fn new(client: Arc<GenAiClient>) -> Self {
        Self {
            source: ClientSource::Injected(client),
        }
    }

    /// Planner backed by the process-wide client.
    ///
    /// The client is resolved on every call, so a missing credential fails
    /// each operation with a configuration error and no network activity.
    pub fn shared() -> Self {
        Self::with_resolver(crate::client::shared)
    }

    /// Planner that obtains its client from `resolve` on every call.
    pub fn with_resolver<F>(resolve: F) -> Self
    where
        F: Fn() -> Result<Arc<GenAiClient>> + Send + Sync + 'static,
    {
        Self {
            source: ClientSource::Resolved(Arc::new(resolve)),
        }
    }

    fn pipeline(&self) -> Result<GenerationPipeline> {
        let client = match &self.source {
            ClientSource::Injected(client) => client.clone(),
            ClientSource::Resolved(resolve) => resolve()?,
        };
        Ok(GenerationPipeline::new(client))
    }

    async fn run<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        prompt: String,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let pipeline = self.pipeline()?;
        let request = operation_request(operation, prompt)?;
        pipeline.run_typed(&request, cancel).await
    }

    /// Day-by-day itinerary, researched with web grounding.
    pub async fn generate_itinerary(
        &self,
        params: &ItineraryParams,
        cancel: &CancellationToken,
    ) -> Result<Itinerary> {
        params.validate()?;
        self.run(schemas::ITINERARY_OP, prompts::itinerary(params), cancel)
            .await
    }

    pub async fn generate_packing_checklist(
        &self,
        params: &ChecklistParams,
        cancel: &CancellationToken,
    ) -> Result<PackingChecklist> {
        params.validate()?;
        self.run(
            schemas::CHECKLIST_OP,
            prompts::packing_checklist(params),
            cancel,
        )
        .await
    }

    /// Cost estimate from current prices (grounded).
    pub async fn generate_price_quote(
        &self,
        params: &PriceQuoteParams,
        cancel: &CancellationToken,
    ) -> Result<PriceQuote> {
        params.validate()?;
        self.run(schemas::PRICE_QUOTE_OP, prompts::price_quote(params), cancel)
            .await
    }

    pub async fn suggest_destinations(
        &self,
        params: &DestinationParams,
        cancel: &CancellationToken,
    ) -> Result<DestinationSuggestions> {
        params.validate()?;
        self.run(schemas::DESTINATIONS_OP, prompts::destinations(params), cancel)
            .await
    }

    /// Entry, health and safety advisory (grounded).
    pub async fn generate_travel_advisory(
        &self,
        params: &AdvisoryParams,
        cancel: &CancellationToken,
    ) -> Result<TravelAdvisory> {
        params.validate()?;
        self.run(
            schemas::ADVISORY_OP,
            prompts::travel_advisory(params),
            cancel,
        )
        .await
    }

    pub async fn generate_phrase_sheet(
        &self,
        params: &PhraseSheetParams,
        cancel: &CancellationToken,
    ) -> Result<PhraseSheet> {
        params.validate()?;
        self.run(schemas::PHRASE_SHEET_OP, prompts::phrase_sheet(params), cancel)
            .await
    }
}

fn operation_request(operation: &'static str, prompt: String) -> Result<OperationRequest> {
    let RegisteredOperation {
        operation,
        grounded,
        default_message,
        schema,
    } = *schemas::lookup(operation).ok_or_else(|| {
        crate::Error::with_message(
            crate::error_code::ErrorKind::Unknown,
            format!("unregistered operation '{}'", operation),
        )
    })?;

    let request = OperationRequest::new(operation, schema, prompt, default_message)
        .with_system_instruction(prompts::SYSTEM_INSTRUCTION);
    Ok(if grounded { request.grounded() } else { request })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error_code::ErrorKind;

    #[test]
    fn test_operation_request_follows_registry() {
        for entry in schemas::registry() {
            let request = operation_request(entry.operation, "prompt".into()).unwrap();
            assert_eq!(request.grounded, entry.grounded);
            assert_eq!(request.schema.name, entry.schema.name);
            assert_eq!(request.default_message, entry.default_message);
            assert_eq!(
                request.system_instruction.as_deref(),
                Some(prompts::SYSTEM_INSTRUCTION)
            );
        }
    }

    #[tokio::test]
    async fn test_missing_credential_fails_every_operation() {
        let planner = TravelPlanner::with_resolver(|| {
            GenAiClient::from_config(&ClientConfig::default()).map(Arc::new)
        });
        let cancel = CancellationToken::new();

        let err = planner
            .generate_itinerary(&ItineraryParams::new("Lisbon", 3), &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = planner
            .generate_phrase_sheet(&PhraseSheetParams::new("Lisbon"), &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
