//! Two-phase structured generation.
//!
//! Web-grounded answers and schema-constrained JSON cannot be requested in
//! the same provider call, so a grounded operation runs twice:
//!
//! ```text
//! prompt ─► Grounding (search tool, free text + sources)
//!              │
//!              ▼
//!           Formatting (responseSchema, JSON) ─► parse ─► validate ─► reattach sources
//! ```
//!
//! Ungrounded operations skip the first phase and send the prompt straight
//! to formatting. Every provider call runs under the client's retry policy;
//! whatever escapes is classified with the operation's default message.

mod stage;


pub use stage::PipelineStage;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::classify::{classify, classify_schema};
use crate::client::GenAiClient;
use crate::error::ErrorContext;
use crate::provider::{GenerateRequest, GroundingSource, RawGeneration};
use crate::retry::duration_ms;
use crate::structured::{OutputValidator, Schema, SchemaViolation, StructuredOutput};
use crate::transport::TransportFailure;
use crate::{Error, Result};

use stage::StageTracker;

/// Field the grounding sources are written to on the final document.
pub const SOURCES_FIELD: &str = "sources";

/// Everything one operation asks of the pipeline.
#[derive(Debug, Clone)]
pub struct OperationRequest {
    /// Operation name for logs and error context (e.g. `generate_itinerary`).
    pub operation: &'static str,
    pub prompt: String,
    pub system_instruction: Option<String>,
    /// Run the web-grounded phase first.
    pub grounded: bool,
    pub schema: &'static Schema,
    /// Shown to the user when a failure has no more specific message.
    pub default_message: &'static str,
}

impl OperationRequest {
    pub fn new(
        operation: &'static str,
        schema: &'static Schema,
        prompt: impl Into<String>,
        default_message: &'static str,
    ) -> Self {
        Self {
            operation,
            prompt: prompt.into(),
            system_instruction: None,
            grounded: false,
            schema,
            default_message,
        }
    }

    pub fn grounded(mut self) -> Self {
        self.grounded = true;
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    fn context(&self, stage: PipelineStage) -> ErrorContext {
        ErrorContext::new()
            .with_operation(self.operation)
            .with_stage(stage.as_str())
    }
}

/// A validated document plus what produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredGeneration {
    /// Validated document, with `sources` attached when grounding found any.
    pub data: Value,
    pub sources: Vec<GroundingSource>,
    /// Stages visited, `Idle` first and `Done` last.
    pub stages: Vec<PipelineStage>,
}

/// Runs [`OperationRequest`]s against one client.
#[derive(Debug, Clone)]
pub struct GenerationPipeline {
    client: Arc<GenAiClient>,
}

impl GenerationPipeline {
    pub fn new(client: Arc<GenAiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<GenAiClient> {
        &self.client
    }

    /// Run both phases and return the validated document.
    pub async fn run(
        &self,
        request: &OperationRequest,
        cancel: &CancellationToken,
    ) -> Result<StructuredGeneration> {
        let start = Instant::now();
        let mut tracker = StageTracker::new(request.operation);

        info!(
            operation = request.operation,
            grounded = request.grounded,
            schema = request.schema.name,
            "structured generation started"
        );

        match self.execute(request, cancel, &mut tracker).await {
            Ok((data, sources)) => {
                tracker.advance(PipelineStage::Done);
                info!(
                    operation = request.operation,
                    sources = sources.len(),
                    duration_ms = duration_ms(start.elapsed()),
                    "structured generation finished"
                );
                Ok(StructuredGeneration {
                    data,
                    sources,
                    stages: tracker.into_history(),
                })
            }
            Err(err) => {
                let failed_in = tracker.current();
                tracker.advance(PipelineStage::Failed);
                info!(
                    operation = request.operation,
                    stage = failed_in.as_str(),
                    kind = err.kind().name(),
                    code = err.kind().code(),
                    duration_ms = duration_ms(start.elapsed()),
                    "structured generation failed"
                );
                Err(err)
            }
        }
    }

    /// [`run`](Self::run) and decode the document into `T`.
    ///
    /// A document that validates but does not decode is a schema error.
    pub async fn run_typed<T: DeserializeOwned>(
        &self,
        request: &OperationRequest,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let generation = self.run(request, cancel).await?;
        serde_json::from_value(generation.data).map_err(|e| {
            classify_schema(SchemaViolation::Decode(e.to_string()), request.default_message)
                .with_context(request.context(PipelineStage::Parsed))
        })
    }

    async fn execute(
        &self,
        request: &OperationRequest,
        cancel: &CancellationToken,
        tracker: &mut StageTracker,
    ) -> Result<(Value, Vec<GroundingSource>)> {
        let (formatting_prompt, sources) = if request.grounded {
            tracker.advance(PipelineStage::Grounding);
            let research = self
                .client
                .request(request.prompt.clone())
                .with_system_instruction(request.system_instruction.clone())
                .with_grounding();
            let grounded = self.call(&research, request, PipelineStage::Grounding, cancel).await?;
            (
                formatting_prompt(&request.prompt, &grounded.text),
                grounded.sources,
            )
        } else {
            (request.prompt.clone(), Vec::new())
        };

        tracker.advance(PipelineStage::Formatting);
        let format = self
            .client
            .request(formatting_prompt)
            .with_system_instruction(request.system_instruction.clone())
            .with_schema(request.schema);
        let formatted = self.call(&format, request, PipelineStage::Formatting, cancel).await?;

        let validator = OutputValidator::for_schema(request.schema);
        let output = StructuredOutput::from_response(formatted.text, request.schema.name, &validator)
            .map_err(|violation| schema_error(violation, request))?;
        tracker.advance(PipelineStage::Parsed);

        let data = attach_sources(output.into_data(), &sources)
            .map_err(|violation| schema_error(violation, request))?;
        Ok((data, sources))
    }

    async fn call(
        &self,
        provider_request: &GenerateRequest,
        request: &OperationRequest,
        stage: PipelineStage,
        cancel: &CancellationToken,
    ) -> Result<RawGeneration> {
        self.client
            .generate(provider_request, cancel)
            .await
            .map_err(|failure: TransportFailure| {
                classify(failure, request.default_message).with_context(request.context(stage))
            })
    }
}

fn schema_error(violation: SchemaViolation, request: &OperationRequest) -> Error {
    let mut context = request.context(PipelineStage::Formatting);
    if let Some(path) = violation.first_path() {
        context = context.with_field_path(path);
    }
    classify_schema(violation, request.default_message).with_context(context)
}

/// Second-phase prompt for a grounded operation.
fn formatting_prompt(original: &str, research: &str) -> String {
    format!(
        "Convert the research notes below into the requested JSON structure. \
         Use only facts stated in the notes; leave optional fields out rather than guessing.\n\n\
         Original request:\n{original}\n\n\
         Research notes:\n{research}"
    )
}

/// Write grounding sources onto the document. No-op without sources.
fn attach_sources(
    mut data: Value,
    sources: &[GroundingSource],
) -> std::result::Result<Value, SchemaViolation> {
    if sources.is_empty() {
        return Ok(data);
    }
    let encoded =
        serde_json::to_value(sources).map_err(|e| SchemaViolation::Decode(e.to_string()))?;
    match data.as_object_mut() {
        Some(object) => {
            object.insert(SOURCES_FIELD.to_string(), encoded);
            Ok(data)
        }
        None => Err(SchemaViolation::Decode(
            "cannot attach sources to a non-object document".to_string(),
        )),
    }
}
