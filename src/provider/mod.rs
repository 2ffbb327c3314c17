//! Model provider boundary.
//!
//! The pipeline talks to the model only through [`ModelProvider`], so a
//! scripted fake can stand in for the real HTTP provider in tests.

pub mod gemini;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::structured::Schema;
use crate::transport::TransportFailure;

pub use gemini::GeminiProvider;

/// One `generateContent` call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub system_instruction: Option<String>,
    /// Enable web search grounding.
    pub grounding: bool,
    /// Constrain the reply to this schema (JSON output).
    pub schema: Option<&'static Schema>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system_instruction: None,
            grounding: false,
            schema: None,
        }
    }

    pub fn with_system_instruction(mut self, instruction: Option<String>) -> Self {
        self.system_instruction = instruction;
        self
    }

    pub fn with_grounding(mut self) -> Self {
        self.grounding = true;
        self
    }

    pub fn with_schema(mut self, schema: &'static Schema) -> Self {
        self.schema = Some(schema);
        self
    }
}

/// A web page the model cited while grounding its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub uri: String,
    #[serde(default)]
    pub title: String,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageInfo {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Unparsed model output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGeneration {
    pub text: String,
    pub sources: Vec<GroundingSource>,
    /// Normalized to lower case (`stop`, `length`, `content_filter`, ...).
    pub finish_reason: Option<String>,
    pub usage: Option<UsageInfo>,
}

impl RawGeneration {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_sources(mut self, sources: Vec<GroundingSource>) -> Self {
        self.sources = sources;
        self
    }
}

/// A generative model reachable over some transport.
#[async_trait]
pub trait ModelProvider: Send + Sync + std::fmt::Debug {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Perform one call. Failures are raw; classification happens upstream.
    async fn generate(&self, request: &GenerateRequest) -> Result<RawGeneration, TransportFailure>;
}
