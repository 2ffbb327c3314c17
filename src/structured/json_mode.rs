//! JSON mode: turning a schema-constrained reply into a validated document.
//!
//! Even with `responseMimeType = application/json` the model occasionally
//! wraps its answer in a markdown fence or adds a sentence around it, so
//! parsing falls back to extracting the first fenced block or bracketed span.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::structured::error::SchemaViolation;
use crate::structured::validator::OutputValidator;

/// MIME type requested from the provider in the formatting pass.
pub const JSON_MIME_TYPE: &str = "application/json";

static EXTRACTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"```json\s*([\s\S]*?)\s*```",
        r"```\s*([\s\S]*?)\s*```",
        r"\{[\s\S]*\}",
        r"\[[\s\S]*\]",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Parse model output as JSON, tolerating fences and surrounding prose.
pub fn parse_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
        return Some(parsed);
    }

    for re in EXTRACTION_PATTERNS.iter() {
        if let Some(captures) = re.captures(trimmed) {
            let candidate = match captures.get(1) {
                Some(inner) => inner.as_str(),
                None => captures.get(0).map(|c| c.as_str()).unwrap_or(trimmed),
            };
            if let Ok(parsed) = serde_json::from_str::<Value>(candidate.trim()) {
                return Some(parsed);
            }
        }
    }

    None
}

/// A formatting-pass reply after parsing and validation.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredOutput {
    raw: String,
    data: Value,
}

impl StructuredOutput {
    /// Parse `content` and check it with `validator`.
    pub fn from_response(
        content: impl Into<String>,
        schema_name: &'static str,
        validator: &OutputValidator,
    ) -> Result<Self, SchemaViolation> {
        let raw = content.into();
        let parsed = parse_json(&raw).ok_or_else(|| {
            let reason = serde_json::from_str::<Value>(raw.trim())
                .err()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no JSON document found".to_string());
            SchemaViolation::Malformed(reason)
        })?;

        let data = validator
            .validate_or_fail(&parsed)
            .map_err(|errors| SchemaViolation::Invalid {
                schema: schema_name,
                errors,
            })?;

        Ok(Self { raw, data })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn into_data(self) -> Value {
        self.data
    }
}
