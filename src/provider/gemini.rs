//! Google Gemini `generateContent` provider.
//!
//! Request/response mapping:
//! - The prompt is one `user` turn in `contents`; the system prompt goes in
//!   the top-level `systemInstruction`.
//! - Grounding enables the `googleSearch` tool. Schema-constrained calls set
//!   `generationConfig.responseMimeType` and `generationConfig.responseSchema`.
//! - Response text is the concatenation of `candidates[0].content.parts[*].text`;
//!   citations come from `candidates[0].groundingMetadata.groundingChunks[*].web`.
//! - The API key travels in the `x-goog-api-key` header, never in the URL.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::retry::duration_ms;
use crate::structured::JSON_MIME_TYPE;
use crate::transport::{http::error_from_body, HttpTransport, TransportFailure};
use crate::Result;

use super::{GenerateRequest, GroundingSource, ModelProvider, RawGeneration, UsageInfo};

/// Gemini over HTTPS.
#[derive(Debug)]
pub struct GeminiProvider {
    transport: HttpTransport,
    base_url: String,
}

impl GeminiProvider {
    /// Build from configuration. Fails when the key is missing or the base URL is unusable.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let api_key = config.api_key()?;
        let base_url = config.endpoint_base()?;
        let transport = HttpTransport::new(config, api_key)?;
        Ok(Self {
            transport,
            base_url,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Request body for one call.
    pub fn build_body(request: &GenerateRequest) -> Value {
        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
        });

        if let Some(instruction) = request.system_instruction.as_deref() {
            body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
        }

        if request.grounding {
            body["tools"] = json!([{ "googleSearch": {} }]);
        }

        if let Some(schema) = request.schema {
            body["generationConfig"] = json!({
                "responseMimeType": JSON_MIME_TYPE,
                "responseSchema": schema.to_response_schema(),
            });
        }

        body
    }

    /// Map a successful reply body.
    pub fn parse_response(body: &Value) -> std::result::Result<RawGeneration, TransportFailure> {
        if let Some(error) = body.get("error") {
            let http_status = error
                .get("code")
                .and_then(|c| c.as_u64())
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(500);
            return Err(error_from_body(http_status, &body.to_string(), None));
        }

        let candidate = match body.pointer("/candidates/0") {
            Some(c) => c,
            None => {
                let reason = body
                    .pointer("/promptFeedback/blockReason")
                    .and_then(|r| r.as_str());
                return Err(match reason {
                    Some(reason) => {
                        TransportFailure::message(format!("prompt blocked by provider: {}", reason))
                    }
                    None => TransportFailure::message("provider returned no candidates"),
                });
            }
        };

        let text: String = candidate
            .pointer("/content/parts")
            .and_then(|p| p.as_array())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                    .collect()
            })
            .unwrap_or_default();

        let finish_reason = candidate
            .get("finishReason")
            .and_then(|v| v.as_str())
            .map(|r| match r {
                "STOP" => "stop".to_string(),
                "MAX_TOKENS" => "length".to_string(),
                "SAFETY" | "RECITATION" => "content_filter".to_string(),
                other => other.to_lowercase(),
            });

        let usage = body.get("usageMetadata").map(|u| UsageInfo {
            prompt_tokens: u["promptTokenCount"].as_u64().unwrap_or(0),
            completion_tokens: u["candidatesTokenCount"].as_u64().unwrap_or(0),
            total_tokens: u["totalTokenCount"].as_u64().unwrap_or(0),
        });

        Ok(RawGeneration {
            text,
            sources: grounding_sources(candidate),
            finish_reason,
            usage,
        })
    }
}

/// Web citations of a candidate, first occurrence of each URI kept.
fn grounding_sources(candidate: &Value) -> Vec<GroundingSource> {
    let Some(chunks) = candidate
        .pointer("/groundingMetadata/groundingChunks")
        .and_then(|c| c.as_array())
    else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    chunks
        .iter()
        .filter_map(|chunk| chunk.get("web"))
        .filter_map(|web| {
            let uri = web.get("uri").and_then(|u| u.as_str())?.trim();
            if uri.is_empty() || !seen.insert(uri.to_string()) {
                return None;
            }
            let title = web
                .get("title")
                .and_then(|t| t.as_str())
                .unwrap_or(uri)
                .to_string();
            Some(GroundingSource {
                uri: uri.to_string(),
                title,
            })
        })
        .collect()
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> std::result::Result<RawGeneration, TransportFailure> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let url = self.endpoint(&request.model);
        let body = Self::build_body(request);
        let start = Instant::now();

        debug!(
            request_id = %request_id,
            model = %request.model,
            grounding = request.grounding,
            schema = request.schema.map(|s| s.name),
            "sending generateContent request"
        );

        let reply = self.transport.post_json(&url, &body, &request_id).await;
        let duration_ms = duration_ms(start.elapsed());

        let generation = match reply {
            Ok(reply) => Self::parse_response(&reply),
            Err(failure) => Err(failure),
        };

        match &generation {
            Ok(g) => info!(
                request_id = %request_id,
                model = %request.model,
                duration_ms,
                sources = g.sources.len(),
                finish_reason = g.finish_reason.as_deref().unwrap_or("unknown"),
                total_tokens = g.usage.map(|u| u.total_tokens).unwrap_or(0),
                "generateContent finished"
            ),
            Err(failure) => info!(
                request_id = %request_id,
                model = %request.model,
                duration_ms,
                failure = %failure,
                "generateContent failed"
            ),
        }

        generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured::{Property, Schema, SchemaNode};

    const FIELDS: &[Property] = &[Property::required("city", SchemaNode::string("City"))];
    static CITY: Schema = Schema::new("city", SchemaNode::object("", FIELDS));

    #[test]
    fn test_build_body_grounded() {
        let request = GenerateRequest::new("gemini-2.5-flash", "Best time to visit Kyoto?")
            .with_system_instruction(Some("You are a travel agent.".into()))
            .with_grounding();
        let body = GeminiProvider::build_body(&request);

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Best time to visit Kyoto?");
        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "You are a travel agent."
        );
        assert_eq!(body["tools"], json!([{ "googleSearch": {} }]));
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_build_body_with_schema() {
        let request = GenerateRequest::new("gemini-2.5-flash", "Format this").with_schema(&CITY);
        let body = GeminiProvider::build_body(&request);

        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert!(body.get("tools").is_none());
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_parse_response_concatenates_parts() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{"text": "{\"city\":"}, {"text": "\"Rome\"}"}], "role": "model" },
                "finishReason": "STOP"
            }],
            "usageMetadata": {
                "promptTokenCount": 5,
                "candidatesTokenCount": 3,
                "totalTokenCount": 8
            }
        });
        let generation = GeminiProvider::parse_response(&body).unwrap();
        assert_eq!(generation.text, r#"{"city":"Rome"}"#);
        assert_eq!(generation.finish_reason.as_deref(), Some("stop"));
        assert_eq!(generation.usage.unwrap().total_tokens, 8);
        assert!(generation.sources.is_empty());
    }

    #[test]
    fn test_parse_response_grounding_sources_deduplicated() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{"text": "Cherry blossoms peak in early April."}] },
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"uri": "https://a.example/kyoto", "title": "a.example"}},
                        {"web": {"uri": "https://b.example/sakura"}},
                        {"web": {"uri": "https://a.example/kyoto", "title": "dup"}},
                        {"retrievedContext": {"uri": "ignored"}}
                    ]
                }
            }]
        });
        let generation = GeminiProvider::parse_response(&body).unwrap();
        assert_eq!(
            generation.sources,
            vec![
                GroundingSource {
                    uri: "https://a.example/kyoto".into(),
                    title: "a.example".into()
                },
                GroundingSource {
                    uri: "https://b.example/sakura".into(),
                    title: "https://b.example/sakura".into()
                },
            ]
        );
    }

    #[test]
    fn test_parse_response_blocked_prompt() {
        let body = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let failure = GeminiProvider::parse_response(&body).unwrap_err();
        assert_eq!(
            failure,
            TransportFailure::message("prompt blocked by provider: SAFETY")
        );
    }

    #[test]
    fn test_parse_response_embedded_error() {
        let body = json!({
            "error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}
        });
        let failure = GeminiProvider::parse_response(&body).unwrap_err();
        assert!(failure.is_rate_limited());
    }

    #[test]
    fn test_finish_reason_normalization() {
        let body = json!({
            "candidates": [{ "content": { "parts": [] }, "finishReason": "SAFETY" }]
        });
        let generation = GeminiProvider::parse_response(&body).unwrap();
        assert_eq!(generation.finish_reason.as_deref(), Some("content_filter"));
        assert_eq!(generation.text, "");
    }

    #[test]
    fn test_from_config_requires_key() {
        let err = GeminiProvider::from_config(&ClientConfig::default()).unwrap_err();
        assert_eq!(err.kind(), crate::error_code::ErrorKind::Configuration);
    }
}
