use crate::config::ClientConfig;
use crate::{Error, Result};
use reqwest::header::HeaderMap;
use reqwest::Proxy;
use serde_json::Value;
use std::fmt::Display;
use std::time::Duration;
use tracing::debug;

use super::TransportFailure;

/// Thin JSON-over-HTTP transport shared by every call of one client.
pub struct HttpTransport {
    client: reqwest::Client,
    api_key: String,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(config: &ClientConfig, api_key: impl Into<String>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            // Conservative HTTP/2 keepalive defaults for long-lived connections.
            .http2_adaptive_window(true)
            .http2_keep_alive_interval(Some(Duration::from_secs(30)))
            .http2_keep_alive_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = config.proxy_url.as_deref() {
            let proxy = Proxy::all(proxy_url)
                .map_err(|e| Error::configuration(format!("invalid proxy url: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }

    fn header_first(headers: &HeaderMap, names: &[&str]) -> Option<String> {
        for name in names {
            if let Some(v) = headers.get(*name) {
                if let Ok(s) = v.to_str() {
                    let s = s.trim();
                    if !s.is_empty() {
                        return Some(s.to_string());
                    }
                }
            }
        }
        None
    }

    /// Only the `Retry-After: <seconds>` form is supported.
    fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
        let raw = Self::header_first(headers, &["retry-after"])?;
        let secs: u64 = raw.parse().ok()?;
        Some(secs.saturating_mul(1000))
    }

    /// POST a JSON body and return the decoded JSON reply.
    ///
    /// Non-2xx replies become [`TransportFailure::Status`], using the
    /// `{"error": {"code", "message", "status"}}` body when the provider sent one.
    pub async fn post_json(
        &self,
        url: &str,
        body: &Value,
        client_request_id: &str,
    ) -> std::result::Result<Value, TransportFailure> {
        let resp = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .header("x-tripgen-request-id", client_request_id)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let retry_after_ms = Self::retry_after_ms(resp.headers());
            let text = error_body_or_empty(status.as_u16(), resp.text().await);
            return Err(error_from_body(status.as_u16(), &text, retry_after_ms));
        }

        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            TransportFailure::message(format!("provider returned malformed JSON: {}", e))
        })
    }
}

/// Body of an error reply. An unreadable body is logged and treated as
/// empty, so the failure is classified from the HTTP status alone.
fn error_body_or_empty<E: Display>(
    http_status: u16,
    read: std::result::Result<String, E>,
) -> String {
    read.unwrap_or_else(|e| {
        debug!(http_status, error = %e, "could not read error reply body");
        String::new()
    })
}

/// Build a status failure from an error reply body.
pub(crate) fn error_from_body(
    http_status: u16,
    body: &str,
    retry_after_ms: Option<u64>,
) -> TransportFailure {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));

    let code = error
        .and_then(|e| e.get("code"))
        .and_then(|c| c.as_u64())
        .and_then(|c| u16::try_from(c).ok())
        .unwrap_or(http_status);
    let status = error
        .and_then(|e| e.get("status"))
        .and_then(|s| s.as_str())
        .map(str::to_string);
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string());

    TransportFailure::Status {
        code,
        status,
        message,
        retry_after_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_error_body_falls_back_to_status() {
        let text = error_body_or_empty(429, Err::<String, _>("connection closed mid-body"));
        assert_eq!(text, "");

        let failure = error_from_body(429, &text, None);
        assert!(failure.is_rate_limited());
        assert!(matches!(failure, TransportFailure::Status { code: 429, status: None, .. }));

        assert_eq!(error_body_or_empty::<&str>(500, Ok("oops".into())), "oops");
    }

    #[test]
    fn test_error_from_structured_body() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let failure = error_from_body(429, body, Some(2000));
        assert_eq!(
            failure,
            TransportFailure::Status {
                code: 429,
                status: Some("RESOURCE_EXHAUSTED".into()),
                message: "Quota exceeded".into(),
                retry_after_ms: Some(2000),
            }
        );
    }

    #[test]
    fn test_error_from_plain_body_keeps_http_status() {
        let failure = error_from_body(502, "Bad Gateway\n", None);
        assert_eq!(failure, TransportFailure::status(502, None, "Bad Gateway"));
    }
}
