//! Mock Gemini endpoint for HTTP-level tests.

use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use tripgen::{ClientConfig, GenAiClient, RetryPolicy};

pub const API_KEY: &str = "test-key";
pub const MODEL: &str = "gemini-test";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
        }
    }

    pub fn path() -> String {
        format!("/models/{}:generateContent", MODEL)
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_api_key(API_KEY)
            .with_model(MODEL)
            .with_base_url(&self.base_url)
            .with_retry(RetryPolicy::new(2, Duration::from_millis(10)))
    }

    /// Real Gemini client pointed at the mock server.
    pub fn client(&self) -> Arc<GenAiClient> {
        Arc::new(GenAiClient::from_config(&self.config()).expect("client"))
    }

    /// Successful generateContent reply carrying `text`.
    pub async fn mock_text(&self, text: &str, hits: usize) -> Mock {
        let body = serde_json::json!({
            "candidates": [{
                "content": {"parts": [{"text": text}], "role": "model"},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 20, "totalTokenCount": 30}
        });
        self.mock_json(200, &body.to_string(), hits).await
    }

    pub async fn mock_json(&self, status: u16, body: &str, hits: usize) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", Self::path().as_str())
            .match_header("x-goog-api-key", API_KEY)
            .match_header("x-tripgen-request-id", Matcher::Any)
            .with_status(usize::from(status))
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// Error reply in Gemini's `{"error": {...}}` shape.
    pub async fn mock_error(&self, code: u16, status: &str, message: &str, hits: usize) -> Mock {
        let body = serde_json::json!({
            "error": {"code": code, "message": message, "status": status}
        });
        self.mock_json(code, &body.to_string(), hits).await
    }
}
