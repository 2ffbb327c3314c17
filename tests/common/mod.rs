//! Shared test fixtures: a scripted provider and a mock Gemini server.
#![allow(dead_code)]

pub mod mock_server;

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tripgen::{
    ClientConfig, GenAiClient, GenAiClientBuilder, GenerateRequest, GroundingSource,
    ModelProvider, RawGeneration, RetryPolicy, TransportFailure,
};

type Reply = Result<RawGeneration, TransportFailure>;

/// Provider that answers from a queue and records every request it sees.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::default(),
        })
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerateRequest) -> Reply {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportFailure::message("no scripted reply left")))
    }
}

/// Client over `provider` with the default 2 retries at 1000ms.
pub fn client_with(provider: Arc<ScriptedProvider>) -> Arc<GenAiClient> {
    Arc::new(
        GenAiClientBuilder::new()
            .config(ClientConfig::default())
            .provider(provider)
            .build()
            .unwrap(),
    )
}

/// Client over `provider` with short backoff for tests on a real clock.
pub fn fast_client_with(provider: Arc<ScriptedProvider>) -> Arc<GenAiClient> {
    Arc::new(
        GenAiClientBuilder::new()
            .config(ClientConfig::default())
            .provider(provider)
            .retry_policy(RetryPolicy::new(2, Duration::from_millis(5)))
            .build()
            .unwrap(),
    )
}

pub fn text(body: &str) -> Reply {
    Ok(RawGeneration::text(body))
}

pub fn grounded(body: &str, sources: &[(&str, &str)]) -> Reply {
    Ok(RawGeneration::text(body).with_sources(
        sources
            .iter()
            .map(|(uri, title)| GroundingSource {
                uri: uri.to_string(),
                title: title.to_string(),
            })
            .collect(),
    ))
}

pub fn rate_limited() -> Reply {
    Err(TransportFailure::status(
        429,
        Some("RESOURCE_EXHAUSTED"),
        "Resource has been exhausted (e.g. check quota).",
    ))
}
