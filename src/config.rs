//! Client configuration.
//!
//! Precedence, lowest first: built-in defaults, an optional YAML file
//! (path in `TRIPGEN_CONFIG`), then `TRIPGEN_*` environment variables.
//! Malformed numeric variables are ignored and the previous value kept.

use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

use crate::retry::RetryPolicy;
use crate::{Error, Result};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 32;

/// Everything needed to build a [`GenAiClient`](crate::GenAiClient).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub pool_max_idle_per_host: usize,
    pub proxy_url: Option<String>,
    pub retry: RetryPolicy,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .field("proxy_url", &self.proxy_url)
            .field("retry", &self.retry)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            proxy_url: None,
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults, then `TRIPGEN_CONFIG` if set, then the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match lookup("TRIPGEN_CONFIG").filter(|p| !p.trim().is_empty()) {
            Some(path) => Self::from_yaml_file(path.trim())?,
            None => Self::default(),
        };
        Ok(base.with_overrides(lookup))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::configuration(format!("invalid client config: {}", e)))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!(
                "failed to read client config {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Apply `TRIPGEN_*` variables on top of `self`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(key) = text("TRIPGEN_API_KEY").or_else(|| text("GEMINI_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(model) = text("TRIPGEN_MODEL") {
            self.model = model;
        }
        if let Some(base_url) = text("TRIPGEN_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(proxy) = text("TRIPGEN_PROXY_URL") {
            self.proxy_url = Some(proxy);
        }
        if let Some(v) = text("TRIPGEN_HTTP_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.timeout_secs = v;
        }
        if let Some(v) = text("TRIPGEN_HTTP_POOL_MAX_IDLE_PER_HOST").and_then(|s| s.parse().ok()) {
            self.pool_max_idle_per_host = v;
        }
        if let Some(v) = text("TRIPGEN_MAX_RETRIES").and_then(|s| s.parse().ok()) {
            self.retry.max_retries = v;
        }
        if let Some(v) = text("TRIPGEN_RETRY_INITIAL_DELAY_MS").and_then(|s| s.parse().ok()) {
            self.retry.initial_delay_ms = v;
        }
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The credential, or a configuration error when it is absent or blank.
    pub fn api_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(Error::configuration(
                "No API key configured. Set TRIPGEN_API_KEY (or GEMINI_API_KEY).",
            )),
        }
    }

    /// Base URL without a trailing slash, checked to be an absolute http(s) URL.
    pub fn endpoint_base(&self) -> Result<String> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            Error::configuration(format!("invalid base url '{}': {}", self.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::configuration(format!(
                "base url '{}' must use http or https",
                self.base_url
            )));
        }
        Ok(self.base_url.trim_end_matches('/').to_string())
    }
}
