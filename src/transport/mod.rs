//! Transport layer: raw failures as observed at the provider boundary and
//! the HTTP transport that produces them.

pub mod http;

pub use http::HttpTransport;

/// Raw failure of a single provider call.
///
/// This is the only failure shape the retry policy and the classifier look at.
/// It is never shown to end users; [`crate::classify`] turns it into an
/// [`crate::Error`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportFailure {
    /// The provider answered with a structured error body.
    #[error("provider error {code}{}: {message}", format_status(.status))]
    Status {
        code: u16,
        status: Option<String>,
        message: String,
        retry_after_ms: Option<u64>,
    },

    /// The request never completed at the transport level (connect, DNS, timeout).
    #[error("connection failed: {0}")]
    Connect(String),

    /// An unstructured failure that only carries a message.
    #[error("{0}")]
    Message(String),

    /// A configuration failure raised before any request was sent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The caller cancelled the call.
    #[error("request cancelled")]
    Cancelled,
}

fn format_status(status: &Option<String>) -> String {
    match status {
        Some(s) => format!(" ({})", s),
        None => String::new(),
    }
}

pub(crate) const RATE_LIMIT_STATUS: &str = "RESOURCE_EXHAUSTED";

impl TransportFailure {
    pub fn status(code: u16, status: Option<&str>, message: impl Into<String>) -> Self {
        Self::Status {
            code,
            status: status.map(str::to_string),
            message: message.into(),
            retry_after_ms: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Text carried by the failure, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. }
            | Self::Connect(message)
            | Self::Message(message)
            | Self::Configuration(message) => Some(message),
            Self::Cancelled => None,
        }
    }

    /// Whether this is a quota failure that may succeed after a delay.
    ///
    /// Checks the structured fields first, then falls back to the message text,
    /// since some failures only mention the quota status in prose.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::Status {
                code,
                status,
                message,
                ..
            } => {
                *code == 429
                    || status.as_deref() == Some(RATE_LIMIT_STATUS)
                    || mentions_rate_limit(message)
            }
            Self::Message(message) => mentions_rate_limit(message),
            Self::Connect(_) | Self::Configuration(_) | Self::Cancelled => false,
        }
    }

    /// Provider-suggested wait before the next attempt.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::Status { retry_after_ms, .. } => *retry_after_ms,
            _ => None,
        }
    }
}

pub(crate) fn mentions_rate_limit(text: &str) -> bool {
    text.contains("429") || text.contains(RATE_LIMIT_STATUS)
}

impl From<reqwest::Error> for TransportFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            return Self::Connect(err.to_string());
        }
        match err.status() {
            Some(status) => Self::status(status.as_u16(), None, err.to_string()),
            None => Self::Message(err.to_string()),
        }
    }
}
