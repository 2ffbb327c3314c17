use crate::error_code::ErrorKind;
use thiserror::Error;

/// Structured error context for logging and debugging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Operation that failed (e.g., "generate_itinerary")
    pub operation: Option<String>,
    /// Pipeline stage at the time of failure (e.g., "grounding", "formatting")
    pub stage: Option<String>,
    /// Field path in the structured reply that caused the error (e.g., "days[0].title")
    pub field_path: Option<String>,
    /// Additional context about the error
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Classified error: the only failure type that leaves the crate.
///
/// `Display` renders the user-facing message. The raw failure is kept as
/// [`std::error::Error::source`] for logging and must not be shown to users.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: ErrorContext,
    #[source]
    cause: Option<Cause>,
}

impl Error {
    /// Create an error of `kind` with that kind's stable user message.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: kind.user_message().to_string(),
            context: ErrorContext::new(),
            cause: None,
        }
    }

    /// Create an error with an explicit user-facing message.
    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: ErrorContext::new(),
            cause: None,
        }
    }

    /// Missing or invalid client configuration.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::Configuration, message)
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled)
    }

    pub(crate) fn with_cause(
        mut self,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = context;
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable text, safe to display.
    pub fn user_message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &ErrorContext {
        &self.context
    }

    /// The raw failure this error was classified from (diagnostics only).
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.retryable()
    }
}
