//! Error types for structured output validation.

use std::fmt;

/// Validation error with location information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error message describing what went wrong
    pub message: String,
    /// JSON path to the error location (e.g., "days[0].title")
    pub path: Option<String>,
}

impl ValidationError {
    /// Create an error with a path.
    pub fn with_path(message: impl Into<String>, path: String) -> Self {
        Self {
            message: message.into(),
            path: Some(path).filter(|p| !p.is_empty()),
        }
    }

    /// Create an error without path.
    pub fn without_path(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Result of validation operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// List of validation errors (empty if valid)
    pub errors: Vec<ValidationError>,
    /// Validated data (None if invalid)
    pub data: Option<serde_json::Value>,
}

impl ValidationResult {
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            errors: Vec::new(),
            data: Some(data),
        }
    }

    pub fn failure(errors: Vec<ValidationError>) -> Self {
        Self { errors, data: None }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get errors as formatted strings.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }

    pub fn into_result(self) -> Result<serde_json::Value, Vec<ValidationError>> {
        if self.is_valid() {
            Ok(self.data.unwrap_or(serde_json::Value::Null))
        } else {
            Err(self.errors)
        }
    }
}

/// Why a structured reply was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaViolation {
    /// The reply was not a JSON document.
    #[error("reply is not valid JSON: {0}")]
    Malformed(String),

    /// The reply was JSON but broke the schema.
    #[error("reply violates schema '{schema}': {}", .errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Invalid {
        schema: &'static str,
        errors: Vec<ValidationError>,
    },

    /// The validated reply could not be decoded into the operation's result type.
    #[error("reply could not be decoded: {0}")]
    Decode(String),
}

impl SchemaViolation {
    /// Path of the first offending field, if known.
    pub fn first_path(&self) -> Option<&str> {
        match self {
            Self::Invalid { errors, .. } => errors.iter().find_map(|e| e.path.as_deref()),
            _ => None,
        }
    }
}
