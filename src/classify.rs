//! Failure classification.
//!
//! Turns a raw [`TransportFailure`] (or a schema violation) into the crate's
//! [`Error`]. This is the only place raw failures are inspected; classified
//! errors are never classified again.

use tracing::warn;

use crate::error_code::ErrorKind;
use crate::structured::SchemaViolation;
use crate::transport::{mentions_rate_limit, TransportFailure};
use crate::Error;

const NETWORK_MARKERS: &[&str] = &[
    "failed to fetch",
    "error sending request",
    "connection refused",
    "connection reset",
    "dns error",
    "network error",
    "network is unreachable",
];

const INVALID_CREDENTIAL_MARKERS: &[&str] = &["API key not valid", "API_KEY_INVALID"];

fn contains_any(text: &str, markers: &[&str]) -> bool {
    let lower = text.to_lowercase();
    markers.iter().any(|m| lower.contains(&m.to_lowercase()))
}

fn mentions_invalid_credential(text: &str) -> bool {
    contains_any(text, INVALID_CREDENTIAL_MARKERS)
}

/// Decide the kind of a raw failure. First match wins.
fn kind_of(failure: &TransportFailure) -> Option<ErrorKind> {
    match failure {
        TransportFailure::Connect(_) => Some(ErrorKind::Network),
        TransportFailure::Message(message)
            if !mentions_rate_limit(message) && contains_any(message, NETWORK_MARKERS) =>
        {
            Some(ErrorKind::Network)
        }
        TransportFailure::Status {
            code,
            status,
            message,
            ..
        } => {
            if mentions_invalid_credential(message) {
                return Some(ErrorKind::Configuration);
            }
            let by_status = status
                .as_deref()
                .and_then(ErrorKind::from_rpc_status)
                .filter(|k| *k != ErrorKind::Cancelled);
            by_status
                .or_else(|| ErrorKind::from_http_status(*code))
                .or_else(|| kind_from_message(message))
        }
        TransportFailure::Message(message) => kind_from_message(message),
        TransportFailure::Configuration(_) => Some(ErrorKind::Configuration),
        TransportFailure::Cancelled => Some(ErrorKind::Cancelled),
    }
}

fn kind_from_message(message: &str) -> Option<ErrorKind> {
    if mentions_rate_limit(message) {
        Some(ErrorKind::RateLimit)
    } else if mentions_invalid_credential(message) {
        Some(ErrorKind::Configuration)
    } else {
        None
    }
}

/// Classify a raw provider failure.
///
/// Never fails. Unrecognized failures become [`ErrorKind::Unknown`] carrying
/// `default_message` verbatim; a failure already tagged as a configuration
/// problem keeps its own message.
pub fn classify(failure: TransportFailure, default_message: &str) -> Error {
    warn!(failure = %failure, "provider call failed");

    let kind = kind_of(&failure);
    let error = match (kind, &failure) {
        (Some(ErrorKind::Configuration), TransportFailure::Configuration(message)) => {
            Error::configuration(message.clone())
        }
        (Some(kind), _) => Error::new(kind),
        (None, _) => Error::with_message(ErrorKind::Unknown, default_message),
    };
    error.with_cause(failure)
}

/// Classify a reply that did not satisfy the operation's schema.
///
/// The user sees `default_message`; schema details stay in the cause.
pub fn classify_schema(violation: SchemaViolation, default_message: &str) -> Error {
    warn!(violation = %violation, "structured reply rejected");
    Error::with_message(ErrorKind::Schema, default_message).with_cause(violation)
}
