//! Error taxonomy: the closed set of failure kinds exposed to callers.
//!
//! Every failure that leaves the crate carries exactly one [`ErrorKind`].
//! Each kind owns a stable code, a snake_case name and one non-technical
//! message that is safe to show to an end user.
//!
//! ## Code Categories
//!
//! | Prefix | Category    | Description                         |
//! |--------|-------------|-------------------------------------|
//! | E1xxx  | client      | Request-side and credential errors  |
//! | E2xxx  | rate        | Quota and rate limit errors         |
//! | E3xxx  | server      | Provider-side and transport errors  |
//! | E4xxx  | operational | Caller-initiated lifecycle outcomes |
//! | E5xxx  | contract    | Reply did not match the schema      |
//! | E9xxx  | unknown     | Catch-all / unclassified            |
//!
//! ## Example
//!
//! ```rust
//! use tripgen::error_code::ErrorKind;
//!
//! let kind = ErrorKind::from_rpc_status("RESOURCE_EXHAUSTED").unwrap();
//! assert_eq!(kind.code(), "E2001");
//! assert!(kind.retryable());
//! assert_eq!(kind.category(), "rate");
//! ```

use std::fmt;

/// Kind of a classified failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// E1001: The provider rejected the request as malformed
    Validation,
    /// E1002: Credential missing, empty or rejected
    Configuration,
    /// E1003: Valid credential without access to the resource
    Permission,
    /// E2001: Request quota exceeded; safe to retry after a delay
    RateLimit,
    /// E3001: Internal error on the provider side
    Server,
    /// E3004: The request never reached the provider (offline, DNS, timeout)
    Network,
    /// E4002: The caller abandoned the request
    Cancelled,
    /// E5001: The provider replied, but the reply did not match the contract
    Schema,
    /// E9999: Failure could not be classified
    Unknown,
}

impl ErrorKind {
    /// All kinds, in code order.
    pub const ALL: [ErrorKind; 9] = [
        Self::Validation,
        Self::Configuration,
        Self::Permission,
        Self::RateLimit,
        Self::Server,
        Self::Network,
        Self::Cancelled,
        Self::Schema,
        Self::Unknown,
    ];

    /// Returns the canonical code string (e.g., `"E1001"`).
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation => "E1001",
            Self::Configuration => "E1002",
            Self::Permission => "E1003",
            Self::RateLimit => "E2001",
            Self::Server => "E3001",
            Self::Network => "E3004",
            Self::Cancelled => "E4002",
            Self::Schema => "E5001",
            Self::Unknown => "E9999",
        }
    }

    /// Returns the standard name (e.g., `"rate_limit"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Configuration => "configuration",
            Self::Permission => "permission",
            Self::RateLimit => "rate_limit",
            Self::Server => "server",
            Self::Network => "network",
            Self::Cancelled => "cancelled",
            Self::Schema => "schema",
            Self::Unknown => "unknown",
        }
    }

    /// Returns the category: `"client"`, `"rate"`, `"server"`, `"operational"`,
    /// `"contract"` or `"unknown"`.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation | Self::Configuration | Self::Permission => "client",
            Self::RateLimit => "rate",
            Self::Server | Self::Network => "server",
            Self::Cancelled => "operational",
            Self::Schema => "contract",
            Self::Unknown => "unknown",
        }
    }

    /// Only rate limiting is retried locally; every other kind surfaces immediately.
    #[inline]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::RateLimit)
    }

    /// Stable message shown to end users.
    ///
    /// `Unknown` and `Schema` errors normally carry the calling operation's
    /// own fallback text instead; this is only used when none was supplied.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation => {
                "The travel request could not be processed. Please adjust the details and try again."
            }
            Self::Configuration => {
                "The trip planner is not configured correctly. Please check the API key."
            }
            Self::Permission => "The trip planner is not allowed to use this service.",
            Self::RateLimit => "Too many requests right now. Please wait a moment and try again.",
            Self::Server => "The planning service had a problem. Please try again shortly.",
            Self::Network => {
                "Could not reach the planning service. Please check your internet connection."
            }
            Self::Cancelled => "The request was cancelled.",
            Self::Schema => "The planner returned an unexpected answer. Please try again.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }

    /// Maps a provider RPC status name (e.g., `"PERMISSION_DENIED"`) to a kind.
    pub fn from_rpc_status(status: &str) -> Option<Self> {
        let kind = match status {
            "INVALID_ARGUMENT" | "FAILED_PRECONDITION" => Self::Validation,
            "UNAUTHENTICATED" => Self::Configuration,
            "PERMISSION_DENIED" => Self::Permission,
            "RESOURCE_EXHAUSTED" => Self::RateLimit,
            "INTERNAL" => Self::Server,
            "CANCELLED" => Self::Cancelled,
            _ => return None,
        };
        Some(kind)
    }

    /// Maps an HTTP status code to a kind, when the code has a defined meaning.
    pub fn from_http_status(status: u16) -> Option<Self> {
        let kind = match status {
            400 => Self::Validation,
            401 => Self::Configuration,
            403 => Self::Permission,
            429 => Self::RateLimit,
            500 => Self::Server,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<_> = ErrorKind::ALL.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), ErrorKind::ALL.len());
    }

    #[test]
    fn test_only_rate_limit_is_retryable() {
        for kind in ErrorKind::ALL {
            assert_eq!(kind.retryable(), kind == ErrorKind::RateLimit, "{}", kind.name());
        }
    }

    #[test]
    fn test_rpc_status_mapping() {
        assert_eq!(
            ErrorKind::from_rpc_status("INVALID_ARGUMENT"),
            Some(ErrorKind::Validation)
        );
        assert_eq!(
            ErrorKind::from_rpc_status("PERMISSION_DENIED"),
            Some(ErrorKind::Permission)
        );
        assert_eq!(
            ErrorKind::from_rpc_status("RESOURCE_EXHAUSTED"),
            Some(ErrorKind::RateLimit)
        );
        assert_eq!(ErrorKind::from_rpc_status("INTERNAL"), Some(ErrorKind::Server));
        assert_eq!(ErrorKind::from_rpc_status("NOT_FOUND"), None);
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorKind::from_http_status(400), Some(ErrorKind::Validation));
        assert_eq!(ErrorKind::from_http_status(403), Some(ErrorKind::Permission));
        assert_eq!(ErrorKind::from_http_status(429), Some(ErrorKind::RateLimit));
        assert_eq!(ErrorKind::from_http_status(500), Some(ErrorKind::Server));
        assert_eq!(ErrorKind::from_http_status(418), None);
    }

    #[test]
    fn test_user_messages_are_non_technical() {
        for kind in ErrorKind::ALL {
            let msg = kind.user_message();
            assert!(!msg.is_empty());
            assert!(!msg.contains("RESOURCE_EXHAUSTED"));
            assert!(!msg.contains("429"));
        }
    }

    #[test]
    fn test_display_is_code() {
        assert_eq!(ErrorKind::Network.to_string(), "E3004");
    }
}
