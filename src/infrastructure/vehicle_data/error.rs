//! # Provider Errors
//!
//! Error types for vehicle-data provider lookups.
//!
//! None of these reach callers of the decoder: any provider failure sends
//! the decode down the structural path. They exist so the fallback can be
//! logged with a precise reason.
//!
//! # Examples
//!
//! ```
//! use protection_quote::infrastructure::vehicle_data::ProviderError;
//!
//! let error = ProviderError::timeout("request timed out after 15000ms");
//! assert!(error.is_transient());
//!
//! let error = ProviderError::MissingMake;
//! assert!(!error.is_transient());
//! ```

use thiserror::Error;

/// Error type for vehicle-data provider operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Request timed out.
    #[error("provider timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Timeout duration in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// Network or connection error.
    #[error("provider connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Provider answered with a non-success status.
    #[error("provider returned HTTP {status}: {message}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// Response body could not be parsed.
    #[error("provider invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },

    /// Response parsed but carried no make.
    #[error("provider response has no make")]
    MissingMake,

    /// Client could not be built.
    #[error("provider internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl ProviderError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error with duration.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates an HTTP status error.
    #[must_use]
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            message: message.into(),
        }
    }

    /// Creates an invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true for failures that might not recur on another request.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connection { .. } => true,
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Short label for structured logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Connection { .. } => "connection",
            Self::HttpStatus { .. } => "http_status",
            Self::InvalidResponse { .. } => "invalid_response",
            Self::MissingMake => "missing_make",
            Self::Internal { .. } => "internal",
        }
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_transient() {
        let error = ProviderError::timeout_with_duration("slow", 15_000);
        assert!(error.is_transient());
        assert_eq!(error.kind(), "timeout");
    }

    #[test]
    fn server_errors_are_transient() {
        assert!(ProviderError::http_status(503, "down").is_transient());
        assert!(ProviderError::http_status(429, "slow down").is_transient());
        assert!(!ProviderError::http_status(404, "missing").is_transient());
    }

    #[test]
    fn malformed_data_is_not_transient() {
        assert!(!ProviderError::invalid_response("bad json").is_transient());
        assert!(!ProviderError::MissingMake.is_transient());
    }

    #[test]
    fn display_format() {
        let display = ProviderError::http_status(500, "boom").to_string();
        assert!(display.contains("500"));
        assert!(display.contains("boom"));
    }
}
