//! # Domain Errors
//!
//! Error types for business rule and input validation failures.
//!
//! These errors describe invalid input handed to the core (malformed VINs,
//! unsupported coverage tiers, bad jurisdiction codes) and arithmetic
//! failures during price composition. They are always surfaced to the caller
//! with a specific reason.
//!
//! # Examples
//!
//! ```
//! use protection_quote::domain::errors::DomainError;
//!
//! let err = DomainError::InvalidVinLength { actual: 12 };
//! assert!(err.to_string().contains("12"));
//! assert!(err.is_vin_error());
//! ```

use crate::domain::value_objects::arithmetic::ArithmeticError;
use thiserror::Error;

/// Domain layer error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// No VIN was supplied.
    #[error("VIN is required")]
    EmptyVin,

    /// VIN is not exactly 17 characters long.
    #[error("VIN must be exactly 17 characters (received {actual})")]
    InvalidVinLength {
        /// Length of the normalized input.
        actual: usize,
    },

    /// VIN contains characters outside `[A-HJ-NPR-Z0-9]`.
    #[error("VIN contains invalid characters: {invalid} (I, O, Q not allowed)")]
    InvalidVinCharacters {
        /// The offending characters, comma separated.
        invalid: String,
    },

    /// The 9th character does not match the computed check digit.
    #[error("invalid VIN check digit: expected {expected}, found {actual}")]
    CheckDigitMismatch {
        /// Check digit computed from the other 16 positions.
        expected: char,
        /// Check digit present in the VIN.
        actual: char,
    },

    /// Jurisdiction code is empty or not alphabetic.
    #[error("invalid jurisdiction code: {0}")]
    InvalidJurisdiction(String),

    /// Coverage limit is not one of the supported tiers.
    #[error("unsupported coverage limit: {0} (supported: 500, 1000)")]
    InvalidCoverageLimit(u32),

    /// Arithmetic failure while composing a price.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),

    /// Generic validation failure.
    #[error("validation error: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Creates a generic validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// Returns true if this error describes a malformed VIN.
    #[must_use]
    pub fn is_vin_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyVin
                | Self::InvalidVinLength { .. }
                | Self::InvalidVinCharacters { .. }
                | Self::CheckDigitMismatch { .. }
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
