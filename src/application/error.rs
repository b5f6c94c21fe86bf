//! # Application Errors
//!
//! Error types for the application layer.
//!
//! These errors represent failures that can occur while wiring or running
//! the quote flow: invalid input, domain rule violations and
//! infrastructure failures that could not be absorbed by a fallback.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)                 - Malformed VIN, jurisdiction, coverage
//! ├── Rating(RatingError)                 - Quote composition failures
//! ├── Vsc(VscRatingError)                 - Service contract pricing failures
//! ├── Infrastructure(InfrastructureError) - Store, provider and config failures
//! └── Validation(String)                  - Request fields outside accepted ranges
//! ```
//!
//! # Examples
//!
//! ```
//! use protection_quote::application::error::{ApplicationError, InfrastructureError};
//!
//! let err = ApplicationError::validation("model year 1901 is out of range");
//! assert!(err.is_validation());
//!
//! let infra_err = InfrastructureError::configuration("log level: bogus");
//! let app_err: ApplicationError = infra_err.into();
//! assert!(!app_err.is_input_error());
//! ```

use crate::application::services::rating_engine::RatingError;
use crate::application::services::vsc_rating_engine::VscRatingError;
use crate::domain::errors::DomainError;
use crate::infrastructure::persistence::StoreError;
use crate::infrastructure::vehicle_data::ProviderError;
use thiserror::Error;

/// Infrastructure layer error.
///
/// Represents errors from external systems: the database, the vehicle data
/// provider and the configuration sources.
#[derive(Debug, Error)]
pub enum InfrastructureError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Pricing or settings store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Vehicle data provider error.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl InfrastructureError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Configuration(_) => false,
            Self::Store(e) => e.is_connection(),
            Self::Provider(e) => e.is_transient(),
        }
    }
}

impl From<config::ConfigError> for InfrastructureError {
    fn from(error: config::ConfigError) -> Self {
        Self::Configuration(error.to_string())
    }
}

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain error from business logic.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Quote could not be rated.
    #[error("rating error: {0}")]
    Rating(#[from] RatingError),

    /// Service contract could not be rated.
    #[error("vsc rating error: {0}")]
    Vsc(#[from] VscRatingError),

    /// Infrastructure error from external systems.
    #[error("infrastructure error: {0}")]
    Infrastructure(#[from] InfrastructureError),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Infrastructure(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if the caller can fix the error by changing the request.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::Domain(e) => !matches!(e, DomainError::Arithmetic(_)),
            Self::Rating(e) => e.is_input_error(),
            Self::Vsc(e) => e.is_input_error(),
            Self::Infrastructure(_) => false,
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::arithmetic::ArithmeticError;

    // InfrastructureError tests

    #[test]
    fn infrastructure_error_configuration() {
        let err = InfrastructureError::configuration("missing base url");
        assert!(err.to_string().contains("configuration"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn infrastructure_error_from_config_error() {
        let err: InfrastructureError = config::ConfigError::NotFound("quote".to_string()).into();
        assert!(matches!(err, InfrastructureError::Configuration(_)));
    }

    #[test]
    fn infrastructure_error_from_store_error() {
        let err: InfrastructureError = StoreError::connection("refused").into();
        assert!(err.to_string().contains("refused"));
        assert!(err.is_retryable());

        let err: InfrastructureError = StoreError::query("syntax").into();
        assert!(!err.is_retryable());
    }

    #[test]
    fn infrastructure_error_from_provider_error() {
        let err: InfrastructureError = ProviderError::http_status(503, "unavailable").into();
        assert!(err.to_string().contains("503"));
        assert!(err.is_retryable());

        let err: InfrastructureError = ProviderError::http_status(404, "missing").into();
        assert!(!err.is_retryable());
    }

    // ApplicationError tests

    #[test]
    fn application_error_validation() {
        let err = ApplicationError::validation("model year 1901 is out of range");
        assert!(err.to_string().contains("1901"));
        assert!(err.is_validation());
        assert!(err.is_input_error());
        assert!(!err.is_retryable());
    }

    #[test]
    fn application_error_from_domain_error() {
        let app_err: ApplicationError = DomainError::InvalidVinLength { actual: 8 }.into();
        assert!(app_err.to_string().contains("received 8"));
        assert!(app_err.is_input_error());
    }

    #[test]
    fn application_error_from_rating_error() {
        let app_err: ApplicationError = RatingError::UnknownProduct("NOPE".to_string()).into();
        assert!(app_err.to_string().contains("NOPE"));
        assert!(app_err.is_input_error());
        assert!(!app_err.is_retryable());
    }

    #[test]
    fn application_error_from_vsc_error() {
        let app_err: ApplicationError = VscRatingError::InvalidMileage {
            mileage: 600_000,
            max: 500_000,
        }
        .into();
        assert!(app_err.to_string().contains("600000"));
        assert!(app_err.is_input_error());

        let app_err: ApplicationError =
            VscRatingError::Arithmetic(ArithmeticError::Overflow).into();
        assert!(!app_err.is_input_error());
    }

    #[test]
    fn application_error_from_infrastructure_error() {
        let infra_err = InfrastructureError::from(StoreError::connection("down"));
        let app_err: ApplicationError = infra_err.into();
        assert!(app_err.to_string().contains("infrastructure"));
        assert!(app_err.is_retryable());
        assert!(!app_err.is_input_error());
    }
}
