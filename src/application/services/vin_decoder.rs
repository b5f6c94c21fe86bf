//! # VIN Decoder
//!
//! Validates and decodes Vehicle Identification Numbers.
//!
//! Decoding always starts from the VIN structure: manufacturer from the
//! WMI, model year from position 10, plant from position 11. When a
//! [`VehicleDataProvider`] is configured it is asked first for descriptive
//! attributes; any provider failure or timeout is logged and the structural
//! decode is returned instead.

use crate::domain::entities::vehicle::{DecodedVehicle, VehicleAttributes};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::manufacturer::resolve_manufacturer;
use crate::domain::value_objects::enums::CheckDigitPolicy;
use crate::domain::value_objects::model_year::resolve_model_year;
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::vin::Vin;
use crate::infrastructure::vehicle_data::VehicleDataProvider;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Default bound on a provider lookup.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(15);

/// Outcome of [`VinDecoder::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationResult {
    /// Whether the VIN passes under the active policy.
    pub valid: bool,
    /// Trimmed, uppercased input.
    pub vin: String,
    /// Human-readable outcome.
    pub message: String,
    /// Whether the check digit matched; absent if the VIN is malformed.
    pub check_digit_valid: Option<bool>,
    /// Check digit computed from the VIN; absent if the VIN is malformed.
    pub expected_check_digit: Option<char>,
    /// Policy the result was evaluated under.
    pub policy: CheckDigitPolicy,
}

/// VIN validator and decoder.
#[derive(Debug, Clone)]
pub struct VinDecoder {
    provider: Option<Arc<dyn VehicleDataProvider>>,
    policy: CheckDigitPolicy,
    provider_timeout: Duration,
}

impl Default for VinDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl VinDecoder {
    /// Creates a structural-only decoder with the strict policy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: None,
            policy: CheckDigitPolicy::default(),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Consults `provider` before falling back to the structural decode.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn VehicleDataProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Sets the check-digit policy.
    #[must_use]
    pub fn with_policy(mut self, policy: CheckDigitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the bound on each provider lookup.
    #[must_use]
    pub fn with_timeout(mut self, provider_timeout: Duration) -> Self {
        self.provider_timeout = provider_timeout;
        self
    }

    /// Returns the check-digit policy.
    #[must_use]
    pub fn policy(&self) -> CheckDigitPolicy {
        self.policy
    }

    /// Returns true if a provider is configured.
    #[must_use]
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Parses a VIN and applies the check-digit policy.
    ///
    /// # Errors
    ///
    /// Returns the syntax errors of [`Vin::parse`], and
    /// `DomainError::CheckDigitMismatch` under the strict policy.
    pub fn check(&self, raw: &str) -> DomainResult<Vin> {
        let vin = Vin::parse(raw)?;
        if self.policy == CheckDigitPolicy::Strict {
            vin.verify_check_digit()?;
        }
        Ok(vin)
    }

    /// Validates a VIN without decoding it.
    #[must_use]
    pub fn validate(&self, raw: &str) -> ValidationResult {
        let normalized = raw.trim().to_uppercase();
        let vin = match Vin::parse(raw) {
            Ok(vin) => vin,
            Err(error) => {
                return ValidationResult {
                    valid: false,
                    vin: normalized,
                    message: error.to_string(),
                    check_digit_valid: None,
                    expected_check_digit: None,
                    policy: self.policy,
                };
            }
        };

        let expected = vin.compute_check_digit();
        let check_digit_valid = expected == vin.check_digit();
        let (valid, message) = match (check_digit_valid, self.policy) {
            (true, _) => (true, "VIN is valid".to_string()),
            (false, CheckDigitPolicy::Lenient) => {
                (true, "VIN is valid (check digit mismatch)".to_string())
            }
            (false, CheckDigitPolicy::Strict) => (
                false,
                DomainError::CheckDigitMismatch {
                    expected,
                    actual: vin.check_digit(),
                }
                .to_string(),
            ),
        };

        ValidationResult {
            valid,
            vin: normalized,
            message,
            check_digit_valid: Some(check_digit_valid),
            expected_check_digit: Some(expected),
            policy: self.policy,
        }
    }

    /// Decodes a VIN as of the current year.
    ///
    /// # Errors
    ///
    /// See [`VinDecoder::decode_at`].
    pub async fn decode(&self, raw: &str, model_year: Option<i32>) -> DomainResult<DecodedVehicle> {
        self.decode_at(raw, model_year, Timestamp::now().year())
            .await
    }

    /// Decodes a VIN, resolving the model year and vehicle age relative to
    /// `current_year`.
    ///
    /// `model_year` is only passed to the provider as a hint.
    ///
    /// # Errors
    ///
    /// Returns a VIN error from [`VinDecoder::check`]. Provider failures are
    /// never returned.
    pub async fn decode_at(
        &self,
        raw: &str,
        model_year: Option<i32>,
        current_year: i32,
    ) -> DomainResult<DecodedVehicle> {
        let vin = self.check(raw)?;
        if !vin.has_valid_check_digit() {
            debug!(vin = %vin, "check digit mismatch tolerated by lenient policy");
        }

        let make = resolve_manufacturer(vin.wmi()).to_string();
        let year = resolve_model_year(vin.model_year_code(), current_year);

        let decoded = match self.enrich(&vin, model_year).await {
            Some(attributes) => DecodedVehicle::from_attributes(&vin, attributes, make, year),
            None => DecodedVehicle::from_structure(&vin, make, year),
        };
        Ok(decoded.with_age_as_of(current_year))
    }

    async fn enrich(&self, vin: &Vin, model_year: Option<i32>) -> Option<VehicleAttributes> {
        let provider = self.provider.as_ref()?;

        match timeout(self.provider_timeout, provider.lookup(vin, model_year)).await {
            Ok(Ok(attributes)) => Some(attributes),
            Ok(Err(error)) => {
                warn!(
                    provider = provider.name(),
                    vin = %vin,
                    kind = error.kind(),
                    error = %error,
                    "vehicle data lookup failed, using structural decode"
                );
                None
            }
            Err(_) => {
                warn!(
                    provider = provider.name(),
                    vin = %vin,
                    timeout_ms = self.provider_timeout.as_millis() as u64,
                    "vehicle data lookup timed out, using structural decode"
                );
                None
            }
        }
    }
}
