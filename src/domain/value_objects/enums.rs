//! # Domain Enums
//!
//! Enumeration types for domain concepts.
//!
//! - [`CustomerType`] - Retail or wholesale pricing class
//! - [`DataSource`] - Where a resolved value came from
//! - [`CoverageLimit`] - Supported coverage tiers
//! - [`DecodeMethod`] - How a VIN was decoded
//! - [`CheckDigitPolicy`] - Whether check-digit mismatches block decoding
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits.

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an enum from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEnumError {
    /// The input does not name any variant.
    #[error("invalid {0} value: {1}")]
    InvalidValue(&'static str, String),
}

/// Customer pricing class.
///
/// # Examples
///
/// ```
/// use protection_quote::domain::value_objects::enums::CustomerType;
///
/// let tier: CustomerType = "Wholesale".parse().unwrap();
/// assert!(tier.is_wholesale());
/// assert_eq!(tier.to_string(), "wholesale");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    /// Direct consumer pricing.
    #[default]
    Retail,
    /// Dealer/reseller pricing with a fixed discount.
    Wholesale,
}

impl CustomerType {
    /// Returns true for the wholesale tier.
    #[inline]
    #[must_use]
    pub const fn is_wholesale(self) -> bool {
        matches!(self, Self::Wholesale)
    }

    /// Returns the value stored in the `customer_type` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Retail => "retail",
            Self::Wholesale => "wholesale",
        }
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "retail" => Ok(Self::Retail),
            "wholesale" => Ok(Self::Wholesale),
            _ => Err(ParseEnumError::InvalidValue("CustomerType", s.to_string())),
        }
    }
}

/// Origin of a resolved price or setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// The authoritative store answered.
    Database,
    /// The embedded fallback table answered.
    Hardcoded,
}

impl DataSource {
    /// Returns true if the value came from the authoritative store.
    #[inline]
    #[must_use]
    pub const fn is_database(self) -> bool {
        matches!(self, Self::Database)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database => write!(f, "database"),
            Self::Hardcoded => write!(f, "hardcoded"),
        }
    }
}

/// Supported coverage tiers.
///
/// Only two limits are sold; any other value is rejected rather than
/// silently priced as the base tier.
///
/// # Examples
///
/// ```
/// use protection_quote::domain::value_objects::enums::CoverageLimit;
/// use rust_decimal::Decimal;
///
/// let tier = CoverageLimit::try_from(1000).unwrap();
/// assert_eq!(tier.multiplier(), Decimal::new(12, 1));
/// assert!(CoverageLimit::try_from(750).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum CoverageLimit {
    /// $500 coverage limit.
    #[default]
    Standard,
    /// $1000 coverage limit.
    Enhanced,
}

impl CoverageLimit {
    /// All supported tiers, lowest first.
    pub const ALL: [Self; 2] = [Self::Standard, Self::Enhanced];

    /// Returns the coverage amount in whole currency units.
    #[must_use]
    pub const fn amount(self) -> u32 {
        match self {
            Self::Standard => 500,
            Self::Enhanced => 1000,
        }
    }

    /// Returns the price multiplier for this tier.
    #[must_use]
    pub fn multiplier(self) -> Decimal {
        match self {
            Self::Standard => Decimal::ONE,
            Self::Enhanced => Decimal::new(12, 1),
        }
    }
}

impl TryFrom<u32> for CoverageLimit {
    type Error = ParseEnumError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.amount() == value)
            .ok_or_else(|| ParseEnumError::InvalidValue("CoverageLimit", value.to_string()))
    }
}

impl From<CoverageLimit> for u32 {
    fn from(value: CoverageLimit) -> Self {
        value.amount()
    }
}

impl fmt::Display for CoverageLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.amount())
    }
}

/// How a VIN was decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DecodeMethod {
    /// Attributes came from the external vehicle-data provider.
    ExternalApi,
    /// Attributes were derived from the VIN structure alone.
    BasicStructure,
}

impl fmt::Display for DecodeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExternalApi => write!(f, "external_api"),
            Self::BasicStructure => write!(f, "basic_structure"),
        }
    }
}

/// Policy applied when the VIN check digit does not match.
///
/// Legacy and non-North-American VINs frequently carry no valid check digit,
/// so decoding can be allowed to proceed with a warning.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum CheckDigitPolicy {
    /// A mismatch fails validation and blocks decoding.
    #[default]
    Strict,
    /// A mismatch is reported but decoding proceeds.
    Lenient,
}

impl fmt::Display for CheckDigitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Lenient => write!(f, "lenient"),
        }
    }
}

impl FromStr for CheckDigitPolicy {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(ParseEnumError::InvalidValue(
                "CheckDigitPolicy",
                s.to_string(),
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn customer_type_parses_case_insensitively() {
        assert_eq!("RETAIL".parse::<CustomerType>().unwrap(), CustomerType::Retail);
        assert_eq!(
            " wholesale ".parse::<CustomerType>().unwrap(),
            CustomerType::Wholesale
        );
        assert!("dealer".parse::<CustomerType>().is_err());
    }

    #[test]
    fn customer_type_serializes_lowercase() {
        let json = serde_json::to_string(&CustomerType::Wholesale).unwrap();
        assert_eq!(json, "\"wholesale\"");
    }

    #[test]
    fn coverage_limit_round_trips_through_u32() {
        let json = serde_json::to_string(&CoverageLimit::Enhanced).unwrap();
        assert_eq!(json, "1000");
        let parsed: CoverageLimit = serde_json::from_str("500").unwrap();
        assert_eq!(parsed, CoverageLimit::Standard);
        assert!(serde_json::from_str::<CoverageLimit>("250").is_err());
    }

    #[test]
    fn coverage_multipliers() {
        assert_eq!(CoverageLimit::Standard.multiplier(), Decimal::ONE);
        assert_eq!(CoverageLimit::Enhanced.multiplier(), Decimal::new(12, 1));
    }

    #[test]
    fn data_source_display() {
        assert_eq!(DataSource::Database.to_string(), "database");
        assert_eq!(DataSource::Hardcoded.to_string(), "hardcoded");
        assert!(DataSource::Database.is_database());
    }

    #[test]
    fn decode_method_serializes_snake_case() {
        let json = serde_json::to_string(&DecodeMethod::BasicStructure).unwrap();
        assert_eq!(json, "\"basic_structure\"");
        assert_eq!(DecodeMethod::ExternalApi.to_string(), "external_api");
    }

    #[test]
    fn check_digit_policy_defaults_to_strict() {
        assert_eq!(CheckDigitPolicy::default(), CheckDigitPolicy::Strict);
        assert_eq!(
            "Lenient".parse::<CheckDigitPolicy>().unwrap(),
            CheckDigitPolicy::Lenient
        );
    }
}
