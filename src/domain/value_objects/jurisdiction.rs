//! # Jurisdiction
//!
//! Two-letter (or longer) region code that drives tax rate and price
//! multiplier lookups. Codes are normalized to uppercase.

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A normalized jurisdiction code such as `FL` or `CA`.
///
/// # Examples
///
/// ```
/// use protection_quote::domain::value_objects::jurisdiction::Jurisdiction;
///
/// let state = Jurisdiction::new(" ca ").unwrap();
/// assert_eq!(state.as_str(), "CA");
/// assert_eq!(Jurisdiction::default().as_str(), "FL");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Jurisdiction(String);

impl Jurisdiction {
    /// Jurisdiction used when the caller supplies none.
    pub const DEFAULT_CODE: &'static str = "FL";

    /// Creates a jurisdiction from a raw code.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidJurisdiction` if the trimmed code is
    /// empty or contains anything other than ASCII letters.
    pub fn new(code: &str) -> DomainResult<Self> {
        let normalized = code.trim().to_ascii_uppercase();
        if normalized.is_empty() || !normalized.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::InvalidJurisdiction(code.to_string()));
        }
        Ok(Self(normalized))
    }

    /// Returns the code as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form used in settings keys (`taxes.ca_tax_rate`).
    #[must_use]
    pub fn settings_fragment(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl Default for Jurisdiction {
    fn default() -> Self {
        Self(Self::DEFAULT_CODE.to_string())
    }
}

impl FromStr for Jurisdiction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Jurisdiction {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Jurisdiction> for String {
    fn from(value: Jurisdiction) -> Self {
        value.0
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_to_uppercase() {
        assert_eq!(Jurisdiction::new("ny").unwrap().as_str(), "NY");
    }

    #[test]
    fn rejects_empty_and_non_alphabetic() {
        assert!(Jurisdiction::new("   ").is_err());
        assert!(Jurisdiction::new("C4").is_err());
        assert!(matches!(
            Jurisdiction::new("F-L"),
            Err(DomainError::InvalidJurisdiction(_))
        ));
    }

    #[test]
    fn settings_fragment_is_lowercase() {
        assert_eq!(Jurisdiction::new("TX").unwrap().settings_fragment(), "tx");
    }

    #[test]
    fn deserializes_with_validation() {
        let parsed: Jurisdiction = serde_json::from_str("\"il\"").unwrap();
        assert_eq!(parsed.as_str(), "IL");
        assert!(serde_json::from_str::<Jurisdiction>("\"12\"").is_err());
    }
}
