//! # Vehicle Identification Number
//!
//! A [`Vin`] is a validated 17-character identifier split into three
//! sections:
//!
//! | Positions | Section | Contents |
//! |-----------|---------|----------|
//! | 1-3 | WMI | World Manufacturer Identifier |
//! | 4-9 | VDS | Vehicle descriptor, check digit at 9 |
//! | 10-17 | VIS | Model-year code at 10, plant code at 11 |
//!
//! Parsing only enforces length and charset. The check digit is computed
//! separately so that callers can choose whether a mismatch is fatal.
//!
//! # Examples
//!
//! ```
//! use protection_quote::domain::value_objects::vin::Vin;
//!
//! let vin = Vin::parse(" 1hgcm82633a004352 ").unwrap();
//! assert_eq!(vin.wmi(), "1HG");
//! assert_eq!(vin.compute_check_digit(), '3');
//! assert!(vin.has_valid_check_digit());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Required VIN length.
pub const VIN_LENGTH: usize = 17;

/// Positional weights used by the check-digit sum.
pub const CHECK_DIGIT_WEIGHTS: [u32; VIN_LENGTH] =
    [8, 7, 6, 5, 4, 3, 2, 10, 0, 9, 8, 7, 6, 5, 4, 3, 2];

const CHECK_DIGIT_INDEX: usize = 8;
const MODEL_YEAR_INDEX: usize = 9;
const PLANT_CODE_INDEX: usize = 10;

/// Returns true if `c` may appear in a VIN.
#[inline]
#[must_use]
pub fn is_vin_char(c: char) -> bool {
    matches!(c, 'A'..='H' | 'J'..='N' | 'P' | 'R'..='Z' | '0'..='9')
}

/// Numeric value of a VIN character in the check-digit sum.
///
/// Returns `None` for characters outside the VIN charset.
#[must_use]
pub fn transliterate(c: char) -> Option<u32> {
    let value = match c {
        '0'..='9' => c.to_digit(10)?,
        'A' | 'J' => 1,
        'B' | 'K' | 'S' => 2,
        'C' | 'L' | 'T' => 3,
        'D' | 'M' | 'U' => 4,
        'E' | 'N' | 'V' => 5,
        'F' | 'W' => 6,
        'G' | 'P' | 'X' => 7,
        'H' | 'Y' => 8,
        'R' | 'Z' => 9,
        _ => return None,
    };
    Some(value)
}

/// A syntactically valid VIN: 17 characters from `[A-HJ-NPR-Z0-9]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Vin(String);

impl Vin {
    /// Normalizes and validates a raw VIN.
    ///
    /// Input is trimmed and uppercased before validation.
    ///
    /// # Errors
    ///
    /// - `DomainError::EmptyVin` if nothing remains after trimming
    /// - `DomainError::InvalidVinLength` if the length is not 17
    /// - `DomainError::InvalidVinCharacters` listing every offending
    ///   character (I, O, Q, punctuation, non-ASCII)
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(DomainError::EmptyVin);
        }

        let length = normalized.chars().count();
        if length != VIN_LENGTH {
            return Err(DomainError::InvalidVinLength { actual: length });
        }

        let mut invalid: Vec<char> = Vec::new();
        for c in normalized.chars().filter(|c| !is_vin_char(*c)) {
            if !invalid.contains(&c) {
                invalid.push(c);
            }
        }
        if !invalid.is_empty() {
            let listed: Vec<String> = invalid.iter().map(char::to_string).collect();
            return Err(DomainError::InvalidVinCharacters {
                invalid: listed.join(", "),
            });
        }

        Ok(Self(normalized))
    }

    /// Returns the VIN as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// World Manufacturer Identifier (positions 1-3).
    #[must_use]
    pub fn wmi(&self) -> &str {
        self.0.get(..3).unwrap_or_default()
    }

    /// Vehicle Descriptor Section (positions 4-9).
    #[must_use]
    pub fn vds(&self) -> &str {
        self.0.get(3..9).unwrap_or_default()
    }

    /// Vehicle Identifier Section (positions 10-17).
    #[must_use]
    pub fn vis(&self) -> &str {
        self.0.get(9..).unwrap_or_default()
    }

    /// Check digit as printed on the VIN (position 9).
    #[must_use]
    pub fn check_digit(&self) -> char {
        self.char_at(CHECK_DIGIT_INDEX)
    }

    /// Model-year code (position 10).
    #[must_use]
    pub fn model_year_code(&self) -> char {
        self.char_at(MODEL_YEAR_INDEX)
    }

    /// Assembly plant code (position 11).
    #[must_use]
    pub fn plant_code(&self) -> char {
        self.char_at(PLANT_CODE_INDEX)
    }

    /// Computes the expected check digit from all 17 positions.
    ///
    /// The weighted sum of transliterated values is reduced modulo 11; a
    /// remainder of 10 is written as `X`.
    #[must_use]
    pub fn compute_check_digit(&self) -> char {
        let sum: u32 = self
            .0
            .chars()
            .zip(CHECK_DIGIT_WEIGHTS)
            .map(|(c, weight)| transliterate(c).unwrap_or(0) * weight)
            .sum();
        match sum % 11 {
            10 => 'X',
            remainder => char::from_digit(remainder, 10).unwrap_or('X'),
        }
    }

    /// Returns true if the printed check digit matches the computed one.
    #[must_use]
    pub fn has_valid_check_digit(&self) -> bool {
        self.check_digit() == self.compute_check_digit()
    }

    /// Verifies the check digit.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CheckDigitMismatch` on mismatch.
    pub fn verify_check_digit(&self) -> DomainResult<()> {
        let expected = self.compute_check_digit();
        let actual = self.check_digit();
        if expected == actual {
            Ok(())
        } else {
            Err(DomainError::CheckDigitMismatch { expected, actual })
        }
    }

    fn char_at(&self, index: usize) -> char {
        self.0.chars().nth(index).unwrap_or('0')
    }
}

impl FromStr for Vin {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Vin {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Vin> for String {
    fn from(value: Vin) -> Self {
        value.0
    }
}

impl AsRef<str> for Vin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
