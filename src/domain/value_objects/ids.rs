//! # Identifiers
//!
//! Quote identifiers are time-derived and sortable, with a random suffix so
//! that quotes generated within the same second never collide.
//!
//! # Examples
//!
//! ```
//! use protection_quote::domain::value_objects::ids::QuoteId;
//! use protection_quote::domain::value_objects::timestamp::Timestamp;
//!
//! let at = Timestamp::from_secs(1_704_067_200).unwrap();
//! let id = QuoteId::generate("HERO", at);
//! assert!(id.as_str().starts_with("HERO-20240101000000-"));
//! ```

use crate::domain::value_objects::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Length of the random hex suffix.
pub const QUOTE_ID_SUFFIX_LEN: usize = 8;

/// Unique quote identifier: `<PREFIX>-<YYYYMMDDHHMMSS>-<8 hex>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(String);

impl QuoteId {
    /// Generates a new identifier for a quote created at `at`.
    #[must_use]
    pub fn generate(prefix: &str, at: Timestamp) -> Self {
        let random = Uuid::new_v4().simple().to_string();
        let suffix = random.get(..QUOTE_ID_SUFFIX_LEN).unwrap_or(&random);
        Self(format!("{prefix}-{}-{suffix}", at.compact()))
    }

    /// Wraps an existing identifier string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
