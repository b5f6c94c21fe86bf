//! # Timestamp Value Object
//!
//! DateTime wrapper with the calendar helpers quoting needs.
//!
//! Quotes carry a creation time and an expiry computed in whole days; VIN
//! decoding needs the current calendar year to disambiguate model-year codes
//! and compute vehicle age.
//!
//! # Examples
//!
//! ```
//! use protection_quote::domain::value_objects::timestamp::Timestamp;
//!
//! let created = Timestamp::from_secs(1_704_067_200).unwrap();
//! let valid_until = created.add_days(30);
//!
//! assert!(valid_until.is_after(&created));
//! assert_eq!(created.year(), 2024);
//! ```

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp.
///
/// # Invariants
///
/// - Always in UTC timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Sortable compact format used inside quote identifiers: `YYYYMMDDHHMMSS`.
    pub const COMPACT_FORMAT: &'static str = "%Y%m%d%H%M%S";

    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Returns `None` if the value is out of range.
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Creates a timestamp at midnight UTC on the given calendar date.
    ///
    /// # Examples
    ///
    /// ```
    /// use protection_quote::domain::value_objects::timestamp::Timestamp;
    ///
    /// let ts = Timestamp::from_ymd(2025, 6, 1).unwrap();
    /// assert_eq!(ts.year(), 2025);
    /// assert!(Timestamp::from_ymd(2025, 2, 30).is_none());
    /// ```
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .map(Self)
    }

    /// Returns the Unix timestamp in seconds.
    #[inline]
    #[must_use]
    pub fn timestamp_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Returns the calendar year.
    #[inline]
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Adds whole days to the timestamp.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Formats the timestamp as `YYYYMMDDHHMMSS`.
    #[must_use]
    pub fn compact(&self) -> String {
        self.0.format(Self::COMPACT_FORMAT).to_string()
    }

    /// Returns true if this timestamp is strictly after `other`.
    #[inline]
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }

    /// Returns true if this timestamp is in the past.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.0 < Utc::now()
    }

    /// Returns the inner `DateTime<Utc>`.
    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
