//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`QuoteId`]: Time-derived quote identifier with random suffix
//! - [`Vin`]: Validated Vehicle Identification Number
//! - [`Jurisdiction`]: Normalized region code
//!
//! ## Arithmetic
//!
//! - [`ArithmeticError`]: Error type for arithmetic failures
//! - [`CheckedArithmetic`]: Trait for safe arithmetic operations
//! - [`Rounding`]: Explicit midpoint strategy for currency output
//!
//! ## Domain Enums
//!
//! - `CustomerType`: Retail or Wholesale
//! - `CoverageLimit`: Supported coverage tiers
//! - `CheckDigitPolicy`: Strict or Lenient check-digit handling

pub mod arithmetic;
pub mod enums;
pub mod ids;
pub mod jurisdiction;
pub mod model_year;
pub mod timestamp;
pub mod vin;

pub use arithmetic::{
    ArithmeticError, ArithmeticResult, CheckedArithmetic, Rounding, checked_product,
    round_currency,
};
pub use enums::{
    CheckDigitPolicy, CoverageLimit, CustomerType, DataSource, DecodeMethod, ParseEnumError,
};
pub use ids::QuoteId;
pub use jurisdiction::Jurisdiction;
pub use model_year::{
    EARLIEST_MODEL_YEAR, YearCandidates, age_in_years, is_plausible_model_year,
    resolve_model_year,
};
pub use timestamp::Timestamp;
pub use vin::Vin;
