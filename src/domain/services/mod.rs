//! # Domain Services
//!
//! Domain logic that doesn't naturally belong to a single entity or value
//! object.
//!
//! ## Services
//!
//! - [`manufacturer::resolve_manufacturer`]: WMI to make resolution
//! - [`eligibility::EligibilityPolicy`]: Vehicle-service-contract eligibility

pub mod eligibility;
pub mod manufacturer;

pub use eligibility::{EligibilityAssessment, EligibilityPolicy, EligibilityRules};
pub use manufacturer::{UNKNOWN_MANUFACTURER, resolve_manufacturer};
