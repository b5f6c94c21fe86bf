//! # Vehicle Eligibility
//!
//! Vehicle-service-contract eligibility from model year and odometer.
//!
//! A vehicle qualifies when it is at most [`EligibilityRules::max_age_years`]
//! model years old and has strictly fewer than
//! [`EligibilityRules::max_mileage`] miles. Vehicles past the warning
//! thresholds still qualify but carry a warning.
//!
//! Eligible vehicles also carry the [`PricingFactors`] a service contract
//! would be rated with.
//!
//! # Examples
//!
//! ```
//! use protection_quote::domain::services::eligibility::EligibilityPolicy;
//!
//! let policy = EligibilityPolicy::default();
//! let assessment = policy.assess(Some("Toyota"), Some(2010), Some(120_000), 2026);
//! assert!(assessment.eligible);
//! assert_eq!(assessment.warnings.len(), 1);
//! assert!(assessment.pricing_factors.is_some());
//!
//! let assessment = policy.assess(None, Some(2018), Some(200_000), 2026);
//! assert!(!assessment.eligible);
//! ```

use crate::domain::value_objects::model_year::age_in_years;
use crate::domain::vsc_rates::PricingFactors;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Thresholds used by [`EligibilityPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EligibilityRules {
    /// Oldest model-year age that still qualifies.
    pub max_age_years: u32,
    /// Mileage at or above which a vehicle is rejected.
    pub max_mileage: u32,
    /// Age above which a warning is attached.
    pub warning_age_years: u32,
    /// Mileage above which a warning is attached.
    pub warning_mileage: u32,
}

impl Default for EligibilityRules {
    fn default() -> Self {
        Self {
            max_age_years: 20,
            max_mileage: 200_000,
            warning_age_years: 15,
            warning_mileage: 150_000,
        }
    }
}

/// Outcome of an eligibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EligibilityAssessment {
    /// Whether the vehicle qualifies.
    pub eligible: bool,
    /// Vehicle age in years, when the model year is known.
    pub vehicle_age: Option<u32>,
    /// Odometer reading supplied by the caller.
    pub mileage: Option<u32>,
    /// Non-blocking notes.
    pub warnings: Vec<String>,
    /// Reasons the vehicle does not qualify.
    pub restrictions: Vec<String>,
    /// Rating factors, for eligible vehicles only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_factors: Option<PricingFactors>,
}

/// Applies [`EligibilityRules`] to a vehicle.
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityPolicy {
    rules: EligibilityRules,
}

impl EligibilityPolicy {
    /// Creates a policy with custom thresholds.
    #[must_use]
    pub const fn new(rules: EligibilityRules) -> Self {
        Self { rules }
    }

    /// Returns the thresholds in use.
    #[must_use]
    pub const fn rules(&self) -> &EligibilityRules {
        &self.rules
    }

    /// Assesses a vehicle as of `current_year`.
    ///
    /// Unknown year or mileage skips the corresponding check. Model years in
    /// the future count as age zero. The make only selects the vehicle class
    /// in the pricing factors.
    #[must_use]
    pub fn assess(
        &self,
        make: Option<&str>,
        model_year: Option<i32>,
        mileage: Option<u32>,
        current_year: i32,
    ) -> EligibilityAssessment {
        let rules = &self.rules;
        let vehicle_age = model_year.map(|year| age_in_years(year, current_year));
        let mut warnings = Vec::new();
        let mut restrictions = Vec::new();

        if let Some(age) = vehicle_age {
            if age > rules.max_age_years {
                restrictions.push(format!(
                    "Vehicle is {age} years old (must be {} model years or newer)",
                    rules.max_age_years
                ));
            } else if age > rules.warning_age_years {
                warnings.push(format!(
                    "Vehicle is {age} years old - limited coverage options may apply"
                ));
            }
        }

        if let Some(miles) = mileage {
            if miles >= rules.max_mileage {
                restrictions.push(format!(
                    "Vehicle has {miles} miles (must be less than {} miles)",
                    rules.max_mileage
                ));
            } else if miles > rules.warning_mileage {
                warnings.push(format!(
                    "High mileage vehicle ({miles} miles) - premium rates may apply"
                ));
            }
        }

        let eligible = restrictions.is_empty();
        EligibilityAssessment {
            eligible,
            vehicle_age,
            mileage,
            warnings,
            restrictions,
            pricing_factors: eligible
                .then(|| PricingFactors::for_vehicle(make, vehicle_age, mileage)),
        }
    }
}
