//! # Vehicle Service Contract Rates
//!
//! The embedded rate card for vehicle service contracts (VSC): a base rate
//! per vehicle class and coverage level, and the age, mileage, term and
//! deductible factors applied to it.
//!
//! Vehicle class follows the make. Reliable makes are class `A`, mass-market
//! domestic makes class `B`, and luxury and European makes class `C`.
//! Unknown makes are rated as class `B`.
//!
//! # Examples
//!
//! ```
//! use protection_quote::domain::vsc_rates::{CoverageLevel, VehicleClass, age_factor, base_rate};
//! use rust_decimal::Decimal;
//!
//! assert_eq!(VehicleClass::for_make("Toyota"), VehicleClass::A);
//! assert_eq!(VehicleClass::for_make("Mini Cooper"), VehicleClass::C);
//! assert_eq!(VehicleClass::for_make("Tesla"), VehicleClass::B);
//!
//! assert_eq!(base_rate(VehicleClass::C, CoverageLevel::Gold), Decimal::new(2100, 0));
//! assert_eq!(age_factor(7), Decimal::new(135, 2));
//! ```

use crate::domain::value_objects::enums::ParseEnumError;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Version of the embedded rate card.
pub const VSC_RATES_VERSION: &str = "2025.2";

/// Oldest model year accepted for a VSC quote.
pub const MIN_VSC_MODEL_YEAR: i32 = 1990;

/// Highest odometer reading accepted for a VSC quote.
pub const MAX_VSC_MILEAGE: u32 = 500_000;

/// Term used when the request does not name one.
pub const DEFAULT_TERM_MONTHS: u32 = 36;

/// Deductible used when the request does not name one.
pub const DEFAULT_DEDUCTIBLE: u32 = 100;

/// Reliability class used to pick the base rate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum VehicleClass {
    /// Most reliable makes, lowest rates.
    A,
    /// Moderate risk.
    B,
    /// Highest risk, highest rates.
    C,
}

/// Makes in lookup order; partial matches take the first hit.
const CLASSIFICATION: &[(&str, VehicleClass)] = &[
    ("honda", VehicleClass::A),
    ("acura", VehicleClass::A),
    ("toyota", VehicleClass::A),
    ("lexus", VehicleClass::A),
    ("nissan", VehicleClass::A),
    ("infiniti", VehicleClass::A),
    ("hyundai", VehicleClass::A),
    ("kia", VehicleClass::A),
    ("mazda", VehicleClass::A),
    ("mitsubishi", VehicleClass::A),
    ("scion", VehicleClass::A),
    ("subaru", VehicleClass::A),
    ("buick", VehicleClass::B),
    ("chevrolet", VehicleClass::B),
    ("chrysler", VehicleClass::B),
    ("dodge", VehicleClass::B),
    ("ford", VehicleClass::B),
    ("gmc", VehicleClass::B),
    ("jeep", VehicleClass::B),
    ("mercury", VehicleClass::B),
    ("oldsmobile", VehicleClass::B),
    ("plymouth", VehicleClass::B),
    ("pontiac", VehicleClass::B),
    ("saturn", VehicleClass::B),
    ("ram", VehicleClass::B),
    ("cadillac", VehicleClass::C),
    ("lincoln", VehicleClass::C),
    ("volkswagen", VehicleClass::C),
    ("volvo", VehicleClass::C),
    ("bmw", VehicleClass::C),
    ("mercedes-benz", VehicleClass::C),
    ("mercedes", VehicleClass::C),
    ("audi", VehicleClass::C),
    ("jaguar", VehicleClass::C),
    ("land rover", VehicleClass::C),
    ("porsche", VehicleClass::C),
    ("saab", VehicleClass::C),
    ("mini", VehicleClass::C),
];

impl VehicleClass {
    /// Every class, lowest rates first.
    pub const ALL: [Self; 3] = [Self::A, Self::B, Self::C];

    /// Classifies a make.
    ///
    /// An exact (case-insensitive) match wins; otherwise the first listed
    /// make that contains, or is contained in, the input. Anything else is
    /// class `B`.
    #[must_use]
    pub fn for_make(make: &str) -> Self {
        let make = make.trim().to_lowercase();
        if make.is_empty() {
            return Self::B;
        }
        CLASSIFICATION
            .iter()
            .find(|(known, _)| *known == make)
            .or_else(|| {
                CLASSIFICATION
                    .iter()
                    .find(|(known, _)| make.contains(known) || known.contains(make.as_str()))
            })
            .map_or(Self::B, |(_, class)| *class)
    }

    /// Class letter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }

    /// Listed makes in this class, in lookup order.
    pub fn makes(self) -> impl Iterator<Item = &'static str> {
        CLASSIFICATION
            .iter()
            .filter(move |(_, class)| *class == self)
            .map(|(make, _)| *make)
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// VSC coverage level.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum CoverageLevel {
    /// Powertrain only.
    Silver,
    /// Powertrain plus major components.
    #[default]
    Gold,
    /// Exclusionary coverage.
    Platinum,
}

impl CoverageLevel {
    /// Every level, narrowest first.
    pub const ALL: [Self; 3] = [Self::Silver, Self::Gold, Self::Platinum];

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Silver => "Silver Coverage",
            Self::Gold => "Gold Coverage",
            Self::Platinum => "Platinum Coverage",
        }
    }

    /// One-line summary of what is covered.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Silver => "Basic powertrain coverage",
            Self::Gold => "Enhanced coverage including major components",
            Self::Platinum => "Comprehensive coverage with exclusionary benefits",
        }
    }
}

impl fmt::Display for CoverageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoverageLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "silver" => Ok(Self::Silver),
            "gold" => Ok(Self::Gold),
            "platinum" => Ok(Self::Platinum),
            _ => Err(ParseEnumError::InvalidValue("CoverageLevel", s.to_string())),
        }
    }
}

/// Base rate in whole dollars.
#[must_use]
pub fn base_rate(class: VehicleClass, level: CoverageLevel) -> Decimal {
    let dollars = match (class, level) {
        (VehicleClass::A, CoverageLevel::Silver) => 800,
        (VehicleClass::A, CoverageLevel::Gold) => 1200,
        (VehicleClass::A, CoverageLevel::Platinum) => 1600,
        (VehicleClass::B, CoverageLevel::Silver) => 1000,
        (VehicleClass::B, CoverageLevel::Gold) => 1500,
        (VehicleClass::B, CoverageLevel::Platinum) => 2000,
        (VehicleClass::C, CoverageLevel::Silver) => 1400,
        (VehicleClass::C, CoverageLevel::Gold) => 2100,
        (VehicleClass::C, CoverageLevel::Platinum) => 2800,
    };
    Decimal::new(dollars, 0)
}

/// Upper bound (inclusive) and factor in hundredths; the last band is open.
type Band = (u32, i64);

const AGE_BANDS: &[Band] = &[(3, 100), (6, 115), (10, 135)];
const AGE_FACTOR_OLDEST: i64 = 160;

const MILEAGE_BANDS: &[Band] = &[(50_000, 100), (75_000, 115), (100_000, 130), (125_000, 150)];
const MILEAGE_FACTOR_HIGHEST: i64 = 175;

/// Term in months and factor in hundredths.
const TERM_FACTORS: &[(u32, i64)] = &[
    (12, 40),
    (24, 70),
    (36, 100),
    (48, 125),
    (60, 145),
    (72, 160),
];

/// Deductible in dollars and factor in hundredths.
const DEDUCTIBLE_FACTORS: &[(u32, i64)] = &[
    (0, 125),
    (50, 115),
    (100, 100),
    (200, 90),
    (500, 75),
    (1000, 65),
];

fn banded(value: u32, bands: &[Band], beyond: i64) -> Decimal {
    let hundredths = bands
        .iter()
        .find(|(upper, _)| value <= *upper)
        .map_or(beyond, |(_, factor)| *factor);
    Decimal::new(hundredths, 2)
}

fn listed(value: u32, table: &[(u32, i64)]) -> Option<Decimal> {
    table
        .iter()
        .find(|(key, _)| *key == value)
        .map(|(_, factor)| Decimal::new(*factor, 2))
}

/// Factor for a vehicle of `age` model years.
#[must_use]
pub fn age_factor(age: u32) -> Decimal {
    banded(age, AGE_BANDS, AGE_FACTOR_OLDEST)
}

/// Factor for an odometer reading.
#[must_use]
pub fn mileage_factor(mileage: u32) -> Decimal {
    banded(mileage, MILEAGE_BANDS, MILEAGE_FACTOR_HIGHEST)
}

/// Factor for a contract term, or `None` if the term is not sold.
#[must_use]
pub fn term_factor(term_months: u32) -> Option<Decimal> {
    listed(term_months, TERM_FACTORS)
}

/// Factor for a deductible, or `None` if the deductible is not offered.
#[must_use]
pub fn deductible_factor(deductible: u32) -> Option<Decimal> {
    listed(deductible, DEDUCTIBLE_FACTORS)
}

/// Terms sold, in months.
#[must_use]
pub fn term_options() -> Vec<u32> {
    TERM_FACTORS.iter().map(|(months, _)| *months).collect()
}

/// Deductibles offered, in dollars.
#[must_use]
pub fn deductible_options() -> Vec<u32> {
    DEDUCTIBLE_FACTORS.iter().map(|(amount, _)| *amount).collect()
}

/// Rating inputs derived from a vehicle ahead of quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PricingFactors {
    /// Vehicle class from the make (`B` when the make is unknown).
    pub vehicle_class: VehicleClass,
    /// Age factor, when the model year is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub age_factor: Option<Decimal>,
    /// Mileage factor, when the mileage is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub mileage_factor: Option<Decimal>,
}

impl PricingFactors {
    /// Looks up the factors for whatever is known about a vehicle.
    #[must_use]
    pub fn for_vehicle(make: Option<&str>, age: Option<u32>, mileage: Option<u32>) -> Self {
        Self {
            vehicle_class: make.map_or(VehicleClass::B, VehicleClass::for_make),
            age_factor: age.map(age_factor),
            mileage_factor: mileage.map(mileage_factor),
        }
    }
}

/// Base rate for one coverage level in one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LevelRate {
    /// Coverage level.
    pub level: CoverageLevel,
    /// Display name.
    pub name: String,
    /// What the level covers.
    pub description: String,
    /// Base rate before factors.
    #[schemars(with = "String")]
    pub base_rate: Decimal,
}

impl LevelRate {
    fn new(class: VehicleClass, level: CoverageLevel) -> Self {
        Self {
            level,
            name: level.name().to_string(),
            description: level.description().to_string(),
            base_rate: base_rate(class, level),
        }
    }
}

/// A class with its rates and example makes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VehicleClassInfo {
    /// The class.
    pub vehicle_class: VehicleClass,
    /// Base rate per coverage level.
    pub base_rates: Vec<LevelRate>,
    /// Up to five listed makes in the class.
    pub example_makes: Vec<String>,
}

impl VehicleClassInfo {
    /// Describes a class.
    #[must_use]
    pub fn for_class(vehicle_class: VehicleClass) -> Self {
        Self {
            vehicle_class,
            base_rates: CoverageLevel::ALL
                .iter()
                .map(|level| LevelRate::new(vehicle_class, *level))
                .collect(),
            example_makes: vehicle_class.makes().take(5).map(str::to_string).collect(),
        }
    }
}

/// A selectable option and the factor it applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FactorOption {
    /// Months for a term, dollars for a deductible.
    pub value: u32,
    /// Multiplier applied to the base rate.
    #[schemars(with = "String")]
    pub factor: Decimal,
}

/// Everything a VSC quote can be configured with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CoverageOptions {
    /// Rate card version.
    pub version: String,
    /// Coverage levels, narrowest first.
    pub coverage_levels: Vec<CoverageLevel>,
    /// Terms in months with their factors.
    pub terms: Vec<FactorOption>,
    /// Deductibles in dollars with their factors.
    pub deductibles: Vec<FactorOption>,
    /// Classes with their base rates.
    pub vehicle_classes: Vec<VehicleClassInfo>,
}

impl CoverageOptions {
    /// Options on the embedded rate card.
    #[must_use]
    pub fn standard() -> Self {
        let options = |table: &[(u32, i64)]| -> Vec<FactorOption> {
            table
                .iter()
                .map(|(value, hundredths)| FactorOption {
                    value: *value,
                    factor: Decimal::new(*hundredths, 2),
                })
                .collect()
        };
        Self {
            version: VSC_RATES_VERSION.to_string(),
            coverage_levels: CoverageLevel::ALL.to_vec(),
            terms: options(TERM_FACTORS),
            deductibles: options(DEDUCTIBLE_FACTORS),
            vehicle_classes: VehicleClass::ALL
                .iter()
                .map(|class| VehicleClassInfo::for_class(*class))
                .collect(),
        }
    }
}
