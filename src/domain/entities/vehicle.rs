//! # Vehicle Entities
//!
//! [`VehicleAttributes`] is what an external vehicle-data provider returns;
//! every field is optional because providers omit anything they cannot
//! determine. [`DecodedVehicle`] is the decode result handed to callers,
//! combining provider attributes (when available) with the structural
//! decode of the VIN.

use crate::domain::value_objects::enums::DecodeMethod;
use crate::domain::value_objects::model_year::age_in_years;
use crate::domain::value_objects::vin::Vin;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Placeholder for descriptive fields that could not be determined.
pub const UNKNOWN: &str = "Unknown";

/// Attributes reported by a vehicle-data provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct VehicleAttributes {
    /// Marketing make, e.g. `Honda`.
    pub make: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Model year.
    pub year: Option<i32>,
    /// Trim level.
    pub trim: Option<String>,
    /// Body class, e.g. `Sedan/Saloon`.
    pub body_style: Option<String>,
    /// Vehicle type, e.g. `PASSENGER CAR`.
    pub vehicle_type: Option<String>,
    /// Primary fuel type.
    pub fuel_type: Option<String>,
    /// Engine cylinder count.
    pub cylinders: Option<u32>,
    /// Engine displacement in litres.
    pub displacement_l: Option<f64>,
    /// Engine brake horsepower.
    pub horsepower: Option<u32>,
    /// Drive type, e.g. `FWD`.
    pub drive_type: Option<String>,
    /// Transmission style.
    pub transmission: Option<String>,
    /// Number of doors.
    pub doors: Option<u32>,
    /// Country of the assembly plant.
    pub plant_country: Option<String>,
    /// Legal manufacturer name.
    pub manufacturer_name: Option<String>,
}

impl VehicleAttributes {
    /// Human-readable engine summary such as `2.4L 4-cyl`.
    ///
    /// Returns `None` when neither displacement nor cylinder count is known.
    #[must_use]
    pub fn engine_summary(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(displacement) = self.displacement_l {
            parts.push(format!("{displacement:.1}L"));
        }
        if let Some(cylinders) = self.cylinders {
            parts.push(format!("{cylinders}-cyl"));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// A decoded vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DecodedVehicle {
    /// Normalized VIN.
    #[schemars(with = "String")]
    pub vin: Vin,
    /// Make, or a region-of-origin label when the manufacturer is unknown.
    pub make: String,
    /// Model year, when it could be determined.
    pub year: Option<i32>,
    /// Model name.
    pub model: String,
    /// Trim level.
    pub trim: String,
    /// Engine summary.
    pub engine: String,
    /// Transmission style.
    pub transmission: String,
    /// Body style.
    pub body_style: String,
    /// Primary fuel type.
    pub fuel_type: String,
    /// Vehicle type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    /// Engine cylinder count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cylinders: Option<u32>,
    /// Engine displacement in litres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displacement_l: Option<f64>,
    /// Engine brake horsepower.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horsepower: Option<u32>,
    /// Drive type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_type: Option<String>,
    /// Number of doors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doors: Option<u32>,
    /// Country of the assembly plant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_country: Option<String>,
    /// Legal manufacturer name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer_name: Option<String>,
    /// World Manufacturer Identifier.
    pub wmi: String,
    /// Vehicle Descriptor Section.
    pub vds: String,
    /// Vehicle Identifier Section.
    pub vis: String,
    /// Assembly plant code.
    pub plant_code: char,
    /// Whether the printed check digit matched.
    pub check_digit_valid: bool,
    /// Age in years relative to the decode date, never negative.
    pub vehicle_age: Option<u32>,
    /// Whether provider data or the VIN structure alone was used.
    pub decode_method: DecodeMethod,
}

impl DecodedVehicle {
    /// Builds a decode result from the VIN structure alone.
    #[must_use]
    pub fn from_structure(vin: &Vin, make: String, year: Option<i32>) -> Self {
        Self {
            vin: vin.clone(),
            make,
            year,
            model: UNKNOWN.to_string(),
            trim: UNKNOWN.to_string(),
            engine: UNKNOWN.to_string(),
            transmission: UNKNOWN.to_string(),
            body_style: UNKNOWN.to_string(),
            fuel_type: UNKNOWN.to_string(),
            vehicle_type: None,
            cylinders: None,
            displacement_l: None,
            horsepower: None,
            drive_type: None,
            doors: None,
            plant_country: None,
            manufacturer_name: None,
            wmi: vin.wmi().to_string(),
            vds: vin.vds().to_string(),
            vis: vin.vis().to_string(),
            plant_code: vin.plant_code(),
            check_digit_valid: vin.has_valid_check_digit(),
            vehicle_age: None,
            decode_method: DecodeMethod::BasicStructure,
        }
    }

    /// Builds a decode result from provider attributes.
    ///
    /// Structural values fill in anything the provider left out: the make
    /// falls back to `structural_make` and the year to `structural_year`.
    #[must_use]
    pub fn from_attributes(
        vin: &Vin,
        attributes: VehicleAttributes,
        structural_make: String,
        structural_year: Option<i32>,
    ) -> Self {
        let engine = attributes.engine_summary();
        let unknown = || UNKNOWN.to_string();
        Self {
            make: attributes.make.unwrap_or(structural_make),
            year: attributes.year.or(structural_year),
            model: attributes.model.unwrap_or_else(unknown),
            trim: attributes.trim.unwrap_or_else(unknown),
            engine: engine.unwrap_or_else(unknown),
            transmission: attributes.transmission.unwrap_or_else(unknown),
            body_style: attributes.body_style.unwrap_or_else(unknown),
            fuel_type: attributes.fuel_type.unwrap_or_else(unknown),
            vehicle_type: attributes.vehicle_type,
            cylinders: attributes.cylinders,
            displacement_l: attributes.displacement_l,
            horsepower: attributes.horsepower,
            drive_type: attributes.drive_type,
            doors: attributes.doors,
            plant_country: attributes.plant_country,
            manufacturer_name: attributes.manufacturer_name,
            decode_method: DecodeMethod::ExternalApi,
            ..Self::from_structure(vin, String::new(), None)
        }
    }

    /// Sets `vehicle_age` relative to `current_year`, clamped at zero.
    #[must_use]
    pub fn with_age_as_of(mut self, current_year: i32) -> Self {
        self.vehicle_age = self.year.map(|year| age_in_years(year, current_year));
        self
    }
}
