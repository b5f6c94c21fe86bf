//! # NHTSA vPIC Provider
//!
//! [`VehicleDataProvider`] backed by the NHTSA vPIC `DecodeVin` endpoint.
//!
//! The endpoint answers with a flat list of `{Variable, Value}` pairs. Only
//! the variables listed in [`NhtsaProvider`]'s field table are read;
//! placeholder values such as `Not Applicable` are dropped and numeric
//! fields that do not parse are omitted.

use crate::domain::entities::vehicle::VehicleAttributes;
use crate::domain::value_objects::model_year::is_plausible_model_year;
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::vin::Vin;
use crate::infrastructure::vehicle_data::error::{ProviderError, ProviderResult};
use crate::infrastructure::vehicle_data::http_client::HttpClient;
use crate::infrastructure::vehicle_data::traits::VehicleDataProvider;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Public vPIC API root.
pub const DEFAULT_BASE_URL: &str = "https://vpic.nhtsa.dot.gov/api";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Model name used when the provider reports a year in the model field.
pub const MODEL_NOT_SPECIFIED: &str = "Model not specified";

const PLACEHOLDERS: &[&str] = &["Not Applicable", "N/A", "null", "", "0"];

#[derive(Debug, Deserialize)]
struct DecodeVinResponse {
    #[serde(rename = "Results", default)]
    results: Vec<DecodeVinVariable>,
}

#[derive(Debug, Deserialize)]
struct DecodeVinVariable {
    #[serde(rename = "Variable")]
    variable: Option<String>,
    #[serde(rename = "Value")]
    value: Option<String>,
}

/// NHTSA vPIC vehicle-data provider.
#[derive(Debug, Clone)]
pub struct NhtsaProvider {
    client: HttpClient,
    base_url: String,
}

impl NhtsaProvider {
    /// Creates a provider against `base_url` with the given timeout.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> ProviderResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client: HttpClient::new(timeout_ms)?,
            base_url,
        })
    }

    /// Creates a provider against the public vPIC API.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the HTTP client cannot be built.
    pub fn public() -> ProviderResult<Self> {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS)
    }

    /// API root this provider talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl VehicleDataProvider for NhtsaProvider {
    async fn lookup(&self, vin: &Vin, model_year: Option<i32>) -> ProviderResult<VehicleAttributes> {
        let url = format!("{}/vehicles/DecodeVin/{}", self.base_url, vin);
        let mut params = vec![("format", "json".to_string())];
        if let Some(year) = model_year {
            params.push(("modelyear", year.to_string()));
        }

        let response: DecodeVinResponse = self.client.get_with_params(&url, &params).await?;
        if response.results.is_empty() {
            return Err(ProviderError::invalid_response("no results"));
        }
        debug!(vin = %vin, fields = response.results.len(), "vPIC response received");

        attributes_from_results(&response.results, Timestamp::now().year())
    }

    fn name(&self) -> &'static str {
        "nhtsa"
    }
}

fn attributes_from_results(
    results: &[DecodeVinVariable],
    current_year: i32,
) -> ProviderResult<VehicleAttributes> {
    let fields: HashMap<&str, String> = results
        .iter()
        .filter_map(|r| {
            let variable = r.variable.as_deref()?;
            let value = clean_value(r.value.as_deref()?)?;
            Some((variable, value))
        })
        .collect();
    let text = |name: &str| fields.get(name).cloned();

    let make = text("Make")
        .map(|m| normalize_make(&m))
        .ok_or(ProviderError::MissingMake)?;

    let mut year = fields
        .get("Model Year")
        .and_then(|y| y.parse::<i32>().ok())
        .filter(|y| is_plausible_model_year(*y, current_year));
    let mut model = text("Model");
    if let Some(embedded) = model
        .as_deref()
        .and_then(|m| year_in_model(m, current_year))
    {
        year = year.or(Some(embedded));
        model = Some(MODEL_NOT_SPECIFIED.to_string());
    }

    Ok(VehicleAttributes {
        make: Some(make),
        model,
        year,
        trim: text("Trim"),
        body_style: text("Body Class"),
        vehicle_type: text("Vehicle Type"),
        fuel_type: text("Fuel Type - Primary"),
        cylinders: fields
            .get("Engine Number of Cylinders")
            .and_then(|v| parse_count(v)),
        displacement_l: fields
            .get("Displacement (L)")
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0),
        horsepower: fields.get("Engine Brake (hp) From").and_then(|v| parse_count(v)),
        drive_type: text("Drive Type"),
        transmission: text("Transmission Style"),
        doors: fields.get("Number of Doors").and_then(|v| parse_count(v)),
        plant_country: text("Plant Country"),
        manufacturer_name: text("Manufacturer Name"),
    })
}

/// Trims, collapses inner whitespace and drops placeholders.
fn clean_value(raw: &str) -> Option<String> {
    let value = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if PLACEHOLDERS.contains(&value.as_str()) {
        None
    } else {
        Some(value)
    }
}

/// Parses a positive whole count, accepting values like `166.0`.
fn parse_count(raw: &str) -> Option<u32> {
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value >= 1.0 && value <= f64::from(u32::MAX) {
        Some(value.round() as u32)
    } else {
        None
    }
}

/// A purely numeric model that looks like a model year.
fn year_in_model(model: &str, current_year: i32) -> Option<i32> {
    if !model.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    model
        .parse::<i32>()
        .ok()
        .filter(|year| is_plausible_model_year(*year, current_year))
}

/// Title-cases a make and applies the known brand spellings.
fn normalize_make(raw: &str) -> String {
    let mut titled = String::with_capacity(raw.len());
    let mut word_start = true;
    for c in raw.trim().chars() {
        if word_start {
            titled.extend(c.to_uppercase());
        } else {
            titled.extend(c.to_lowercase());
        }
        word_start = !c.is_alphabetic();
    }

    match titled.as_str() {
        "Bmw" => "BMW".to_string(),
        "Gmc" => "GMC".to_string(),
        "Mercedes Benz" => "Mercedes-Benz".to_string(),
        _ => titled,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VIN: &str = "1HGCM82633A004352";

    fn results(pairs: &[(&str, Option<&str>)]) -> serde_json::Value {
        let results: Vec<_> = pairs
            .iter()
            .map(|(variable, value)| json!({"Variable": variable, "Value": value}))
            .collect();
        json!({"Count": results.len(), "Results": results})
    }

    async fn provider_for(server: &MockServer, body: serde_json::Value) -> NhtsaProvider {
        Mock::given(method("GET"))
            .and(path(format!("/vehicles/DecodeVin/{VIN}")))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
        NhtsaProvider::new(server.uri(), 2_000).unwrap()
    }

    #[test]
    fn make_normalization() {
        assert_eq!(normalize_make("HONDA"), "Honda");
        assert_eq!(normalize_make("BMW"), "BMW");
        assert_eq!(normalize_make("gmc"), "GMC");
        assert_eq!(normalize_make("MERCEDES-BENZ"), "Mercedes-Benz");
        assert_eq!(normalize_make("mercedes benz"), "Mercedes-Benz");
        assert_eq!(normalize_make("  LAND ROVER "), "Land Rover");
    }

    #[test]
    fn placeholders_are_dropped() {
        for raw in ["Not Applicable", "N/A", "null", "", "0", "   "] {
            assert_eq!(clean_value(raw), None, "{raw:?}");
        }
        assert_eq!(clean_value("  Sedan/Saloon  "), Some("Sedan/Saloon".to_string()));
        assert_eq!(clean_value("Crew   Cab"), Some("Crew Cab".to_string()));
    }

    #[test]
    fn counts_accept_decimals() {
        assert_eq!(parse_count("4"), Some(4));
        assert_eq!(parse_count("166.0"), Some(166));
        assert_eq!(parse_count("V6"), None);
        assert_eq!(parse_count("-2"), None);
    }

    #[tokio::test]
    async fn maps_named_fields() {
        let server = MockServer::start().await;
        let body = results(&[
            ("Make", Some("HONDA")),
            ("Model", Some("Accord")),
            ("Model Year", Some("2003")),
            ("Trim", Some("EX")),
            ("Body Class", Some("Coupe")),
            ("Vehicle Type", Some("PASSENGER CAR")),
            ("Fuel Type - Primary", Some("Gasoline")),
            ("Engine Number of Cylinders", Some("6")),
            ("Displacement (L)", Some("3.0")),
            ("Engine Brake (hp) From", Some("240")),
            ("Drive Type", Some("FWD/Front-Wheel Drive")),
            ("Transmission Style", Some("Automatic")),
            ("Number of Doors", Some("2")),
            ("Plant Country", Some("UNITED STATES (USA)")),
            ("Manufacturer Name", Some("AMERICAN HONDA MOTOR CO., INC.")),
            ("Series", Some("Not Applicable")),
        ]);
        let provider = provider_for(&server, body).await;

        let vin = Vin::parse(VIN).unwrap();
        let attrs = provider.lookup(&vin, None).await.unwrap();
        assert_eq!(attrs.make.as_deref(), Some("Honda"));
        assert_eq!(attrs.model.as_deref(), Some("Accord"));
        assert_eq!(attrs.year, Some(2003));
        assert_eq!(attrs.cylinders, Some(6));
        assert_eq!(attrs.displacement_l, Some(3.0));
        assert_eq!(attrs.horsepower, Some(240));
        assert_eq!(attrs.doors, Some(2));
        assert_eq!(attrs.transmission.as_deref(), Some("Automatic"));
        assert_eq!(attrs.engine_summary().as_deref(), Some("3.0L 6-cyl"));
    }

    #[tokio::test]
    async fn sends_model_year_hint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/vehicles/DecodeVin/{VIN}")))
            .and(query_param("modelyear", "2003"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(results(&[("Make", Some("HONDA"))])),
            )
            .expect(1)
            .mount(&server)
            .await;
        let provider = NhtsaProvider::new(format!("{}/", server.uri()), 2_000).unwrap();

        let vin = Vin::parse(VIN).unwrap();
        assert!(provider.lookup(&vin, Some(2003)).await.is_ok());
    }

    #[tokio::test]
    async fn numeric_model_is_treated_as_year() {
        let server = MockServer::start().await;
        let body = results(&[("Make", Some("HONDA")), ("Model", Some("2003")), ("Model Year", None)]);
        let provider = provider_for(&server, body).await;

        let attrs = provider.lookup(&Vin::parse(VIN).unwrap(), None).await.unwrap();
        assert_eq!(attrs.model.as_deref(), Some(MODEL_NOT_SPECIFIED));
        assert_eq!(attrs.year, Some(2003));
    }

    fn variables(pairs: &[(&str, &str)]) -> Vec<DecodeVinVariable> {
        pairs
            .iter()
            .map(|(variable, value)| DecodeVinVariable {
                variable: Some((*variable).to_string()),
                value: Some((*value).to_string()),
            })
            .collect()
    }

    #[test]
    fn year_window_moves_with_current_year() {
        assert_eq!(year_in_model("2031", 2030), Some(2031));
        assert_eq!(year_in_model("2031", 2026), None);
        assert_eq!(year_in_model("1979", 2026), None);
        assert_eq!(year_in_model("Accord", 2026), None);

        let attrs =
            attributes_from_results(&variables(&[("Make", "TESLA"), ("Model", "2035")]), 2034)
                .unwrap();
        assert_eq!(attrs.year, Some(2035));
        assert_eq!(attrs.model.as_deref(), Some(MODEL_NOT_SPECIFIED));
    }

    #[test]
    fn implausible_reported_year_is_dropped() {
        let attrs = attributes_from_results(
            &variables(&[("Make", "HONDA"), ("Model Year", "-2147483648")]),
            2026,
        )
        .unwrap();
        assert_eq!(attrs.year, None);

        let attrs = attributes_from_results(
            &variables(&[("Make", "HONDA"), ("Model Year", "2027")]),
            2026,
        )
        .unwrap();
        assert_eq!(attrs.year, Some(2027));
    }

    #[tokio::test]
    async fn missing_make_is_an_error() {
        let server = MockServer::start().await;
        let body = results(&[("Make", Some("")), ("Model", Some("Accord"))]);
        let provider = provider_for(&server, body).await;

        let result = provider.lookup(&Vin::parse(VIN).unwrap(), None).await;
        assert_eq!(result.unwrap_err(), ProviderError::MissingMake);
    }

    #[tokio::test]
    async fn empty_results_are_invalid() {
        let server = MockServer::start().await;
        let provider = provider_for(&server, json!({"Count": 0, "Results": []})).await;

        let result = provider.lookup(&Vin::parse(VIN).unwrap(), None).await;
        assert!(matches!(result, Err(ProviderError::InvalidResponse { .. })));
    }

    #[tokio::test]
    async fn malformed_json_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;
        let provider = NhtsaProvider::new(server.uri(), 2_000).unwrap();

        let result = provider.lookup(&Vin::parse(VIN).unwrap(), None).await;
        assert!(matches!(result, Err(ProviderError::InvalidResponse { .. })));
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let provider = NhtsaProvider::new(server.uri(), 2_000).unwrap();

        let result = provider.lookup(&Vin::parse(VIN).unwrap(), None).await;
        assert!(matches!(result, Err(ProviderError::HttpStatus { status: 503, .. })));
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(results(&[("Make", Some("HONDA"))]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;
        let provider = NhtsaProvider::new(server.uri(), 50).unwrap();

        let result = provider.lookup(&Vin::parse(VIN).unwrap(), None).await;
        assert!(matches!(result, Err(ProviderError::Timeout { .. })));
    }
}
