//! # Settings Resolver
//!
//! Resolves ancillary pricing settings (fees, discount and tax rates,
//! jurisdiction multipliers, contact details) with the same two-stage policy
//! as the [`PricingResolver`](super::pricing_resolver::PricingResolver): the
//! [`SettingsSource`] first, then a fixed default.
//!
//! Stored values may be JSON numbers or numeric strings. A value that does
//! not parse, or parses to something out of range, is ignored and the next
//! key (or the default) is used.

use crate::domain::value_objects::enums::DataSource;
use crate::domain::value_objects::jurisdiction::Jurisdiction;
use crate::infrastructure::persistence::traits::{LookupOutcome, SettingKey, SettingsSource};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::pricing_resolver::DEFAULT_LOOKUP_TIMEOUT;

/// Admin fee when nothing is stored.
pub const DEFAULT_ADMIN_FEE: Decimal = Decimal::from_parts(2500, 0, 0, false, 2);
/// Wholesale discount rate when nothing is stored.
pub const DEFAULT_WHOLESALE_DISCOUNT: Decimal = Decimal::from_parts(15, 0, 0, false, 2);
/// Tax rate when nothing is stored.
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(7, 0, 0, false, 2);
/// Processing fee when nothing is stored.
pub const DEFAULT_PROCESSING_FEE: Decimal = Decimal::from_parts(1500, 0, 0, false, 2);
/// Dealer fee when nothing is stored.
pub const DEFAULT_DEALER_FEE: Decimal = Decimal::from_parts(5000, 0, 0, false, 2);
/// Support phone number when nothing is stored.
pub const DEFAULT_CONTACT_PHONE: &str = "1-(866) 660-7003";
/// Support email when nothing is stored.
pub const DEFAULT_CONTACT_EMAIL: &str = "support@connectedautocare.com";
/// Support hours when nothing is stored.
pub const DEFAULT_SUPPORT_HOURS: &str = "24/7";

/// Built-in jurisdiction multipliers, in hundredths.
const JURISDICTION_MULTIPLIERS: &[(&str, i64)] = &[
    ("FL", 100),
    ("CA", 115),
    ("NY", 120),
    ("TX", 105),
    ("IL", 110),
];

/// Built-in multiplier for `jurisdiction`; 1.00 for anything not listed.
#[must_use]
pub fn default_jurisdiction_multiplier(jurisdiction: &Jurisdiction) -> Decimal {
    JURISDICTION_MULTIPLIERS
        .iter()
        .find(|(code, _)| *code == jurisdiction.as_str())
        .map_or(Decimal::ONE, |(_, hundredths)| Decimal::new(*hundredths, 2))
}

/// A setting value and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolved<T> {
    /// The value in effect.
    pub value: T,
    /// Store or built-in default.
    pub source: DataSource,
}

impl<T> Resolved<T> {
    /// A value read from the settings store.
    #[must_use]
    pub fn stored(value: T) -> Self {
        Self {
            value,
            source: DataSource::Database,
        }
    }

    /// A built-in default.
    #[must_use]
    pub fn default_value(value: T) -> Self {
        Self {
            value,
            source: DataSource::Hardcoded,
        }
    }
}

/// Support contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ContactInfo {
    /// Support phone number.
    pub phone: String,
    /// Support email address.
    pub email: String,
    /// Support hours.
    pub support_hours: String,
}

/// Every setting in effect for one product family and jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsSnapshot {
    /// Family used for the admin fee.
    pub product_family: String,
    /// Jurisdiction used for the tax rate and multiplier.
    pub jurisdiction: Jurisdiction,
    /// Admin fee.
    pub admin_fee: Resolved<Decimal>,
    /// Processing fee.
    pub processing_fee: Resolved<Decimal>,
    /// Dealer fee.
    pub dealer_fee: Resolved<Decimal>,
    /// Wholesale discount rate.
    pub wholesale_discount: Resolved<Decimal>,
    /// Tax rate.
    pub tax_rate: Resolved<Decimal>,
    /// Jurisdiction price multiplier.
    pub jurisdiction_multiplier: Resolved<Decimal>,
    /// Support contact details.
    pub contact: ContactInfo,
}

/// Two-stage settings resolver.
#[derive(Debug, Clone)]
pub struct SettingsResolver {
    source: Option<Arc<dyn SettingsSource>>,
    lookup_timeout: Duration,
}

impl Default for SettingsResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsResolver {
    /// Creates a resolver that only uses built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Consults `source` before the defaults.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn SettingsSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the bound on each lookup.
    #[must_use]
    pub fn with_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    /// Admin fee for a product family, then the generic admin fee.
    pub async fn admin_fee(&self, product_family: &str) -> Resolved<Decimal> {
        self.decimal(
            &[
                SettingKey::ProductAdminFee(product_family.to_string()),
                SettingKey::AdminFee,
            ],
            DEFAULT_ADMIN_FEE,
            is_non_negative,
        )
        .await
    }

    /// Admin fee stored for a product family only, else `fallback`.
    ///
    /// Used by products whose fee must not inherit the generic admin fee.
    pub async fn family_admin_fee(
        &self,
        product_family: &str,
        fallback: Decimal,
    ) -> Resolved<Decimal> {
        self.decimal(
            &[SettingKey::ProductAdminFee(product_family.to_string())],
            fallback,
            is_non_negative,
        )
        .await
    }

    /// Wholesale discount rate, as a fraction in `[0, 1)`.
    pub async fn wholesale_discount(&self) -> Resolved<Decimal> {
        self.decimal(
            &[SettingKey::WholesaleDiscount],
            DEFAULT_WHOLESALE_DISCOUNT,
            |rate| !rate.is_sign_negative() && rate < Decimal::ONE,
        )
        .await
    }

    /// Tax rate for a jurisdiction, then the default tax rate.
    pub async fn tax_rate(&self, jurisdiction: &Jurisdiction) -> Resolved<Decimal> {
        self.decimal(
            &[
                SettingKey::TaxRate(jurisdiction.clone()),
                SettingKey::DefaultTaxRate,
            ],
            DEFAULT_TAX_RATE,
            is_non_negative,
        )
        .await
    }

    /// Price multiplier for a jurisdiction.
    pub async fn jurisdiction_multiplier(&self, jurisdiction: &Jurisdiction) -> Resolved<Decimal> {
        self.decimal(
            &[SettingKey::JurisdictionMultiplier(jurisdiction.clone())],
            default_jurisdiction_multiplier(jurisdiction),
            |m| m > Decimal::ZERO,
        )
        .await
    }

    /// Processing fee.
    pub async fn processing_fee(&self) -> Resolved<Decimal> {
        self.decimal(
            &[SettingKey::ProcessingFee],
            DEFAULT_PROCESSING_FEE,
            is_non_negative,
        )
        .await
    }

    /// Dealer fee.
    pub async fn dealer_fee(&self) -> Resolved<Decimal> {
        self.decimal(&[SettingKey::DealerFee], DEFAULT_DEALER_FEE, is_non_negative)
            .await
    }

    /// Support contact details.
    pub async fn contact_info(&self) -> ContactInfo {
        ContactInfo {
            phone: self
                .text(&SettingKey::ContactPhone, DEFAULT_CONTACT_PHONE)
                .await
                .value,
            email: self
                .text(&SettingKey::ContactEmail, DEFAULT_CONTACT_EMAIL)
                .await
                .value,
            support_hours: self
                .text(&SettingKey::SupportHours, DEFAULT_SUPPORT_HOURS)
                .await
                .value,
        }
    }

    /// Resolves every setting at once.
    pub async fn current_settings(
        &self,
        product_family: &str,
        jurisdiction: &Jurisdiction,
    ) -> SettingsSnapshot {
        let (
            admin_fee,
            processing_fee,
            dealer_fee,
            wholesale_discount,
            tax_rate,
            jurisdiction_multiplier,
            contact,
        ) = tokio::join!(
            self.admin_fee(product_family),
            self.processing_fee(),
            self.dealer_fee(),
            self.wholesale_discount(),
            self.tax_rate(jurisdiction),
            self.jurisdiction_multiplier(jurisdiction),
            self.contact_info(),
        );

        SettingsSnapshot {
            product_family: product_family.to_string(),
            jurisdiction: jurisdiction.clone(),
            admin_fee,
            processing_fee,
            dealer_fee,
            wholesale_discount,
            tax_rate,
            jurisdiction_multiplier,
            contact,
        }
    }

    async fn decimal(
        &self,
        keys: &[SettingKey],
        fallback: Decimal,
        accept: impl Fn(Decimal) -> bool,
    ) -> Resolved<Decimal> {
        for key in keys {
            let Some(raw) = self.lookup(key).await else {
                continue;
            };
            match parse_decimal(&raw).filter(|value| accept(*value)) {
                Some(value) => return Resolved::stored(value),
                None => warn!(setting = %key, raw = %raw, "unusable setting value, ignoring"),
            }
        }
        Resolved::default_value(fallback)
    }

    async fn text(&self, key: &SettingKey, fallback: &str) -> Resolved<String> {
        match self.lookup(key).await {
            Some(Value::String(s)) if !s.trim().is_empty() => Resolved::stored(s.trim().to_string()),
            Some(raw) => {
                warn!(setting = %key, raw = %raw, "unusable setting value, ignoring");
                Resolved::default_value(fallback.to_string())
            }
            None => Resolved::default_value(fallback.to_string()),
        }
    }

    async fn lookup(&self, key: &SettingKey) -> Option<Value> {
        let source = self.source.as_ref()?;

        match timeout(self.lookup_timeout, source.get(key)).await {
            Ok(LookupOutcome::Found(value)) => Some(value),
            Ok(LookupOutcome::NotFound) => {
                debug!(source = source.name(), setting = %key, "setting not stored");
                None
            }
            Ok(LookupOutcome::SourceUnavailable(reason)) => {
                warn!(
                    source = source.name(),
                    setting = %key,
                    reason = %reason,
                    "settings source unavailable, using default"
                );
                None
            }
            Err(_) => {
                warn!(
                    source = source.name(),
                    setting = %key,
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "settings lookup timed out, using default"
                );
                None
            }
        }
    }
}

fn is_non_negative(value: Decimal) -> bool {
    !value.is_sign_negative()
}

/// Reads a decimal from a JSON number or numeric string.
fn parse_decimal(raw: &Value) -> Option<Decimal> {
    let text = match raw {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
