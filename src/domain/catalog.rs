//! # Pricing Catalog
//!
//! The embedded, versioned product table. It is always available and acts
//! as the fallback source of truth whenever the pricing store cannot answer.
//!
//! Each product has an external code (used by storefronts and the pricing
//! store) and an internal catalog key. The mapping between the two is
//! bijective: no code or key appears twice.
//!
//! # Examples
//!
//! ```
//! use protection_quote::domain::catalog::PricingCatalog;
//! use rust_decimal::Decimal;
//!
//! let catalog = PricingCatalog::standard();
//! let product = catalog.get("HOME_PROTECTION_PLAN").unwrap();
//! assert_eq!(product.key(), "home_protection");
//! assert_eq!(product.base_price(), Decimal::new(199, 0));
//! assert_eq!(catalog.get("home_protection"), Some(product));
//! ```

use crate::domain::entities::product::ProductPricingConfig;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::arithmetic::CheckedArithmetic;
use crate::domain::value_objects::enums::CustomerType;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Version of the embedded catalog.
pub const CATALOG_VERSION: &str = "2025.1";

/// Factor applied to catalog multipliers for wholesale customers.
pub const WHOLESALE_MULTIPLIER_FACTOR: Decimal = Decimal::from_parts(85, 0, 0, false, 2);

/// Raw catalog row: code, key, base price in whole units, term multipliers in
/// tenths.
type CatalogRow = (&'static str, &'static str, i64, &'static [(u32, i64)]);

const FIVE_YEAR_HOME: &[(u32, i64)] = &[(1, 10), (2, 18), (3, 25), (4, 32), (5, 38)];
const FIVE_YEAR_AUTO: &[(u32, i64)] = &[(1, 10), (2, 19), (3, 27), (4, 34), (5, 40)];
const THREE_YEAR: &[(u32, i64)] = &[(1, 10), (2, 17), (3, 23)];

const STANDARD_ROWS: &[CatalogRow] = &[
    ("HOME_PROTECTION_PLAN", "home_protection", 199, FIVE_YEAR_HOME),
    (
        "COMPREHENSIVE_AUTO_PROTECTION",
        "auto_protection",
        299,
        FIVE_YEAR_AUTO,
    ),
    (
        "ALL_VEHICLE_DEDUCTIBLE_REIMBURSEMENT",
        "deductible_reimbursement",
        150,
        THREE_YEAR,
    ),
    (
        "HOME_DEDUCTIBLE_REIMBURSEMENT",
        "home_deductible_reimbursement",
        160,
        THREE_YEAR,
    ),
    (
        "AUTO_ADVANTAGE_DEDUCTIBLE_REIMBURSEMENT",
        "auto_advantage_deductible_reimbursement",
        120,
        THREE_YEAR,
    ),
    (
        "MULTI_VEHICLE_DEDUCTIBLE_REIMBURSEMENT",
        "multi_vehicle_deductible_reimbursement",
        150,
        THREE_YEAR,
    ),
    (
        "AUTO_RV_DEDUCTIBLE_REIMBURSEMENT",
        "auto_rv_deductible_reimbursement",
        175,
        THREE_YEAR,
    ),
    (
        "HERO_LEVEL_HOME_PROTECTION",
        "hero_level_protection_home",
        789,
        THREE_YEAR,
    ),
];

/// Immutable, versioned product pricing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingCatalog {
    version: String,
    products: Vec<ProductPricingConfig>,
}

impl PricingCatalog {
    /// Creates a catalog, enforcing the code/key bijection.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if a product code or key
    /// appears twice, or a code collides with another product's key.
    pub fn new(
        version: impl Into<String>,
        products: Vec<ProductPricingConfig>,
    ) -> DomainResult<Self> {
        let duplicate =
            |name: &str| DomainError::validation(format!("duplicate catalog entry: {name}"));
        let mut seen: HashSet<&str> = HashSet::new();
        for product in &products {
            if !seen.insert(product.product_code()) {
                return Err(duplicate(product.product_code()));
            }
            if product.key() != product.product_code() && !seen.insert(product.key()) {
                return Err(duplicate(product.key()));
            }
        }
        Ok(Self {
            version: version.into(),
            products,
        })
    }

    /// The embedded catalog shipped with this crate.
    #[must_use]
    pub fn standard() -> Self {
        let products = STANDARD_ROWS
            .iter()
            .filter_map(|(code, key, base, terms)| {
                ProductPricingConfig::new(
                    *code,
                    *key,
                    Decimal::new(*base, 0),
                    terms
                        .iter()
                        .map(|(term, tenths)| (*term, Decimal::new(*tenths, 1))),
                )
                .ok()
            })
            .collect();
        Self {
            version: CATALOG_VERSION.to_string(),
            products,
        }
    }

    /// Catalog version string.
    #[inline]
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Looks up a product by external code or internal key.
    #[must_use]
    pub fn get(&self, code_or_key: &str) -> Option<&ProductPricingConfig> {
        self.by_code(code_or_key)
            .or_else(|| self.by_key(code_or_key))
    }

    /// Looks up a product by external code.
    #[must_use]
    pub fn by_code(&self, product_code: &str) -> Option<&ProductPricingConfig> {
        self.products
            .iter()
            .find(|p| p.product_code() == product_code)
    }

    /// Looks up a product by internal key.
    #[must_use]
    pub fn by_key(&self, key: &str) -> Option<&ProductPricingConfig> {
        self.products.iter().find(|p| p.key() == key)
    }

    /// Maps an external code to its catalog key.
    #[must_use]
    pub fn key_for_code(&self, product_code: &str) -> Option<&str> {
        self.by_code(product_code).map(ProductPricingConfig::key)
    }

    /// Maps a catalog key to its external code.
    #[must_use]
    pub fn code_for_key(&self, key: &str) -> Option<&str> {
        self.by_key(key).map(ProductPricingConfig::product_code)
    }

    /// Base price and term multiplier for a product code and term.
    #[must_use]
    pub fn price(&self, product_code: &str, term_years: u32) -> Option<(Decimal, Decimal)> {
        let product = self.by_code(product_code)?;
        let multiplier = product.multiplier(term_years)?;
        Some((product.base_price(), multiplier))
    }

    /// Base price and tier-adjusted multiplier.
    ///
    /// Wholesale multipliers are scaled by [`WHOLESALE_MULTIPLIER_FACTOR`];
    /// retail multipliers are returned as stored.
    #[must_use]
    pub fn tier_price(
        &self,
        product_code: &str,
        term_years: u32,
        customer_type: CustomerType,
    ) -> Option<(Decimal, Decimal)> {
        let (base_price, multiplier) = self.price(product_code, term_years)?;
        let multiplier = match customer_type {
            CustomerType::Retail => multiplier,
            CustomerType::Wholesale => multiplier.safe_mul(WHOLESALE_MULTIPLIER_FACTOR).ok()?,
        };
        Some((base_price, multiplier))
    }

    /// All products in catalog order.
    pub fn products(&self) -> impl Iterator<Item = &ProductPricingConfig> {
        self.products.iter()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns true if the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for PricingCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn every_embedded_row_is_valid() {
        let catalog = PricingCatalog::standard();
        assert_eq!(catalog.len(), STANDARD_ROWS.len());
        assert_eq!(catalog.version(), CATALOG_VERSION);
    }

    #[test]
    fn mapping_is_bijective() {
        let catalog = PricingCatalog::standard();
        for product in catalog.products() {
            let key = catalog.key_for_code(product.product_code()).unwrap();
            assert_eq!(catalog.code_for_key(key), Some(product.product_code()));
        }
        assert!(PricingCatalog::new("test", catalog.products().cloned().collect()).is_ok());
    }

    #[test]
    fn duplicate_codes_are_rejected() {
        let product = PricingCatalog::standard().by_key("home_protection").cloned().unwrap();
        let result = PricingCatalog::new("dup", vec![product.clone(), product]);
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn price_lookup() {
        let catalog = PricingCatalog::standard();
        assert_eq!(
            catalog.price("COMPREHENSIVE_AUTO_PROTECTION", 3),
            Some((Decimal::new(299, 0), Decimal::new(27, 1)))
        );
        assert_eq!(
            catalog.price("HERO_LEVEL_HOME_PROTECTION", 2),
            Some((Decimal::new(789, 0), Decimal::new(17, 1)))
        );
        assert_eq!(catalog.price("HOME_DEDUCTIBLE_REIMBURSEMENT", 5), None);
        assert_eq!(catalog.price("home_protection", 1), None);
        assert_eq!(catalog.price("NOPE", 1), None);
    }

    #[test]
    fn wholesale_tier_scales_multiplier() {
        let catalog = PricingCatalog::standard();
        assert_eq!(WHOLESALE_MULTIPLIER_FACTOR, Decimal::new(85, 2));
        assert_eq!(
            catalog.tier_price("HOME_PROTECTION_PLAN", 2, CustomerType::Wholesale),
            Some((Decimal::new(199, 0), Decimal::new(153, 2)))
        );
        assert_eq!(
            catalog.tier_price("HOME_PROTECTION_PLAN", 2, CustomerType::Retail),
            Some((Decimal::new(199, 0), Decimal::new(18, 1)))
        );
    }

    #[test]
    fn get_accepts_code_or_key() {
        let catalog = PricingCatalog::standard();
        assert_eq!(
            catalog.get("auto_rv_deductible_reimbursement").unwrap().base_price(),
            Decimal::new(175, 0)
        );
        assert_eq!(
            catalog
                .get("MULTI_VEHICLE_DEDUCTIBLE_REIMBURSEMENT")
                .unwrap()
                .key(),
            "multi_vehicle_deductible_reimbursement"
        );
        assert!(catalog.get("unknown").is_none());
    }

    #[test]
    fn home_protection_terms() {
        let catalog = PricingCatalog::standard();
        let home = catalog.by_key("home_protection").unwrap();
        assert_eq!(home.terms(), vec![1, 2, 3, 4, 5]);
        assert_eq!(home.multiplier(5), Some(Decimal::new(38, 1)));
    }
}
