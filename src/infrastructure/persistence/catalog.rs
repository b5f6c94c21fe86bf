//! # Catalog Pricing Source
//!
//! Serves the embedded catalog through the [`PricingSource`] port, so it can
//! stand in for the authoritative store when no database is configured.

use crate::domain::catalog::PricingCatalog;
use crate::domain::value_objects::enums::CustomerType;
use crate::infrastructure::persistence::traits::{LookupOutcome, PriceEntry, PricingSource};
use async_trait::async_trait;

#[async_trait]
impl PricingSource for PricingCatalog {
    async fn lookup(
        &self,
        product_code: &str,
        term_years: u32,
        customer_type: CustomerType,
    ) -> LookupOutcome<PriceEntry> {
        match self.tier_price(product_code, term_years, customer_type) {
            Some((base_price, multiplier)) => {
                LookupOutcome::Found(PriceEntry::new(base_price, multiplier))
            }
            None => LookupOutcome::NotFound,
        }
    }

    fn name(&self) -> &'static str {
        "catalog"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn catalog_answers_known_rows() {
        let catalog = PricingCatalog::standard();
        let outcome = catalog
            .lookup("AUTO_RV_DEDUCTIBLE_REIMBURSEMENT", 3, CustomerType::Retail)
            .await;
        assert_eq!(
            outcome,
            LookupOutcome::Found(PriceEntry::new(Decimal::new(175, 0), Decimal::new(23, 1)))
        );
        assert_eq!(catalog.name(), "catalog");
    }

    #[tokio::test]
    async fn catalog_never_reports_unavailable() {
        let catalog = PricingCatalog::standard();
        let outcome = catalog
            .lookup("HOME_DEDUCTIBLE_REIMBURSEMENT", 5, CustomerType::Wholesale)
            .await;
        assert!(outcome.is_not_found());
    }
}
