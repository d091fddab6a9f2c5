//! Price question resolution.
//!
//! Wraps the price service behind the outcome shape the conversation needs:
//! nothing, one product, or several products awaiting a numbered choice.
//! Service failures are absorbed here and reported as "nothing found";
//! they never abort a turn.

use std::sync::Arc;

use dawaa_sources::{PriceSource, PriceVariant};

/// Outcome of a price lookup.
#[derive(Debug, Clone)]
pub enum PriceOutcome {
    /// No product found (or the service was unreachable)
    NotFound,
    /// Exactly one marketed product
    Single(PriceVariant),
    /// Several products; the full ordered set for indexed selection
    Multiple(Vec<PriceVariant>),
}

/// Resolves price questions through a [`PriceSource`].
pub struct PriceResolver {
    source: Arc<dyn PriceSource>,
}

impl PriceResolver {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self { source }
    }

    /// Look up the marketed products for a medicine term.
    pub async fn lookup(&self, term: &str) -> PriceOutcome {
        let variants = match self.source.variants(term).await {
            Ok(variants) => variants,
            Err(e) => {
                tracing::warn!(term, error = %e, "price lookup failed");
                return PriceOutcome::NotFound;
            }
        };

        match variants.len() {
            0 => PriceOutcome::NotFound,
            1 => PriceOutcome::Single(variants.into_iter().next().expect("one variant")),
            _ => PriceOutcome::Multiple(variants),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dawaa_core::{AppError, AppResult};

    struct FixedPrices(Vec<PriceVariant>);

    #[async_trait::async_trait]
    impl PriceSource for FixedPrices {
        async fn variants(&self, _term: &str) -> AppResult<Vec<PriceVariant>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenPrices;

    #[async_trait::async_trait]
    impl PriceSource for BrokenPrices {
        async fn variants(&self, _term: &str) -> AppResult<Vec<PriceVariant>> {
            Err(AppError::Source("unreachable".to_string()))
        }
    }

    fn variant(name: &str, price: &str) -> PriceVariant {
        PriceVariant {
            id: name.to_string(),
            product_name: name.to_string(),
            price: Some(price.to_string()),
            currency: "EGP".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_is_not_found() {
        let resolver = PriceResolver::new(Arc::new(FixedPrices(vec![])));
        assert!(matches!(resolver.lookup("panadol").await, PriceOutcome::NotFound));
    }

    #[tokio::test]
    async fn test_single_variant() {
        let resolver = PriceResolver::new(Arc::new(FixedPrices(vec![variant(
            "Panadol Extra",
            "38.5",
        )])));

        match resolver.lookup("panadol").await {
            PriceOutcome::Single(v) => assert_eq!(v.product_name, "Panadol Extra"),
            other => panic!("expected single, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_multiple_variants_preserve_order() {
        let resolver = PriceResolver::new(Arc::new(FixedPrices(vec![
            variant("Panadol Extra", "38.5"),
            variant("Panadol Advance", "30"),
            variant("Panadol Cold", "45"),
        ])));

        match resolver.lookup("panadol").await {
            PriceOutcome::Multiple(variants) => {
                assert_eq!(variants.len(), 3);
                assert_eq!(variants[0].product_name, "Panadol Extra");
                assert_eq!(variants[2].product_name, "Panadol Cold");
            }
            other => panic!("expected multiple, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_service_failure_is_not_found() {
        let resolver = PriceResolver::new(Arc::new(BrokenPrices));
        assert!(matches!(resolver.lookup("panadol").await, PriceOutcome::NotFound));
    }
}
