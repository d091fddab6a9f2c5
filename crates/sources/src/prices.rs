//! Price lookup abstraction.
//!
//! The price service returns one row per marketed product (brand, strength,
//! pack). The trait keeps the conversation engine testable without a live
//! service.

use dawaa_core::AppResult;

/// Currency every price from the service is quoted in.
pub const PRICE_CURRENCY: &str = "EGP";

/// One marketed product variant with its price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceVariant {
    /// Service-side product id, used for detail fetches
    pub id: String,

    /// Full marketed product name (brand + strength + pack)
    pub product_name: String,

    /// Price as quoted by the service, when present
    pub price: Option<String>,

    /// Quote currency
    pub currency: String,
}

/// Trait for the price lookup service.
///
/// Variants preserve the service's result order; user-facing selection is
/// 1-based over that order.
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    async fn variants(&self, term: &str) -> AppResult<Vec<PriceVariant>>;
}
