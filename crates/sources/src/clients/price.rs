//! Price service client.
//!
//! Search returns summary rows; a per-product detail endpoint carries the
//! authoritative name and price. Detail fetches are capped and spaced out
//! to stay within the service's informal rate expectations; a failed
//! detail fetch keeps the summary row rather than dropping the variant.

use std::time::Duration;

use serde::Deserialize;

use dawaa_core::{AppError, AppResult};

use crate::prices::{PriceSource, PriceVariant, PRICE_CURRENCY};

/// At most this many search hits get a detail fetch per request.
const MAX_DETAIL_FETCHES: usize = 5;

/// Pause between consecutive detail fetches.
const DETAIL_FETCH_DELAY_MS: u64 = 200;

/// Price service API client.
pub struct PriceClient {
    base_url: String,
    client: reqwest::Client,
}

impl PriceClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into(),
            client: super::http_client(timeout_secs),
        }
    }

    /// Search products by medicine name (either language).
    pub async fn search(&self, name: &str) -> AppResult<Vec<ProductSummary>> {
        let url = format!("{}/search.php", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("name", name)])
            .send()
            .await
            .map_err(|e| AppError::Source(format!("price search failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Source(format!(
                "price service returned {}",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Source(format!("price search payload: {}", e)))?;

        if body.error {
            return Err(AppError::Source(format!(
                "price service error: {}",
                body.message.unwrap_or_else(|| "unknown".to_string())
            )));
        }

        if body.code != 200 {
            return Err(AppError::Source(format!(
                "price service code {}",
                body.code
            )));
        }

        Ok(body.products)
    }

    /// Fetch the detail record for one product.
    pub async fn details(&self, id: &str) -> AppResult<Option<ProductDetails>> {
        let url = format!("{}/info.php", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("id", id)])
            .send()
            .await
            .map_err(|e| AppError::Source(format!("price details failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Source(format!(
                "price service returned {}",
                response.status()
            )));
        }

        let body: DetailsResponse = response
            .json()
            .await
            .map_err(|e| AppError::Source(format!("price details payload: {}", e)))?;

        if body.error || body.code != 200 {
            return Ok(None);
        }

        Ok(body.product)
    }
}

#[async_trait::async_trait]
impl PriceSource for PriceClient {
    async fn variants(&self, term: &str) -> AppResult<Vec<PriceVariant>> {
        let products = self.search(term).await?;
        tracing::debug!(term, count = products.len(), "price search results");

        let mut variants: Vec<PriceVariant> = products.iter().map(ProductSummary::to_variant).collect();

        for (index, product) in products.iter().take(MAX_DETAIL_FETCHES).enumerate() {
            let Some(id) = product.id.as_ref().map(Flexible::render) else {
                continue;
            };

            if index > 0 {
                tokio::time::sleep(Duration::from_millis(DETAIL_FETCH_DELAY_MS)).await;
            }

            match self.details(&id).await {
                Ok(Some(details)) => {
                    let variant = &mut variants[index];
                    if let Some(name) = details.name {
                        variant.product_name = name;
                    }
                    if let Some(price) = details.price {
                        variant.price = Some(price.render());
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    // Keep the summary row; a missing detail record is not
                    // worth losing the variant over.
                    tracing::warn!(id = %id, error = %e, "price detail fetch failed");
                }
            }
        }

        Ok(variants)
    }
}

/// A value the service serializes as either a number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Flexible {
    Number(f64),
    Text(String),
}

impl Flexible {
    pub fn render(&self) -> String {
        match self {
            Flexible::Number(n) if n.fract() == 0.0 => format!("{:.0}", n),
            Flexible::Number(n) => n.to_string(),
            Flexible::Text(s) => s.clone(),
        }
    }
}

/// One search result row.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSummary {
    pub id: Option<Flexible>,
    pub name: Option<String>,
    pub price: Option<Flexible>,
}

impl ProductSummary {
    fn to_variant(&self) -> PriceVariant {
        PriceVariant {
            id: self.id.as_ref().map(Flexible::render).unwrap_or_default(),
            product_name: self.name.clone().unwrap_or_else(|| "Unknown".to_string()),
            price: self.price.as_ref().map(Flexible::render),
            currency: PRICE_CURRENCY.to_string(),
        }
    }
}

/// One detail record.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDetails {
    pub name: Option<String>,
    pub price: Option<Flexible>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default = "default_error")]
    error: bool,
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    products: Vec<ProductSummary>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    #[serde(default = "default_error")]
    error: bool,
    #[serde(default)]
    code: i64,
    #[serde(default)]
    product: Option<ProductDetails>,
}

// An absent error flag means the payload is not trustworthy
fn default_error() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_parse() {
        let json = r#"{
            "error": false,
            "code": 200,
            "products": [
                {"id": 101, "name": "Panadol Extra 24 tabs", "price": 38.5},
                {"id": "102", "name": "Panadol Advance", "price": "30"}
            ]
        }"#;

        let body: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(!body.error);
        assert_eq!(body.products.len(), 2);

        let first = body.products[0].to_variant();
        assert_eq!(first.id, "101");
        assert_eq!(first.price.as_deref(), Some("38.5"));
        assert_eq!(first.currency, "EGP");

        let second = body.products[1].to_variant();
        assert_eq!(second.id, "102");
        assert_eq!(second.price.as_deref(), Some("30"));
    }

    #[test]
    fn test_whole_number_price_renders_without_fraction() {
        let price = Flexible::Number(45.0);
        assert_eq!(price.render(), "45");
    }

    #[test]
    fn test_missing_error_flag_defaults_to_error() {
        let body: SearchResponse = serde_json::from_str(r#"{"code": 200}"#).unwrap();
        assert!(body.error);
    }

    #[test]
    fn test_details_response_parse() {
        let json = r#"{
            "error": false,
            "code": 200,
            "product": {
                "name": "Panadol Extra 24 tabs",
                "price": 38.5,
                "desc": "Pain relief tablets",
                "components": ["Paracetamol", "Caffeine"],
                "company": "GSK"
            }
        }"#;

        let body: DetailsResponse = serde_json::from_str(json).unwrap();
        let product = body.product.unwrap();
        assert_eq!(product.components.len(), 2);
        assert_eq!(product.company.as_deref(), Some("GSK"));
    }

    #[test]
    fn test_summary_without_name_renders_unknown() {
        let summary = ProductSummary {
            id: None,
            name: None,
            price: None,
        };
        let variant = summary.to_variant();
        assert_eq!(variant.product_name, "Unknown");
        assert!(variant.price.is_none());
    }
}
