//! Information provider abstraction.
//!
//! Each source of medicine information (curated table, local label store,
//! remote services) implements [`InfoProvider`]. The chain runner drives
//! them in order and applies the validity filter; providers stay unaware of
//! each other and are independently addable, removable, and mockable.

use dawaa_core::AppResult;

/// A label field the chain can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoField {
    /// Indications and usage
    Indications,
    /// Warnings, contraindications, precautions
    Warnings,
    /// Dosage and administration
    Dosage,
    /// Drug interactions
    Interactions,
}

impl InfoField {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoField::Indications => "indications",
            InfoField::Warnings => "warnings",
            InfoField::Dosage => "dosage",
            InfoField::Interactions => "interactions",
        }
    }
}

/// One accepted piece of provider text, tagged with where it came from.
#[derive(Debug, Clone)]
pub struct InformationRecord {
    pub source: String,
    pub field: InfoField,
    pub text: String,
}

/// Trait for information providers.
///
/// A provider answers for the fields it carries and returns `Ok(None)` for
/// everything else — absence is a value, never an error. Errors are
/// reserved for genuine failures (network, payload) and are absorbed by
/// the chain runner.
#[async_trait::async_trait]
pub trait InfoProvider: Send + Sync {
    /// Provider name used in logs and source attribution.
    fn name(&self) -> &str;

    /// Whether this provider is bypassed when a pinned brand-family
    /// override is in effect.
    fn bypass_for_pinned(&self) -> bool {
        false
    }

    /// Fetch a label field for a medicine term.
    ///
    /// # Arguments
    /// * `term` - resolved medicine name (trade or generic)
    /// * `generic` - generic name, when known
    /// * `field` - which label field is wanted
    async fn fetch(
        &self,
        term: &str,
        generic: Option<&str>,
        field: InfoField,
    ) -> AppResult<Option<String>>;
}

/// Trait for active-ingredient lookups against a remote vocabulary.
#[async_trait::async_trait]
pub trait IngredientSource: Send + Sync {
    async fn fetch_ingredients(&self, term: &str) -> AppResult<Vec<String>>;
}
