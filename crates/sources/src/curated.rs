//! Curated usage table.
//!
//! Hand-checked indication paragraphs for the medicines users ask about
//! most. First provider in the chain: fast, offline, and already written to
//! pass the validity filter.

use std::collections::HashMap;

use dawaa_core::{AppError, AppResult};
use dawaa_lexicon::normalize_term;

use crate::provider::{InfoField, InfoProvider};

const CURATED_USAGE: &str = include_str!("../data/curated_usage.json");

/// Curated local usage table, keyed by normalized medicine name.
pub struct CuratedUsageProvider {
    usage: HashMap<String, String>,
}

impl CuratedUsageProvider {
    /// Build from the embedded data file.
    pub fn builtin() -> AppResult<Self> {
        Self::from_json(CURATED_USAGE)
    }

    pub fn from_json(json: &str) -> AppResult<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(json)
            .map_err(|e| AppError::Source(format!("curated usage table: {}", e)))?;

        let usage = raw
            .into_iter()
            .map(|(k, v)| (normalize_term(&k), v))
            .collect();

        Ok(Self { usage })
    }

    fn lookup(&self, name: &str) -> Option<&String> {
        let name = normalize_term(name);
        if name.is_empty() {
            return None;
        }

        if let Some(found) = self.usage.get(&name) {
            return Some(found);
        }

        // Partial match either way covers brand spelling variants
        // ("claritin" vs "claritine").
        self.usage
            .iter()
            .find(|(key, _)| name.contains(key.as_str()) || key.contains(&name))
            .map(|(_, v)| v)
    }
}

#[async_trait::async_trait]
impl InfoProvider for CuratedUsageProvider {
    fn name(&self) -> &str {
        "curated"
    }

    async fn fetch(
        &self,
        term: &str,
        generic: Option<&str>,
        field: InfoField,
    ) -> AppResult<Option<String>> {
        if field != InfoField::Indications {
            return Ok(None);
        }

        if let Some(text) = self.lookup(term) {
            return Ok(Some(text.clone()));
        }

        if let Some(generic) = generic {
            if let Some(text) = self.lookup(generic) {
                return Ok(Some(text.clone()));
            }
        }

        Ok(None)
    }
}
