//! Locally ingested label store.
//!
//! A read-only dataset of regulatory label records produced by an offline
//! ETL collaborator (one JSON object per line). Loaded once at startup and
//! queried by exact generic name or brand-name substring. No dataset on
//! disk simply means this provider never answers.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use serde::Deserialize;

use dawaa_core::{AppError, AppResult};
use dawaa_lexicon::normalize_term;

use crate::provider::{InfoField, InfoProvider};

/// One ingested label record.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelRecord {
    pub generic: String,
    pub brand: String,
    #[serde(default)]
    pub indications: Option<String>,
}

/// In-memory index over the ingested label dataset.
pub struct LabelStore {
    by_generic: HashMap<String, LabelRecord>,
    records: Vec<LabelRecord>,
}

impl LabelStore {
    /// Load the dataset from a JSON Lines file.
    ///
    /// Malformed lines are skipped with a warning; the ETL occasionally
    /// emits partial records and one bad line must not poison the store.
    pub fn load(path: &Path) -> AppResult<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            AppError::Source(format!("failed to open label store {:?}: {}", path, e))
        })?;

        let reader = std::io::BufReader::new(file);
        let mut records = Vec::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<LabelRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(line = line_no + 1, error = %e, "skipping malformed label record");
                }
            }
        }

        tracing::info!(count = records.len(), "label store loaded");
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<LabelRecord>) -> Self {
        let by_generic = records
            .iter()
            .map(|r| (normalize_term(&r.generic), r.clone()))
            .collect();

        Self { by_generic, records }
    }

    /// Number of records in the store.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find indications for a term: exact generic match first, then brand
    /// substring.
    pub fn indications(&self, term: &str) -> Option<&str> {
        let term = normalize_term(term);
        if term.is_empty() {
            return None;
        }

        if let Some(record) = self.by_generic.get(&term) {
            return record.indications.as_deref();
        }

        self.records
            .iter()
            .find(|r| normalize_term(&r.brand).contains(&term))
            .and_then(|r| r.indications.as_deref())
    }
}

/// Chain provider backed by the label store.
pub struct LabelStoreProvider {
    store: LabelStore,
}

impl LabelStoreProvider {
    pub fn new(store: LabelStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl InfoProvider for LabelStoreProvider {
    fn name(&self) -> &str {
        "label-store"
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

        if let Some(text) = self.store.indications(term) {
            return Ok(Some(text.to_string()));
        }

        if let Some(generic) = generic {
            if let Some(text) = self.store.indications(generic) {
                return Ok(Some(text.to_string()));
            }
        }

        Ok(None)
    }
}
