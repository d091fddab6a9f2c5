//! Regulatory label search client.
//!
//! Searches the public drug-label corpus by generic name and maps its
//! array-valued fields onto the chain's label fields. The service answers
//! 404 for an empty result set; that is absence, not failure.

use serde::Deserialize;

use dawaa_core::{AppError, AppResult};

use crate::provider::{InfoField, InfoProvider};

/// Regulatory label search API client.
pub struct RegulatoryLabelClient {
    base_url: String,
    client: reqwest::Client,
}

impl RegulatoryLabelClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into(),
            client: super::http_client(timeout_secs),
        }
    }

    /// Search for a label document by generic name.
    pub async fn search_by_generic(&self, generic: &str) -> AppResult<Option<LabelDocument>> {
        let generic = generic.to_lowercase();
        let search = format!("openfda.generic_name:\"{}\"", generic.trim());

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("search", search.as_str()), ("limit", "1")])
            .send()
            .await
            .map_err(|e| AppError::Source(format!("label search failed: {}", e)))?;

        // Empty result sets come back as 404
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(AppError::Source(format!(
                "label search returned {}",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Source(format!("label search payload: {}", e)))?;

        Ok(body.results.into_iter().next())
    }
}

/// One label document with the fields the chain reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelDocument {
    #[serde(default)]
    pub indications_and_usage: Vec<String>,
    #[serde(default)]
    pub indications: Vec<String>,
    #[serde(default)]
    pub clinical_pharmacology: Vec<String>,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub contraindications: Vec<String>,
    #[serde(default)]
    pub dosage_and_administration: Vec<String>,
    #[serde(default)]
    pub drug_interactions: Vec<String>,
}

impl LabelDocument {
    /// First non-empty value for a label field, in documented fallback
    /// order for indications.
    pub fn field_text(&self, field: InfoField) -> Option<String> {
        let ordered: &[&Vec<String>] = match field {
            InfoField::Indications => &[
                &self.indications_and_usage,
                &self.indications,
                &self.clinical_pharmacology,
                &self.description,
            ],
            InfoField::Warnings => &[&self.warnings, &self.contraindications],
            InfoField::Dosage => &[&self.dosage_and_administration],
            InfoField::Interactions => &[&self.drug_interactions],
        };

        ordered
            .iter()
            .find_map(|values| values.first())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}

/// Chain provider backed by the regulatory label search.
pub struct RegulatoryLabelProvider {
    client: RegulatoryLabelClient,
}

impl RegulatoryLabelProvider {
    pub fn new(client: RegulatoryLabelClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl InfoProvider for RegulatoryLabelProvider {
    fn name(&self) -> &str {
        "regulatory-labels"
    }

    async fn fetch(
        &self,
        term: &str,
        generic: Option<&str>,
        field: InfoField,
    ) -> AppResult<Option<String>> {
        let lookup = generic.unwrap_or(term);

        let Some(document) = self.client.search_by_generic(lookup).await? else {
            return Ok(None);
        };

        Ok(document.field_text(field))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<LabelDocument>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_field_priority() {
        let json = r#"{
            "results": [{
                "indications_and_usage": ["INDICATIONS AND USAGE: for the relief of seasonal allergies."],
                "description": ["A white crystalline powder."]
            }]
        }"#;

        let body: SearchResponse = serde_json::from_str(json).unwrap();
        let document = body.results.into_iter().next().unwrap();
        let text = document.field_text(InfoField::Indications).unwrap();
        assert!(text.contains("seasonal allergies"));
    }

    #[test]
    fn test_indications_fallback_order() {
        let document = LabelDocument {
            clinical_pharmacology: vec!["Blocks peripheral histamine receptors.".to_string()],
            description: vec!["A white powder.".to_string()],
            ..Default::default()
        };

        let text = document.field_text(InfoField::Indications).unwrap();
        assert!(text.contains("histamine receptors"));
    }

    #[test]
    fn test_warnings_falls_back_to_contraindications() {
        let document = LabelDocument {
            contraindications: vec!["Known hypersensitivity to the active substance.".to_string()],
            ..Default::default()
        };

        let text = document.field_text(InfoField::Warnings).unwrap();
        assert!(text.contains("hypersensitivity"));
    }

    #[test]
    fn test_absent_field_is_none() {
        let document = LabelDocument::default();
        assert!(document.field_text(InfoField::Indications).is_none());
        assert!(document.field_text(InfoField::Dosage).is_none());
    }

    #[test]
    fn test_empty_payload_parses() {
        let body: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(body.results.is_empty());
    }
}
