//! Concept vocabulary service client.
//!
//! Resolves a medicine name to a concept id, fetches the concept's
//! structured properties, and serves approximate-term spelling correction
//! for the name resolver. Properties are matched to label fields by
//! keyword.

use serde::Deserialize;

use dawaa_core::{AppError, AppResult};
use dawaa_lexicon::TermCorrectionSource;

use crate::provider::{InfoField, InfoProvider, IngredientSource};

/// One name/value property of a vocabulary concept.
#[derive(Debug, Clone)]
pub struct ConceptProperty {
    pub name: String,
    pub value: String,
}

/// Concept vocabulary API client.
pub struct ConceptClient {
    base_url: String,
    client: reqwest::Client,
}

impl ConceptClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into(),
            client: super::http_client(timeout_secs),
        }
    }

    /// Resolve a medicine name to a concept id.
    pub async fn lookup_id(&self, name: &str) -> AppResult<Option<String>> {
        let url = format!("{}/drugs.json", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("name", name)])
            .send()
            .await
            .map_err(|e| AppError::Source(format!("concept id lookup failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Source(format!(
                "concept vocabulary returned {}",
                response.status()
            )));
        }

        let body: DrugsResponse = response
            .json()
            .await
            .map_err(|e| AppError::Source(format!("concept id payload: {}", e)))?;

        let id = body
            .drug_group
            .into_iter()
            .flat_map(|g| g.concept_group)
            .flat_map(|g| g.concept_properties)
            .find_map(|c| c.rxcui);

        Ok(id)
    }

    /// Fetch all structured properties of a concept.
    pub async fn properties(&self, id: &str) -> AppResult<Vec<ConceptProperty>> {
        let url = format!("{}/rxcui/{}/allProperties.json", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .query(&[("prop", "all")])
            .send()
            .await
            .map_err(|e| AppError::Source(format!("concept properties failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Source(format!(
                "concept vocabulary returned {}",
                response.status()
            )));
        }

        let body: PropertiesResponse = response
            .json()
            .await
            .map_err(|e| AppError::Source(format!("concept properties payload: {}", e)))?;

        let properties = body
            .prop_concept_group
            .into_iter()
            .flat_map(|g| g.prop_concept)
            .filter(|p| !p.prop_value.is_empty())
            .map(|p| ConceptProperty {
                name: p.prop_name,
                value: p.prop_value,
            })
            .collect();

        Ok(properties)
    }
}

#[async_trait::async_trait]
impl TermCorrectionSource for ConceptClient {
    async fn approximate_term(&self, term: &str) -> AppResult<Option<String>> {
        let url = format!("{}/approximateTerm.json", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("term", term), ("maxEntries", "1")])
            .send()
            .await
            .map_err(|e| AppError::Source(format!("approximate term failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Source(format!(
                "approximate term returned {}",
                response.status()
            )));
        }

        let body: ApproximateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Source(format!("approximate term payload: {}", e)))?;

        let corrected = body
            .approximate_group
            .into_iter()
            .flat_map(|g| g.candidate)
            .find_map(|c| c.name);

        Ok(corrected)
    }
}

/// Keywords that tie a concept property to a label field.
fn field_keywords(field: InfoField) -> &'static [&'static str] {
    match field {
        InfoField::Indications => &["indication", "use", "purpose", "treatment", "therapy"],
        InfoField::Warnings => &["warning", "contraindication", "precaution", "adverse"],
        InfoField::Dosage => &["dosage", "dose"],
        InfoField::Interactions => &["interaction"],
    }
}

/// Select property values matching a label field, deduplicated and joined.
fn match_field(properties: &[ConceptProperty], field: InfoField) -> Option<String> {
    let keywords = field_keywords(field);
    let mut values: Vec<&str> = Vec::new();

    for property in properties {
        let name = property.name.to_lowercase();
        if keywords.iter().any(|k| name.contains(k)) && !values.contains(&property.value.as_str())
        {
            values.push(&property.value);
        }
    }

    if values.is_empty() {
        None
    } else {
        Some(values.join("; "))
    }
}

/// Chain provider backed by the concept vocabulary.
///
/// Bypassed for pinned brand families: certain brand names collide with
/// unrelated vocabulary concepts and produced documented false positives.
pub struct ConceptProvider {
    client: ConceptClient,
}

impl ConceptProvider {
    pub fn new(client: ConceptClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl InfoProvider for ConceptProvider {
    fn name(&self) -> &str {
        "concept-vocabulary"
    }

    fn bypass_for_pinned(&self) -> bool {
        true
    }

    async fn fetch(
        &self,
        term: &str,
        _generic: Option<&str>,
        field: InfoField,
    ) -> AppResult<Option<String>> {
        let Some(id) = self.client.lookup_id(term).await? else {
            return Ok(None);
        };

        let properties = self.client.properties(&id).await?;
        Ok(match_field(&properties, field))
    }
}

#[async_trait::async_trait]
impl IngredientSource for ConceptProvider {
    async fn fetch_ingredients(&self, term: &str) -> AppResult<Vec<String>> {
        let Some(id) = self.client.lookup_id(term).await? else {
            return Ok(Vec::new());
        };

        let properties = self.client.properties(&id).await?;
        let mut ingredients: Vec<String> = Vec::new();

        for property in properties {
            let name = property.name.to_lowercase();
            if name.contains("ingredient") && !ingredients.contains(&property.value) {
                ingredients.push(property.value);
            }
        }

        Ok(ingredients)
    }
}

// Wire formats

#[derive(Debug, Deserialize)]
struct DrugsResponse {
    #[serde(rename = "drugGroup")]
    drug_group: Option<DrugGroup>,
}

#[derive(Debug, Deserialize)]
struct DrugGroup {
    #[serde(rename = "conceptGroup", default)]
    concept_group: Vec<ConceptGroup>,
}

#[derive(Debug, Deserialize)]
struct ConceptGroup {
    #[serde(rename = "conceptProperties", default)]
    concept_properties: Vec<ConceptEntry>,
}

#[derive(Debug, Deserialize)]
struct ConceptEntry {
    rxcui: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PropertiesResponse {
    #[serde(rename = "propConceptGroup")]
    prop_concept_group: Option<PropConceptGroup>,
}

#[derive(Debug, Deserialize)]
struct PropConceptGroup {
    #[serde(rename = "propConcept", default)]
    prop_concept: Vec<PropConcept>,
}

#[derive(Debug, Deserialize)]
struct PropConcept {
    #[serde(rename = "propName", default)]
    prop_name: String,
    #[serde(rename = "propValue", default)]
    prop_value: String,
}

#[derive(Debug, Deserialize)]
struct ApproximateResponse {
    #[serde(rename = "approximateGroup")]
    approximate_group: Option<ApproximateGroup>,
}

#[derive(Debug, Deserialize)]
struct ApproximateGroup {
    #[serde(default)]
    candidate: Vec<ApproximateCandidate>,
}

#[derive(Debug, Deserialize)]
struct ApproximateCandidate {
    name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props() -> Vec<ConceptProperty> {
        vec![
            ConceptProperty {
                name: "Indication".to_string(),
                value: "Treatment of seasonal allergic rhinitis".to_string(),
            },
            ConceptProperty {
                name: "WARNING_TEXT".to_string(),
                value: "May cause drowsiness".to_string(),
            },
            ConceptProperty {
                name: "Recommended dose".to_string(),
                value: "10 mg once daily".to_string(),
            },
            ConceptProperty {
                name: "Active ingredient".to_string(),
                value: "Loratadine".to_string(),
            },
        ]
    }

    #[test]
    fn test_match_field_indications() {
        let text = match_field(&props(), InfoField::Indications).unwrap();
        assert!(text.contains("allergic rhinitis"));
    }

    #[test]
    fn test_match_field_is_case_insensitive() {
        let text = match_field(&props(), InfoField::Warnings).unwrap();
        assert_eq!(text, "May cause drowsiness");
    }

    #[test]
    fn test_match_field_dosage() {
        let text = match_field(&props(), InfoField::Dosage).unwrap();
        assert_eq!(text, "10 mg once daily");
    }

    #[test]
    fn test_match_field_absent() {
        assert!(match_field(&props(), InfoField::Interactions).is_none());
    }

    #[test]
    fn test_match_field_joins_and_dedupes() {
        let properties = vec![
            ConceptProperty {
                name: "indication".to_string(),
                value: "Allergy relief".to_string(),
            },
            ConceptProperty {
                name: "therapeutic use".to_string(),
                value: "Allergy relief".to_string(),
            },
            ConceptProperty {
                name: "purpose".to_string(),
                value: "Hives".to_string(),
            },
        ];

        let text = match_field(&properties, InfoField::Indications).unwrap();
        assert_eq!(text, "Allergy relief; Hives");
    }

    #[test]
    fn test_drugs_response_parse() {
        let json = r#"{
            "drugGroup": {
                "conceptGroup": [
                    {"tty": "BN"},
                    {"conceptProperties": [{"rxcui": "83367", "name": "atorvastatin"}]}
                ]
            }
        }"#;

        let body: DrugsResponse = serde_json::from_str(json).unwrap();
        let id = body
            .drug_group
            .into_iter()
            .flat_map(|g| g.concept_group)
            .flat_map(|g| g.concept_properties)
            .find_map(|c| c.rxcui);
        assert_eq!(id, Some("83367".to_string()));
    }

    #[test]
    fn test_approximate_response_parse() {
        let json = r#"{"approximateGroup": {"candidate": [{"name": "Zyrtec", "rank": "1"}]}}"#;
        let body: ApproximateResponse = serde_json::from_str(json).unwrap();
        let name = body
            .approximate_group
            .into_iter()
            .flat_map(|g| g.candidate)
            .find_map(|c| c.name);
        assert_eq!(name, Some("Zyrtec".to_string()));
    }

    #[test]
    fn test_empty_responses_parse() {
        let body: DrugsResponse = serde_json::from_str("{}").unwrap();
        assert!(body.drug_group.is_none());

        let body: ApproximateResponse = serde_json::from_str(r#"{"approximateGroup": {}}"#).unwrap();
        assert!(body.approximate_group.unwrap().candidate.is_empty());
    }
}
