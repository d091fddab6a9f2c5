//! Knowledge-base foreign-label lookup client.
//!
//! Queries a public knowledge base for the English label of an entity whose
//! Arabic label matches the term. Used by the name resolver when the local
//! foreign dictionary misses.

use serde::Deserialize;

use dawaa_core::{AppError, AppResult};
use dawaa_lexicon::ForeignLabelSource;

/// SPARQL endpoint client for foreign-label lookups.
pub struct TranslationClient {
    base_url: String,
    client: reqwest::Client,
}

impl TranslationClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into(),
            client: super::http_client(timeout_secs),
        }
    }

    fn build_query(term: &str) -> String {
        // The term is interpolated into a quoted literal; strip quote
        // characters so user text cannot alter the query shape.
        let sanitized: String = term.chars().filter(|c| *c != '"' && *c != '\\').collect();
        format!(
            "SELECT ?enLabel WHERE {{ ?d rdfs:label \"{}\"@ar; rdfs:label ?enLabel. \
             FILTER(lang(?enLabel)=\"en\") }} LIMIT 1",
            sanitized
        )
    }
}

#[async_trait::async_trait]
impl ForeignLabelSource for TranslationClient {
    async fn lookup_foreign_label(&self, term: &str) -> AppResult<Option<String>> {
        let query = Self::build_query(term);

        let response = self
            .client
            .get(&self.base_url)
            .header("Accept", "application/json")
            .header("User-Agent", "dawaa/0.1")
            .query(&[("query", query.as_str()), ("format", "json")])
            .send()
            .await
            .map_err(|e| AppError::Source(format!("foreign label lookup failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Source(format!(
                "knowledge base returned {}",
                response.status()
            )));
        }

        let body: SparqlResponse = response
            .json()
            .await
            .map_err(|e| AppError::Source(format!("foreign label payload: {}", e)))?;

        let label = body
            .results
            .map(|r| r.bindings)
            .unwrap_or_default()
            .into_iter()
            .find_map(|b| b.en_label)
            .map(|l| l.value);

        Ok(label)
    }
}

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: Option<SparqlResults>,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    #[serde(default)]
    bindings: Vec<SparqlBinding>,
}

#[derive(Debug, Deserialize)]
struct SparqlBinding {
    #[serde(rename = "enLabel")]
    en_label: Option<SparqlValue>,
}

#[derive(Debug, Deserialize)]
struct SparqlValue {
    value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parse() {
        let json = r#"{
            "results": {
                "bindings": [
                    {"enLabel": {"type": "literal", "xml:lang": "en", "value": "loratadine"}}
                ]
            }
        }"#;

        let body: SparqlResponse = serde_json::from_str(json).unwrap();
        let label = body
            .results
            .map(|r| r.bindings)
            .unwrap_or_default()
            .into_iter()
            .find_map(|b| b.en_label)
            .map(|l| l.value);
        assert_eq!(label, Some("loratadine".to_string()));
    }

    #[test]
    fn test_empty_bindings_parse() {
        let body: SparqlResponse =
            serde_json::from_str(r#"{"results": {"bindings": []}}"#).unwrap();
        assert!(body.results.unwrap().bindings.is_empty());
    }

    #[test]
    fn test_query_escapes_quotes() {
        let query = TranslationClient::build_query("ter\"m");
        assert!(!query.contains("ter\"m"));
        assert!(query.contains("term"));
    }
}
