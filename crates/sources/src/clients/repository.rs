//! Label repository client.
//!
//! Two-step lookup against the label document repository: a name search
//! yields a document id, then the full document is fetched by id. Field
//! fallback mirrors the regulatory label search.

use serde::Deserialize;

use dawaa_core::{AppError, AppResult};

use crate::provider::{InfoField, InfoProvider};

/// Label repository API client.
pub struct LabelRepositoryClient {
    base_url: String,
    client: reqwest::Client,
}

impl LabelRepositoryClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into(),
            client: super::http_client(timeout_secs),
        }
    }

    /// Step 1: find a document id for a medicine name.
    pub async fn lookup_id(&self, name: &str) -> AppResult<Option<String>> {
        let url = format!("{}/drugnames.json", self.base_url);
        let name = name.to_lowercase();

        let response = self
            .client
            .get(&url)
            .query(&[("drug_name", name.trim())])
            .send()
            .await
            .map_err(|e| AppError::Source(format!("repository name lookup failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Source(format!(
                "label repository returned {}",
                response.status()
            )));
        }

        let body: NamesResponse = response
            .json()
            .await
            .map_err(|e| AppError::Source(format!("repository names payload: {}", e)))?;

        Ok(body.data.into_iter().find_map(|entry| entry.setid))
    }

    /// Step 2: fetch the document itself.
    pub async fn fetch_label(&self, id: &str) -> AppResult<Option<RepositoryLabel>> {
        let url = format!("{}/spls/{}.json", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Source(format!("repository label fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Source(format!(
                "label repository returned {}",
                response.status()
            )));
        }

        let body: LabelResponse = response
            .json()
            .await
            .map_err(|e| AppError::Source(format!("repository label payload: {}", e)))?;

        Ok(body.data.into_iter().next())
    }
}

/// One label document from the repository.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryLabel {
    #[serde(default)]
    pub indications_and_usage: Option<String>,
    #[serde(default)]
    pub clinical_pharmacology: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub warnings: Option<String>,
    #[serde(default)]
    pub dosage_and_administration: Option<String>,
    #[serde(default)]
    pub drug_interactions: Option<String>,
}

impl RepositoryLabel {
    /// First present value for a label field.
    pub fn field_text(&self, field: InfoField) -> Option<String> {
        let ordered: &[&Option<String>] = match field {
            InfoField::Indications => &[
                &self.indications_and_usage,
                &self.clinical_pharmacology,
                &self.description,
            ],
            InfoField::Warnings => &[&self.warnings],
            InfoField::Dosage => &[&self.dosage_and_administration],
            InfoField::Interactions => &[&self.drug_interactions],
        };

        ordered
            .iter()
            .find_map(|value| value.as_deref())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}

/// Chain provider backed by the two-step repository lookup.
pub struct LabelRepositoryProvider {
    client: LabelRepositoryClient,
}

impl LabelRepositoryProvider {
    pub fn new(client: LabelRepositoryClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl InfoProvider for LabelRepositoryProvider {
    fn name(&self) -> &str {
        "label-repository"
    }

    async fn fetch(
        &self,
        term: &str,
        generic: Option<&str>,
        field: InfoField,
    ) -> AppResult<Option<String>> {
        let lookup = generic.unwrap_or(term);

        let Some(id) = self.client.lookup_id(lookup).await? else {
            return Ok(None);
        };

        let Some(label) = self.client.fetch_label(&id).await? else {
            return Ok(None);
        };

        Ok(label.field_text(field))
    }
}

#[derive(Debug, Deserialize)]
struct NamesResponse {
    #[serde(default)]
    data: Vec<NameEntry>,
}

#[derive(Debug, Deserialize)]
struct NameEntry {
    setid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LabelResponse {
    #[serde(default)]
    data: Vec<RepositoryLabel>,
}
