//! Remote collaborator clients.
//!
//! One reqwest adapter per outbound service. Every client takes its base
//! URL at construction so tests can point it at a stub server, and shares
//! the configured per-call timeout. Clients signal absence with
//! `Ok(None)`, never with errors; errors mean the call itself failed.

mod concept;
mod labels;
mod price;
mod repository;
mod translation;

pub use concept::{ConceptClient, ConceptProperty, ConceptProvider};
pub use labels::{RegulatoryLabelClient, RegulatoryLabelProvider};
pub use price::PriceClient;
pub use repository::{LabelRepositoryClient, LabelRepositoryProvider};
pub use translation::TranslationClient;

use std::time::Duration;

/// Build a reqwest client with the shared per-call timeout.
pub(crate) fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
