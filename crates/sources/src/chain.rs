//! The information fallback chain.
//!
//! Providers are tried in a fixed order until one produces text that the
//! validity filter accepts. A provider error or timeout is equivalent to
//! "no result": it is logged at this boundary and the chain advances. Only
//! total exhaustion yields nothing.

use std::sync::Arc;

use crate::provider::{InfoField, InfoProvider, InformationRecord};
use crate::validity::ValidityFilter;

/// Brand families that historically collided with unrelated concepts in
/// the vocabulary service. For these, the lookup term is forced to the
/// family's generic name and the vocabulary provider is bypassed.
struct PinnedFamily {
    brands: &'static [&'static str],
    generic: &'static str,
}

const PINNED_FAMILIES: &[PinnedFamily] = &[
    PinnedFamily {
        brands: &["prozac", "protasi", "groza", "promax", "grozax"],
        generic: "fluoxetine",
    },
    PinnedFamily {
        brands: &["ozempic", "اوزيمبيك", "اوزيمبك"],
        generic: "semaglutide",
    },
];

/// Ordered provider chain with validity filtering.
pub struct InfoChain {
    providers: Vec<Arc<dyn InfoProvider>>,
    filter: ValidityFilter,
}

impl InfoChain {
    pub fn new(providers: Vec<Arc<dyn InfoProvider>>, filter: ValidityFilter) -> Self {
        Self { providers, filter }
    }

    /// Fetch usage (indications) text for a medicine.
    pub async fn usage(&self, term: &str, generic: Option<&str>) -> Option<InformationRecord> {
        self.field(term, generic, InfoField::Indications).await
    }

    /// Fetch an arbitrary label field, walking the chain until a provider's
    /// text passes the validity filter.
    pub async fn field(
        &self,
        term: &str,
        generic: Option<&str>,
        field: InfoField,
    ) -> Option<InformationRecord> {
        let pinned = pinned_generic(term, generic);
        let (term, generic) = match pinned {
            Some(forced) => {
                tracing::debug!(term, forced, "pinned brand family override");
                (forced, Some(forced))
            }
            None => (term, generic),
        };

        for provider in &self.providers {
            if pinned.is_some() && provider.bypass_for_pinned() {
                tracing::debug!(provider = provider.name(), "bypassed for pinned family");
                continue;
            }

            let candidate = match provider.fetch(term, generic, field).await {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "provider failed, advancing chain");
                    continue;
                }
            };

            let Some(text) = candidate else { continue };

            if !self.filter.accept(&text) {
                tracing::debug!(provider = provider.name(), "text rejected by validity filter");
                continue;
            }

            tracing::info!(provider = provider.name(), field = field.as_str(), "chain answered");
            return Some(InformationRecord {
                source: provider.name().to_string(),
                field,
                text,
            });
        }

        tracing::info!(term, field = field.as_str(), "all providers exhausted");
        None
    }
}

/// Forced generic term for a pinned brand family, if the term or the known
/// generic belongs to one.
fn pinned_generic(term: &str, generic: Option<&str>) -> Option<&'static str> {
    let term = term.to_lowercase();
    PINNED_FAMILIES
        .iter()
        .find(|family| {
            family.brands.contains(&term.as_str())
                || generic.is_some_and(|g| g.eq_ignore_ascii_case(family.generic))
        })
        .map(|family| family.generic)
}
