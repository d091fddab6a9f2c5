//! Information sources for the dawaa engine.
//!
//! This crate provides the multi-source information fallback chain and the
//! outbound collaborator clients behind it:
//! - **Providers**: curated table, ingested label store, concept
//!   vocabulary, regulatory label search, label repository
//! - **Chain runner**: ordered fallback with per-provider fault isolation
//! - **Validity filter**: rejects boilerplate label text before it can
//!   reach a user
//! - **Price lookup**: search plus capped per-product detail fetches
//!
//! Every provider implements [`InfoProvider`], so sources are individually
//! addable, removable, and mockable.

pub mod chain;
pub mod clients;
pub mod curated;
pub mod prices;
pub mod provider;
pub mod store;
pub mod validity;

// Re-export main types
pub use chain::InfoChain;
pub use clients::{
    ConceptClient, ConceptProvider, LabelRepositoryClient, LabelRepositoryProvider, PriceClient,
    RegulatoryLabelClient, RegulatoryLabelProvider, TranslationClient,
};
pub use curated::CuratedUsageProvider;
pub use prices::{PriceSource, PriceVariant, PRICE_CURRENCY};
pub use provider::{InfoField, InfoProvider, InformationRecord, IngredientSource};
pub use store::{LabelRecord, LabelStore, LabelStoreProvider};
pub use validity::ValidityFilter;
