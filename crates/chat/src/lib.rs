//! Conversation engine for the dawaa medicine Q&A system.
//!
//! This crate turns classified bilingual questions into replies:
//! - [`QuestionClassifier`]: keyword-driven intent detection and subject
//!   extraction
//! - [`SessionStore`]: per-user multi-turn state (confirmation and
//!   variant-selection exchanges), written through compare-and-swap
//! - [`PriceResolver`]: single/multi-variant price answers
//! - [`Composer`]: every user-visible reply string
//! - [`ChatEngine`]: the `ask(question, user_id)` orchestrator

pub mod classify;
pub mod compose;
pub mod engine;
pub mod price;
pub mod session;
pub mod types;

// Re-export main types
pub use classify::{Classification, ConfirmationSuggestion, QuestionClassifier};
pub use compose::{Composer, ComparisonSection, PRICE_DISPLAY_LIMIT};
pub use engine::ChatEngine;
pub use price::{PriceOutcome, PriceResolver};
pub use session::{Session, SessionStore};
pub use types::{Intent, MedicineQuery, PendingConfirmation, PriceVariant};
