//! Medicine name lexicon for the dawaa engine.
//!
//! This crate canonicalizes medicine names from noisy bilingual input:
//! - Static name-mapping data (canonical list, foreign-term dictionary,
//!   misspellings, trade-to-generic, active ingredients)
//! - Fuzzy scoring tolerant of misspellings
//! - The [`NameResolver`] pipeline with pluggable remote lookup sources
//!
//! # Example
//! ```
//! use dawaa_lexicon::{fuzzy, Lexicon};
//!
//! let lexicon = Lexicon::builtin().unwrap();
//! assert!(lexicon.is_canonical("panadol"));
//! assert_eq!(fuzzy::similarity("panadol", "panadol"), 100);
//! ```

pub mod clean;
pub mod data;
pub mod fuzzy;
pub mod resolver;
pub mod script;

// Re-export main types
pub use clean::strip_product_tokens;
pub use data::Lexicon;
pub use resolver::{
    ForeignLabelSource, NameResolver, NoTranslation, Resolution, TermCorrectionSource,
    TranslationSource,
};
pub use script::{is_arabic, normalize_term};
