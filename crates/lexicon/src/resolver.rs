//! Medicine name resolution.
//!
//! Turns noisy free text (either language, misspelled, embedded in a
//! question) into a canonical medicine name. Local dictionaries are tried
//! first; remote lookups and fuzzy matching only run when the cheap paths
//! miss. Every remote step is fault-isolated: a failure is the same as "no
//! result" and the pipeline moves on.

use std::sync::Arc;

use dawaa_core::{AppResult, Thresholds};

use crate::data::Lexicon;
use crate::fuzzy;
use crate::script::{is_arabic, normalize_term};

/// Remote approximate-term spelling correction (Latin-script inputs).
#[async_trait::async_trait]
pub trait TermCorrectionSource: Send + Sync {
    async fn approximate_term(&self, term: &str) -> AppResult<Option<String>>;
}

/// Remote foreign-label lookup (non-Latin inputs) against an external
/// knowledge base.
#[async_trait::async_trait]
pub trait ForeignLabelSource: Send + Sync {
    async fn lookup_foreign_label(&self, term: &str) -> AppResult<Option<String>>;
}

/// Optional machine-translation fallback. Implementations may no-op.
#[async_trait::async_trait]
pub trait TranslationSource: Send + Sync {
    async fn translate(&self, text: &str) -> AppResult<Option<String>>;
}

/// Default translation source: not wired to any backend.
pub struct NoTranslation;

#[async_trait::async_trait]
impl TranslationSource for NoTranslation {
    async fn translate(&self, _text: &str) -> AppResult<Option<String>> {
        Ok(None)
    }
}

/// Outcome of a resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Name identified with full confidence.
    Resolved(String),
    /// A plausible candidate was found; the user must confirm it.
    NeedsConfirmation { candidate: String, score: u32 },
    /// Nothing matched above the confirmation threshold.
    NotFound,
}

/// Words that must never be fuzzy-matched against medicine names.
const SMALL_TALK: &[&str] = &[
    "hi", "hello", "hey", "good", "morning", "evening", "afternoon", "thanks", "thank", "bye",
    "goodbye", "yes", "no", "ok", "okay", "مرحبا", "السلام", "صباح", "مساء", "شكرا", "وداعا",
    "نعم", "لا", "ايوه", "أهلا", "اهلا",
];

/// Canonicalizes medicine names from free text.
pub struct NameResolver {
    lexicon: Arc<Lexicon>,
    correction: Arc<dyn TermCorrectionSource>,
    foreign: Arc<dyn ForeignLabelSource>,
    translation: Arc<dyn TranslationSource>,
    thresholds: Thresholds,
}

impl NameResolver {
    pub fn new(
        lexicon: Arc<Lexicon>,
        correction: Arc<dyn TermCorrectionSource>,
        foreign: Arc<dyn ForeignLabelSource>,
        translation: Arc<dyn TranslationSource>,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            lexicon,
            correction,
            foreign,
            translation,
            thresholds,
        }
    }

    /// Resolve a medicine name from free text.
    pub async fn resolve(&self, text: &str) -> Resolution {
        self.resolve_excluding(text, &[]).await
    }

    /// Resolve a medicine name, skipping candidates the user already
    /// rejected in a confirmation exchange.
    pub async fn resolve_excluding(&self, text: &str, rejected: &[String]) -> Resolution {
        let normalized = normalize_term(text);
        if normalized.is_empty() {
            return Resolution::NotFound;
        }

        // 1. Known misspellings map straight to their canonical name.
        if let Some(corrected) = self.lexicon.correct_misspelling(&normalized) {
            if !rejected.contains(&corrected) {
                tracing::debug!(input = %normalized, name = %corrected, "misspelling corrected");
                return Resolution::Resolved(corrected);
            }
        }

        // 2. Canonical name present verbatim in the text.
        if let Some(name) = self.lexicon.find_canonical(&normalized, rejected) {
            return Resolution::Resolved(name);
        }

        // 3. Foreign-language dictionary.
        if let Some(name) = self.lexicon.find_foreign(&normalized) {
            if !rejected.contains(&name) {
                tracing::debug!(input = %normalized, name = %name, "foreign term mapped");
                return Resolution::Resolved(name);
            }
        }

        // Small talk and very short fragments would only produce garbage
        // matches downstream.
        if self.is_small_talk(&normalized) || normalized.chars().count() < 4 {
            return Resolution::NotFound;
        }

        // 4/5. Remote lookups, picked by script.
        if is_arabic(text) {
            match self.foreign.lookup_foreign_label(&normalized).await {
                Ok(Some(label)) => return Resolution::Resolved(self.canonicalize(&label)),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "foreign label lookup failed"),
            }
        } else {
            match self.correction.approximate_term(&normalized).await {
                Ok(Some(corrected)) => return Resolution::Resolved(self.canonicalize(&corrected)),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "approximate term lookup failed"),
            }
        }

        // 6. Machine translation, if a backend is configured.
        match self.translation.translate(&normalized).await {
            Ok(Some(translated)) => {
                let translated = normalize_term(&translated);
                if let Some(name) = self.lexicon.find_canonical(&translated, rejected) {
                    return Resolution::Resolved(name);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "translation lookup failed"),
        }

        // 7. Fuzzy matching against the canonical list.
        let candidates = self
            .lexicon
            .canonical_names()
            .filter(|name| !rejected.iter().any(|r| r == name));

        match fuzzy::best_match(&normalized, candidates) {
            Some((name, score)) if score >= self.thresholds.name_accept => {
                tracing::debug!(input = %normalized, name = %name, score, "fuzzy match accepted");
                Resolution::Resolved(name.to_string())
            }
            Some((name, score)) if score >= self.thresholds.name_confirm => {
                tracing::debug!(input = %normalized, name = %name, score, "fuzzy match needs confirmation");
                Resolution::NeedsConfirmation {
                    candidate: name.to_string(),
                    score,
                }
            }
            _ => Resolution::NotFound,
        }
    }

    /// Map a remote lookup result back onto the canonical list when
    /// possible; otherwise keep the corrected term as-is for the
    /// information chain to try.
    fn canonicalize(&self, term: &str) -> String {
        let normalized = normalize_term(term);
        self.lexicon
            .find_canonical(&normalized, &[])
            .unwrap_or(normalized)
    }

    fn is_small_talk(&self, normalized: &str) -> bool {
        let words: Vec<&str> = normalized.split_whitespace().collect();
        words.len() <= 2 && words.iter().any(|w| SMALL_TALK.contains(w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dawaa_core::AppError;

    /// Stub that fails the test if any network-backed source is touched.
    struct PanickingSource;

    #[async_trait::async_trait]
    impl TermCorrectionSource for PanickingSource {
        async fn approximate_term(&self, term: &str) -> AppResult<Option<String>> {
            panic!("unexpected network call: approximate_term({})", term);
        }
    }

    #[async_trait::async_trait]
    impl ForeignLabelSource for PanickingSource {
        async fn lookup_foreign_label(&self, term: &str) -> AppResult<Option<String>> {
            panic!("unexpected network call: lookup_foreign_label({})", term);
        }
    }

    /// Stub that yields nothing, as an unreachable backend would after
    /// its failure is absorbed.
    struct EmptySource;

    #[async_trait::async_trait]
    impl TermCorrectionSource for EmptySource {
        async fn approximate_term(&self, _term: &str) -> AppResult<Option<String>> {
            Ok(None)
        }
    }

    #[async_trait::async_trait]
    impl ForeignLabelSource for EmptySource {
        async fn lookup_foreign_label(&self, _term: &str) -> AppResult<Option<String>> {
            Ok(None)
        }
    }

    /// Stub that always errors, to prove failures fall through.
    struct FailingSource;

    #[async_trait::async_trait]
    impl TermCorrectionSource for FailingSource {
        async fn approximate_term(&self, _term: &str) -> AppResult<Option<String>> {
            Err(AppError::Source("connection refused".to_string()))
        }
    }

    #[async_trait::async_trait]
    impl ForeignLabelSource for FailingSource {
        async fn lookup_foreign_label(&self, _term: &str) -> AppResult<Option<String>> {
            Err(AppError::Source("connection refused".to_string()))
        }
    }

    fn resolver_with(
        correction: Arc<dyn TermCorrectionSource>,
        foreign: Arc<dyn ForeignLabelSource>,
    ) -> NameResolver {
        NameResolver::new(
            Arc::new(Lexicon::builtin().unwrap()),
            correction,
            foreign,
            Arc::new(NoTranslation),
            Thresholds::default(),
        )
    }

    fn offline_resolver() -> NameResolver {
        resolver_with(Arc::new(EmptySource), Arc::new(EmptySource))
    }

    #[tokio::test]
    async fn test_canonical_names_resolve_directly() {
        let resolver = resolver_with(Arc::new(PanickingSource), Arc::new(PanickingSource));

        for name in ["panadol", "lipitor", "zyrtec", "augmentin", "metformin"] {
            assert_eq!(
                resolver.resolve(name).await,
                Resolution::Resolved(name.to_string())
            );
        }
    }

    #[tokio::test]
    async fn test_foreign_terms_resolve_without_network() {
        // Panicking stubs prove dictionary hits never reach the network.
        let resolver = resolver_with(Arc::new(PanickingSource), Arc::new(PanickingSource));

        assert_eq!(
            resolver.resolve("كلاريتين").await,
            Resolution::Resolved("claritin".to_string())
        );
        assert_eq!(
            resolver.resolve("البانادول").await,
            Resolution::Resolved("panadol".to_string())
        );
    }

    #[tokio::test]
    async fn test_name_in_question_resolves() {
        let resolver = resolver_with(Arc::new(PanickingSource), Arc::new(PanickingSource));

        assert_eq!(
            resolver.resolve("what is the price of panadol?").await,
            Resolution::Resolved("panadol".to_string())
        );
    }

    #[tokio::test]
    async fn test_misspelling_needs_confirmation() {
        let resolver = offline_resolver();

        match resolver.resolve("zertic").await {
            Resolution::NeedsConfirmation { candidate, score } => {
                assert_eq!(candidate, "zyrtec");
                assert!((75..100).contains(&score));
            }
            other => panic!("expected confirmation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_greetings_are_not_matched() {
        let resolver = offline_resolver();

        assert_eq!(resolver.resolve("hello").await, Resolution::NotFound);
        assert_eq!(resolver.resolve("good morning").await, Resolution::NotFound);
        assert_eq!(resolver.resolve("شكرا").await, Resolution::NotFound);
    }

    #[tokio::test]
    async fn test_short_inputs_are_not_matched() {
        let resolver = offline_resolver();

        assert_eq!(resolver.resolve("pa").await, Resolution::NotFound);
        assert_eq!(resolver.resolve("xyz").await, Resolution::NotFound);
    }

    #[tokio::test]
    async fn test_remote_failure_falls_through_to_fuzzy() {
        let resolver = resolver_with(Arc::new(FailingSource), Arc::new(FailingSource));

        // The correction backend errors; fuzzy matching still runs.
        match resolver.resolve("zertic").await {
            Resolution::NeedsConfirmation { candidate, .. } => assert_eq!(candidate, "zyrtec"),
            other => panic!("expected confirmation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_remote_correction_short_circuits() {
        struct Correcting;

        #[async_trait::async_trait]
        impl TermCorrectionSource for Correcting {
            async fn approximate_term(&self, _term: &str) -> AppResult<Option<String>> {
                Ok(Some("Zyrtec".to_string()))
            }
        }

        let resolver = resolver_with(Arc::new(Correcting), Arc::new(EmptySource));

        assert_eq!(
            resolver.resolve("zertic").await,
            Resolution::Resolved("zyrtec".to_string())
        );
    }

    #[tokio::test]
    async fn test_rejected_candidate_is_never_reproposed() {
        let resolver = offline_resolver();
        let rejected = vec!["zyrtec".to_string()];

        match resolver.resolve_excluding("zertic", &rejected).await {
            Resolution::NeedsConfirmation { candidate, .. } => {
                assert_ne!(candidate, "zyrtec");
            }
            Resolution::Resolved(name) => assert_ne!(name, "zyrtec"),
            Resolution::NotFound => {}
        }
    }

    #[tokio::test]
    async fn test_unknown_gibberish_not_found() {
        let resolver = offline_resolver();
        assert_eq!(resolver.resolve("qwxyzzzz").await, Resolution::NotFound);
    }
}
