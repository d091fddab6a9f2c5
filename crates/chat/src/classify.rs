//! Question classification.
//!
//! Keyword-driven bilingual intent detection plus subject extraction. The
//! first matching intent in priority order wins: comparison >
//! administration > ingredients > contraindications > special populations
//! > category > compound > all-prices > price > usage > general.

use std::sync::Arc;

use dawaa_lexicon::{normalize_term, NameResolver, Resolution};

use crate::types::{Intent, MedicineQuery};

const COMPARISON_KEYWORDS: &[&str] = &[
    "difference", "compare", "versus", "الفرق", "قارن", "مقارنة",
];

const ADMINISTRATION_KEYWORDS: &[&str] = &[
    "how should i take",
    "how to take",
    "how do i take",
    "dosage",
    "dose",
    "how many",
    "جرعة",
    "الجرعة",
    "كيف اخذ",
    "كيف آخذ",
    "كيف اتناول",
    "كيف أتناول",
];

const INGREDIENT_KEYWORDS: &[&str] = &[
    "active ingredient",
    "ingredients",
    "ingredient",
    // common misspellings seen in real traffic
    "ingredint",
    "ingrediant",
    "ingrediants",
    "ingridient",
    "ingridients",
    "ingrient",
    "ingrients",
    "ingerin",
    "ingreint",
    "contains",
    "what is in",
    "what's in",
    "المادة الفعالة",
    "المواد الفعالة",
    "المكونات",
    "يحتوي",
];

const CONTRAINDICATION_KEYWORDS: &[&str] = &[
    "contraindication",
    "side effect",
    "warnings",
    "warning",
    "precaution",
    "موانع الاستعمال",
    "موانع",
    "الآثار الجانبية",
    "الاثار الجانبية",
    "تحذيرات",
    "احتياطات",
];

const SPECIAL_POPULATION_KEYWORDS: &[&str] = &[
    "pregnan",
    "breastfeed",
    "lactation",
    "children",
    "kids",
    "pediatric",
    "infant",
    "الحمل",
    "حامل",
    "الرضاعة",
    "الأطفال",
    "الاطفال",
    "للأطفال",
];

const CATEGORY_KEYWORDS: &[&str] = &[
    "category",
    "drug class",
    "classification",
    "what type of",
    "what kind of",
    "فئة",
    "تصنيف",
];

const ALL_PRICES_KEYWORDS: &[&str] = &[
    "all prices",
    "all proices",
    "جميع الأسعار",
    "جميع الاسعار",
    "كل الأسعار",
    "كل الاسعار",
];

const PRICE_KEYWORDS: &[&str] = &[
    "price", "prices", "proices", "cost", "how much", "سعر", "أسعار", "اسعار", "تكلفة",
    "التكلفة", "بكام", "كم",
];

const USAGE_KEYWORDS: &[&str] = &[
    "usage",
    "used for",
    "indication",
    "purpose",
    "treat",
    "استخدام",
    "يستخدم",
    "مؤشرات",
    "الغرض",
    "يعالج",
    "علاج",
];

/// Filler words removed before deciding whether a message is a bare
/// follow-up ("price", "what is the usage") that should inherit the
/// previous subject.
const FUNCTION_WORDS: &[&str] = &[
    "what", "is", "the", "of", "for", "it", "its", "this", "that", "me", "tell", "about",
    "please", "how", "much", "many", "does", "do", "are", "in", "a", "an", "show", "give",
    "ما", "هو", "هي", "هذا", "ذلك", "عن",
];

/// A fuzzy name suggestion surfaced during subject extraction.
#[derive(Debug, Clone)]
pub struct ConfirmationSuggestion {
    pub candidate: String,
    pub score: u32,
}

/// Result of classifying one message.
#[derive(Debug, Clone)]
pub struct Classification {
    pub query: MedicineQuery,
    pub confirmation: Option<ConfirmationSuggestion>,
}

/// Classifies questions into intents and extracts their subjects.
pub struct QuestionClassifier {
    resolver: Arc<NameResolver>,
    lexicon: Arc<dawaa_lexicon::Lexicon>,
}

impl QuestionClassifier {
    pub fn new(resolver: Arc<NameResolver>, lexicon: Arc<dawaa_lexicon::Lexicon>) -> Self {
        Self { resolver, lexicon }
    }

    /// Classify a message, optionally against the previous medicine for
    /// follow-up questions.
    pub async fn classify(&self, text: &str, previous_medicine: Option<&str>) -> Classification {
        let normalized = normalize_term(text);
        let arabic = dawaa_lexicon::is_arabic(text);
        let intent = detect_intent(&normalized);

        let mut subjects = Vec::new();
        let mut confirmation = None;

        if intent == Intent::Comparison {
            subjects = self.comparison_subjects(&normalized);
        } else {
            match self.resolver.resolve(text).await {
                Resolution::Resolved(name) => subjects.push(name),
                Resolution::NeedsConfirmation { candidate, score } => {
                    confirmation = Some(ConfirmationSuggestion { candidate, score });
                }
                Resolution::NotFound => {
                    if let Some(previous) = previous_medicine {
                        if supports_follow_up(intent) && is_generic_follow_up(&normalized) {
                            tracing::debug!(previous, "follow-up question inherits subject");
                            subjects.push(previous.to_string());
                        }
                    }
                }
            }
        }

        tracing::debug!(?intent, subjects = ?subjects, "question classified");

        Classification {
            query: MedicineQuery {
                raw_text: text.to_string(),
                arabic,
                intent,
                subjects,
            },
            confirmation,
        }
    }

    /// Up to two distinct canonical names from a comparison question, after
    /// correcting known misspellings.
    fn comparison_subjects(&self, normalized: &str) -> Vec<String> {
        // Rewriting misspellings in place lets the canonical scan see them.
        let mut text = normalized.to_string();
        for word in normalized.split_whitespace() {
            if let Some(correct) = self.lexicon.correct_misspelling(word) {
                text = text.replace(word, &correct);
            }
        }

        let mut found = self.lexicon.find_all_canonical(&text);
        found.truncate(2);
        found
    }
}

/// Keyword-priority intent detection over normalized text.
fn detect_intent(normalized: &str) -> Intent {
    if is_comparison(normalized) {
        return Intent::Comparison;
    }
    if has_any(normalized, ADMINISTRATION_KEYWORDS) {
        return Intent::Administration;
    }
    if has_any(normalized, INGREDIENT_KEYWORDS) {
        return Intent::Ingredients;
    }
    if has_any(normalized, CONTRAINDICATION_KEYWORDS) {
        return Intent::Contraindications;
    }
    if has_any(normalized, SPECIAL_POPULATION_KEYWORDS) {
        return Intent::SpecialPopulations;
    }
    if has_any(normalized, CATEGORY_KEYWORDS) {
        return Intent::Category;
    }

    let price = has_any(normalized, PRICE_KEYWORDS);
    let usage = has_any(normalized, USAGE_KEYWORDS);

    if usage && price {
        return Intent::Compound;
    }
    if has_any(normalized, ALL_PRICES_KEYWORDS) {
        return Intent::AllPrices;
    }
    if price {
        return Intent::Price;
    }
    if usage {
        return Intent::Usage;
    }

    Intent::General
}

fn is_comparison(normalized: &str) -> bool {
    if has_any(normalized, COMPARISON_KEYWORDS) {
        return true;
    }

    let words: Vec<&str> = normalized.split_whitespace().collect();
    if words.contains(&"vs") {
        return true;
    }

    // "between X and Y" needs both halves to avoid matching every "and"
    (words.contains(&"between") && words.contains(&"and"))
        || (words.contains(&"بين") && normalized.contains('و'))
}

fn has_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

fn supports_follow_up(intent: Intent) -> bool {
    matches!(
        intent,
        Intent::Price
            | Intent::AllPrices
            | Intent::Usage
            | Intent::Ingredients
            | Intent::Contraindications
            | Intent::Administration
            | Intent::SpecialPopulations
            | Intent::Category
            | Intent::Compound
    )
}

/// A message is a generic follow-up when nothing substantial remains after
/// stripping intent keywords and filler words.
fn is_generic_follow_up(normalized: &str) -> bool {
    let mut residual = normalized.to_string();

    for keywords in [
        COMPARISON_KEYWORDS,
        ADMINISTRATION_KEYWORDS,
        INGREDIENT_KEYWORDS,
        CONTRAINDICATION_KEYWORDS,
        SPECIAL_POPULATION_KEYWORDS,
        CATEGORY_KEYWORDS,
        ALL_PRICES_KEYWORDS,
        PRICE_KEYWORDS,
        USAGE_KEYWORDS,
    ] {
        for keyword in keywords {
            residual = residual.replace(keyword, " ");
        }
    }

    residual
        .split_whitespace()
        .filter(|w| !FUNCTION_WORDS.contains(w))
        .all(|w| w.chars().count() <= 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dawaa_core::{AppResult, Thresholds};
    use dawaa_lexicon::{
        ForeignLabelSource, Lexicon, NoTranslation, TermCorrectionSource,
    };

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

    fn classifier() -> QuestionClassifier {
        let lexicon = Arc::new(Lexicon::builtin().unwrap());
        let resolver = Arc::new(NameResolver::new(
            lexicon.clone(),
            Arc::new(EmptySource),
            Arc::new(EmptySource),
            Arc::new(NoTranslation),
            Thresholds::default(),
        ));
        QuestionClassifier::new(resolver, lexicon)
    }

    #[test]
    fn test_intent_priority() {
        assert_eq!(
            detect_intent("what is the difference between panadol and voltaren"),
            Intent::Comparison
        );
        assert_eq!(detect_intent("how should i take metformin"), Intent::Administration);
        assert_eq!(
            detect_intent("what are the ingredients in claritine"),
            Intent::Ingredients
        );
        assert_eq!(detect_intent("side effects of lipitor"), Intent::Contraindications);
        assert_eq!(
            detect_intent("is panadol safe during pregnancy"),
            Intent::SpecialPopulations
        );
        assert_eq!(detect_intent("what kind of drug is concor"), Intent::Category);
        assert_eq!(detect_intent("show me all prices of panadol"), Intent::AllPrices);
        assert_eq!(detect_intent("what is the price of panadol"), Intent::Price);
        assert_eq!(detect_intent("what is panadol used for"), Intent::Usage);
        assert_eq!(detect_intent("panadol"), Intent::General);
    }

    #[test]
    fn test_compound_beats_price_and_usage() {
        assert_eq!(
            detect_intent("what is panadol used for and how much does it cost"),
            Intent::Compound
        );
    }

    #[test]
    fn test_comparison_beats_everything() {
        assert_eq!(
            detect_intent("compare the price of panadol and tylenol"),
            Intent::Comparison
        );
    }

    #[test]
    fn test_arabic_intents() {
        assert_eq!(detect_intent("ما هو سعر البانادول"), Intent::Price);
        assert_eq!(detect_intent("ما هو استخدام كلاريتين"), Intent::Usage);
        assert_eq!(detect_intent("الفرق بين البانادول والريفو"), Intent::Comparison);
        assert_eq!(detect_intent("ما هي المادة الفعالة في ليبيتور"), Intent::Ingredients);
    }

    #[test]
    fn test_vs_is_comparison() {
        assert_eq!(detect_intent("panadol vs tylenol"), Intent::Comparison);
    }

    #[test]
    fn test_bare_and_is_not_comparison() {
        assert_eq!(detect_intent("panadol and water"), Intent::General);
    }

    #[test]
    fn test_generic_follow_up_detection() {
        assert!(is_generic_follow_up("price"));
        assert!(is_generic_follow_up("what is the price"));
        assert!(is_generic_follow_up("what is the usage"));
        assert!(is_generic_follow_up("كم سعره"));
        assert!(!is_generic_follow_up("price of obscuredrugname"));
    }

    #[tokio::test]
    async fn test_subject_extraction_from_text() {
        let classifier = classifier();
        let result = classifier.classify("what is the price of panadol", None).await;
        assert_eq!(result.query.intent, Intent::Price);
        assert_eq!(result.query.subjects, vec!["panadol".to_string()]);
        assert!(result.confirmation.is_none());
    }

    #[tokio::test]
    async fn test_follow_up_inherits_previous_subject() {
        let classifier = classifier();
        let result = classifier.classify("what is the price", Some("lipitor")).await;
        assert_eq!(result.query.intent, Intent::Price);
        assert_eq!(result.query.subjects, vec!["lipitor".to_string()]);
    }

    #[tokio::test]
    async fn test_new_subject_never_falls_back_to_previous() {
        let classifier = classifier();
        // Names an unknown medicine: must not silently answer about lipitor
        let result = classifier
            .classify("what is the price of obscuredrugname", Some("lipitor"))
            .await;
        assert!(result.query.subjects.is_empty());
    }

    #[tokio::test]
    async fn test_comparison_extracts_two_subjects() {
        let classifier = classifier();
        let result = classifier
            .classify("what is the difference between panadol and voltaren", None)
            .await;
        assert_eq!(result.query.intent, Intent::Comparison);
        assert_eq!(
            result.query.subjects,
            vec!["panadol".to_string(), "voltaren".to_string()]
        );
    }

    #[tokio::test]
    async fn test_comparison_with_misspelling() {
        let classifier = classifier();
        let result = classifier
            .classify("difference between palvix and aspirin", None)
            .await;
        assert!(result.query.subjects.contains(&"plavix".to_string()));
        assert!(result.query.subjects.contains(&"aspirin".to_string()));
    }

    #[tokio::test]
    async fn test_fuzzy_subject_surfaces_confirmation() {
        let classifier = classifier();
        let result = classifier.classify("zertic", None).await;
        let suggestion = result.confirmation.unwrap();
        assert_eq!(suggestion.candidate, "zyrtec");
        assert!((75..100).contains(&suggestion.score));
    }

    #[tokio::test]
    async fn test_arabic_subject_extraction() {
        let classifier = classifier();
        let result = classifier.classify("ما هو استخدام كلاريتين؟", None).await;
        assert_eq!(result.query.intent, Intent::Usage);
        assert_eq!(result.query.subjects, vec!["claritin".to_string()]);
        assert!(result.query.arabic);
    }
}
