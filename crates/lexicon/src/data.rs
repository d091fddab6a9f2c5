//! Static name-mapping data.
//!
//! All bilingual dictionaries live as declarative JSON under `data/` and are
//! embedded at compile time, parsed once into an immutable [`Lexicon`].
//! Resolution logic never carries inline tables.

use std::collections::HashMap;

use dawaa_core::{AppError, AppResult};

use crate::script::normalize_term;

const CANONICAL_NAMES: &str = include_str!("../data/canonical_names.json");
const FOREIGN_NAMES: &str = include_str!("../data/foreign_names.json");
const MISSPELLINGS: &str = include_str!("../data/misspellings.json");
const GENERIC_NAMES: &str = include_str!("../data/generic_names.json");
const INGREDIENTS: &str = include_str!("../data/ingredients.json");

/// Immutable lookup tables for medicine names.
///
/// Holds the canonical name list plus the foreign-term, misspelling,
/// trade-to-generic, and active-ingredient dictionaries. All keys are
/// stored in normalized form (see [`normalize_term`]).
#[derive(Debug)]
pub struct Lexicon {
    canonical: Vec<String>,
    foreign: HashMap<String, String>,
    foreign_keys: Vec<String>,
    misspellings: HashMap<String, String>,
    misspelling_keys: Vec<String>,
    generics: HashMap<String, String>,
    ingredients: HashMap<String, Vec<String>>,
}

impl Lexicon {
    /// Build the lexicon from the embedded data files.
    pub fn builtin() -> AppResult<Self> {
        Self::from_json(
            CANONICAL_NAMES,
            FOREIGN_NAMES,
            MISSPELLINGS,
            GENERIC_NAMES,
            INGREDIENTS,
        )
    }

    /// Build a lexicon from raw JSON documents.
    pub fn from_json(
        canonical: &str,
        foreign: &str,
        misspellings: &str,
        generics: &str,
        ingredients: &str,
    ) -> AppResult<Self> {
        let canonical: Vec<String> = serde_json::from_str(canonical)
            .map_err(|e| AppError::Lexicon(format!("canonical name list: {}", e)))?;
        let foreign_raw: HashMap<String, String> = serde_json::from_str(foreign)
            .map_err(|e| AppError::Lexicon(format!("foreign name dictionary: {}", e)))?;
        let misspellings_raw: HashMap<String, String> = serde_json::from_str(misspellings)
            .map_err(|e| AppError::Lexicon(format!("misspelling table: {}", e)))?;
        let generics_raw: HashMap<String, String> = serde_json::from_str(generics)
            .map_err(|e| AppError::Lexicon(format!("generic name table: {}", e)))?;
        let ingredients_raw: HashMap<String, Vec<String>> = serde_json::from_str(ingredients)
            .map_err(|e| AppError::Lexicon(format!("ingredient table: {}", e)))?;

        let canonical: Vec<String> = canonical.iter().map(|n| normalize_term(n)).collect();

        let foreign: HashMap<String, String> = foreign_raw
            .into_iter()
            .map(|(k, v)| (normalize_term(&k), normalize_term(&v)))
            .collect();

        let misspellings: HashMap<String, String> = misspellings_raw
            .into_iter()
            .map(|(k, v)| (normalize_term(&k), normalize_term(&v)))
            .collect();

        let generics = generics_raw
            .into_iter()
            .map(|(k, v)| (normalize_term(&k), normalize_term(&v)))
            .collect();

        let ingredients = ingredients_raw
            .into_iter()
            .map(|(k, v)| (normalize_term(&k), v))
            .collect();

        // Substring scans prefer the longest key, so "claritine" wins over
        // the contained "claritin".
        let mut sorted_canonical = canonical.clone();
        sorted_canonical.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));

        let mut foreign_keys: Vec<String> = foreign.keys().cloned().collect();
        foreign_keys.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));

        let mut misspelling_keys: Vec<String> = misspellings.keys().cloned().collect();
        misspelling_keys.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));

        Ok(Self {
            canonical: sorted_canonical,
            foreign,
            foreign_keys,
            misspellings,
            misspelling_keys,
            generics,
            ingredients,
        })
    }

    /// All canonical names, longest first.
    pub fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.canonical.iter().map(String::as_str)
    }

    /// Whether a normalized name is on the canonical list.
    pub fn is_canonical(&self, name: &str) -> bool {
        self.canonical.iter().any(|n| n == name)
    }

    /// Find a canonical name appearing as a substring of the text.
    ///
    /// Longest names are tried first; excluded candidates are skipped.
    pub fn find_canonical(&self, text: &str, exclude: &[String]) -> Option<String> {
        self.canonical
            .iter()
            .find(|name| !exclude.contains(name) && text.contains(name.as_str()))
            .cloned()
    }

    /// All canonical names appearing anywhere in the text, in the order
    /// they appear, deduplicated through the generic-name table so a brand
    /// and its foreign spelling count once. Foreign-dictionary terms in the
    /// text contribute their mapped canonical names. Scanning is
    /// longest-name-first so "claritine" is not shadowed by the contained
    /// "claritin".
    pub fn find_all_canonical(&self, text: &str) -> Vec<String> {
        let mut found: Vec<(usize, String)> = Vec::new();
        let mut seen_generics = Vec::new();

        for name in &self.canonical {
            let Some(position) = text.find(name.as_str()) else {
                continue;
            };
            if found.iter().any(|(_, f)| f.contains(name.as_str())) {
                continue;
            }
            let generic = self.generic_for(name).unwrap_or(name).to_string();
            if seen_generics.contains(&generic) {
                continue;
            }
            seen_generics.push(generic);
            found.push((position, name.clone()));
        }

        for key in &self.foreign_keys {
            let Some(position) = text.find(key.as_str()) else {
                continue;
            };
            if found
                .iter()
                .any(|(_, f)| f.contains(key.as_str()) || key.contains(f.as_str()))
            {
                continue;
            }
            let Some(name) = self.foreign.get(key) else { continue };
            let generic = self.generic_for(name).unwrap_or(name).to_string();
            if seen_generics.contains(&generic) {
                continue;
            }
            seen_generics.push(generic);
            found.push((position, name.clone()));
        }

        found.sort_by_key(|(position, _)| *position);
        found.into_iter().map(|(_, name)| name).collect()
    }

    /// Correct a known misspelling appearing in the text.
    pub fn correct_misspelling(&self, text: &str) -> Option<String> {
        self.misspelling_keys
            .iter()
            .find(|key| text.contains(key.as_str()))
            .and_then(|key| self.misspellings.get(key))
            .cloned()
    }

    /// Map a foreign-language term appearing in the text to its canonical
    /// name. Exact normalized-key lookup, scanned over the text so terms
    /// embedded in a sentence are found.
    pub fn find_foreign(&self, text: &str) -> Option<String> {
        if let Some(mapped) = self.foreign.get(text) {
            return Some(mapped.clone());
        }

        self.foreign_keys
            .iter()
            .find(|key| text.contains(key.as_str()))
            .and_then(|key| self.foreign.get(key))
            .cloned()
    }

    /// Generic (active-ingredient common) name for a trade name, if mapped.
    pub fn generic_for(&self, name: &str) -> Option<&str> {
        self.generics.get(name).map(String::as_str)
    }

    /// Active-ingredient labels for a medicine name.
    ///
    /// Exact lookup first, then containment either way, matching how noisy
    /// product names ("claritin" vs "claritine") arrive.
    pub fn ingredients_for(&self, name: &str) -> Option<&[String]> {
        if let Some(found) = self.ingredients.get(name) {
            return Some(found);
        }

        self.ingredients
            .iter()
            .find(|(key, _)| name.contains(key.as_str()) || key.contains(name))
            .map(|(_, v)| v.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> Lexicon {
        Lexicon::builtin().expect("builtin lexicon parses")
    }

    #[test]
    fn test_builtin_parses() {
        let lex = lexicon();
        assert!(lex.is_canonical("panadol"));
        assert!(lex.is_canonical("zyrtec"));
        assert!(!lex.is_canonical("zertic"));
    }

    #[test]
    fn test_find_canonical_in_sentence() {
        let lex = lexicon();
        assert_eq!(
            lex.find_canonical("what is the price of panadol", &[]),
            Some("panadol".to_string())
        );
    }

    #[test]
    fn test_find_canonical_prefers_longest() {
        let lex = lexicon();
        assert_eq!(
            lex.find_canonical("claritine usage", &[]),
            Some("claritine".to_string())
        );
    }

    #[test]
    fn test_find_canonical_respects_exclusions() {
        let lex = lexicon();
        let excluded = vec!["panadol".to_string()];
        assert_eq!(lex.find_canonical("panadol", &excluded), None);
    }

    #[test]
    fn test_foreign_lookup() {
        let lex = lexicon();
        assert_eq!(lex.find_foreign("كلاريتين"), Some("claritin".to_string()));
        // Definite-article form
        assert_eq!(lex.find_foreign("البانادول"), Some("panadol".to_string()));
        // Embedded in a sentence
        assert_eq!(
            lex.find_foreign("ما هو استخدام كلاريتين؟"),
            Some("claritin".to_string())
        );
    }

    #[test]
    fn test_misspelling_correction() {
        let lex = lexicon();
        assert_eq!(
            lex.correct_misspelling("palvix price"),
            Some("plavix".to_string())
        );
        assert_eq!(lex.correct_misspelling("panadol"), None);
    }

    #[test]
    fn test_generic_for() {
        let lex = lexicon();
        assert_eq!(lex.generic_for("lipitor"), Some("atorvastatin"));
        assert_eq!(lex.generic_for("prozac"), Some("fluoxetine"));
        assert_eq!(lex.generic_for("unknown-brand"), None);
    }

    #[test]
    fn test_ingredients_partial_match() {
        let lex = lexicon();
        let found = lex.ingredients_for("claritin").unwrap();
        assert!(found.contains(&"Loratadine".to_string()));
    }

    #[test]
    fn test_find_all_canonical_dedupes_same_generic() {
        let lex = lexicon();
        // claritin and loratadine share a generic; only one should remain
        let found = lex.find_all_canonical("compare claritin and loratadine");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_find_all_canonical_two_subjects_in_text_order() {
        let lex = lexicon();
        let found = lex.find_all_canonical("difference between panadol and voltaren");
        assert_eq!(found, vec!["panadol".to_string(), "voltaren".to_string()]);

        let reversed = lex.find_all_canonical("difference between voltaren and panadol");
        assert_eq!(reversed, vec!["voltaren".to_string(), "panadol".to_string()]);
    }

    #[test]
    fn test_find_all_canonical_maps_foreign_terms() {
        let lex = lexicon();
        let found = lex.find_all_canonical("الفرق بين البانادول والريفو");
        assert!(found.contains(&"panadol".to_string()));
        assert!(found.contains(&"rivo".to_string()));
    }

    #[test]
    fn test_find_all_canonical_mixed_scripts_dedupe() {
        let lex = lexicon();
        // Same medicine named in both scripts counts once
        let found = lex.find_all_canonical("panadol او البانادول");
        assert_eq!(found, vec!["panadol".to_string()]);
    }
}
