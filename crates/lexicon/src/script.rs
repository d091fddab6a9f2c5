//! Script detection and term normalization.
//!
//! Questions arrive in English or Arabic, often mixed. Normalization keeps
//! dictionary lookups deterministic: whitespace is collapsed, Arabic
//! diacritics (tashkeel) are stripped, and Latin text is lowercased.

/// Check whether text contains Arabic characters.
pub fn is_arabic(text: &str) -> bool {
    text.chars().any(|c| ('\u{0621}'..='\u{064A}').contains(&c))
}

/// Normalize a term for lookup.
///
/// Collapses runs of whitespace, removes Arabic diacritics
/// (U+064B..U+065F and U+0670) and lowercases Latin letters. The result is
/// the key form used by every dictionary in the lexicon.
pub fn normalize_term(term: &str) -> String {
    let stripped: String = term
        .chars()
        .filter(|c| !is_diacritic(*c))
        .collect();

    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn is_diacritic(c: char) -> bool {
    ('\u{064B}'..='\u{065F}').contains(&c) || c == '\u{0670}'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_arabic() {
        assert!(is_arabic("بانادول"));
        assert!(is_arabic("ما هو سعر panadol"));
        assert!(!is_arabic("panadol"));
        assert!(!is_arabic(""));
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_term("  Panadol   Extra "), "panadol extra");
    }

    #[test]
    fn test_normalize_strips_diacritics() {
        // "دواء" with fatha/damma marks inserted
        let decorated = "دَوَاءٌ";
        assert_eq!(normalize_term(decorated), "دواء");
    }

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(normalize_term("LIPITOR"), "lipitor");
    }
}
