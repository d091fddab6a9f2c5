//! Fuzzy name scoring.
//!
//! Two-part approach, both built on Jaro-Winkler from `strsim`:
//! 1. whole-string similarity between the candidate and the full input
//! 2. partial similarity - the candidate aligned against every window of
//!    matching length inside the longer string, so a name embedded in a
//!    question still scores high
//!
//! The final score is `round(100 * max(whole, partial))`. 100 means an
//! exact (or exactly-contained) match; scores in the confirmation band are
//! surfaced to the user as "did you mean" prompts.

/// Similarity score between two strings on a 0-100 scale.
pub fn similarity(a: &str, b: &str) -> u32 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let whole = strsim::jaro_winkler(a, b);
    let score = whole.max(partial(a, b));

    (score * 100.0).round() as u32
}

/// Best window alignment of the shorter string inside the longer one.
fn partial(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let (short, long) = if a_chars.len() <= b_chars.len() {
        (&a_chars, &b_chars)
    } else {
        (&b_chars, &a_chars)
    };

    if short.len() == long.len() {
        return strsim::jaro_winkler(a, b);
    }

    let needle: String = short.iter().collect();
    let mut best: f64 = 0.0;

    for window in long.windows(short.len()) {
        let haystack: String = window.iter().collect();
        let score = strsim::jaro_winkler(&needle, &haystack);
        if score > best {
            best = score;
        }
    }

    best
}

/// Find the best-scoring candidate for the given text.
///
/// Returns the candidate together with its score, or `None` when the
/// candidate list is empty.
pub fn best_match<'a, I>(text: &str, candidates: I) -> Option<(&'a str, u32)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, u32)> = None;

    for candidate in candidates {
        let score = similarity(candidate, text);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_scores_100() {
        assert_eq!(similarity("panadol", "panadol"), 100);
    }

    #[test]
    fn test_contained_name_scores_100() {
        // Exact containment aligns a perfect window
        assert_eq!(similarity("panadol", "price of panadol"), 100);
    }

    #[test]
    fn test_close_misspelling_lands_in_confirmation_band() {
        let score = similarity("zyrtec", "zertic");
        assert!((75..100).contains(&score), "score was {}", score);
    }

    #[test]
    fn test_unrelated_strings_score_low() {
        assert!(similarity("zyrtec", "hello world") < 75);
    }

    #[test]
    fn test_corruption_is_monotonic() {
        // Progressively corrupting a name never raises its score
        let exact = similarity("lipitor", "lipitor");
        let one_off = similarity("lipitor", "liptor");
        let two_off = similarity("lipitor", "liptr");

        assert_eq!(exact, 100);
        assert!(one_off < exact);
        assert!(two_off < one_off);
    }

    #[test]
    fn test_best_match_picks_highest() {
        let candidates = ["zyrtec", "zantac", "zocor"];
        let (name, score) = best_match("zertic", candidates).unwrap();
        assert_eq!(name, "zyrtec");
        assert!(score >= 75);
    }

    #[test]
    fn test_best_match_empty_candidates() {
        assert!(best_match("zertic", std::iter::empty()).is_none());
    }

    #[test]
    fn test_empty_input_scores_zero() {
        assert_eq!(similarity("", "panadol"), 0);
        assert_eq!(similarity("panadol", ""), 0);
    }
}
