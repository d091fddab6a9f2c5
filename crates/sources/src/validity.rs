//! Validity filtering for provider text.
//!
//! Regulatory label feeds are full of placeholder paragraphs ("use as
//! directed by the physician") that are technically present but tell the
//! user nothing. Every candidate text passes this filter before the chain
//! accepts it; a rejected text falls through to the next provider and is
//! never surfaced.

use dawaa_core::Thresholds;

/// Placeholder phrases that mark a label paragraph as content-free.
const BOILERPLATE_PHRASES: &[&str] = &[
    "condition listed above or as directed by the physician",
    "as directed by the physician",
    "relief of naturally occurring simple nervous tension",
    "use for relief of",
    "indications condition listed above",
    "see package insert",
    "refer to package insert",
    "consult your doctor",
    "ask your doctor",
    "talk to your doctor",
    "follow your doctor's instructions",
    "use as prescribed",
    "use as directed",
    "use according to",
    "use under medical supervision",
    "use under doctor's supervision",
    "use under physician's supervision",
    "use under medical advice",
    "use under medical guidance",
];

/// Words so generic that a paragraph made mostly of them says nothing.
const GENERIC_WORDS: &[&str] = &[
    "use",
    "for",
    "relief",
    "of",
    "naturally",
    "occurring",
    "simple",
    "nervous",
    "tension",
    "condition",
    "listed",
    "above",
    "directed",
    "physician",
    "doctor",
    "medical",
    "supervision",
    "advice",
    "guidance",
    "care",
    "treatment",
    "management",
];

/// Heuristic filter rejecting generic or boilerplate provider text.
#[derive(Debug, Clone, Copy)]
pub struct ValidityFilter {
    min_chars: usize,
    generic_ratio: f64,
}

impl ValidityFilter {
    pub fn new(thresholds: &Thresholds) -> Self {
        Self {
            min_chars: thresholds.validity_min_chars,
            generic_ratio: thresholds.validity_generic_ratio,
        }
    }

    /// Decide whether a provider text is meaningful enough to surface.
    pub fn accept(&self, text: &str) -> bool {
        let trimmed = text.trim();

        if trimmed.chars().count() < self.min_chars {
            tracing::debug!(chars = trimmed.chars().count(), "text rejected: too short");
            return false;
        }

        let lower = trimmed.to_lowercase();
        if let Some(phrase) = BOILERPLATE_PHRASES.iter().find(|p| lower.contains(**p)) {
            tracing::debug!(phrase, "text rejected: boilerplate phrase");
            return false;
        }

        let words: Vec<&str> = lower.split_whitespace().collect();
        if !words.is_empty() {
            let generic_count = words
                .iter()
                .filter(|w| GENERIC_WORDS.contains(*w))
                .count();
            let ratio = generic_count as f64 / words.len() as f64;
            if ratio > self.generic_ratio {
                tracing::debug!(generic_count, total = words.len(), "text rejected: mostly generic words");
                return false;
            }
        }

        true
    }
}

impl Default for ValidityFilter {
    fn default() -> Self {
        Self::new(&Thresholds::default())
    }
}
