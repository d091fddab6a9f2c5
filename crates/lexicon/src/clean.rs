//! Product-name cleanup.
//!
//! Price services return full marketed product names ("Lipitor 20mg 30
//! tablets"). When such a variant is committed as the conversation's
//! current medicine, only the base name is useful for follow-up lookups.

use regex::Regex;
use std::sync::LazyLock;

static DOSAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+\s*(?:mg|mcg|g|ml|iu|units?|%)").expect("dosage regex"));

static FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s+(?:tablets?|capsules?|injection|cream|gel|ointment|suspension|syrup|drops|spray|inhaler|patch|suppositor(?:y|ies)|powder|solution)\b",
    )
    .expect("form regex")
});

static QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+\d+\s*(?:tabs?|caps?|amps?|vials?|tubes?|bottles?|sachets?)\b")
        .expect("quantity regex")
});

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("punctuation regex"));

static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("spaces regex"));

/// Extract the base medicine name from a full product name.
///
/// Removes dosage strengths, pharmaceutical forms, and pack-count tokens,
/// then collapses whitespace and drops stray punctuation.
pub fn strip_product_tokens(full_name: &str) -> String {
    if full_name.is_empty() {
        return String::new();
    }

    let mut base = DOSAGE.replace_all(full_name, "").into_owned();
    base = FORM.replace_all(&base, "").into_owned();
    base = QUANTITY.replace_all(&base, "").into_owned();
    base = PUNCTUATION.replace_all(&base, "").into_owned();
    base = SPACES.replace_all(base.trim(), " ").into_owned();

    base
}
