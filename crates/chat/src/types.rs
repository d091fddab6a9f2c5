//! Conversation data types.

pub use dawaa_sources::PriceVariant;

/// What the user is asking for. One intent per message; the first match in
/// priority order wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// "difference between X and Y"
    Comparison,
    /// "how should I take X"
    Administration,
    /// "what are the ingredients in X"
    Ingredients,
    /// "side effects of X"
    Contraindications,
    /// "is X safe during pregnancy / for children"
    SpecialPopulations,
    /// "what kind of drug is X"
    Category,
    /// usage and price keywords in one message
    Compound,
    /// "show me all prices of X"
    AllPrices,
    /// "price of X"
    Price,
    /// "what is X used for"
    Usage,
    /// anything else that mentions a medicine
    General,
}

/// One classified user message. Ephemeral: built per message, never stored.
#[derive(Debug, Clone)]
pub struct MedicineQuery {
    pub raw_text: String,
    pub arabic: bool,
    pub intent: Intent,
    pub subjects: Vec<String>,
}

/// A name suggestion awaiting the user's yes/no.
///
/// Carries the already-classified intent so the replay after "yes" cannot
/// drift from the original classification, and the candidates the user has
/// already turned down so none is proposed twice.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConfirmation {
    pub candidate: String,
    pub original_question: String,
    pub intent: Intent,
    pub rejected: Vec<String>,
}
