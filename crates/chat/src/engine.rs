//! The conversation engine.
//!
//! One entry point, [`ChatEngine::ask`]: takes a free-text question and a
//! user id, runs the per-user state machine, and returns the reply. Turns
//! are processed synchronously end-to-end; the only shared mutable state is
//! the session store, written through compare-and-swap so a double
//! submission by the same user cannot drop an update.

use std::sync::Arc;

use dawaa_core::{AppConfig, AppResult};
use dawaa_lexicon::{
    normalize_term, strip_product_tokens, Lexicon, NameResolver, NoTranslation, Resolution,
};
use dawaa_sources::{
    ConceptClient, ConceptProvider, CuratedUsageProvider, InfoChain, InfoField, InfoProvider,
    IngredientSource, LabelRepositoryClient, LabelRepositoryProvider, LabelStore,
    LabelStoreProvider, PriceClient, RegulatoryLabelClient, RegulatoryLabelProvider,
    TranslationClient, ValidityFilter,
};

use crate::classify::QuestionClassifier;
use crate::compose::{Composer, ComparisonSection, PRICE_DISPLAY_LIMIT};
use crate::price::{PriceOutcome, PriceResolver};
use crate::session::{Session, SessionStore};
use crate::types::{Intent, PendingConfirmation};

const GREETING_WORDS: &[&str] = &[
    "hi", "hello", "hey", "salam", "مرحبا", "اهلا", "أهلا", "هاي",
];

const GREETING_PHRASES: &[&str] = &[
    "good morning",
    "good evening",
    "good afternoon",
    "السلام عليكم",
    "صباح الخير",
    "مساء الخير",
];

const FAREWELL_WORDS: &[&str] = &["bye", "goodbye", "وداعا", "سلام"];

const THANKS_PHRASES: &[&str] = &["thanks", "thank you", "شكرا", "متشكر"];

const AFFIRMATIONS: &[&str] = &[
    "yes", "yeah", "yep", "yup", "y", "ok", "okay", "sure", "correct", "نعم", "ايوه", "أيوه",
    "ايوة", "اه", "تمام", "صح",
];

const NEGATIONS: &[&str] = &["no", "nope", "nah", "n", "لا", "لأ"];

/// The query-resolution engine behind `ask`.
pub struct ChatEngine {
    lexicon: Arc<Lexicon>,
    resolver: Arc<NameResolver>,
    classifier: QuestionClassifier,
    chain: InfoChain,
    prices: PriceResolver,
    ingredients: Arc<dyn IngredientSource>,
    sessions: Arc<SessionStore>,
    default_user: String,
}

impl ChatEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lexicon: Arc<Lexicon>,
        resolver: Arc<NameResolver>,
        chain: InfoChain,
        prices: PriceResolver,
        ingredients: Arc<dyn IngredientSource>,
        sessions: Arc<SessionStore>,
        default_user: impl Into<String>,
    ) -> Self {
        let classifier = QuestionClassifier::new(resolver.clone(), lexicon.clone());
        Self {
            lexicon,
            resolver,
            classifier,
            chain,
            prices,
            ingredients,
            sessions,
            default_user: default_user.into(),
        }
    }

    /// Wire the engine against the configured live collaborators.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let timeout = config.request_timeout_secs;
        let endpoints = &config.endpoints;

        let lexicon = Arc::new(Lexicon::builtin()?);
        let resolver = Arc::new(NameResolver::new(
            lexicon.clone(),
            Arc::new(ConceptClient::new(endpoints.concept_api.as_str(), timeout)),
            Arc::new(TranslationClient::new(
                endpoints.translation_api.as_str(),
                timeout,
            )),
            Arc::new(NoTranslation),
            config.thresholds,
        ));

        let concept = Arc::new(ConceptProvider::new(ConceptClient::new(
            endpoints.concept_api.as_str(),
            timeout,
        )));

        let mut providers: Vec<Arc<dyn InfoProvider>> =
            vec![Arc::new(CuratedUsageProvider::builtin()?)];
        if let Some(path) = &config.label_store_path {
            providers.push(Arc::new(LabelStoreProvider::new(LabelStore::load(path)?)));
        }
        providers.push(concept.clone());
        providers.push(Arc::new(RegulatoryLabelProvider::new(
            RegulatoryLabelClient::new(endpoints.label_api.as_str(), timeout),
        )));
        providers.push(Arc::new(LabelRepositoryProvider::new(
            LabelRepositoryClient::new(endpoints.repository_api.as_str(), timeout),
        )));

        let chain = InfoChain::new(providers, ValidityFilter::new(&config.thresholds));
        let prices = PriceResolver::new(Arc::new(PriceClient::new(
            endpoints.price_api.as_str(),
            timeout,
        )));

        Ok(Self::new(
            lexicon,
            resolver,
            chain,
            prices,
            concept,
            Arc::new(SessionStore::new()),
            config.default_user_id.clone(),
        ))
    }

    /// Answer one question for one user.
    ///
    /// A missing or blank user id falls back to the configured default, so
    /// all anonymous callers share a single session.
    pub async fn ask(&self, question: &str, user_id: Option<&str>) -> AppResult<String> {
        let text = question.trim();
        if text.is_empty() {
            return Ok(Composer::prompt_for_message());
        }

        let user = user_id
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(&self.default_user);

        let mut attempt = 0;
        loop {
            attempt += 1;
            let session = self.sessions.snapshot(user);
            let revision = session.revision;

            let (reply, updated) = self.process(text, session).await;

            match self.sessions.compare_and_swap(user, revision, updated) {
                Ok(()) => return Ok(reply),
                Err(_) if attempt == 1 => {
                    tracing::debug!(user, "session conflict, reprocessing turn");
                }
                Err(_) => {
                    tracing::warn!(user, "session conflict persisted, dropping state update");
                    return Ok(reply);
                }
            }
        }
    }

    /// Run one turn of the state machine against a session snapshot.
    async fn process(&self, text: &str, mut session: Session) -> (String, Session) {
        if let Some(pending) = session.pending.clone() {
            return self.handle_confirmation(text, pending, session).await;
        }

        if !session.variants.is_empty() {
            if let Some(choice) = parse_selection(text) {
                if (1..=session.variants.len()).contains(&choice) {
                    let variant = session.variants[choice - 1].clone();
                    session.clear_transient();
                    session.last_medicine =
                        Some(normalize_term(&strip_product_tokens(&variant.product_name)));
                    session.selected_variant = Some(variant.clone());
                    return (Composer::variant_selected(&variant), session);
                }
            }
            // Out-of-range or non-numeric: treat as a fresh question.
            session.clear_transient();
        }

        let normalized = normalize_term(text);
        if let Some(reply) = small_talk_reply(&normalized) {
            return (reply, session);
        }

        let classification = self
            .classifier
            .classify(text, session.last_medicine.as_deref())
            .await;

        if let Some(suggestion) = classification.confirmation {
            let prompt = Composer::confirmation_prompt(&suggestion.candidate);
            session.set_pending(PendingConfirmation {
                candidate: suggestion.candidate,
                original_question: text.to_string(),
                intent: classification.query.intent,
                rejected: Vec::new(),
            });
            return (prompt, session);
        }

        let query = classification.query;
        if query.subjects.is_empty() {
            return (Composer::prompt_for_name(), session);
        }

        self.answer(query.intent, &query.subjects, session).await
    }

    /// A yes/no turn while a name suggestion is pending.
    async fn handle_confirmation(
        &self,
        text: &str,
        pending: PendingConfirmation,
        mut session: Session,
    ) -> (String, Session) {
        let normalized = normalize_term(text);

        if is_reply_word(&normalized, AFFIRMATIONS) {
            session.clear_transient();
            // Replay the intent classified with the original question, not
            // a re-derived one.
            return self
                .answer(pending.intent, &[pending.candidate], session)
                .await;
        }

        if is_reply_word(&normalized, NEGATIONS) {
            let mut rejected = pending.rejected;
            rejected.push(pending.candidate);

            return match self
                .resolver
                .resolve_excluding(&pending.original_question, &rejected)
                .await
            {
                Resolution::Resolved(name) => {
                    session.clear_transient();
                    self.answer(pending.intent, &[name], session).await
                }
                Resolution::NeedsConfirmation { candidate, .. } => {
                    let prompt = Composer::confirmation_prompt(&candidate);
                    session.set_pending(PendingConfirmation {
                        candidate,
                        original_question: pending.original_question,
                        intent: pending.intent,
                        rejected,
                    });
                    (prompt, session)
                }
                Resolution::NotFound => {
                    session.clear_transient();
                    (Composer::could_not_identify(), session)
                }
            };
        }

        // Anything else: re-ask, state unchanged.
        (Composer::confirmation_prompt(&pending.candidate), session)
    }

    /// Dispatch an intent over its resolved subjects.
    async fn answer(
        &self,
        intent: Intent,
        subjects: &[String],
        mut session: Session,
    ) -> (String, Session) {
        session.clear_transient();

        if intent == Intent::Comparison {
            if subjects.len() < 2 {
                return (Composer::prompt_for_two_names(), session);
            }
            let reply = self.comparison(&subjects[0], &subjects[1]).await;
            return (reply, session);
        }

        let name = subjects[0].clone();
        session.last_medicine = Some(name.clone());

        match intent {
            Intent::Price => self.price_answer(&name, session, false).await,
            Intent::AllPrices => self.price_answer(&name, session, true).await,
            Intent::Compound => {
                let usage = self.usage_answer(&name).await;
                let (price, session) = self.price_answer(&name, session, false).await;
                (Composer::compound(&usage, &price), session)
            }
            Intent::Usage | Intent::General => (self.usage_answer(&name).await, session),
            Intent::Ingredients => (self.ingredients_answer(&name).await, session),
            Intent::Contraindications => {
                let reply = match self.field_text(&name, InfoField::Warnings).await {
                    Some(text) => Composer::warnings(&name, &text),
                    None => Composer::warnings_guidance(&name),
                };
                (reply, session)
            }
            Intent::Administration => {
                let reply = match self.field_text(&name, InfoField::Dosage).await {
                    Some(text) => Composer::dosage(&name, &text),
                    None => Composer::dosage_guidance(&name),
                };
                (reply, session)
            }
            Intent::SpecialPopulations => (Composer::special_populations(&name), session),
            Intent::Category => (
                Composer::category(&name, self.lexicon.generic_for(&name)),
                session,
            ),
            Intent::Comparison => (Composer::prompt_for_two_names(), session),
        }
    }

    /// Price lookup plus the state transition for multi-variant results.
    async fn price_answer(
        &self,
        name: &str,
        mut session: Session,
        list_all: bool,
    ) -> (String, Session) {
        match self.prices.lookup(name).await {
            PriceOutcome::NotFound => (Composer::price_not_found(name), session),
            PriceOutcome::Single(variant) => (Composer::price_single(&variant), session),
            PriceOutcome::Multiple(variants) => {
                let display = if list_all {
                    variants.len()
                } else {
                    PRICE_DISPLAY_LIMIT
                };
                let reply = Composer::price_list(&variants, display);
                session.set_variants(variants);
                (reply, session)
            }
        }
    }

    async fn usage_answer(&self, name: &str) -> String {
        let generic = self.lexicon.generic_for(name).map(String::from);
        match self.chain.usage(name, generic.as_deref()).await {
            Some(record) => Composer::usage(name, &record.text),
            None => Composer::not_found(name),
        }
    }

    async fn field_text(&self, name: &str, field: InfoField) -> Option<String> {
        let generic = self.lexicon.generic_for(name).map(String::from);
        self.chain
            .field(name, generic.as_deref(), field)
            .await
            .map(|record| record.text)
    }

    async fn ingredients_answer(&self, name: &str) -> String {
        if let Some(found) = self.lexicon.ingredients_for(name) {
            return Composer::ingredients(name, found);
        }

        match self.ingredients.fetch_ingredients(name).await {
            Ok(found) if !found.is_empty() => Composer::ingredients(name, &found),
            Ok(_) => Composer::not_found(name),
            Err(e) => {
                tracing::warn!(name, error = %e, "ingredient lookup failed");
                Composer::not_found(name)
            }
        }
    }

    /// Ingredients, usage, and price side by side for two medicines.
    async fn comparison(&self, first: &str, second: &str) -> String {
        let mut sections = Vec::with_capacity(2);

        for name in [first, second] {
            let ingredients = match self.lexicon.ingredients_for(name) {
                Some(found) => Some(found.join(", ")),
                None => match self.ingredients.fetch_ingredients(name).await {
                    Ok(found) if !found.is_empty() => Some(found.join(", ")),
                    Ok(_) => None,
                    Err(e) => {
                        tracing::warn!(name, error = %e, "ingredient lookup failed");
                        None
                    }
                },
            };

            let generic = self.lexicon.generic_for(name).map(String::from);
            let usage = self
                .chain
                .usage(name, generic.as_deref())
                .await
                .map(|record| record.text);

            let price = match self.prices.lookup(name).await {
                PriceOutcome::Single(variant) => variant
                    .price
                    .map(|p| format!("{} {}", p, variant.currency)),
                PriceOutcome::Multiple(variants) => variants
                    .into_iter()
                    .find_map(|v| v.price.map(|p| format!("{} ({})", p, v.currency))),
                PriceOutcome::NotFound => None,
            };

            sections.push(ComparisonSection {
                name: name.to_string(),
                ingredients,
                usage,
                price,
            });
        }

        Composer::comparison(&sections)
    }
}

/// A 1-based selection, when the whole reply is a number.
fn parse_selection(text: &str) -> Option<usize> {
    text.trim().parse::<usize>().ok()
}

/// Whole-message match against a short reply word list ("yes", "no").
fn is_reply_word(normalized: &str, words: &[&str]) -> bool {
    let mut parts = normalized.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(first), None) => words.contains(&first),
        (Some(first), Some(_)) => words.contains(&first) && parts.next().is_none(),
        _ => false,
    }
}

/// Canned replies for greetings, thanks, farewells, and help requests.
fn small_talk_reply(normalized: &str) -> Option<String> {
    let words: Vec<&str> = normalized.split_whitespace().collect();
    let short = words.len() <= 4;

    if short
        && (words.iter().any(|w| GREETING_WORDS.contains(w))
            || GREETING_PHRASES.iter().any(|p| normalized.contains(p)))
    {
        return Some(Composer::greeting());
    }

    if normalized == "help"
        || normalized == "مساعدة"
        || normalized.contains("what can you do")
    {
        return Some(Composer::help());
    }

    if short && THANKS_PHRASES.iter().any(|p| normalized.contains(p)) {
        return Some(Composer::thanks_reply());
    }

    if short && words.iter().any(|w| FAREWELL_WORDS.contains(w)) {
        return Some(Composer::farewell());
    }

    None
}
