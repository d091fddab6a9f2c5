//! Reply composition.
//!
//! Every user-visible string is rendered here, from text that has already
//! passed the validity filter. Internal state (pending confirmations,
//! provider names, rejected candidates) never leaks into a reply.

use crate::types::PriceVariant;

/// How many variants a multi-product price reply displays. The full set is
/// kept in the session for indexed selection.
pub const PRICE_DISPLAY_LIMIT: usize = 5;

/// One medicine's column in a comparison reply.
#[derive(Debug, Clone)]
pub struct ComparisonSection {
    pub name: String,
    pub ingredients: Option<String>,
    pub usage: Option<String>,
    pub price: Option<String>,
}

/// Renders the final reply for every conversation outcome.
pub struct Composer;

impl Composer {
    pub fn greeting() -> String {
        "Hello! I can help you with medicine prices, usage, active ingredients, \
         and comparisons, in English or Arabic. What would you like to know?"
            .to_string()
    }

    pub fn help() -> String {
        [
            "Here is what you can ask me:",
            "- \"What is the price of panadol?\"",
            "- \"What is claritine used for?\"",
            "- \"What are the active ingredients of lipitor?\"",
            "- \"Compare panadol and voltaren\"",
            "- \"ما هو سعر البانادول؟\"",
            "You can also just send a medicine name.",
        ]
        .join("\n")
    }

    pub fn farewell() -> String {
        "Take care! Come back any time you have a question about a medicine.".to_string()
    }

    pub fn thanks_reply() -> String {
        "You're welcome! Anything else you would like to know?".to_string()
    }

    pub fn prompt_for_message() -> String {
        "Please enter a message.".to_string()
    }

    pub fn prompt_for_name() -> String {
        "Which medicine do you mean? Please send its name and I will look it up.".to_string()
    }

    pub fn prompt_for_two_names() -> String {
        "To compare, please name the two medicines, for example: \
         \"compare panadol and voltaren\"."
            .to_string()
    }

    /// The confirmation question for a fuzzy name candidate.
    pub fn confirmation_prompt(candidate: &str) -> String {
        format!("Did you mean '{}'? (yes/no)", candidate)
    }

    pub fn could_not_identify() -> String {
        "Sorry, I could not identify that medicine. Please check the spelling \
         or try another name."
            .to_string()
    }

    /// Terminal "nothing found" reply with suggested next actions.
    pub fn not_found(name: &str) -> String {
        format!(
            "Sorry, I couldn't find information about '{}'. You could check \
             the spelling, try the generic name, or ask me about its price \
             instead.",
            name
        )
    }

    pub fn usage(name: &str, text: &str) -> String {
        format!("{}: {}", capitalize(name), text.trim())
    }

    pub fn ingredients(name: &str, ingredients: &[String]) -> String {
        format!(
            "The active ingredient{} of {}: {}.",
            if ingredients.len() == 1 { "" } else { "s" },
            capitalize(name),
            ingredients.join(", ")
        )
    }

    pub fn warnings(name: &str, text: &str) -> String {
        format!("Warnings for {}: {}", capitalize(name), text.trim())
    }

    /// Fallback when no provider carries warnings text.
    pub fn warnings_guidance(name: &str) -> String {
        format!(
            "I don't have the full contraindications of {} on file. Please \
             read the package leaflet and ask your pharmacist before use, \
             especially if you take other medicines.",
            capitalize(name)
        )
    }

    pub fn dosage(name: &str, text: &str) -> String {
        format!("Dosage of {}: {}", capitalize(name), text.trim())
    }

    /// Fallback when no provider carries dosage text.
    pub fn dosage_guidance(name: &str) -> String {
        format!(
            "The right dose of {} depends on your age, weight, and condition. \
             Please follow the package leaflet or your doctor's prescription.",
            capitalize(name)
        )
    }

    pub fn special_populations(name: &str) -> String {
        format!(
            "Use of {} during pregnancy, breastfeeding, or in children should \
             always be cleared with a doctor first. I can tell you its usage, \
             ingredients, or price if that helps.",
            capitalize(name)
        )
    }

    pub fn category(name: &str, generic: Option<&str>) -> String {
        match generic {
            Some(generic) => format!(
                "{} is a brand of {}. A pharmacist can tell you its exact \
                 therapeutic class and the alternatives in it.",
                capitalize(name),
                generic
            ),
            None => format!(
                "I don't have the therapeutic class of {} on file. A \
                 pharmacist can place it exactly; I can tell you its usage, \
                 ingredients, or price.",
                capitalize(name)
            ),
        }
    }

    pub fn price_single(variant: &PriceVariant) -> String {
        match &variant.price {
            Some(price) => format!(
                "{} costs {} {}.",
                variant.product_name, price, variant.currency
            ),
            None => format!(
                "{} is listed, but its price is not available right now.",
                variant.product_name
            ),
        }
    }

    /// Numbered list of products, capped for display; the caller keeps the
    /// full set for selection.
    pub fn price_list(variants: &[PriceVariant], display: usize) -> String {
        let mut lines = vec![format!(
            "I found {} products matching that name:",
            variants.len()
        )];

        for (index, variant) in variants.iter().take(display).enumerate() {
            let price = match &variant.price {
                Some(price) => format!("{} {}", price, variant.currency),
                None => "price not listed".to_string(),
            };
            lines.push(format!("{}. {} - {}", index + 1, variant.product_name, price));
        }

        if variants.len() > display {
            lines.push(format!("...and {} more.", variants.len() - display));
        }

        lines.push("Reply with a number to pick one.".to_string());
        lines.join("\n")
    }

    pub fn variant_selected(variant: &PriceVariant) -> String {
        match &variant.price {
            Some(price) => format!(
                "{} costs {} {}. Anything else you'd like to know about it?",
                variant.product_name, price, variant.currency
            ),
            None => format!(
                "You picked {}. Its price is not available right now.",
                variant.product_name
            ),
        }
    }

    pub fn price_not_found(name: &str) -> String {
        format!(
            "Sorry, I couldn't find a price for '{}'. The product may not be \
             on the market here; try another spelling or the generic name.",
            name
        )
    }

    pub fn compound(usage_part: &str, price_part: &str) -> String {
        format!("{}\n\n{}", usage_part, price_part)
    }

    /// Two labeled sections with ingredients, usage, and price each.
    pub fn comparison(sections: &[ComparisonSection]) -> String {
        let mut lines = Vec::new();

        for section in sections {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!("{}:", capitalize(&section.name)));
            lines.push(format!(
                "  Ingredients: {}",
                section.ingredients.as_deref().unwrap_or("not available")
            ));
            lines.push(format!(
                "  Usage: {}",
                section.usage.as_deref().unwrap_or("not available")
            ));
            lines.push(format!(
                "  Price: {}",
                section.price.as_deref().unwrap_or("not available")
            ));
        }

        lines.join("\n")
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(name: &str, price: Option<&str>) -> PriceVariant {
        PriceVariant {
            id: "1".to_string(),
            product_name: name.to_string(),
            price: price.map(String::from),
            currency: "EGP".to_string(),
        }
    }

    #[test]
    fn test_confirmation_prompt_exact_shape() {
        assert_eq!(
            Composer::confirmation_prompt("zyrtec"),
            "Did you mean 'zyrtec'? (yes/no)"
        );
    }

    #[test]
    fn test_price_list_numbers_every_displayed_variant() {
        let variants = vec![
            variant("Panadol Extra 24 tabs", Some("38.5")),
            variant("Panadol Advance", Some("30")),
            variant("Panadol Cold", None),
        ];

        let reply = Composer::price_list(&variants, PRICE_DISPLAY_LIMIT);
        assert!(reply.contains("1. Panadol Extra 24 tabs - 38.5 EGP"));
        assert!(reply.contains("2. Panadol Advance - 30 EGP"));
        assert!(reply.contains("3. Panadol Cold - price not listed"));
        assert!(!reply.contains("4."));
        assert!(reply.contains("Reply with a number"));
    }

    #[test]
    fn test_price_list_caps_display_but_reports_total() {
        let variants: Vec<PriceVariant> = (1..=8)
            .map(|i| variant(&format!("Panadol {}", i), Some("10")))
            .collect();

        let reply = Composer::price_list(&variants, PRICE_DISPLAY_LIMIT);
        assert!(reply.contains("I found 8 products"));
        assert!(reply.contains("5. Panadol 5"));
        assert!(!reply.contains("6. Panadol 6"));
        assert!(reply.contains("...and 3 more."));
    }

    #[test]
    fn test_comparison_renders_both_sections() {
        let sections = vec![
            ComparisonSection {
                name: "panadol".to_string(),
                ingredients: Some("Paracetamol".to_string()),
                usage: Some("Pain relief".to_string()),
                price: Some("38.5 EGP".to_string()),
            },
            ComparisonSection {
                name: "voltaren".to_string(),
                ingredients: Some("Diclofenac".to_string()),
                usage: None,
                price: None,
            },
        ];

        let reply = Composer::comparison(&sections);
        assert!(reply.contains("Panadol:"));
        assert!(reply.contains("Voltaren:"));
        assert_eq!(reply.matches("Ingredients:").count(), 2);
        assert_eq!(reply.matches("Usage:").count(), 2);
        assert_eq!(reply.matches("Price:").count(), 2);
        assert!(reply.contains("not available"));
    }

    #[test]
    fn test_single_price_with_and_without_value() {
        assert_eq!(
            Composer::price_single(&variant("Panadol Extra", Some("38.5"))),
            "Panadol Extra costs 38.5 EGP."
        );
        assert!(Composer::price_single(&variant("Panadol Extra", None))
            .contains("not available"));
    }

    #[test]
    fn test_ingredients_pluralization() {
        let one = Composer::ingredients("panadol", &["Paracetamol".to_string()]);
        assert!(one.starts_with("The active ingredient of"));

        let two = Composer::ingredients(
            "augmentin",
            &["Amoxicillin".to_string(), "Clavulanic acid".to_string()],
        );
        assert!(two.starts_with("The active ingredients of"));
        assert!(two.contains("Amoxicillin, Clavulanic acid"));
    }
}
