//! Ingredient resolver
//!
//! Turns free-text ingredient descriptions such as "Rice (1 cup)" into a name
//! and a gram quantity.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::units::match_unit;

/// Quantity phrase used when an entry carries no parenthesised clause
pub const DEFAULT_QUANTITY: &str = "1";

/// Matches "<name> (<quantity phrase>)", first clause only
static INGREDIENT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([^(]*)\(([^)]*)\)").ok());

/// Matches the first unsigned decimal number
static NUMBER_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").ok());

/// Name and raw quantity phrase split out of one ingredient entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientToken {
    pub name: String,
    pub raw_quantity: String,
}

/// An ingredient entry with its quantity converted to grams
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedIngredient {
    pub name: String,
    pub raw_quantity: String,
    pub grams: f64,
    /// Canonical unit label from the unit table, if one matched
    pub unit: Option<&'static str>,
}

/// Split an ingredient entry into name and quantity phrase.
///
/// Entries without a parenthesised clause resolve to the whole text with a
/// quantity of "1". Returns `None` only when no name can be extracted.
pub fn resolve(ingredient_text: &str) -> Option<IngredientToken> {
    let text = ingredient_text.trim();

    let captures = INGREDIENT_PATTERN
        .as_ref()
        .and_then(|pattern| pattern.captures(text));

    let (name, raw_quantity) = match captures {
        Some(caps) => {
            let name = caps.get(1).map_or("", |m| m.as_str()).trim();
            let quantity = caps.get(2).map_or("", |m| m.as_str()).trim();
            let quantity = if quantity.is_empty() { DEFAULT_QUANTITY } else { quantity };
            (name, quantity)
        }
        // An unclosed "(" still ends the name
        None => (text.split('(').next().unwrap_or("").trim(), DEFAULT_QUANTITY),
    };

    if name.is_empty() {
        return None;
    }

    Some(IngredientToken {
        name: name.to_string(),
        raw_quantity: raw_quantity.to_string(),
    })
}

/// Extract the first numeric magnitude from a quantity phrase, defaulting to 1
pub fn parse_magnitude(phrase: &str) -> f64 {
    NUMBER_PATTERN
        .as_ref()
        .and_then(|pattern| pattern.find(phrase))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(1.0)
}

/// Convert a quantity phrase to grams.
///
/// Unrecognised units pass the magnitude through unscaled. Never negative.
pub fn to_grams(raw_quantity: &str) -> f64 {
    let magnitude = parse_magnitude(raw_quantity);
    match match_unit(raw_quantity) {
        Some(rule) => rule.conversion.apply(magnitude),
        None => magnitude,
    }
}

/// Resolve an entry and convert its quantity in one step
pub fn resolve_quantity(ingredient_text: &str) -> Option<ResolvedIngredient> {
    let token = resolve(ingredient_text)?;
    let grams = to_grams(&token.raw_quantity);
    let unit = match_unit(&token.raw_quantity).map(|rule| rule.unit);

    Some(ResolvedIngredient {
        name: token.name,
        raw_quantity: token.raw_quantity,
        grams,
        unit,
    })
}

/// Split a comma-separated ingredient string into entries.
///
/// Commas inside parentheses do not split ("Rice (1 cup, cooked)").
/// Blank entries are dropped.
pub fn split_ingredient_list(list: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in list.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                entries.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    entries.push(current);

    entries
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grams(text: &str) -> f64 {
        resolve_quantity(text).map(|r| r.grams).unwrap_or(-1.0)
    }

    #[test]
    fn test_resolve_name_and_quantity() {
        let token = resolve("Rice (1 cup)").unwrap();
        assert_eq!(token.name, "Rice");
        assert_eq!(token.raw_quantity, "1 cup");

        let token = resolve("  Green Chilli ( 2 pieces ) ").unwrap();
        assert_eq!(token.name, "Green Chilli");
        assert_eq!(token.raw_quantity, "2 pieces");
    }

    #[test]
    fn test_resolve_without_parentheses() {
        let token = resolve("Coriander leaves").unwrap();
        assert_eq!(token.name, "Coriander leaves");
        assert_eq!(token.raw_quantity, DEFAULT_QUANTITY);
    }

    #[test]
    fn test_resolve_uses_first_clause() {
        let token = resolve("Paneer (200g) (cubed)").unwrap();
        assert_eq!(token.name, "Paneer");
        assert_eq!(token.raw_quantity, "200g");
    }

    #[test]
    fn test_resolve_degenerate_inputs() {
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("   "), None);
        assert_eq!(resolve("(100g)"), None);

        let token = resolve("Salt ()").unwrap();
        assert_eq!(token.raw_quantity, DEFAULT_QUANTITY);

        let token = resolve("Sugar (2 tbsp").unwrap();
        assert_eq!(token.name, "Sugar");
        assert_eq!(token.raw_quantity, DEFAULT_QUANTITY);
    }

    #[test]
    fn test_parse_magnitude() {
        assert_eq!(parse_magnitude("1.5 cups"), 1.5);
        assert_eq!(parse_magnitude("about 250g"), 250.0);
        assert_eq!(parse_magnitude("a pinch"), 1.0);
        assert_eq!(parse_magnitude("0 g"), 0.0);
    }

    #[test]
    fn test_to_grams_plain_grams() {
        for n in [1.0, 25.0, 100.0, 250.5] {
            assert_eq!(to_grams(&format!("{}g", n)), n);
            assert_eq!(to_grams(&format!("{} g", n)), n);
        }
    }

    #[test]
    fn test_to_grams_cups() {
        for n in [1.0, 2.0, 0.5] {
            assert_eq!(to_grams(&format!("{} cup", n)), n * 240.0);
        }
    }

    #[test]
    fn test_to_grams_household_units() {
        assert_eq!(to_grams("2 tbsp"), 30.0);
        assert_eq!(to_grams("3 tsp"), 15.0);
        assert_eq!(to_grams("2 pieces"), 60.0);
        assert_eq!(to_grams("4 cloves"), 12.0);
        assert_eq!(to_grams("1 kg"), 1000.0);
        assert_eq!(to_grams("500 ml"), 500.0);
        assert_eq!(to_grams("1.5 l"), 1500.0);
    }

    #[test]
    fn test_to_taste_is_fixed() {
        assert_eq!(to_grams("to taste"), 5.0);
        assert_eq!(to_grams("2 to taste"), 5.0);
        assert_eq!(grams("Salt (to taste)"), 5.0);
    }

    #[test]
    fn test_unrecognised_unit_passes_magnitude_through() {
        assert_eq!(to_grams("3 handfuls"), 3.0);
        assert_eq!(to_grams("2 large eggs"), 2.0);
        assert_eq!(to_grams("some"), 1.0);
    }

    #[test]
    fn test_ginger_inches() {
        assert_eq!(grams("Ginger (2 inch)"), 30.0);
    }

    #[test]
    fn test_resolve_quantity_reports_unit() {
        let resolved = resolve_quantity("Dal (100g)").unwrap();
        assert_eq!(resolved.name, "Dal");
        assert_eq!(resolved.grams, 100.0);
        assert_eq!(resolved.unit, Some("g"));

        let resolved = resolve_quantity("Onion").unwrap();
        assert_eq!(resolved.grams, 1.0);
        assert_eq!(resolved.unit, None);
    }

    #[test]
    fn test_split_ingredient_list() {
        let entries = split_ingredient_list("Rice (1 cup), Dal (100g), Salt (to taste)");
        assert_eq!(entries, vec!["Rice (1 cup)", "Dal (100g)", "Salt (to taste)"]);

        let entries = split_ingredient_list("Rice (1 cup, cooked), , Ghee (1 tsp),");
        assert_eq!(entries, vec!["Rice (1 cup, cooked)", "Ghee (1 tsp)"]);

        assert!(split_ingredient_list("  ").is_empty());
    }
}
