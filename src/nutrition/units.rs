//! Unit table and conversion constants
//!
//! Approximate gram weights for the household measures that show up in
//! ingredient lists. These are fixed constants, not densities.

use serde::Serialize;

// ============================================================================
// Weight / Volume Constants (to grams)
// ============================================================================

/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;
/// Grams per liter (water-equivalent)
pub const G_PER_LITER: f64 = 1000.0;

// ============================================================================
// Household Measure Constants (to grams)
// ============================================================================

/// Grams per cup
pub const G_PER_CUP: f64 = 240.0;
/// Grams per tablespoon
pub const G_PER_TBSP: f64 = 15.0;
/// Grams per teaspoon
pub const G_PER_TSP: f64 = 5.0;
/// Grams per piece
pub const GRAMS_PER_PIECE: f64 = 30.0;
/// Grams per garlic clove
pub const G_PER_CLOVE: f64 = 3.0;
/// Grams per inch (ginger root)
pub const G_PER_INCH: f64 = 15.0;
/// Fixed amount for "to taste"
pub const TO_TASTE_GRAMS: f64 = 5.0;

/// How a matched unit turns a magnitude into grams
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Conversion {
    /// grams = magnitude * factor
    Scale(f64),
    /// grams = constant, magnitude ignored
    Fixed(f64),
}

impl Conversion {
    /// Apply this conversion to a parsed magnitude
    pub fn apply(&self, magnitude: f64) -> f64 {
        match self {
            Conversion::Scale(factor) => magnitude * factor,
            Conversion::Fixed(grams) => *grams,
        }
    }
}

/// How a rule recognises its unit within a quantity phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitMatcher {
    /// One of the phrase's words equals one of these tokens
    Token(&'static [&'static str]),
    /// The lowercased phrase contains one of these needles
    Contains(&'static [&'static str]),
}

/// One row of the unit table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitRule {
    /// Canonical unit label (e.g., "cup")
    pub unit: &'static str,
    pub matcher: UnitMatcher,
    pub conversion: Conversion,
}

/// Unit table in priority order. First match wins.
pub const UNIT_RULES: &[UnitRule] = &[
    UnitRule {
        unit: "g",
        matcher: UnitMatcher::Token(&["g", "gm", "gram", "grams"]),
        conversion: Conversion::Scale(1.0),
    },
    UnitRule {
        unit: "kg",
        matcher: UnitMatcher::Token(&["kg", "kilogram", "kilograms"]),
        conversion: Conversion::Scale(G_PER_KG),
    },
    UnitRule {
        unit: "ml",
        matcher: UnitMatcher::Token(&["ml", "milliliter", "milliliters", "millilitre", "millilitres"]),
        conversion: Conversion::Scale(1.0),
    },
    UnitRule {
        unit: "l",
        matcher: UnitMatcher::Token(&["l", "liter", "liters", "litre", "litres"]),
        conversion: Conversion::Scale(G_PER_LITER),
    },
    UnitRule {
        unit: "cup",
        matcher: UnitMatcher::Contains(&["cup"]),
        conversion: Conversion::Scale(G_PER_CUP),
    },
    UnitRule {
        unit: "tbsp",
        matcher: UnitMatcher::Contains(&["tbsp", "tablespoon"]),
        conversion: Conversion::Scale(G_PER_TBSP),
    },
    UnitRule {
        unit: "tsp",
        matcher: UnitMatcher::Contains(&["tsp", "teaspoon"]),
        conversion: Conversion::Scale(G_PER_TSP),
    },
    UnitRule {
        unit: "piece",
        matcher: UnitMatcher::Contains(&["piece"]),
        conversion: Conversion::Scale(GRAMS_PER_PIECE),
    },
    UnitRule {
        unit: "clove",
        matcher: UnitMatcher::Contains(&["clove"]),
        conversion: Conversion::Scale(G_PER_CLOVE),
    },
    UnitRule {
        unit: "inch",
        matcher: UnitMatcher::Contains(&["inch"]),
        conversion: Conversion::Scale(G_PER_INCH),
    },
    UnitRule {
        unit: "to taste",
        matcher: UnitMatcher::Contains(&["to taste"]),
        conversion: Conversion::Fixed(TO_TASTE_GRAMS),
    },
];

impl UnitRule {
    fn matches(&self, lowered: &str, words: &[&str]) -> bool {
        match self.matcher {
            UnitMatcher::Token(tokens) => words.iter().any(|w| tokens.contains(w)),
            UnitMatcher::Contains(needles) => needles.iter().any(|n| lowered.contains(n)),
        }
    }
}

/// Split a lowercased phrase into alphabetic words.
///
/// Digits and punctuation separate words, so "100g" yields ["g"].
fn alpha_words(lowered: &str) -> Vec<&str> {
    lowered
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Find the first unit rule that recognises a quantity phrase
pub fn match_unit(phrase: &str) -> Option<&'static UnitRule> {
    let lowered = phrase.to_lowercase();
    let words = alpha_words(&lowered);
    UNIT_RULES.iter().find(|rule| rule.matches(&lowered, &words))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_of(phrase: &str) -> Option<&'static str> {
        match_unit(phrase).map(|r| r.unit)
    }

    #[test]
    fn test_weight_tokens_need_exact_word() {
        assert_eq!(unit_of("100g"), Some("g"));
        assert_eq!(unit_of("100 grams"), Some("g"));
        assert_eq!(unit_of("1.5 kg"), Some("kg"));
        // "eggs" contains a g but is not a gram token
        assert_eq!(unit_of("2 large eggs"), None);
    }

    #[test]
    fn test_volume_tokens() {
        assert_eq!(unit_of("200ml"), Some("ml"));
        assert_eq!(unit_of("1 L"), Some("l"));
        assert_eq!(unit_of("2 litres"), Some("l"));
    }

    #[test]
    fn test_household_measures() {
        assert_eq!(unit_of("1 cup"), Some("cup"));
        assert_eq!(unit_of("2 Cups"), Some("cup"));
        assert_eq!(unit_of("1 tbsp"), Some("tbsp"));
        assert_eq!(unit_of("1 tablespoon"), Some("tbsp"));
        assert_eq!(unit_of("1/2 tsp"), Some("tsp"));
        assert_eq!(unit_of("3 pieces"), Some("piece"));
        assert_eq!(unit_of("4 cloves"), Some("clove"));
        assert_eq!(unit_of("2 inch"), Some("inch"));
        assert_eq!(unit_of("To Taste"), Some("to taste"));
    }

    #[test]
    fn test_priority_order() {
        // cup is checked before tsp
        assert_eq!(unit_of("1 cup plus 1 tsp"), Some("cup"));
        // to taste is last
        assert_eq!(unit_of("1 tsp or to taste"), Some("tsp"));
    }

    #[test]
    fn test_unrecognised_units() {
        assert_eq!(unit_of("2 handfuls"), None);
        assert_eq!(unit_of("3"), None);
        assert_eq!(unit_of(""), None);
    }

    #[test]
    fn test_conversion_apply() {
        assert_eq!(Conversion::Scale(240.0).apply(2.0), 480.0);
        assert_eq!(Conversion::Fixed(5.0).apply(12.0), 5.0);
    }
}
