//! Recommendation generator
//!
//! Fixed decision tables of threshold checks. Every rule is evaluated in
//! declaration order and every match is appended; no rule depends on another.

use crate::models::NutritionTotal;

use super::bmi::BmiCategory;

/// Which BMI categories a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applies {
    All,
    Underweight,
    NormalWeight,
    /// Overweight or Obese
    AboveNormal,
}

impl Applies {
    fn includes(&self, category: BmiCategory) -> bool {
        match self {
            Applies::All => true,
            Applies::Underweight => category == BmiCategory::Underweight,
            Applies::NormalWeight => category == BmiCategory::NormalWeight,
            Applies::AboveNormal => category.is_above_normal(),
        }
    }
}

/// Nutrient a rule compares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nutrient {
    Calories,
    Protein,
    Fat,
    Fibre,
    Carbohydrate,
}

impl Nutrient {
    fn value(&self, totals: &NutritionTotal) -> f64 {
        match self {
            Nutrient::Calories => totals.calories_kcal,
            Nutrient::Protein => totals.protein_g,
            Nutrient::Fat => totals.fat_g,
            Nutrient::Fibre => totals.fibre_g,
            Nutrient::Carbohydrate => totals.carbohydrate_g,
        }
    }
}

/// Strict comparison against a literal threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    Below(f64),
    Above(f64),
}

impl Threshold {
    fn holds(&self, value: f64) -> bool {
        match *self {
            Threshold::Below(limit) => value < limit,
            Threshold::Above(limit) => value > limit,
        }
    }
}

/// One row of a decision table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub applies: Applies,
    pub nutrient: Nutrient,
    pub threshold: Threshold,
    pub message: &'static str,
}

impl Rule {
    pub fn fires(&self, totals: &NutritionTotal, category: BmiCategory) -> bool {
        self.applies.includes(category) && self.threshold.holds(self.nutrient.value(totals))
    }
}

const fn rule(applies: Applies, nutrient: Nutrient, threshold: Threshold, message: &'static str) -> Rule {
    Rule { applies, nutrient, threshold, message }
}

/// Appended when no dish rule fires
pub const BALANCED_MESSAGE: &str =
    "This dish appears to be nutritionally balanced. Enjoy it as part of a varied diet.";

/// Per-dish table: BMI-specific rules first, then universal ones
pub const DISH_RULES: &[Rule] = &[
    rule(
        Applies::Underweight,
        Nutrient::Calories,
        Threshold::Below(500.0),
        "This dish is relatively low in calories. Consider adding more calorie-dense ingredients for weight gain.",
    ),
    rule(
        Applies::Underweight,
        Nutrient::Protein,
        Threshold::Below(20.0),
        "This dish is low in protein. Consider adding more protein-rich ingredients for muscle growth.",
    ),
    rule(
        Applies::AboveNormal,
        Nutrient::Calories,
        Threshold::Above(800.0),
        "This dish is high in calories. Consider reducing portion size or choosing lower-calorie alternatives.",
    ),
    rule(
        Applies::AboveNormal,
        Nutrient::Fat,
        Threshold::Above(30.0),
        "This dish is high in fat. Consider reducing oil or choosing leaner protein sources.",
    ),
    rule(
        Applies::All,
        Nutrient::Protein,
        Threshold::Below(10.0),
        "This dish is low in protein. Consider adding protein-rich ingredients like meat, fish, eggs, or legumes.",
    ),
    rule(
        Applies::All,
        Nutrient::Carbohydrate,
        Threshold::Above(50.0),
        "This dish is high in carbohydrates. If you're watching your carb intake, consider reducing rice or bread portions.",
    ),
    rule(
        Applies::All,
        Nutrient::Fibre,
        Threshold::Below(5.0),
        "This dish is low in fiber. Consider adding more vegetables or whole grains for better digestive health.",
    ),
];

/// Whole-day table for summed meals
pub const DAILY_RULES: &[Rule] = &[
    rule(
        Applies::All,
        Nutrient::Protein,
        Threshold::Below(50.0),
        "Consider adding more protein-rich foods to your diet.",
    ),
    rule(
        Applies::All,
        Nutrient::Protein,
        Threshold::Above(100.0),
        "Your protein intake is quite high. Make sure this aligns with your fitness goals.",
    ),
    rule(
        Applies::All,
        Nutrient::Fat,
        Threshold::Above(70.0),
        "Your fat intake is high. Consider reducing high-fat foods.",
    ),
    rule(
        Applies::All,
        Nutrient::Carbohydrate,
        Threshold::Above(300.0),
        "Your carbohydrate intake is high. Consider balancing with more protein and healthy fats.",
    ),
    rule(
        Applies::Underweight,
        Nutrient::Calories,
        Threshold::Below(2000.0),
        "Increase your calorie intake to reach a healthy weight.",
    ),
    rule(
        Applies::AboveNormal,
        Nutrient::Calories,
        Threshold::Above(2200.0),
        "Consider reducing your calorie intake to support weight loss.",
    ),
];

/// Every firing rule's message, in table order
pub fn evaluate_rules(rules: &[Rule], totals: &NutritionTotal, category: BmiCategory) -> Vec<String> {
    rules
        .iter()
        .filter(|r| r.fires(totals, category))
        .map(|r| r.message.to_string())
        .collect()
}

/// Suggestions for a single dish; never empty
pub fn recommend(totals: &NutritionTotal, category: BmiCategory) -> Vec<String> {
    let mut suggestions = evaluate_rules(DISH_RULES, totals, category);
    if suggestions.is_empty() {
        suggestions.push(BALANCED_MESSAGE.to_string());
    }
    suggestions
}

/// Suggestions for a day's worth of meals; empty when nothing fires
pub fn recommend_daily(totals: &NutritionTotal, category: BmiCategory) -> Vec<String> {
    evaluate_rules(DAILY_RULES, totals, category)
}
