//! Nutrition engine
//!
//! Ingredient resolution, nutrient aggregation, BMI, and recommendations.

pub mod aggregator;
pub mod bmi;
pub mod lookup;
pub mod recommend;
pub mod resolver;
pub mod units;

pub use aggregator::{
    aggregate, aggregate_concurrent, aggregate_with_precision, analyze, analyze_concurrent,
    IngredientContribution, NutritionReport, Precision,
};
pub use bmi::{calculate_bmi, BmiCategory, BmiResult};
pub use lookup::{IngredientTable, NutrientLookup, NutrientRecord};
pub use recommend::{recommend, recommend_daily};
pub use resolver::{
    parse_magnitude, resolve, resolve_quantity, split_ingredient_list, to_grams, IngredientToken,
    ResolvedIngredient,
};
pub use units::{match_unit, UnitRule};
