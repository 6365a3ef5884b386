//! Nutrition aggregator
//!
//! Resolves each ingredient entry, looks it up in a nutrient store, scales the
//! record to the resolved grams, and sums everything into one total.
//! Misses never fail the aggregation; the entry just contributes nothing.

use serde::Serialize;
use tokio::task::JoinSet;

use super::lookup::{NutrientLookup, NutrientRecord};
use super::resolver::{resolve_quantity, ResolvedIngredient};
use crate::models::NutritionTotal;

/// Decimal places applied once, after summation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Ingredient-list aggregation (2 places)
    Aggregate,
    /// Dish-level calculation (whole numbers)
    Dish,
}

impl Precision {
    pub fn places(&self) -> u32 {
        match self {
            Precision::Aggregate => 2,
            Precision::Dish => 0,
        }
    }
}

/// What one matched entry added to the total
#[derive(Debug, Clone, Serialize)]
pub struct IngredientContribution {
    pub ingredient: ResolvedIngredient,
    /// Name of the nutrient record that matched
    pub matched_name: String,
    /// resolved grams / reference grams
    pub ratio: f64,
    pub nutrition: NutritionTotal,
}

/// Aggregation result with per-entry bookkeeping.
///
/// `total` is unrounded; use [`NutritionReport::rounded_total`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct NutritionReport {
    pub total: NutritionTotal,
    pub matched: Vec<IngredientContribution>,
    /// Resolved names with no nutrient record
    pub unmatched: Vec<String>,
    /// Entries that could not be resolved at all
    pub unparsed: Vec<String>,
}

impl NutritionReport {
    pub fn rounded_total(&self, precision: Precision) -> NutritionTotal {
        self.total.rounded(precision.places())
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Matched(contribution) => {
                self.total += contribution.nutrition;
                self.matched.push(contribution);
            }
            Outcome::Unmatched(name) => self.unmatched.push(name),
            Outcome::Unparsed(text) => self.unparsed.push(text),
        }
    }
}

enum Outcome {
    Matched(IngredientContribution),
    Unmatched(String),
    Unparsed(String),
}

/// Missing, negative, or non-finite values count as zero
fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Scale a record's per-reference values to `grams`
pub fn contribution_for(record: &NutrientRecord, grams: f64) -> NutritionTotal {
    let ratio = non_negative(grams) / record.reference_grams();
    NutritionTotal {
        protein_g: non_negative(record.protein_g),
        fat_g: non_negative(record.fat_g),
        fibre_g: non_negative(record.fibre_g),
        carbohydrate_g: non_negative(record.carbohydrate_g),
        energy_kj: non_negative(record.energy_kj),
        calories_kcal: non_negative(record.calories_kcal),
    }
    .scale(ratio)
}

fn evaluate<L: NutrientLookup + ?Sized>(text: &str, lookup: &L) -> Outcome {
    let Some(ingredient) = resolve_quantity(text) else {
        tracing::debug!("Skipping unparseable ingredient entry: {:?}", text);
        return Outcome::Unparsed(text.to_string());
    };

    let record = match lookup.find_by_name(&ingredient.name) {
        Ok(Some(record)) => record,
        Ok(None) => {
            tracing::debug!("Ingredient not found: {}", ingredient.name);
            return Outcome::Unmatched(ingredient.name);
        }
        Err(e) => {
            tracing::warn!("Nutrient lookup failed for '{}': {}", ingredient.name, e);
            return Outcome::Unmatched(ingredient.name);
        }
    };

    let ratio = non_negative(ingredient.grams) / record.reference_grams();
    let nutrition = contribution_for(&record, ingredient.grams);

    Outcome::Matched(IngredientContribution {
        ingredient,
        matched_name: record.name,
        ratio,
        nutrition,
    })
}

/// Resolve, look up, and sum a sequence of ingredient entries, in input order
pub fn analyze<I, S, L>(ingredient_texts: I, lookup: &L) -> NutritionReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    L: NutrientLookup + ?Sized,
{
    let mut report = NutritionReport::default();
    for text in ingredient_texts {
        report.record(evaluate(text.as_ref(), lookup));
    }

    tracing::debug!(
        matched = report.matched.len(),
        unmatched = report.unmatched.len(),
        unparsed = report.unparsed.len(),
        "Aggregated ingredient list"
    );
    report
}

/// Aggregate with an explicit final precision
pub fn aggregate_with_precision<I, S, L>(
    ingredient_texts: I,
    lookup: &L,
    precision: Precision,
) -> NutritionTotal
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    L: NutrientLookup + ?Sized,
{
    analyze(ingredient_texts, lookup).rounded_total(precision)
}

/// Aggregate an ingredient list into totals rounded to 2 decimal places
pub fn aggregate<I, S, L>(ingredient_texts: I, lookup: &L) -> NutritionTotal
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    L: NutrientLookup + ?Sized,
{
    aggregate_with_precision(ingredient_texts, lookup, Precision::Aggregate)
}

/// Like [`analyze`], but each lookup runs as its own blocking task.
///
/// Results are merged back in input order, so the report and its total are
/// identical to the sequential version.
pub async fn analyze_concurrent<L>(ingredient_texts: Vec<String>, lookup: L) -> NutritionReport
where
    L: NutrientLookup + Clone + Send + Sync + 'static,
{
    let mut tasks = JoinSet::new();
    for (idx, text) in ingredient_texts.into_iter().enumerate() {
        let lookup = lookup.clone();
        tasks.spawn_blocking(move || (idx, evaluate(&text, &lookup)));
    }

    let mut outcomes = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => tracing::warn!("Ingredient lookup task failed: {}", e),
        }
    }
    outcomes.sort_by_key(|(idx, _)| *idx);

    let mut report = NutritionReport::default();
    for (_, outcome) in outcomes {
        report.record(outcome);
    }
    report
}

/// Concurrent counterpart of [`aggregate`]
pub async fn aggregate_concurrent<L>(ingredient_texts: Vec<String>, lookup: L) -> NutritionTotal
where
    L: NutrientLookup + Clone + Send + Sync + 'static,
{
    analyze_concurrent(ingredient_texts, lookup)
        .await
        .rounded_total(Precision::Aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::lookup::IngredientTable;
    use std::sync::Arc;

    fn record(name: &str, calories: f64, protein: f64) -> NutrientRecord {
        NutrientRecord {
            calories_kcal: calories,
            protein_g: protein,
            reference_quantity_g: Some(100.0),
            ..NutrientRecord::named(name)
        }
    }

    fn store() -> IngredientTable {
        let mut table: IngredientTable =
            vec![record("Rice", 130.0, 2.7), record("Dal", 116.0, 9.0)].into_iter().collect();
        table.insert(NutrientRecord {
            fibre_g: 1.6,
            carbohydrate_g: 8.6,
            energy_kj: 167.0,
            fat_g: 0.1,
            reference_quantity_g: Some(50.0),
            ..record("Onion", 40.0, 1.1)
        });
        table
    }

    #[test]
    fn test_empty_list_is_zero() {
        let total = aggregate(Vec::<String>::new(), &store());
        assert_eq!(total, NutritionTotal::zero());
    }

    #[test]
    fn test_rice_and_dal_scenario() {
        let total = aggregate(["Rice (100g)", "Dal (100g)"], &store());
        assert!((total.calories_kcal - 246.0).abs() < 1e-9);
        assert!((total.protein_g - 11.7).abs() < 1e-9);
    }

    #[test]
    fn test_reference_quantity_scales_ratio() {
        // Onion record is per 50 g, so 1 cup (240 g) is a 4.8x ratio
        let report = analyze(["Onion (1 cup)"], &store());
        assert_eq!(report.matched.len(), 1);
        assert!((report.matched[0].ratio - 4.8).abs() < 1e-9);
        assert!((report.total.calories_kcal - 192.0).abs() < 1e-9);
    }

    #[test]
    fn test_unmatched_contributes_nothing() {
        let with = aggregate(["Rice (1 cup)", "Unobtainium (3 cups)"], &store());
        let without = aggregate(["Rice (1 cup)"], &store());
        assert_eq!(with, without);

        let report = analyze(["Rice (1 cup)", "Unobtainium (3 cups)", "(5g)"], &store());
        assert_eq!(report.unmatched, vec!["Unobtainium".to_string()]);
        assert_eq!(report.unparsed, vec!["(5g)".to_string()]);
    }

    #[test]
    fn test_order_independent() {
        let forward = aggregate(["Rice (1 cup)", "Dal (150g)", "Onion (2 pieces)"], &store());
        let backward = aggregate(["Onion (2 pieces)", "Dal (150g)", "Rice (1 cup)"], &store());
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_totals_never_decrease() {
        let entries = ["Rice (1 cup)", "Salt (to taste)", "Dal (100g)", "Onion (1 piece)"];
        let mut previous = NutritionTotal::zero();
        for n in 1..=entries.len() {
            let total = analyze(&entries[..n], &store()).total;
            assert!(total.calories_kcal >= previous.calories_kcal);
            assert!(total.protein_g >= previous.protein_g);
            previous = total;
        }
    }

    #[test]
    fn test_negative_record_values_count_as_zero() {
        let mut table = IngredientTable::new();
        table.insert(record("Mystery", -50.0, 3.0));
        let total = aggregate(["Mystery (100g)"], &table);
        assert_eq!(total.calories_kcal, 0.0);
        assert_eq!(total.protein_g, 3.0);
    }

    #[test]
    fn test_dish_precision_rounds_to_whole() {
        let total = aggregate_with_precision(["Rice (100g)", "Dal (100g)"], &store(), Precision::Dish);
        assert_eq!(total.protein_g, 12.0);
        assert_eq!(total.calories_kcal, 246.0);
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        let entries: Vec<String> = ["Dal (2 cups)", "Rice (1 cup)", "Nope (1g)", "Onion (3 tbsp)"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let table = store();
        let sequential = analyze(&entries, &table);
        let concurrent = analyze_concurrent(entries, Arc::new(table)).await;

        assert_eq!(sequential.total, concurrent.total);
        assert_eq!(concurrent.unmatched, vec!["Nope".to_string()]);
        let names: Vec<_> = concurrent.matched.iter().map(|c| c.matched_name.as_str()).collect();
        assert_eq!(names, vec!["Dal", "Rice", "Onion"]);
    }

    #[tokio::test]
    async fn test_aggregate_concurrent_rounds_once() {
        let entries = vec!["Rice (100g)".to_string(), "Dal (100g)".to_string()];
        let total = aggregate_concurrent(entries.clone(), Arc::new(store())).await;
        assert_eq!(total, aggregate(&entries, &store()));
        assert!((total.calories_kcal - 246.0).abs() < 1e-9);
    }
}
