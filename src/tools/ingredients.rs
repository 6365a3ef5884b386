//! Ingredient tools
//!
//! Manage the nutrient store and inspect how entries resolve.

use serde::Serialize;

use crate::db::Database;
use crate::error::{NutritionError, Result};
use crate::models::{Ingredient, IngredientCreate, NutritionTotal};
use crate::nutrition::aggregator::contribution_for;
use crate::nutrition::{resolve_quantity, NutrientLookup, NutrientRecord, ResolvedIngredient};

/// Summary of an ingredient for list/search results
#[derive(Debug, Serialize)]
pub struct IngredientSummary {
    pub id: i64,
    pub name: String,
    pub reference_quantity_g: f64,
    pub calories_kcal: f64,
    pub protein_g: f64,
}

impl From<&Ingredient> for IngredientSummary {
    fn from(item: &Ingredient) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            reference_quantity_g: item.reference_quantity_g,
            calories_kcal: item.calories_kcal,
            protein_g: item.protein_g,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchIngredientsResponse {
    pub items: Vec<IngredientSummary>,
    pub total: usize,
}

/// How a single entry resolves against the store
#[derive(Debug, Serialize)]
pub struct ResolveIngredientResponse {
    pub input: String,
    pub resolved: Option<ResolvedIngredient>,
    pub matched: Option<NutrientRecord>,
    pub contribution: Option<NutritionTotal>,
}

fn validate(data: &IngredientCreate) -> Result<()> {
    if data.name.trim().is_empty() {
        return Err(NutritionError::InvalidInput("Ingredient name cannot be empty".to_string()));
    }

    if let Some(q) = data.reference_quantity_g {
        if !q.is_finite() || q <= 0.0 {
            return Err(NutritionError::InvalidInput(
                "reference_quantity_g must be greater than 0".to_string(),
            ));
        }
    }

    let nutrients = [
        ("protein_g", data.protein_g),
        ("fat_g", data.fat_g),
        ("fibre_g", data.fibre_g),
        ("carbohydrate_g", data.carbohydrate_g),
        ("energy_kj", data.energy_kj),
        ("calories_kcal", data.calories_kcal),
    ];
    for (field, value) in nutrients {
        if !value.is_finite() || value < 0.0 {
            return Err(NutritionError::InvalidInput(format!("{} cannot be negative", field)));
        }
    }

    Ok(())
}

/// Add a new ingredient, or overwrite it when `replace` is set
pub fn add_ingredient(db: &Database, data: IngredientCreate, replace: bool) -> Result<Ingredient> {
    validate(&data)?;

    let item = db.with_conn(|conn| {
        if replace {
            Ingredient::upsert(conn, &data)
        } else {
            Ingredient::create(conn, &data)
        }
    })?;

    tracing::info!("Stored ingredient '{}' (id {})", item.name, item.id);
    Ok(item)
}

/// Search ingredients by name
pub fn search_ingredients(db: &Database, query: &str, limit: i64) -> Result<SearchIngredientsResponse> {
    let limit = limit.clamp(1, 100);
    let items = db.with_conn(|conn| Ingredient::search(conn, query, limit))?;

    let items: Vec<IngredientSummary> = items.iter().map(IngredientSummary::from).collect();
    let total = items.len();
    Ok(SearchIngredientsResponse { items, total })
}

/// Resolve one entry and show which record it would match
pub fn resolve_ingredient(db: &Database, text: &str) -> Result<ResolveIngredientResponse> {
    let resolved = resolve_quantity(text);

    let matched = match &resolved {
        Some(r) => db.find_by_name(&r.name)?,
        None => None,
    };

    let contribution = match (&resolved, &matched) {
        (Some(r), Some(record)) => Some(contribution_for(record, r.grams).rounded(2)),
        _ => None,
    };

    Ok(ResolveIngredientResponse {
        input: text.to_string(),
        resolved,
        matched,
        contribution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;

    fn rice() -> IngredientCreate {
        IngredientCreate {
            name: "Rice".to_string(),
            reference_quantity_g: Some(100.0),
            protein_g: 2.7,
            fat_g: 0.3,
            fibre_g: 0.4,
            carbohydrate_g: 28.0,
            energy_kj: 544.0,
            calories_kcal: 130.0,
        }
    }

    #[test]
    fn test_add_ingredient_validation() {
        let (_dir, db) = test_database();

        let mut bad = rice();
        bad.name = "  ".to_string();
        assert!(matches!(add_ingredient(&db, bad, false), Err(NutritionError::InvalidInput(_))));

        let mut bad = rice();
        bad.fat_g = -1.0;
        assert!(matches!(add_ingredient(&db, bad, false), Err(NutritionError::InvalidInput(_))));

        let mut bad = rice();
        bad.reference_quantity_g = Some(0.0);
        assert!(matches!(add_ingredient(&db, bad, false), Err(NutritionError::InvalidInput(_))));

        assert!(add_ingredient(&db, rice(), false).is_ok());
        // Duplicate without replace is a database error
        assert!(matches!(add_ingredient(&db, rice(), false), Err(NutritionError::Database(_))));
        assert!(add_ingredient(&db, rice(), true).is_ok());
    }

    #[test]
    fn test_resolve_ingredient() {
        let (_dir, db) = test_database();
        add_ingredient(&db, rice(), false).unwrap();

        let response = resolve_ingredient(&db, "Wild rice (2 cups)").unwrap();
        let resolved = response.resolved.unwrap();
        assert_eq!(resolved.grams, 480.0);
        assert!(response.matched.is_none());

        let response = resolve_ingredient(&db, "rice (1 cup)").unwrap();
        assert_eq!(response.matched.unwrap().name, "Rice");
        assert_eq!(response.contribution.unwrap().calories_kcal, 312.0);

        let response = resolve_ingredient(&db, "(1 cup)").unwrap();
        assert!(response.resolved.is_none());
        assert!(response.contribution.is_none());
    }

    #[test]
    fn test_search_ingredients_clamps_limit() {
        let (_dir, db) = test_database();
        add_ingredient(&db, rice(), false).unwrap();
        let response = search_ingredients(&db, "ric", 0).unwrap();
        assert_eq!(response.total, 1);
    }
}
