//! Bulk import of ingredient and dish exports
//!
//! Each file is a JSON array. Rows are deserialized one at a time so a bad row
//! is skipped and reported instead of failing the whole file.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::Database;
use crate::error::{NutritionError, Result};
use crate::models::{Dish, DishCreate, Ingredient, IngredientCreate};
use crate::nutrition::NutrientRecord;

/// Errors reported per file before the list is truncated
const MAX_REPORTED_ERRORS: usize = 20;

#[derive(Debug, Default, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl ImportSummary {
    fn skip(&mut self, row: usize, reason: impl std::fmt::Display) {
        self.skipped += 1;
        if self.errors.len() < MAX_REPORTED_ERRORS {
            self.errors.push(format!("row {}: {}", row, reason));
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub ingredients: Option<ImportSummary>,
    pub dishes: Option<ImportSummary>,
}

fn read_rows(path: &Path) -> Result<Vec<serde_json::Value>> {
    let reader = BufReader::new(File::open(path)?);
    let rows: Vec<serde_json::Value> = serde_json::from_reader(reader)?;
    Ok(rows)
}

/// Deserialize each row, keeping the ones that pass `accept`
fn parse_rows<T, F>(rows: Vec<serde_json::Value>, summary: &mut ImportSummary, accept: F) -> Vec<T>
where
    T: DeserializeOwned,
    F: Fn(&T) -> std::result::Result<(), String>,
{
    let mut parsed = Vec::with_capacity(rows.len());
    for (idx, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<T>(row) {
            Ok(item) => match accept(&item) {
                Ok(()) => parsed.push(item),
                Err(reason) => summary.skip(idx + 1, reason),
            },
            Err(e) => summary.skip(idx + 1, e),
        }
    }
    parsed
}

fn check_ingredient(record: &NutrientRecord) -> std::result::Result<(), String> {
    if record.name.trim().is_empty() {
        return Err("missing ingredient name".to_string());
    }
    Ok(())
}

fn check_dish(dish: &DishCreate) -> std::result::Result<(), String> {
    if dish.name.trim().is_empty() {
        return Err("missing dish name".to_string());
    }
    if dish.ingredients.trim().is_empty() {
        return Err(format!("dish '{}' has no ingredients", dish.name));
    }
    Ok(())
}

/// Upsert every row of an ingredient export in one transaction
pub fn import_ingredients(db: &Database, path: &Path) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    let records: Vec<NutrientRecord> = parse_rows(read_rows(path)?, &mut summary, check_ingredient);
    let count = records.len();

    db.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        for record in records {
            Ingredient::upsert(&tx, &IngredientCreate::from(record))?;
        }
        tx.commit()?;
        Ok(())
    })?;
    summary.imported = count;

    tracing::info!(
        "Imported {} ingredients from {} ({} skipped)",
        summary.imported,
        path.display(),
        summary.skipped
    );
    Ok(summary)
}

/// Upsert every row of a dish export in one transaction
pub fn import_dishes(db: &Database, path: &Path) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    let dishes: Vec<DishCreate> = parse_rows(read_rows(path)?, &mut summary, check_dish);
    let count = dishes.len();

    db.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        for dish in &dishes {
            Dish::upsert(&tx, dish)?;
        }
        tx.commit()?;
        Ok(())
    })?;
    summary.imported = count;

    tracing::info!(
        "Imported {} dishes from {} ({} skipped)",
        summary.imported,
        path.display(),
        summary.skipped
    );
    Ok(summary)
}

/// Import one or both exports. At least one path is required.
pub fn import_food_data(
    db: &Database,
    ingredients_path: Option<&Path>,
    dishes_path: Option<&Path>,
) -> Result<ImportResponse> {
    if ingredients_path.is_none() && dishes_path.is_none() {
        return Err(NutritionError::InvalidInput(
            "Provide ingredients_path, dishes_path, or both".to_string(),
        ));
    }

    let ingredients = ingredients_path
        .map(|path| import_ingredients(db, path))
        .transpose()?;
    let dishes = dishes_path.map(|path| import_dishes(db, path)).transpose()?;

    Ok(ImportResponse { ingredients, dishes })
}
