//! Nutrient store capability
//!
//! The aggregator only needs "name -> best nutrient record". Anything that can
//! answer that (SQLite, an in-memory table) implements [`NutrientLookup`].

use std::convert::Infallible;
use std::io::Read;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

/// Reference quantity assumed when a record does not carry one
pub const DEFAULT_REFERENCE_QUANTITY_G: f64 = 100.0;

fn zero_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// Nutrient values for one ingredient, defined per `reference_quantity_g`.
///
/// Deserializes both the snake_case form and the column headers of the
/// ingredient spreadsheet export ("Protein (g)", "Energy (kJ)", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientRecord {
    #[serde(alias = "Ingredient")]
    pub name: String,
    #[serde(default, alias = "Quantity (100g)", alias = "Quantity Standard (g)")]
    pub reference_quantity_g: Option<f64>,
    #[serde(default, deserialize_with = "zero_if_null", alias = "Protein (g)")]
    pub protein_g: f64,
    #[serde(default, deserialize_with = "zero_if_null", alias = "Fat (g)")]
    pub fat_g: f64,
    #[serde(default, deserialize_with = "zero_if_null", alias = "Fibre (g)")]
    pub fibre_g: f64,
    #[serde(default, deserialize_with = "zero_if_null", alias = "Carbohydrates (g)")]
    pub carbohydrate_g: f64,
    #[serde(default, deserialize_with = "zero_if_null", alias = "Energy (kJ)")]
    pub energy_kj: f64,
    #[serde(default, deserialize_with = "zero_if_null", alias = "Calories (kcal)")]
    pub calories_kcal: f64,
}

impl NutrientRecord {
    /// Record with every nutrient at zero and the default reference quantity
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference_quantity_g: None,
            protein_g: 0.0,
            fat_g: 0.0,
            fibre_g: 0.0,
            carbohydrate_g: 0.0,
            energy_kj: 0.0,
            calories_kcal: 0.0,
        }
    }

    /// Reference quantity in grams; absent or non-positive values mean 100 g
    pub fn reference_grams(&self) -> f64 {
        match self.reference_quantity_g {
            Some(q) if q.is_finite() && q > 0.0 => q,
            _ => DEFAULT_REFERENCE_QUANTITY_G,
        }
    }
}

/// Name -> nutrient record capability.
///
/// Matching is case-insensitive on a substring of the record name. When more
/// than one record contains the query, the shortest name wins, then the one
/// inserted first.
pub trait NutrientLookup {
    type Error: std::fmt::Display;

    fn find_by_name(&self, name: &str) -> Result<Option<NutrientRecord>, Self::Error>;
}

impl<T: NutrientLookup + ?Sized> NutrientLookup for &T {
    type Error = T::Error;

    fn find_by_name(&self, name: &str) -> Result<Option<NutrientRecord>, Self::Error> {
        (**self).find_by_name(name)
    }
}

impl<T: NutrientLookup + ?Sized> NutrientLookup for Arc<T> {
    type Error = T::Error;

    fn find_by_name(&self, name: &str) -> Result<Option<NutrientRecord>, Self::Error> {
        (**self).find_by_name(name)
    }
}

/// In-memory nutrient store, insertion ordered
#[derive(Debug, Clone, Default)]
pub struct IngredientTable {
    records: Vec<NutrientRecord>,
}

impl IngredientTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON array of records (snake_case or spreadsheet headers)
    pub fn from_json_reader<R: Read>(reader: R) -> serde_json::Result<Self> {
        let records: Vec<NutrientRecord> = serde_json::from_reader(reader)?;
        Ok(Self { records })
    }

    pub fn insert(&mut self, record: NutrientRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[NutrientRecord] {
        &self.records
    }

    /// Ranked best match for a name
    pub fn best_match(&self, name: &str) -> Option<&NutrientRecord> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.name.to_lowercase().contains(&needle))
            .min_by_key(|(idx, r)| (r.name.chars().count(), *idx))
            .map(|(_, r)| r)
    }
}

impl FromIterator<NutrientRecord> for IngredientTable {
    fn from_iter<I: IntoIterator<Item = NutrientRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl NutrientLookup for IngredientTable {
    type Error = Infallible;

    fn find_by_name(&self, name: &str) -> Result<Option<NutrientRecord>, Self::Error> {
        Ok(self.best_match(name).cloned())
    }
}
