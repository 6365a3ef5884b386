//! Ingredient model
//!
//! Nutrient values for one ingredient, stored per reference quantity.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{Database, DbError, DbResult};
use crate::nutrition::lookup::{NutrientLookup, NutrientRecord, DEFAULT_REFERENCE_QUANTITY_G};

/// A stored ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub reference_quantity_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub fibre_g: f64,
    pub carbohydrate_g: f64,
    pub energy_kj: f64,
    pub calories_kcal: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating or replacing an ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientCreate {
    pub name: String,
    pub reference_quantity_g: Option<f64>,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub fat_g: f64,
    #[serde(default)]
    pub fibre_g: f64,
    #[serde(default)]
    pub carbohydrate_g: f64,
    #[serde(default)]
    pub energy_kj: f64,
    #[serde(default)]
    pub calories_kcal: f64,
}

impl From<NutrientRecord> for IngredientCreate {
    fn from(r: NutrientRecord) -> Self {
        Self {
            name: r.name,
            reference_quantity_g: r.reference_quantity_g,
            protein_g: r.protein_g,
            fat_g: r.fat_g,
            fibre_g: r.fibre_g,
            carbohydrate_g: r.carbohydrate_g,
            energy_kj: r.energy_kj,
            calories_kcal: r.calories_kcal,
        }
    }
}

impl IngredientCreate {
    fn reference_or_default(&self) -> f64 {
        match self.reference_quantity_g {
            Some(q) if q > 0.0 => q,
            _ => DEFAULT_REFERENCE_QUANTITY_G,
        }
    }
}

impl Ingredient {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            reference_quantity_g: row.get("reference_quantity_g")?,
            protein_g: row.get("protein_g")?,
            fat_g: row.get("fat_g")?,
            fibre_g: row.get("fibre_g")?,
            carbohydrate_g: row.get("carbohydrate_g")?,
            energy_kj: row.get("energy_kj")?,
            calories_kcal: row.get("calories_kcal")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new ingredient; fails if the name already exists
    pub fn create(conn: &Connection, data: &IngredientCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO ingredients (
                name, reference_quantity_g,
                protein_g, fat_g, fibre_g, carbohydrate_g, energy_kj, calories_kcal
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                data.name.trim(),
                data.reference_or_default(),
                data.protein_g,
                data.fat_g,
                data.fibre_g,
                data.carbohydrate_g,
                data.energy_kj,
                data.calories_kcal,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Insert, or overwrite the nutrient values of an existing name
    pub fn upsert(conn: &Connection, data: &IngredientCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO ingredients (
                name, reference_quantity_g,
                protein_g, fat_g, fibre_g, carbohydrate_g, energy_kj, calories_kcal
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(name) DO UPDATE SET
                reference_quantity_g = excluded.reference_quantity_g,
                protein_g = excluded.protein_g,
                fat_g = excluded.fat_g,
                fibre_g = excluded.fibre_g,
                carbohydrate_g = excluded.carbohydrate_g,
                energy_kj = excluded.energy_kj,
                calories_kcal = excluded.calories_kcal,
                updated_at = datetime('now')
            "#,
            params![
                data.name.trim(),
                data.reference_or_default(),
                data.protein_g,
                data.fat_g,
                data.fibre_g,
                data.carbohydrate_g,
                data.energy_kj,
                data.calories_kcal,
            ],
        )?;

        Self::get_by_name(conn, data.name.trim())?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM ingredients WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Exact (case-insensitive) name lookup
    pub fn get_by_name(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM ingredients WHERE name = ?1")?;

        match stmt.query_row([name], Self::from_row) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Best ranked match for a name fragment.
    ///
    /// Case-insensitive substring of the stored name; shortest name wins,
    /// then lowest id.
    pub fn find_best_match(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let needle = name.trim();
        if needle.is_empty() {
            return Ok(None);
        }

        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM ingredients
            WHERE instr(lower(name), lower(?1)) > 0
            ORDER BY length(name) ASC, id ASC
            LIMIT 1
            "#,
        )?;

        match stmt.query_row([needle], Self::from_row) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Search ingredients by name
    pub fn search(conn: &Connection, query: &str, limit: i64) -> DbResult<Vec<Self>> {
        let search_pattern = format!("%{}%", query.trim());
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM ingredients
            WHERE name LIKE ?1
            ORDER BY length(name) ASC, name ASC
            LIMIT ?2
            "#,
        )?;

        let items = stmt
            .query_map(params![search_pattern, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM ingredients", [], |row| row.get(0))?;
        Ok(count)
    }

    /// View as a nutrient record for the aggregator
    pub fn to_record(&self) -> NutrientRecord {
        NutrientRecord {
            name: self.name.clone(),
            reference_quantity_g: Some(self.reference_quantity_g),
            protein_g: self.protein_g,
            fat_g: self.fat_g,
            fibre_g: self.fibre_g,
            carbohydrate_g: self.carbohydrate_g,
            energy_kj: self.energy_kj,
            calories_kcal: self.calories_kcal,
        }
    }
}

impl NutrientLookup for Database {
    type Error = DbError;

    fn find_by_name(&self, name: &str) -> Result<Option<NutrientRecord>, Self::Error> {
        self.with_conn(|conn| Ingredient::find_best_match(conn, name))
            .map(|found| found.map(|i| i.to_record()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;

    fn create(name: &str, calories: f64) -> IngredientCreate {
        IngredientCreate {
            name: name.to_string(),
            reference_quantity_g: None,
            protein_g: 1.0,
            fat_g: 0.0,
            fibre_g: 0.0,
            carbohydrate_g: 0.0,
            energy_kj: 0.0,
            calories_kcal: calories,
        }
    }

    #[test]
    fn test_create_defaults_reference_quantity() {
        let (_dir, db) = test_database();
        let item = db.with_conn(|c| Ingredient::create(c, &create("Rice", 130.0))).unwrap();
        assert_eq!(item.reference_quantity_g, 100.0);
        assert_eq!(item.calories_kcal, 130.0);
    }

    #[test]
    fn test_names_are_unique_ignoring_case() {
        let (_dir, db) = test_database();
        db.with_conn(|c| Ingredient::create(c, &create("Rice", 130.0))).unwrap();
        assert!(db.with_conn(|c| Ingredient::create(c, &create("RICE", 1.0))).is_err());
    }

    #[test]
    fn test_upsert_overwrites() {
        let (_dir, db) = test_database();
        db.with_conn(|c| Ingredient::upsert(c, &create("Rice", 130.0))).unwrap();
        let updated = db.with_conn(|c| Ingredient::upsert(c, &create("rice", 125.0))).unwrap();
        assert_eq!(updated.calories_kcal, 125.0);
        assert_eq!(updated.name, "Rice");
        assert_eq!(db.with_conn(Ingredient::count).unwrap(), 1);
    }

    #[test]
    fn test_find_best_match_ranking() {
        let (_dir, db) = test_database();
        db.with_conn(|c| {
            Ingredient::create(c, &create("Rice flour", 360.0))?;
            Ingredient::create(c, &create("Brown Rice", 110.0))?;
            Ingredient::create(c, &create("Rice", 130.0))?;
            Ok(())
        })
        .unwrap();

        let found = db.find_by_name("rice").unwrap().unwrap();
        assert_eq!(found.name, "Rice");
        assert_eq!(found.calories_kcal, 130.0);

        let found = db.find_by_name("BROWN").unwrap().unwrap();
        assert_eq!(found.name, "Brown Rice");

        assert!(db.find_by_name("quinoa").unwrap().is_none());
        assert!(db.find_by_name("   ").unwrap().is_none());
    }

    #[test]
    fn test_search() {
        let (_dir, db) = test_database();
        db.with_conn(|c| {
            Ingredient::create(c, &create("Toor Dal", 340.0))?;
            Ingredient::create(c, &create("Moong Dal", 350.0))?;
            Ingredient::create(c, &create("Ghee", 900.0))?;
            Ok(())
        })
        .unwrap();

        let found = db.with_conn(|c| Ingredient::search(c, "dal", 10)).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "Toor Dal");
    }
}
