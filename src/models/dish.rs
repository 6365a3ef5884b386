//! Dish model
//!
//! A named dish with its ingredient list stored as free text.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::split_ingredient_list;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dish {
    pub id: i64,
    pub name: String,
    /// Comma-separated entries, e.g. "Rice (1 cup), Dal (100g)"
    pub ingredients: String,
    pub cooking_method: Option<String>,
    pub recipe_steps: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a dish.
///
/// Also accepts the column headers of the recipe spreadsheet export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishCreate {
    #[serde(alias = "Dish Name", alias = "dishName")]
    pub name: String,
    #[serde(alias = "Ingredients")]
    pub ingredients: String,
    #[serde(default, alias = "Cooking Method", alias = "cookingMethod")]
    pub cooking_method: Option<String>,
    #[serde(default, alias = "Recipe Steps", alias = "recipeSteps")]
    pub recipe_steps: Option<String>,
}

impl Dish {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            ingredients: row.get("ingredients")?,
            cooking_method: row.get("cooking_method")?,
            recipe_steps: row.get("recipe_steps")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Individual ingredient entries
    pub fn ingredient_list(&self) -> Vec<String> {
        split_ingredient_list(&self.ingredients)
    }

    pub fn create(conn: &Connection, data: &DishCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO dishes (name, ingredients, cooking_method, recipe_steps)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                data.name.trim(),
                data.ingredients,
                data.cooking_method,
                data.recipe_steps,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Insert, or replace the contents of an existing name
    pub fn upsert(conn: &Connection, data: &DishCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO dishes (name, ingredients, cooking_method, recipe_steps)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(name) DO UPDATE SET
                ingredients = excluded.ingredients,
                cooking_method = excluded.cooking_method,
                recipe_steps = excluded.recipe_steps,
                updated_at = datetime('now')
            "#,
            params![
                data.name.trim(),
                data.ingredients,
                data.cooking_method,
                data.recipe_steps,
            ],
        )?;

        let mut stmt = conn.prepare("SELECT * FROM dishes WHERE name = ?1")?;
        Ok(stmt.query_row([data.name.trim()], Self::from_row)?)
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM dishes WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(dish) => Ok(Some(dish)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Best ranked match for a dish name fragment (shortest name, then lowest id)
    pub fn find_best_match(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let needle = name.trim();
        if needle.is_empty() {
            return Ok(None);
        }

        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM dishes
            WHERE instr(lower(name), lower(?1)) > 0
            ORDER BY length(name) ASC, id ASC
            LIMIT 1
            "#,
        )?;

        match stmt.query_row([needle], Self::from_row) {
            Ok(dish) => Ok(Some(dish)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn search(conn: &Connection, query: &str, limit: i64) -> DbResult<Vec<Self>> {
        let search_pattern = format!("%{}%", query.trim());
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM dishes
            WHERE name LIKE ?1
            ORDER BY name ASC
            LIMIT ?2
            "#,
        )?;

        let dishes = stmt
            .query_map(params![search_pattern, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(dishes)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM dishes", [], |row| row.get(0))?;
        Ok(count)
    }
}
