//! Nutritrack Status Tool
//!
//! Runtime status of the service and usage instructions for assistants.

use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::migrations::get_schema_version;
use crate::db::Database;
use crate::error::Result;
use crate::models::{Dish, Ingredient};

/// How to use the nutrition tools
pub const USAGE_INSTRUCTIONS: &str = r#"
# Nutritrack Usage Instructions

## Ingredient entries

Every ingredient entry has the form `Name (quantity)`:

- `Rice (1 cup)`
- `Dal (100g)`
- `Garlic (4 cloves)`
- `Salt (to taste)`

The text before the first `(` is the ingredient name. The text inside the
parentheses is the quantity phrase. An entry without parentheses means one
unit of the ingredient (`Egg` is read as `Egg (1)`).

## Quantity conversion

| Unit | Grams |
|------|-------|
| g, gram, grams | x1 |
| kg | x1000 |
| ml | x1 |
| l, liter, litre | x1000 |
| cup | x240 |
| tbsp, tablespoon | x15 |
| tsp, teaspoon | x5 |
| piece | x30 |
| clove | x3 |
| inch | x15 |
| to taste | 5 (fixed) |

The first number in the phrase is the magnitude (default 1). Phrases with no
recognised unit use the number as grams.

## Name matching

Names match stored ingredients case-insensitively on a substring. When
several ingredients contain the name, the shortest one wins. Entries that do
not match anything are listed under `unmatched` and contribute nothing.

## Tools

| Task | Tool |
|------|------|
| Add or replace an ingredient | `add_ingredient` |
| Search ingredients | `search_ingredients` |
| See how one entry resolves | `resolve_ingredient` |
| Add or replace a dish | `add_dish` |
| Search dishes | `search_dishes` |
| Totals for an ingredient list | `calculate_nutrition` |
| Totals for a stored dish | `calculate_dish_nutrition` |
| Totals for several dishes | `analyze_meals` |
| BMI and category | `calculate_bmi` |
| Load JSON exports | `import_food_data` |

## Recommendations

Pass `bmi_category` (`underweight`, `normal_weight`, `overweight`, `obese`) to
get advice tuned to the category. Call `calculate_bmi` first if only height and
weight are known. Without a category, normal weight is assumed.

- Dish totals (`calculate_nutrition`, `calculate_dish_nutrition`) always return
  at least one recommendation.
- Meal totals (`analyze_meals`) use daily thresholds and may return none.
"#;

/// Runtime status of the Nutritrack service
#[derive(Debug, Clone, Serialize)]
pub struct NutritrackStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub schema_version: i32,
    pub ingredient_count: i64,
    pub dish_count: i64,

    /// Process information
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    started_at: DateTime<Utc>,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            started_at: Utc::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, db: &Database) -> Result<NutritrackStatus> {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let (schema_version, ingredient_count, dish_count) = db.with_conn(|conn| {
            Ok((
                get_schema_version(conn)?,
                Ingredient::count(conn)?,
                Dish::count(conn)?,
            ))
        })?;

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        Ok(NutritrackStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            schema_version,
            ingredient_count,
            dish_count,
            started_at: self.started_at,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        })
    }
}
