//! Error types for the engine and its tools

use thiserror::Error;

use crate::db::DbError;

#[derive(Debug, Error)]
pub enum NutritionError {
    /// Caller-contract violation (missing list, bad numbers, empty names)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dish not found: {0}")]
    DishNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for NutritionError {
    fn from(e: rusqlite::Error) -> Self {
        NutritionError::Database(DbError::Sqlite(e))
    }
}

pub type Result<T> = std::result::Result<T, NutritionError>;
