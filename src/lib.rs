//! Nutritrack Library
//!
//! Ingredient quantity resolution, nutrition aggregation, and dietary
//! recommendations, served over MCP.

pub mod build_info;
pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;

pub use error::{NutritionError, Result};
