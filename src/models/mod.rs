//! Data models
//!
//! Database entities and shared value types.

mod dish;
mod ingredient;
mod nutrition;

pub use dish::{Dish, DishCreate};
pub use ingredient::{Ingredient, IngredientCreate};
pub use nutrition::NutritionTotal;
