//! Dish and meal tools
//!
//! Nutrition totals and recommendations for ingredient lists, stored dishes,
//! and lists of meals.

use serde::Serialize;

use crate::db::Database;
use crate::error::{NutritionError, Result};
use crate::models::{Dish, DishCreate, NutritionTotal};
use crate::nutrition::{
    analyze, analyze_concurrent, recommend, recommend_daily, resolve, BmiCategory,
    IngredientContribution, IngredientToken, Precision,
};

#[derive(Debug, Serialize)]
pub struct DishSummary {
    pub id: i64,
    pub name: String,
    pub ingredient_count: usize,
    pub cooking_method: Option<String>,
}

impl From<&Dish> for DishSummary {
    fn from(dish: &Dish) -> Self {
        Self {
            id: dish.id,
            name: dish.name.clone(),
            ingredient_count: dish.ingredient_list().len(),
            cooking_method: dish.cooking_method.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchDishesResponse {
    pub dishes: Vec<DishSummary>,
    pub total: usize,
}

/// Response for calculate_nutrition
#[derive(Debug, Serialize)]
pub struct CalculateNutritionResponse {
    pub ingredients: Vec<String>,
    /// Rounded to 2 decimal places
    pub nutrition: NutritionTotal,
    pub contributions: Vec<IngredientContribution>,
    pub unmatched: Vec<String>,
    pub unparsed: Vec<String>,
    pub bmi_category: BmiCategory,
    pub recommendations: Vec<String>,
}

/// Response for calculate_dish_nutrition
#[derive(Debug, Serialize)]
pub struct DishNutritionResponse {
    pub dish_name: String,
    pub ingredients: Vec<IngredientToken>,
    /// Rounded to whole numbers
    pub nutrition: NutritionTotal,
    pub unmatched: Vec<String>,
    pub bmi_category: BmiCategory,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MealDetail {
    pub dish_name: String,
    /// Rounded to 2 decimal places
    pub nutrition: NutritionTotal,
    pub ingredients: Vec<String>,
}

/// Response for analyze_meals
#[derive(Debug, Serialize)]
pub struct AnalyzeMealsResponse {
    pub total_nutrition: NutritionTotal,
    pub meal_details: Vec<MealDetail>,
    pub dishes_not_found: Vec<String>,
    pub bmi_category: BmiCategory,
    pub recommendations: Vec<String>,
}

/// Add (or replace) a dish
pub fn add_dish(db: &Database, data: DishCreate, replace: bool) -> Result<DishSummary> {
    if data.name.trim().is_empty() {
        return Err(NutritionError::InvalidInput("Dish name cannot be empty".to_string()));
    }
    if data.ingredients.trim().is_empty() {
        return Err(NutritionError::InvalidInput("Dish ingredients cannot be empty".to_string()));
    }

    let dish = db.with_conn(|conn| {
        if replace {
            Dish::upsert(conn, &data)
        } else {
            Dish::create(conn, &data)
        }
    })?;

    tracing::info!("Stored dish '{}' (id {})", dish.name, dish.id);
    Ok(DishSummary::from(&dish))
}

pub fn search_dishes(db: &Database, query: &str, limit: i64) -> Result<SearchDishesResponse> {
    let limit = limit.clamp(1, 100);
    let dishes = db.with_conn(|conn| Dish::search(conn, query, limit))?;

    let dishes: Vec<DishSummary> = dishes.iter().map(DishSummary::from).collect();
    let total = dishes.len();
    Ok(SearchDishesResponse { dishes, total })
}

/// Aggregate a free ingredient list.
///
/// `ingredients` being absent is the one hard failure; individual misses are
/// reported in the response.
pub fn calculate_nutrition(
    db: &Database,
    ingredients: Option<Vec<String>>,
    bmi_category: Option<BmiCategory>,
) -> Result<CalculateNutritionResponse> {
    let ingredients = ingredients.ok_or_else(|| {
        NutritionError::InvalidInput("ingredients must be a list of ingredient entries".to_string())
    })?;
    let bmi_category = bmi_category.unwrap_or_default();

    let report = analyze(&ingredients, db);
    let nutrition = report.rounded_total(Precision::Aggregate);
    let recommendations = recommend(&nutrition, bmi_category);

    Ok(CalculateNutritionResponse {
        ingredients,
        nutrition,
        contributions: report.matched,
        unmatched: report.unmatched,
        unparsed: report.unparsed,
        bmi_category,
        recommendations,
    })
}

fn find_dish(db: &Database, dish_name: &str) -> Result<Dish> {
    if dish_name.trim().is_empty() {
        return Err(NutritionError::InvalidInput("dish_name cannot be empty".to_string()));
    }
    db.with_conn(|conn| Dish::find_best_match(conn, dish_name))?
        .ok_or_else(|| NutritionError::DishNotFound(dish_name.to_string()))
}

/// Whole-number totals and dish recommendations for a stored dish
pub fn calculate_dish_nutrition(
    db: &Database,
    dish_name: &str,
    bmi_category: Option<BmiCategory>,
) -> Result<DishNutritionResponse> {
    let dish = find_dish(db, dish_name)?;
    let bmi_category = bmi_category.unwrap_or_default();

    let entries = dish.ingredient_list();
    let report = analyze(&entries, db);
    for name in &report.unmatched {
        tracing::info!("Ingredient not found for dish '{}': {}", dish.name, name);
    }

    let nutrition = report.rounded_total(Precision::Dish);
    let recommendations = recommend(&nutrition, bmi_category);

    Ok(DishNutritionResponse {
        dish_name: dish.name,
        ingredients: entries.iter().filter_map(|e| resolve(e)).collect(),
        nutrition,
        unmatched: report.unmatched,
        bmi_category,
        recommendations,
    })
}

/// Sum several dishes and apply the daily table.
///
/// Each dish is rounded to 2 places before summing. Unknown dishes are listed
/// in `dishes_not_found` rather than failing the request.
pub async fn analyze_meals(
    db: &Database,
    dish_names: Option<Vec<String>>,
    bmi_category: Option<BmiCategory>,
) -> Result<AnalyzeMealsResponse> {
    let dish_names = dish_names.ok_or_else(|| {
        NutritionError::InvalidInput("meals must be a list of dish names".to_string())
    })?;
    let bmi_category = bmi_category.unwrap_or_default();

    let mut total = NutritionTotal::zero();
    let mut meal_details = Vec::new();
    let mut dishes_not_found = Vec::new();

    for name in dish_names {
        let dish = match find_dish(db, &name) {
            Ok(dish) => dish,
            Err(NutritionError::DishNotFound(_)) | Err(NutritionError::InvalidInput(_)) => {
                tracing::debug!("Meal dish not found: {:?}", name);
                dishes_not_found.push(name);
                continue;
            }
            Err(e) => return Err(e),
        };

        let ingredients = dish.ingredient_list();
        let report = analyze_concurrent(ingredients.clone(), db.clone()).await;
        let nutrition = report.rounded_total(Precision::Aggregate);
        total += nutrition;

        meal_details.push(MealDetail {
            dish_name: dish.name,
            nutrition,
            ingredients,
        });
    }

    let total_nutrition = total.rounded(Precision::Aggregate.places());
    let recommendations = recommend_daily(&total_nutrition, bmi_category);

    Ok(AnalyzeMealsResponse {
        total_nutrition,
        meal_details,
        dishes_not_found,
        bmi_category,
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;
    use crate::models::IngredientCreate;
    use crate::tools::ingredients::add_ingredient;

    fn ingredient(name: &str, calories: f64, protein: f64, fibre: f64, carbs: f64) -> IngredientCreate {
        IngredientCreate {
            name: name.to_string(),
            reference_quantity_g: None,
            protein_g: protein,
            fat_g: 1.0,
            fibre_g: fibre,
            carbohydrate_g: carbs,
            energy_kj: calories * 4.184,
            calories_kcal: calories,
        }
    }

    fn seeded() -> (tempfile::TempDir, Database) {
        let (dir, db) = test_database();
        add_ingredient(&db, ingredient("Rice", 130.0, 2.7, 0.4, 28.0), false).unwrap();
        add_ingredient(&db, ingredient("Dal", 116.0, 9.0, 8.0, 20.0), false).unwrap();
        add_ingredient(&db, ingredient("Salt", 0.0, 0.0, 0.0, 0.0), false).unwrap();
        add_dish(
            &db,
            DishCreate {
                name: "Dal Chawal".to_string(),
                ingredients: "Rice (100g), Dal (100g), Salt (to taste), Saffron (1 pinch)".to_string(),
                cooking_method: Some("Boiling".to_string()),
                recipe_steps: None,
            },
            false,
        )
        .unwrap();
        (dir, db)
    }

    #[test]
    fn test_calculate_nutrition_requires_list() {
        let (_dir, db) = seeded();
        let result = calculate_nutrition(&db, None, None);
        assert!(matches!(result, Err(NutritionError::InvalidInput(_))));
    }

    #[test]
    fn test_calculate_nutrition_empty_list() {
        let (_dir, db) = seeded();
        let response = calculate_nutrition(&db, Some(vec![]), None).unwrap();
        assert_eq!(response.nutrition, NutritionTotal::zero());
        assert_eq!(response.bmi_category, BmiCategory::NormalWeight);
    }

    #[test]
    fn test_calculate_nutrition_scenario() {
        let (_dir, db) = seeded();
        let entries = vec!["Rice (100g)".to_string(), "Dal (100g)".to_string()];
        let response = calculate_nutrition(&db, Some(entries), Some(BmiCategory::Underweight)).unwrap();
        assert!((response.nutrition.calories_kcal - 246.0).abs() < 1e-9);
        assert!((response.nutrition.protein_g - 11.7).abs() < 1e-9);
        assert_eq!(response.contributions.len(), 2);
        assert!(response.recommendations[0].contains("low in calories"));
    }

    #[test]
    fn test_calculate_dish_nutrition() {
        let (_dir, db) = seeded();
        let response = calculate_dish_nutrition(&db, "chawal", None).unwrap();
        assert_eq!(response.dish_name, "Dal Chawal");
        assert_eq!(response.ingredients.len(), 4);
        assert_eq!(response.ingredients[2].raw_quantity, "to taste");
        assert_eq!(response.unmatched, vec!["Saffron".to_string()]);
        assert_eq!(response.nutrition.calories_kcal, 246.0);
        assert_eq!(response.nutrition.protein_g, 12.0);
        assert_eq!(response.nutrition.fibre_g, 8.0);
    }

    #[test]
    fn test_calculate_dish_nutrition_missing_dish() {
        let (_dir, db) = seeded();
        let result = calculate_dish_nutrition(&db, "biryani", None);
        assert!(matches!(result, Err(NutritionError::DishNotFound(_))));
    }

    #[tokio::test]
    async fn test_analyze_meals() {
        let (_dir, db) = seeded();
        let meals = vec!["dal chawal".to_string(), "Pizza".to_string(), "Dal Chawal".to_string()];
        let response = analyze_meals(&db, Some(meals), Some(BmiCategory::Obese)).await.unwrap();

        assert_eq!(response.meal_details.len(), 2);
        assert_eq!(response.dishes_not_found, vec!["Pizza".to_string()]);
        assert!((response.total_nutrition.calories_kcal - 492.0).abs() < 1e-9);
        assert!((response.total_nutrition.protein_g - 23.4).abs() < 1e-9);
        // protein < 50 is the only daily rule that fires
        assert_eq!(response.recommendations.len(), 1);
    }

    #[tokio::test]
    async fn test_analyze_meals_requires_list() {
        let (_dir, db) = seeded();
        let result = analyze_meals(&db, None, None).await;
        assert!(matches!(result, Err(NutritionError::InvalidInput(_))));
    }
}
