//! Nutritrack MCP Server Implementation
//!
//! Exposes the nutrition tools over MCP.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::error::NutritionError;
use crate::models::{DishCreate, IngredientCreate};
use crate::nutrition::BmiCategory;
use crate::tools::status::{StatusTracker, USAGE_INSTRUCTIONS};
use crate::tools::{dishes, health, import, ingredients};

/// Nutritrack MCP Service
#[derive(Clone)]
pub struct NutritrackService {
    status_tracker: Arc<StatusTracker>,
    database: Database,
    tool_router: ToolRouter<NutritrackService>,
}

impl NutritrackService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(StatusTracker::new(database_path)),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_mcp_error(e: NutritionError) -> McpError {
    match e {
        NutritionError::InvalidInput(msg) => McpError::invalid_params(msg, None),
        other => McpError::internal_error(other.to_string(), None),
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn parse_bmi_category(label: Option<&str>) -> Option<BmiCategory> {
    label.map(BmiCategory::parse)
}

// ============================================================================
// Ingredient Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddIngredientParams {
    pub name: String,
    /// Quantity in grams the nutrient values refer to (default 100)
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
    /// Overwrite an existing ingredient with the same name
    #[serde(default)]
    pub replace: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchParams {
    pub query: String,
    #[serde(default = "default_search_limit")]
    pub limit: i64,
}

fn default_search_limit() -> i64 { 20 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ResolveIngredientParams {
    /// One ingredient entry, e.g. "Rice (1 cup)"
    pub ingredient: String,
}

// ============================================================================
// Dish Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddDishParams {
    pub name: String,
    /// Comma-separated entries, e.g. "Rice (1 cup), Dal (100g)"
    pub ingredients: String,
    pub cooking_method: Option<String>,
    pub recipe_steps: Option<String>,
    #[serde(default)]
    pub replace: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateNutritionParams {
    /// Ingredient entries, e.g. ["Rice (1 cup)", "Dal (100g)"]
    pub ingredients: Option<Vec<String>>,
    /// underweight, normal_weight, overweight, or obese
    pub bmi_category: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateDishNutritionParams {
    pub dish_name: String,
    pub bmi_category: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeMealsParams {
    /// Dish names eaten over the day
    pub meals: Option<Vec<String>>,
    pub bmi_category: Option<String>,
}

// ============================================================================
// Health / Import Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateBmiParams {
    pub height_cm: f64,
    pub weight_kg: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImportFoodDataParams {
    /// Path to a JSON array of ingredient rows
    pub ingredients_path: Option<String>,
    /// Path to a JSON array of dish rows
    pub dishes_path: Option<String>,
}

#[tool_router]
impl NutritrackService {
    // --- Status ---

    #[tool(description = "Get the current status of the Nutritrack service including build info, database status, and process information")]
    async fn nutritrack_status(&self) -> Result<CallToolResult, McpError> {
        let status = self.status_tracker.get_status(&self.database).map_err(to_mcp_error)?;
        json_result(&status)
    }

    #[tool(description = "Get instructions for writing ingredient entries and using the nutrition tools. Call this when unsure about entry format or units.")]
    fn usage_instructions(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(USAGE_INSTRUCTIONS)]))
    }

    // --- Ingredients ---

    #[tool(description = "Add an ingredient with nutrient values per reference quantity (default 100 g). Set replace=true to overwrite an existing one.")]
    fn add_ingredient(&self, Parameters(p): Parameters<AddIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = IngredientCreate {
            name: p.name, reference_quantity_g: p.reference_quantity_g,
            protein_g: p.protein_g, fat_g: p.fat_g, fibre_g: p.fibre_g,
            carbohydrate_g: p.carbohydrate_g, energy_kj: p.energy_kj, calories_kcal: p.calories_kcal,
        };
        let result = ingredients::add_ingredient(&self.database, data, p.replace).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Search ingredients by name")]
    fn search_ingredients(&self, Parameters(p): Parameters<SearchParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::search_ingredients(&self.database, &p.query, p.limit).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Show how one ingredient entry resolves: parsed name, quantity in grams, matched ingredient, and its contribution")]
    fn resolve_ingredient(&self, Parameters(p): Parameters<ResolveIngredientParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::resolve_ingredient(&self.database, &p.ingredient).map_err(to_mcp_error)?;
        json_result(&result)
    }

    // --- Dishes ---

    #[tool(description = "Add a dish with a comma-separated ingredient list. Set replace=true to overwrite an existing one.")]
    fn add_dish(&self, Parameters(p): Parameters<AddDishParams>) -> Result<CallToolResult, McpError> {
        let data = DishCreate {
            name: p.name, ingredients: p.ingredients,
            cooking_method: p.cooking_method, recipe_steps: p.recipe_steps,
        };
        let result = dishes::add_dish(&self.database, data, p.replace).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Search dishes by name")]
    fn search_dishes(&self, Parameters(p): Parameters<SearchParams>) -> Result<CallToolResult, McpError> {
        let result = dishes::search_dishes(&self.database, &p.query, p.limit).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Total nutrition (2 decimal places) and recommendations for a list of ingredient entries like \"Rice (1 cup)\"")]
    fn calculate_nutrition(&self, Parameters(p): Parameters<CalculateNutritionParams>) -> Result<CallToolResult, McpError> {
        let category = parse_bmi_category(p.bmi_category.as_deref());
        let result = dishes::calculate_nutrition(&self.database, p.ingredients, category).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Total nutrition (whole numbers) and recommendations for a stored dish, found by partial name")]
    fn calculate_dish_nutrition(&self, Parameters(p): Parameters<CalculateDishNutritionParams>) -> Result<CallToolResult, McpError> {
        let category = parse_bmi_category(p.bmi_category.as_deref());
        let result = dishes::calculate_dish_nutrition(&self.database, &p.dish_name, category).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Sum the nutrition of several dishes and give daily recommendations. Unknown dishes are listed, not fatal.")]
    async fn analyze_meals(&self, Parameters(p): Parameters<AnalyzeMealsParams>) -> Result<CallToolResult, McpError> {
        let category = parse_bmi_category(p.bmi_category.as_deref());
        let result = dishes::analyze_meals(&self.database, p.meals, category)
            .await
            .map_err(to_mcp_error)?;
        json_result(&result)
    }

    // --- Health ---

    #[tool(description = "Calculate BMI from height (cm) and weight (kg) and return its category")]
    fn calculate_bmi(&self, Parameters(p): Parameters<CalculateBmiParams>) -> Result<CallToolResult, McpError> {
        let result = health::calculate_bmi(p.height_cm, p.weight_kg).map_err(to_mcp_error)?;
        json_result(&result)
    }

    // --- Import ---

    #[tool(description = "Import ingredient and/or dish JSON exports from files. Existing names are updated; invalid rows are skipped and reported.")]
    fn import_food_data(&self, Parameters(p): Parameters<ImportFoodDataParams>) -> Result<CallToolResult, McpError> {
        let result = import::import_food_data(
            &self.database,
            p.ingredients_path.as_deref().map(Path::new),
            p.dishes_path.as_deref().map(Path::new),
        )
        .map_err(to_mcp_error)?;
        json_result(&result)
    }
}

#[tool_handler]
impl ServerHandler for NutritrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutritrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutritrack".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutritrack - ingredient nutrition totals and dietary recommendations. \
                 Call usage_instructions for the ingredient entry format and unit table. \
                 Ingredients: add_ingredient, search_ingredients, resolve_ingredient. \
                 Dishes: add_dish, search_dishes. \
                 Calculations: calculate_nutrition (ingredient list), calculate_dish_nutrition (stored dish), \
                 analyze_meals (list of dishes). Pass bmi_category, or call calculate_bmi first. \
                 Data: import_food_data for JSON exports. Status: nutritrack_status."
                    .into(),
            ),
        }
    }
}
