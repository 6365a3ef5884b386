//! Health tools

use serde::Serialize;

use crate::error::Result;
use crate::nutrition::{calculate_bmi as compute_bmi, BmiCategory};

#[derive(Debug, Serialize)]
pub struct BmiResponse {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub category: BmiCategory,
    /// Display form of the category ("Normal weight")
    pub category_label: &'static str,
}

pub fn calculate_bmi(height_cm: f64, weight_kg: f64) -> Result<BmiResponse> {
    let result = compute_bmi(height_cm, weight_kg)?;
    tracing::debug!("BMI {} -> {}", result.bmi, result.category);

    Ok(BmiResponse {
        height_cm,
        weight_kg,
        bmi: result.bmi,
        category: result.category,
        category_label: result.category.label(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NutritionError;

    #[test]
    fn test_calculate_bmi_response() {
        let response = calculate_bmi(170.0, 65.0).unwrap();
        assert_eq!(response.bmi, 22.49);
        assert_eq!(response.category, BmiCategory::NormalWeight);
        assert_eq!(response.category_label, "Normal weight");
    }

    #[test]
    fn test_calculate_bmi_rejects_zero_height() {
        assert!(matches!(calculate_bmi(0.0, 65.0), Err(NutritionError::InvalidInput(_))));
    }
}
