//! BMI calculation and categories

use serde::{Deserialize, Serialize};

use crate::error::{NutritionError, Result};

/// BMI band used to select recommendation thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    #[default]
    NormalWeight,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Standard cutoffs: <18.5, <25, <30, >=30
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::NormalWeight
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    /// Human-readable label ("Normal weight")
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    /// Parse a label loosely ("Normal weight", "normal_weight", "OBESE").
    /// Unknown labels fall back to the default category.
    pub fn parse(s: &str) -> Self {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "underweight" => BmiCategory::Underweight,
            "overweight" => BmiCategory::Overweight,
            "obese" => BmiCategory::Obese,
            _ => BmiCategory::NormalWeight,
        }
    }

    /// Overweight and Obese share the weight-loss thresholds
    pub fn is_above_normal(&self) -> bool {
        matches!(self, BmiCategory::Overweight | BmiCategory::Obese)
    }
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Computed BMI with its category
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BmiResult {
    /// Rounded to 2 decimal places
    pub bmi: f64,
    pub category: BmiCategory,
}

/// BMI from height in centimeters and weight in kilograms
pub fn calculate_bmi(height_cm: f64, weight_kg: f64) -> Result<BmiResult> {
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(NutritionError::InvalidInput(
            "height must be a positive number of centimeters".to_string(),
        ));
    }
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(NutritionError::InvalidInput(
            "weight must be a positive number of kilograms".to_string(),
        ));
    }

    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    let category = BmiCategory::from_bmi(bmi);

    Ok(BmiResult {
        bmi: (bmi * 100.0).round() / 100.0,
        category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cutoffs() {
        assert_eq!(BmiCategory::from_bmi(18.49), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::NormalWeight);
        assert_eq!(BmiCategory::from_bmi(24.99), BmiCategory::NormalWeight);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(29.99), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_calculate_bmi() {
        let result = calculate_bmi(175.0, 70.0).unwrap();
        assert_eq!(result.bmi, 22.86);
        assert_eq!(result.category, BmiCategory::NormalWeight);

        let result = calculate_bmi(160.0, 90.0).unwrap();
        assert_eq!(result.category, BmiCategory::Obese);
    }

    #[test]
    fn test_calculate_bmi_rejects_bad_input() {
        assert!(matches!(calculate_bmi(0.0, 70.0), Err(NutritionError::InvalidInput(_))));
        assert!(matches!(calculate_bmi(170.0, -1.0), Err(NutritionError::InvalidInput(_))));
        assert!(calculate_bmi(f64::NAN, 70.0).is_err());
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!(BmiCategory::parse("Normal weight"), BmiCategory::NormalWeight);
        assert_eq!(BmiCategory::parse("normal_weight"), BmiCategory::NormalWeight);
        assert_eq!(BmiCategory::parse("UNDERWEIGHT"), BmiCategory::Underweight);
        assert_eq!(BmiCategory::parse("Obese"), BmiCategory::Obese);
        assert_eq!(BmiCategory::parse("something else"), BmiCategory::NormalWeight);
        assert_eq!(BmiCategory::Overweight.to_string(), "Overweight");
    }
}
