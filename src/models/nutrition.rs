//! Shared nutrition totals
//!
//! Used by the aggregator, dish calculations, and meal analysis.

use serde::{Deserialize, Serialize};

/// Running or final nutrient totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotal {
    pub protein_g: f64,
    pub fat_g: f64,
    pub fibre_g: f64,
    pub carbohydrate_g: f64,
    pub energy_kj: f64,
    pub calories_kcal: f64,
}

impl NutritionTotal {
    /// All fields zero
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale every field by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            protein_g: self.protein_g * multiplier,
            fat_g: self.fat_g * multiplier,
            fibre_g: self.fibre_g * multiplier,
            carbohydrate_g: self.carbohydrate_g * multiplier,
            energy_kj: self.energy_kj * multiplier,
            calories_kcal: self.calories_kcal * multiplier,
        }
    }

    /// Field-wise sum
    pub fn add(&self, other: &NutritionTotal) -> Self {
        Self {
            protein_g: self.protein_g + other.protein_g,
            fat_g: self.fat_g + other.fat_g,
            fibre_g: self.fibre_g + other.fibre_g,
            carbohydrate_g: self.carbohydrate_g + other.carbohydrate_g,
            energy_kj: self.energy_kj + other.energy_kj,
            calories_kcal: self.calories_kcal + other.calories_kcal,
        }
    }

    /// Round every field to `places` decimal places
    pub fn rounded(&self, places: u32) -> Self {
        let factor = 10f64.powi(places as i32);
        let round = |v: f64| (v * factor).round() / factor;
        Self {
            protein_g: round(self.protein_g),
            fat_g: round(self.fat_g),
            fibre_g: round(self.fibre_g),
            carbohydrate_g: round(self.carbohydrate_g),
            energy_kj: round(self.energy_kj),
            calories_kcal: round(self.calories_kcal),
        }
    }
}

impl std::ops::Add for NutritionTotal {
    type Output = NutritionTotal;

    fn add(self, other: NutritionTotal) -> NutritionTotal {
        NutritionTotal::add(&self, &other)
    }
}

impl std::ops::AddAssign for NutritionTotal {
    fn add_assign(&mut self, other: NutritionTotal) {
        *self = NutritionTotal::add(self, &other);
    }
}

impl std::ops::Mul<f64> for NutritionTotal {
    type Output = NutritionTotal;

    fn mul(self, multiplier: f64) -> NutritionTotal {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for NutritionTotal {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutritionTotal::zero(), |acc, n| acc + n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NutritionTotal {
        NutritionTotal {
            protein_g: 2.345,
            fat_g: 0.004,
            fibre_g: 1.0,
            carbohydrate_g: 28.125,
            energy_kj: 544.5,
            calories_kcal: 129.996,
        }
    }

    #[test]
    fn test_rounded_two_places() {
        let r = sample().rounded(2);
        assert!((r.protein_g - 2.35).abs() < 1e-9 || (r.protein_g - 2.34).abs() < 1e-9);
        assert_eq!(r.fat_g, 0.0);
        assert_eq!(r.calories_kcal, 130.0);
    }

    #[test]
    fn test_rounded_whole() {
        let r = sample().rounded(0);
        assert_eq!(r.protein_g, 2.0);
        assert_eq!(r.carbohydrate_g, 28.0);
        assert_eq!(r.energy_kj, 545.0);
    }

    #[test]
    fn test_sum_and_scale() {
        let total: NutritionTotal = vec![sample(), sample()].into_iter().sum();
        assert_eq!(total.fibre_g, 2.0);
        assert_eq!((sample() * 0.5).fibre_g, 0.5);
    }
}
