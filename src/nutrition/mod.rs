//! Nutrition lookup port. Values are displayed as-is; nothing is computed.

mod json;

pub use json::JsonNutritionRepository;

use std::collections::BTreeMap;

use crate::error::Result;

/// Per-ingredient nutrient values, e.g. `{"calories": 165.0}`.
/// Unknown ingredients yield an empty map.
pub trait NutritionRepository: Send + Sync {
    fn get_nutrition(&self, ingredient: &str) -> Result<BTreeMap<String, f64>>;
}

pub fn explain_nutrition(nutrition: &BTreeMap<String, f64>) -> String {
    match nutrition.get("calories") {
        Some(calories) => format!("Estimated calories: {}", calories),
        None => "Estimated calories: unknown".to_string(),
    }
}
