use serde::Deserialize;

use crate::model::{Ingredient, UserPreference};

/// Appends `ingredient` when the user's `preference` intensity exceeds `threshold`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlavorRule {
    pub preference: String,
    pub threshold: f64,
    pub ingredient: Ingredient,
}

impl FlavorRule {
    pub fn new(preference: impl Into<String>, threshold: f64, ingredient: Ingredient) -> Self {
        FlavorRule {
            preference: preference.into(),
            threshold,
            ingredient,
        }
    }

    /// Strictly greater than the threshold; an unstated preference counts as 0
    pub fn fires(&self, preferences: &UserPreference) -> bool {
        preferences.flavor(&self.preference) > self.threshold
    }
}

pub fn default_flavor_rules() -> Vec<FlavorRule> {
    vec![FlavorRule::new(
        "spicy",
        0.5,
        Ingredient::new("chili flakes", "1", "tsp", ["vegan", "spice"]),
    )]
}
