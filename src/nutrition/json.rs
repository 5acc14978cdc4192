use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::{CustomizeError, Result};
use crate::knowledge::{normalize_key, read_table};
use crate::nutrition::NutritionRepository;

const TABLE: &str = "nutrition";
const BUNDLED: &str = include_str!("../../data/nutrition.json");

/// ingredient -> nutrient -> value, loaded from a JSON mapping document
#[derive(Debug, Clone, Default)]
pub struct JsonNutritionRepository {
    entries: HashMap<String, BTreeMap<String, f64>>,
}

impl JsonNutritionRepository {
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_json(&read_table(path)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, BTreeMap<String, f64>> =
            serde_json::from_str(json).map_err(|source| CustomizeError::TableParse {
                table: TABLE,
                source,
            })?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (ingredient, values) in raw {
            let ingredient = normalize_key(TABLE, "ingredient", &ingredient)?;
            let mut nutrients = BTreeMap::new();
            for (nutrient, value) in values {
                nutrients.insert(normalize_key(TABLE, "nutrient", &nutrient)?, value);
            }
            if entries.insert(ingredient.clone(), nutrients).is_some() {
                return Err(CustomizeError::InvalidTable {
                    table: TABLE,
                    reason: format!("ingredient '{}' listed twice", ingredient),
                });
            }
        }

        debug!("Loaded nutrition values for {} ingredients", entries.len());
        Ok(JsonNutritionRepository { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl NutritionRepository for JsonNutritionRepository {
    fn get_nutrition(&self, ingredient: &str) -> Result<BTreeMap<String, f64>> {
        Ok(self
            .entries
            .get(&ingredient.trim().to_lowercase())
            .cloned()
            .unwrap_or_default())
    }
}
