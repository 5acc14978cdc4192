use std::collections::{BTreeSet, HashMap};

use crate::error::{CustomizeError, Result};
use crate::knowledge::normalize_key;
use crate::model::{DietaryType, Ingredient};

const TABLE: &str = "diet rule";
const BUNDLED: &str = include_str!("../../data/diet_rules.json");

/// dietary type -> ingredient categories it disallows
#[derive(Debug, Clone, Default)]
pub struct DietRules {
    disallowed: HashMap<String, BTreeSet<String>>,
}

impl DietRules {
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<String>> =
            serde_json::from_str(json).map_err(|source| CustomizeError::TableParse {
                table: TABLE,
                source,
            })?;

        let mut disallowed = HashMap::with_capacity(raw.len());
        for (diet, categories) in raw {
            let diet = normalize_key(TABLE, "dietary type", &diet)?;
            let categories = categories
                .iter()
                .map(|c| normalize_key(TABLE, "category", c))
                .collect::<Result<BTreeSet<_>>>()?;

            if disallowed.insert(diet.clone(), categories).is_some() {
                return Err(CustomizeError::InvalidTable {
                    table: TABLE,
                    reason: format!("dietary type '{}' listed twice", diet),
                });
            }
        }

        Ok(DietRules { disallowed })
    }

    /// Whether the ingredient's categories intersect the diet's disallowed set.
    ///
    /// Diets without a rule impose no constraint.
    pub fn violates(&self, ingredient: &Ingredient, dietary_type: &DietaryType) -> bool {
        self.disallowed
            .get(&dietary_type.as_str().trim().to_lowercase())
            .is_some_and(|blocked| {
                ingredient
                    .categories
                    .iter()
                    .any(|category| blocked.contains(&category.to_lowercase()))
            })
    }

    pub fn disallowed(&self, dietary_type: &DietaryType) -> Option<&BTreeSet<String>> {
        self.disallowed
            .get(&dietary_type.as_str().trim().to_lowercase())
    }

    pub fn dietary_types(&self) -> BTreeSet<&str> {
        self.disallowed.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.disallowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disallowed.is_empty()
    }
}
