use std::collections::{BTreeSet, HashMap};

use crate::error::{CustomizeError, Result};
use crate::knowledge::normalize_key;

const TABLE: &str = "substitution";
const BUNDLED: &str = include_str!("../../data/substitution_rules.json");

/// ingredient -> dietary type -> candidate substitutes in priority order
#[derive(Debug, Clone, Default)]
pub struct SubstitutionRules {
    rules: HashMap<String, HashMap<String, Vec<String>>>,
}

impl SubstitutionRules {
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED)
    }

    /// Parse and validate a `{ingredient: {diet: [candidate, ...]}}` document
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, HashMap<String, Vec<String>>> = serde_json::from_str(json)
            .map_err(|source| CustomizeError::TableParse {
                table: TABLE,
                source,
            })?;

        let mut rules = HashMap::with_capacity(raw.len());
        for (ingredient, by_diet) in raw {
            let ingredient = normalize_key(TABLE, "ingredient", &ingredient)?;

            let mut diets = HashMap::with_capacity(by_diet.len());
            for (diet, candidates) in by_diet {
                let diet = normalize_key(TABLE, "dietary type", &diet)?;
                let candidates = candidates
                    .into_iter()
                    .map(|c| {
                        let c = c.trim().to_string();
                        if c.is_empty() {
                            Err(CustomizeError::InvalidTable {
                                table: TABLE,
                                reason: format!(
                                    "empty substitute for '{}' under '{}'",
                                    ingredient, diet
                                ),
                            })
                        } else {
                            Ok(c)
                        }
                    })
                    .collect::<Result<Vec<_>>>()?;

                if diets.insert(diet.clone(), candidates).is_some() {
                    return Err(CustomizeError::InvalidTable {
                        table: TABLE,
                        reason: format!(
                            "dietary type '{}' listed twice for '{}'",
                            diet, ingredient
                        ),
                    });
                }
            }

            if rules.insert(ingredient.clone(), diets).is_some() {
                return Err(CustomizeError::InvalidTable {
                    table: TABLE,
                    reason: format!("ingredient '{}' listed twice", ingredient),
                });
            }
        }

        Ok(SubstitutionRules { rules })
    }

    /// Candidates for an ingredient under a dietary type, empty if there are none
    pub fn candidates(&self, ingredient: &str, dietary_type: &str) -> &[String] {
        self.rules
            .get(&ingredient.trim().to_lowercase())
            .and_then(|by_diet| by_diet.get(&dietary_type.trim().to_lowercase()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Dietary types mentioned anywhere in the table
    pub fn dietary_types(&self) -> BTreeSet<&str> {
        self.rules
            .values()
            .flat_map(|by_diet| by_diet.keys().map(String::as_str))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
