use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{CustomizeError, Result};
use crate::knowledge::normalize_key;

const TABLE: &str = "allergen";
const BUNDLED: &str = include_str!("../../data/allergen_map.json");

/// allergen category -> ingredient names that trigger it
#[derive(Debug, Clone, Default)]
pub struct AllergenTable {
    categories: HashMap<String, HashSet<String>>,
}

impl AllergenTable {
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED)
    }

    /// Parse and validate a `{category: [ingredient, ...]}` document
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<String>> =
            serde_json::from_str(json).map_err(|source| CustomizeError::TableParse {
                table: TABLE,
                source,
            })?;

        let mut categories = HashMap::with_capacity(raw.len());
        for (category, triggers) in raw {
            let category = normalize_key(TABLE, "category", &category)?;
            let triggers = triggers
                .iter()
                .map(|t| normalize_key(TABLE, "trigger ingredient", t))
                .collect::<Result<HashSet<_>>>()?;

            if categories.insert(category.clone(), triggers).is_some() {
                return Err(CustomizeError::InvalidTable {
                    table: TABLE,
                    reason: format!("category '{}' listed twice", category),
                });
            }
        }

        Ok(AllergenTable { categories })
    }

    /// Whether `ingredient` triggers any of the declared allergen categories.
    ///
    /// Matching is exact membership on the lower-cased name. Categories the
    /// table does not know match nothing.
    pub fn is_allergenic<I, S>(&self, ingredient: &str, allergens: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = ingredient.trim().to_lowercase();
        allergens.into_iter().any(|allergen| {
            self.categories
                .get(&allergen.as_ref().trim().to_lowercase())
                .is_some_and(|triggers| triggers.contains(&name))
        })
    }

    pub fn triggers(&self, category: &str) -> Option<&HashSet<String>> {
        self.categories.get(&category.trim().to_lowercase())
    }

    pub fn categories(&self) -> BTreeSet<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
