use log::debug;
use std::collections::HashSet;
use std::path::Path;

use crate::error::{CustomizeError, Result};
use crate::knowledge::read_table;
use crate::model::Recipe;
use crate::repository::{name_matches, RecipeRepository};

const TABLE: &str = "recipe";
const BUNDLED: &str = include_str!("../../data/recipes.json");

/// Read-only recipe collection loaded from a JSON array
#[derive(Debug, Clone, Default)]
pub struct JsonRecipeRepository {
    recipes: Vec<Recipe>,
}

impl JsonRecipeRepository {
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_json(&read_table(path)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let recipes: Vec<Recipe> =
            serde_json::from_str(json).map_err(|source| CustomizeError::TableParse {
                table: TABLE,
                source,
            })?;

        let mut seen = HashSet::new();
        for recipe in &recipes {
            if !seen.insert(recipe.id.as_str()) {
                return Err(CustomizeError::InvalidTable {
                    table: TABLE,
                    reason: format!("duplicate recipe id '{}'", recipe.id),
                });
            }
        }

        debug!("Loaded {} recipes", recipes.len());
        Ok(JsonRecipeRepository { recipes })
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl RecipeRepository for JsonRecipeRepository {
    fn get(&self, id: &str) -> Result<Option<Recipe>> {
        Ok(self.recipes.iter().find(|r| r.id == id).cloned())
    }

    fn search(&self, query: &str) -> Result<Vec<Recipe>> {
        Ok(self
            .recipes
            .iter()
            .filter(|r| name_matches(&r.name, query))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_recipes() {
        let repo = JsonRecipeRepository::bundled().unwrap();
        let recipe = repo.get("1").unwrap().unwrap();
        assert_eq!(recipe.name, "Chicken Pasta");
        assert_eq!(recipe.ingredients.len(), 5);
        assert_eq!(recipe.instructions.len(), 5);
        assert!(repo.get("999").unwrap().is_none());
    }

    #[test]
    fn test_search_by_prefix() {
        let repo = JsonRecipeRepository::bundled().unwrap();

        let found = repo.search("chick").unwrap();
        let names: Vec<&str> = found.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Chicken Pasta", "Chickpea Curry"]);

        assert_eq!(repo.search("").unwrap().len(), repo.len());
        assert!(repo.search("pasta").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[
            {"id": "1", "name": "A", "ingredients": []},
            {"id": "1", "name": "B", "ingredients": []}
        ]"#;
        let err = JsonRecipeRepository::from_json(json).unwrap_err();
        assert!(err.to_string().contains("duplicate recipe id"));
    }
}
