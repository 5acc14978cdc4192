//! Rewrites recipes into dietary-compliant variants.
//!
//! A [`RecipeCustomizer`] holds immutable substitution, allergen and diet
//! rule tables and turns a [`Recipe`] plus a [`UserPreference`] into a
//! [`CustomizationResult`]:
//!
//! ```
//! use recipe_customizer::{Ingredient, Recipe, RecipeCustomizer, UserPreference};
//!
//! let customizer = RecipeCustomizer::bundled()?;
//! let recipe = Recipe {
//!     id: "1".to_string(),
//!     name: "Chicken Rice".to_string(),
//!     ingredients: vec![
//!         Ingredient::new("chicken", "200", "g", ["meat"]),
//!         Ingredient::new("rice", "1", "cup", ["grain"]),
//!     ],
//!     instructions: vec!["Cook everything".to_string()],
//!     cuisine: "Home".to_string(),
//!     dietary_tags: Default::default(),
//! };
//!
//! let result = customizer.customize(&recipe, &UserPreference::anonymous("vegan"));
//! assert_eq!(result.modified_ingredients[0].name, "tofu");
//! assert_eq!(result.summary, "Made 1 substitutions:\n- chicken -> tofu");
//! # Ok::<(), recipe_customizer::CustomizeError>(())
//! ```

pub mod config;
pub mod customizer;
pub mod error;
pub mod knowledge;
pub mod model;
pub mod nutrition;
pub mod providers;
pub mod repository;

pub use crate::config::{load_config, AppConfig};
pub use customizer::{FlavorRule, RecipeCustomizer, ResolverPolicy, SubstitutionResolver};
pub use error::{CustomizeError, Result};
pub use knowledge::KnowledgeBase;
pub use model::{
    CustomizationResult, DietaryType, Ingredient, Recipe, SubstitutionResult, UserPreference,
};
pub use nutrition::{explain_nutrition, JsonNutritionRepository, NutritionRepository};
pub use repository::{CachedRecipeRepository, JsonRecipeRepository, RecipeRepository};

/// Build a customizer from configuration: tables first, then pipeline settings
pub fn customizer_from_config(config: &AppConfig) -> Result<RecipeCustomizer> {
    let knowledge = KnowledgeBase::from_config(&config.knowledge)?.into_shared();
    Ok(RecipeCustomizer::from_config(knowledge, &config.customizer))
}

/// Open the configured recipe repository, or the bundled one
pub fn repository_from_config(
    config: &AppConfig,
) -> Result<CachedRecipeRepository<JsonRecipeRepository>> {
    let repository = match &config.knowledge.recipes {
        Some(path) => JsonRecipeRepository::from_path(path)?,
        None => JsonRecipeRepository::bundled()?,
    };
    Ok(CachedRecipeRepository::new(repository))
}

/// Open the configured nutrition table, or the bundled one
pub fn nutrition_from_config(config: &AppConfig) -> Result<JsonNutritionRepository> {
    match &config.knowledge.nutrition {
        Some(path) => JsonNutritionRepository::from_path(path),
        None => JsonNutritionRepository::bundled(),
    }
}
