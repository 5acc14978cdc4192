//! Recipe storage port.
//!
//! The customizer only ever sees resolved [`Recipe`] values; repositories are
//! how callers obtain them.

mod cache;
mod json;

pub use cache::CachedRecipeRepository;
pub use json::JsonRecipeRepository;

use crate::error::Result;
use crate::model::Recipe;

/// Read access to a recipe collection
pub trait RecipeRepository: Send + Sync {
    /// Look up a recipe by id
    fn get(&self, id: &str) -> Result<Option<Recipe>>;

    /// Recipes whose name starts with `query`, ignoring case.
    /// A blank query matches everything.
    fn search(&self, query: &str) -> Result<Vec<Recipe>>;
}

/// Case-insensitive prefix match used by the bundled repositories
pub(crate) fn name_matches(name: &str, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty() || name.to_lowercase().starts_with(&query)
}
