use log::debug;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::Result;
use crate::model::Recipe;
use crate::repository::RecipeRepository;

/// Memoizes `get` lookups of another repository.
///
/// Misses are not cached, and `search` always goes to the inner repository.
pub struct CachedRecipeRepository<R> {
    inner: R,
    cache: RwLock<HashMap<String, Recipe>>,
}

impl<R: RecipeRepository> CachedRecipeRepository<R> {
    pub fn new(inner: R) -> Self {
        CachedRecipeRepository {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn cached_len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: RecipeRepository> RecipeRepository for CachedRecipeRepository<R> {
    fn get(&self, id: &str) -> Result<Option<Recipe>> {
        if let Some(recipe) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
        {
            debug!("Recipe cache hit for '{}'", id);
            return Ok(Some(recipe.clone()));
        }

        let recipe = self.inner.get(id)?;
        if let Some(recipe) = &recipe {
            self.cache
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(id.to_string(), recipe.clone());
        }
        Ok(recipe)
    }

    fn search(&self, query: &str) -> Result<Vec<Recipe>> {
        self.inner.search(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRepository {
        gets: AtomicUsize,
    }

    impl RecipeRepository for CountingRepository {
        fn get(&self, id: &str) -> Result<Option<Recipe>> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            if id == "missing" {
                return Ok(None);
            }
            Ok(Some(Recipe {
                id: id.to_string(),
                name: format!("Recipe {}", id),
                ingredients: Vec::new(),
                instructions: Vec::new(),
                cuisine: String::new(),
                dietary_tags: Default::default(),
            }))
        }

        fn search(&self, _query: &str) -> Result<Vec<Recipe>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_hits_are_served_from_cache() {
        let repo = CachedRecipeRepository::new(CountingRepository {
            gets: AtomicUsize::new(0),
        });

        assert_eq!(repo.get("1").unwrap().unwrap().name, "Recipe 1");
        assert_eq!(repo.get("1").unwrap().unwrap().name, "Recipe 1");
        assert_eq!(repo.cached_len(), 1);
        assert_eq!(repo.into_inner().gets.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_misses_are_not_cached() {
        let repo = CachedRecipeRepository::new(CountingRepository {
            gets: AtomicUsize::new(0),
        });

        assert!(repo.get("missing").unwrap().is_none());
        assert!(repo.get("missing").unwrap().is_none());
        assert_eq!(repo.cached_len(), 0);
        assert_eq!(repo.into_inner().gets.load(Ordering::SeqCst), 2);
    }
}
