//! The customization pass: allergen removal, dietary substitution and flavor
//! augmentation over a single recipe.

mod flavor;
mod resolver;

pub use flavor::{default_flavor_rules, FlavorRule};
pub use resolver::{ResolverPolicy, SubstitutionResolver, NO_SUBSTITUTE_REASON, TABLE_CONFIDENCE};

use log::{debug, info};
use std::collections::HashSet;
use std::sync::Arc;

use crate::config::CustomizerConfig;
use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::model::{CustomizationResult, Ingredient, Recipe, SubstitutionResult, UserPreference};

/// What happens to one input ingredient
#[derive(Debug)]
enum Decision {
    Keep,
    Substitute(SubstitutionResult),
    Drop(&'static str),
}

/// Rewrites recipes against a fixed set of rule tables.
///
/// Cloning is cheap and clones share the same tables. Swapping tables means
/// building a new customizer with [`RecipeCustomizer::with_knowledge`].
#[derive(Debug, Clone)]
pub struct RecipeCustomizer {
    knowledge: Arc<KnowledgeBase>,
    policy: ResolverPolicy,
    enforce_blocked: bool,
    flavor_rules: Arc<[FlavorRule]>,
}

impl RecipeCustomizer {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        RecipeCustomizer {
            knowledge,
            policy: ResolverPolicy::default(),
            enforce_blocked: false,
            flavor_rules: default_flavor_rules().into(),
        }
    }

    /// A customizer over the bundled tables with default settings
    pub fn bundled() -> Result<Self> {
        Ok(Self::new(KnowledgeBase::bundled()?.into_shared()))
    }

    pub fn from_config(knowledge: Arc<KnowledgeBase>, config: &CustomizerConfig) -> Self {
        let policy = if config.avoid_existing_substitutes {
            ResolverPolicy::AvoidExisting
        } else {
            ResolverPolicy::FirstCandidate
        };

        Self::new(knowledge)
            .with_policy(policy)
            .enforce_blocked_ingredients(config.enforce_blocked_ingredients)
            .with_flavor_rules(config.flavor_rules.clone())
    }

    pub fn with_policy(mut self, policy: ResolverPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn enforce_blocked_ingredients(mut self, enforce: bool) -> Self {
        self.enforce_blocked = enforce;
        self
    }

    pub fn with_flavor_rules(mut self, rules: Vec<FlavorRule>) -> Self {
        self.flavor_rules = rules.into();
        self
    }

    /// Same settings, different tables
    pub fn with_knowledge(&self, knowledge: Arc<KnowledgeBase>) -> Self {
        RecipeCustomizer {
            knowledge,
            ..self.clone()
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Run one customization pass over `recipe`.
    ///
    /// The recipe is not modified. Every ingredient is kept, substituted or
    /// dropped; there is no per-ingredient failure.
    pub fn customize(&self, recipe: &Recipe, preferences: &UserPreference) -> CustomizationResult {
        let context = recipe.ingredient_names();
        let resolver = SubstitutionResolver::new(&self.knowledge.substitutions)
            .with_policy(self.policy);
        let blocked: HashSet<String> = if self.enforce_blocked {
            preferences
                .blocked_ingredients
                .iter()
                .map(|name| name.trim().to_lowercase())
                .collect()
        } else {
            HashSet::new()
        };

        let mut modified_ingredients = Vec::with_capacity(recipe.ingredients.len());
        let mut substitutions = Vec::new();
        let mut dropped = 0usize;

        for ingredient in &recipe.ingredients {
            let decision = if self
                .knowledge
                .allergens
                .is_allergenic(&ingredient.name, &preferences.allergens)
            {
                Decision::Drop("allergen")
            } else if blocked.contains(&ingredient.name.trim().to_lowercase()) {
                Decision::Drop("blocked")
            } else if self
                .knowledge
                .diet_rules
                .violates(ingredient, &preferences.dietary_type)
            {
                let result = resolver.resolve_excluding(
                    &ingredient.name,
                    &preferences.dietary_type,
                    context.as_slice(),
                    |candidate| self.is_excluded(candidate, preferences, &blocked),
                );
                if result.is_resolved() {
                    Decision::Substitute(result)
                } else {
                    Decision::Drop("no substitute")
                }
            } else {
                Decision::Keep
            };

            match decision {
                Decision::Keep => modified_ingredients.push(ingredient.clone()),
                Decision::Substitute(result) => {
                    if let Some(substitute) = &result.substitute {
                        modified_ingredients.push(ingredient.renamed(substitute.as_str()));
                    }
                    substitutions.push(result);
                }
                Decision::Drop(reason) => {
                    debug!("Dropping '{}' ({})", ingredient.name, reason);
                    dropped += 1;
                }
            }
        }

        let augmented = self.augment_flavors(preferences, &blocked, &mut modified_ingredients);

        info!(
            "Customized '{}' for {}: {} substitutions, {} dropped, {} flavor additions",
            recipe.name,
            preferences.dietary_type,
            substitutions.len(),
            dropped,
            augmented
        );

        CustomizationResult {
            modified_ingredients,
            summary: summarize(&substitutions),
            substitutions,
            instructions: recipe.instructions.clone(),
        }
    }

    /// Whether a name added by the pipeline itself would break the user's constraints
    fn is_excluded(
        &self,
        name: &str,
        preferences: &UserPreference,
        blocked: &HashSet<String>,
    ) -> bool {
        self.knowledge
            .allergens
            .is_allergenic(name, &preferences.allergens)
            || blocked.contains(&name.trim().to_lowercase())
    }

    /// Append the ingredient of every flavor rule that fires; returns how many fired
    fn augment_flavors(
        &self,
        preferences: &UserPreference,
        blocked: &HashSet<String>,
        out: &mut Vec<Ingredient>,
    ) -> usize {
        let before = out.len();
        out.extend(
            self.flavor_rules
                .iter()
                .filter(|rule| rule.fires(preferences))
                .filter(|rule| !self.is_excluded(&rule.ingredient.name, preferences, blocked))
                .map(|rule| rule.ingredient.clone()),
        );
        out.len() - before
    }
}

/// Human-readable account of the substitutions made
pub fn summarize(substitutions: &[SubstitutionResult]) -> String {
    if substitutions.is_empty() {
        return "No substitutions needed".to_string();
    }

    let mut summary = format!("Made {} substitutions:", substitutions.len());
    for sub in substitutions {
        summary.push_str(&format!(
            "\n- {} -> {}",
            sub.original,
            sub.substitute.as_deref().unwrap_or_default()
        ));
    }
    summary
}
