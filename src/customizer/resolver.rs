use std::collections::HashSet;

use log::debug;

use crate::knowledge::SubstitutionRules;
use crate::model::{DietaryType, SubstitutionResult};

/// Confidence reported for every table-driven substitution
pub const TABLE_CONFIDENCE: f64 = 0.8;

pub const NO_SUBSTITUTE_REASON: &str = "No substitute found";

/// How a substitute is picked from the candidate list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolverPolicy {
    /// Always the first candidate; the recipe context is ignored
    #[default]
    FirstCandidate,
    /// First candidate the recipe does not already contain, falling back to
    /// the first candidate when all of them are present
    AvoidExisting,
}

/// Picks a replacement for a diet-violating ingredient from the rule table
#[derive(Debug, Clone, Copy)]
pub struct SubstitutionResolver<'a> {
    rules: &'a SubstitutionRules,
    policy: ResolverPolicy,
}

impl<'a> SubstitutionResolver<'a> {
    pub fn new(rules: &'a SubstitutionRules) -> Self {
        SubstitutionResolver {
            rules,
            policy: ResolverPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ResolverPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Resolve a substitute for `ingredient` under `dietary_type`.
    ///
    /// `context` holds the names of every ingredient in the recipe. Only the
    /// `AvoidExisting` policy looks at it.
    pub fn resolve<S: AsRef<str>>(
        &self,
        ingredient: &str,
        dietary_type: &DietaryType,
        context: &[S],
    ) -> SubstitutionResult {
        self.resolve_excluding(ingredient, dietary_type, context, |_| false)
    }

    /// Like [`resolve`](Self::resolve), but candidates for which `rejected`
    /// returns true are never chosen.
    pub fn resolve_excluding<S, F>(
        &self,
        ingredient: &str,
        dietary_type: &DietaryType,
        context: &[S],
        rejected: F,
    ) -> SubstitutionResult
    where
        S: AsRef<str>,
        F: Fn(&str) -> bool,
    {
        let mut candidates = self
            .rules
            .candidates(ingredient, dietary_type.as_str())
            .iter()
            .filter(|c| !rejected(c.as_str()));

        let chosen = match self.policy {
            ResolverPolicy::FirstCandidate => candidates.next(),
            ResolverPolicy::AvoidExisting => {
                let present: HashSet<String> = context
                    .iter()
                    .map(|name| name.as_ref().trim().to_lowercase())
                    .collect();
                let allowed: Vec<&String> = candidates.collect();
                allowed
                    .iter()
                    .find(|c| !present.contains(&c.to_lowercase()))
                    .or_else(|| allowed.first())
                    .copied()
            }
        };

        match chosen {
            Some(substitute) => {
                debug!(
                    "Resolved '{}' -> '{}' for {}",
                    ingredient, substitute, dietary_type
                );
                SubstitutionResult {
                    original: ingredient.to_string(),
                    substitute: Some(substitute.clone()),
                    reason: format!("Common {} alternative", dietary_type),
                    confidence: TABLE_CONFIDENCE,
                }
            }
            None => {
                debug!("No {} substitute for '{}'", dietary_type, ingredient);
                SubstitutionResult {
                    original: ingredient.to_string(),
                    substitute: None,
                    reason: NO_SUBSTITUTE_REASON.to_string(),
                    confidence: 0.0,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> SubstitutionRules {
        SubstitutionRules::from_json(
            r#"{
                "chicken": {"vegan": ["tofu", "tempeh", "chickpeas"]},
                "butter": {"vegan": []}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_picks_first_candidate() {
        let rules = rules();
        let resolver = SubstitutionResolver::new(&rules);
        let result = resolver.resolve("chicken", &DietaryType::Vegan, &["chicken", "pasta"]);

        assert_eq!(result.original, "chicken");
        assert_eq!(result.substitute.as_deref(), Some("tofu"));
        assert_eq!(result.reason, "Common vegan alternative");
        assert_eq!(result.confidence, 0.8);
    }

    #[test]
    fn test_default_policy_ignores_context() {
        let rules = rules();
        let resolver = SubstitutionResolver::new(&rules);
        let result = resolver.resolve("chicken", &DietaryType::Vegan, &["chicken", "tofu"]);
        assert_eq!(result.substitute.as_deref(), Some("tofu"));
    }

    #[test]
    fn test_lookup_lowercases_name_but_keeps_original() {
        let rules = rules();
        let resolver = SubstitutionResolver::new(&rules);
        let result = resolver.resolve("Chicken", &DietaryType::Vegan, &[] as &[&str]);
        assert_eq!(result.original, "Chicken");
        assert_eq!(result.substitute.as_deref(), Some("tofu"));
    }

    #[test]
    fn test_missing_and_empty_lists() {
        let rules = rules();
        let resolver = SubstitutionResolver::new(&rules);

        for (name, diet) in [
            ("chicken", DietaryType::Vegetarian),
            ("butter", DietaryType::Vegan),
            ("shrimp", DietaryType::Vegan),
        ] {
            let result = resolver.resolve(name, &diet, &[] as &[&str]);
            assert_eq!(result.substitute, None);
            assert_eq!(result.reason, "No substitute found");
            assert_eq!(result.confidence, 0.0);
            assert!(!result.is_resolved());
        }
    }

    #[test]
    fn test_avoid_existing_policy() {
        let rules = rules();
        let resolver =
            SubstitutionResolver::new(&rules).with_policy(ResolverPolicy::AvoidExisting);

        let result = resolver.resolve("chicken", &DietaryType::Vegan, &["chicken", "Tofu"]);
        assert_eq!(result.substitute.as_deref(), Some("tempeh"));

        let result = resolver.resolve(
            "chicken",
            &DietaryType::Vegan,
            &["tofu", "tempeh", "chickpeas"],
        );
        assert_eq!(result.substitute.as_deref(), Some("tofu"));
    }

    #[test]
    fn test_rejected_candidates_are_skipped() {
        let rules = rules();
        let resolver = SubstitutionResolver::new(&rules);

        let result =
            resolver.resolve_excluding("chicken", &DietaryType::Vegan, &["chicken"], |c| {
                c == "tofu"
            });
        assert_eq!(result.substitute.as_deref(), Some("tempeh"));

        let result =
            resolver.resolve_excluding("chicken", &DietaryType::Vegan, &["chicken"], |_| true);
        assert_eq!(result.substitute, None);
        assert_eq!(result.reason, "No substitute found");
    }
}
