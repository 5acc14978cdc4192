//! Static lookup tables backing the customization pipeline.
//!
//! Every table is a UTF-8 JSON mapping document. Bundled copies are compiled
//! into the crate; configuration may point at replacement files. A table that
//! fails to load or validate aborts construction; no partial table is ever
//! used.

mod allergens;
mod diet_rules;
mod substitutions;

pub use allergens::AllergenTable;
pub use diet_rules::DietRules;
pub use substitutions::SubstitutionRules;

use log::{debug, info};
use std::path::Path;
use std::sync::Arc;

use crate::config::KnowledgeConfig;
use crate::error::{CustomizeError, Result};

/// Immutable bundle of all rule tables
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    pub substitutions: SubstitutionRules,
    pub allergens: AllergenTable,
    pub diet_rules: DietRules,
}

impl KnowledgeBase {
    pub fn new(
        substitutions: SubstitutionRules,
        allergens: AllergenTable,
        diet_rules: DietRules,
    ) -> Self {
        KnowledgeBase {
            substitutions,
            allergens,
            diet_rules,
        }
    }

    /// Tables shipped with the crate
    pub fn bundled() -> Result<Self> {
        Ok(KnowledgeBase::new(
            SubstitutionRules::bundled()?,
            AllergenTable::bundled()?,
            DietRules::bundled()?,
        ))
    }

    /// Load all three tables from files
    pub fn from_paths(substitutions: &Path, allergens: &Path, diet_rules: &Path) -> Result<Self> {
        Self::load(Some(substitutions), Some(allergens), Some(diet_rules))
    }

    /// Load each table from the configured path, falling back to the bundled copy
    pub fn from_config(config: &KnowledgeConfig) -> Result<Self> {
        Self::load(
            config.substitution_rules.as_deref(),
            config.allergens.as_deref(),
            config.diet_rules.as_deref(),
        )
    }

    fn load(
        substitutions: Option<&Path>,
        allergens: Option<&Path>,
        diet_rules: Option<&Path>,
    ) -> Result<Self> {
        let substitutions = match substitutions {
            Some(path) => SubstitutionRules::from_json(&read_table(path)?)?,
            None => SubstitutionRules::bundled()?,
        };
        let allergens = match allergens {
            Some(path) => AllergenTable::from_json(&read_table(path)?)?,
            None => AllergenTable::bundled()?,
        };
        let diet_rules = match diet_rules {
            Some(path) => DietRules::from_json(&read_table(path)?)?,
            None => DietRules::bundled()?,
        };

        info!(
            "Loaded knowledge base: {} substitution entries, {} allergen categories, {} diet rules",
            substitutions.len(),
            allergens.len(),
            diet_rules.len()
        );

        Ok(KnowledgeBase::new(substitutions, allergens, diet_rules))
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

pub(crate) fn read_table(path: &Path) -> Result<String> {
    debug!("Reading table from {}", path.display());
    std::fs::read_to_string(path).map_err(|source| CustomizeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Lower-cased, trimmed key; empty keys are rejected
pub(crate) fn normalize_key(table: &'static str, what: &str, key: &str) -> Result<String> {
    let key = key.trim().to_lowercase();
    if key.is_empty() {
        return Err(CustomizeError::InvalidTable {
            table,
            reason: format!("empty {} name", what),
        });
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_tables_load() {
        let knowledge = KnowledgeBase::bundled().unwrap();
        assert!(!knowledge.substitutions.is_empty());
        assert!(knowledge.allergens.len() >= 6);
        assert!(knowledge.diet_rules.len() >= 2);
    }

    #[test]
    fn test_default_config_uses_bundled_tables() {
        let knowledge = KnowledgeBase::from_config(&KnowledgeConfig::default()).unwrap();
        assert_eq!(
            knowledge.substitutions.candidates("chicken", "vegan"),
            ["tofu", "tempeh", "chickpeas"]
        );
    }

    #[test]
    fn test_missing_table_file_is_fatal() {
        let config = KnowledgeConfig {
            allergens: Some("/nonexistent/allergen_map.json".into()),
            ..Default::default()
        };
        let err = KnowledgeBase::from_config(&config).unwrap_err();
        assert!(matches!(err, CustomizeError::Io { .. }));
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_from_paths_reads_every_table() {
        let dir = tempfile::tempdir().unwrap();
        let substitutions = dir.path().join("substitution_rules.json");
        let allergens = dir.path().join("allergen_map.json");
        let diet_rules = dir.path().join("diet_rules.json");
        std::fs::write(&substitutions, r#"{"beef": {"keto": ["pork belly"]}}"#).unwrap();
        std::fs::write(&allergens, r#"{"sesame": ["tahini"]}"#).unwrap();
        std::fs::write(&diet_rules, r#"{"keto": ["grain"]}"#).unwrap();

        let knowledge = KnowledgeBase::from_paths(&substitutions, &allergens, &diet_rules).unwrap();
        assert_eq!(knowledge.substitutions.candidates("beef", "keto"), ["pork belly"]);
        assert!(knowledge.allergens.is_allergenic("tahini", ["sesame"]));
        assert_eq!(knowledge.diet_rules.len(), 1);
        assert!(knowledge.substitutions.candidates("chicken", "vegan").is_empty());
    }

    #[test]
    fn test_from_paths_has_no_bundled_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let substitutions = dir.path().join("substitution_rules.json");
        std::fs::write(&substitutions, "{}").unwrap();

        let err = KnowledgeBase::from_paths(
            &substitutions,
            &dir.path().join("missing_allergens.json"),
            &dir.path().join("missing_diet_rules.json"),
        )
        .unwrap_err();
        assert!(matches!(err, CustomizeError::Io { .. }));
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("t", "key", "  Olive Oil ").unwrap(), "olive oil");
        assert!(normalize_key("t", "key", "   ").is_err());
    }
}
