use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::customizer::{default_flavor_rules, FlavorRule};

/// Main application configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Where the rule tables and recipes are loaded from
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    /// Customization pipeline behaviour
    #[serde(default)]
    pub customizer: CustomizerConfig,
    /// LLM provider used to explain customizations
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Optional table file overrides; unset entries use the bundled tables
#[derive(Debug, Deserialize, Clone, Default)]
pub struct KnowledgeConfig {
    pub substitution_rules: Option<PathBuf>,
    pub allergens: Option<PathBuf>,
    pub diet_rules: Option<PathBuf>,
    pub recipes: Option<PathBuf>,
    /// Per-ingredient nutrient values shown alongside customized recipes
    pub nutrition: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CustomizerConfig {
    /// Skip substitutes that the recipe already contains
    #[serde(default)]
    pub avoid_existing_substitutes: bool,
    /// Drop ingredients listed in the user's blocked ingredients
    #[serde(default)]
    pub enforce_blocked_ingredients: bool,
    /// Flavor augmentation rules, evaluated in order
    #[serde(default = "default_flavor_rules")]
    pub flavor_rules: Vec<FlavorRule>,
}

impl Default for CustomizerConfig {
    fn default() -> Self {
        Self {
            avoid_existing_substitutes: false,
            enforce_blocked_ingredients: false,
            flavor_rules: default_flavor_rules(),
        }
    }
}

/// Configuration for the LLM provider
#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// API key (falls back to ANTHROPIC_API_KEY)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

// Default value functions
fn default_model() -> String {
    "claude-3-5-haiku-latest".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

impl AppConfig {
    /// Load configuration from `customizer.toml` and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        load_config(None)
    }
}

/// Load configuration from file and environment variables
///
/// Configuration is loaded with the following priority (highest to lowest):
/// 1. Environment variables with RECIPE_CUSTOMIZER__ prefix
/// 2. The given file, or customizer.toml in the current directory
/// 3. Default values
///
/// Environment variable format: RECIPE_CUSTOMIZER__CUSTOMIZER__AVOID_EXISTING_SUBSTITUTES
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let file = match path {
        // An explicitly requested file must exist
        Some(path) => File::from(path).required(true),
        None => File::with_name("customizer").required(false),
    };

    let settings = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix("RECIPE_CUSTOMIZER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        assert_eq!(default_temperature(), 0.7);
        assert_eq!(default_max_tokens(), 1024);

        let config = AppConfig::default();
        assert!(!config.customizer.avoid_existing_substitutes);
        assert!(!config.customizer.enforce_blocked_ingredients);
        assert_eq!(config.customizer.flavor_rules.len(), 1);
        assert!(config.knowledge.recipes.is_none());
        assert!(config.knowledge.nutrition.is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[knowledge]
recipes = "/srv/recipes.json"

[customizer]
avoid_existing_substitutes = true

[[customizer.flavor_rules]]
preference = "sweet"
threshold = 0.7

[customizer.flavor_rules.ingredient]
name = "honey"
quantity = "1"
unit = "tbsp"
categories = ["sweetener"]

[llm]
model = "claude-test"
"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(
            config.knowledge.recipes.as_deref(),
            Some(Path::new("/srv/recipes.json"))
        );
        assert!(config.customizer.avoid_existing_substitutes);
        assert_eq!(config.customizer.flavor_rules.len(), 1);
        assert_eq!(config.customizer.flavor_rules[0].preference, "sweet");
        assert_eq!(config.customizer.flavor_rules[0].ingredient.name, "honey");
        assert_eq!(config.llm.model, "claude-test");
        assert_eq!(config.llm.max_tokens, 1024);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = load_config(Some(Path::new("/nonexistent/customizer.toml")));
        assert!(result.is_err());
    }
}
