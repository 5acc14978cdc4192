use clap::{Parser, Subcommand};
use log::{error, info};
use serde_json::json;
use std::collections::BTreeSet;
use std::path::PathBuf;

use recipe_customizer::providers::{build_explanation_prompt, AnthropicProvider, LlmProvider};
use recipe_customizer::{
    customizer_from_config, explain_nutrition, load_config, nutrition_from_config,
    repository_from_config, CustomizeError, CustomizationResult, NutritionRepository, Recipe,
    RecipeRepository, UserPreference,
};

#[derive(Parser)]
#[command(name = "recipe-customizer")]
#[command(version)]
#[command(about = "Adapt recipes to dietary preferences, allergens and flavor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to customizer.toml if present)
    #[arg(long, short, global = true, env = "RECIPE_CUSTOMIZER_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Customize a recipe from the repository
    Customize {
        /// Recipe id
        recipe_id: String,

        /// Dietary type: vegan, vegetarian, non-veg, ...
        #[arg(long, short)]
        diet: String,

        /// Allergen category to avoid (repeatable)
        #[arg(long = "allergen", short)]
        allergens: Vec<String>,

        /// Ingredient to leave out (repeatable)
        #[arg(long = "blocked")]
        blocked: Vec<String>,

        /// Flavor preference as key=value with value in [0, 1] (repeatable)
        #[arg(long = "flavor", short, value_parser = parse_flavor)]
        flavors: Vec<(String, f64)>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Ask the configured LLM to explain the changes
        #[arg(long)]
        explain: bool,

        /// Show nutrition estimates for the customized ingredients
        #[arg(long)]
        nutrition: bool,
    },

    /// List recipes whose name starts with QUERY
    Search {
        #[arg(default_value = "")]
        query: String,
    },

    /// Show the allergen categories and diet types the tables know
    Tables,
}

fn parse_flavor(s: &str) -> Result<(String, f64), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("flavor intensity {} is outside [0, 1]", value));
    }
    Ok((key.trim().to_string(), value))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).map_err(|e| {
        error!("Unable to load configuration: {}", e);
        CustomizeError::from(e)
    })?;

    match cli.command {
        Commands::Customize {
            recipe_id,
            diet,
            allergens,
            blocked,
            flavors,
            json,
            explain,
            nutrition,
        } => {
            let customizer = customizer_from_config(&config)?;
            let repository = repository_from_config(&config)?;
            let recipe = repository
                .get(&recipe_id)?
                .ok_or(CustomizeError::RecipeNotFound(recipe_id))?;

            let mut preferences = UserPreference::anonymous(diet.as_str())
                .with_allergens(allergens)
                .with_blocked(blocked);
            for (axis, intensity) in flavors {
                preferences = preferences.with_flavor(axis, intensity);
            }

            let result = customizer.customize(&recipe, &preferences);
            if json {
                println!("{}", render_json(&recipe, &result)?);
            } else {
                println!("{}", render_text(&recipe, &result));
            }

            if nutrition {
                let table = nutrition_from_config(&config)?;
                println!("\n{}", render_nutrition(&table, &result)?);
            }

            if explain {
                let provider = AnthropicProvider::new(&config.llm)?;
                info!("Requesting explanation from {}", provider.provider_name());
                let explanation = provider
                    .complete(&build_explanation_prompt(&recipe, &result))
                    .await?;
                println!("\n{}", explanation);
            }
        }
        Commands::Search { query } => {
            let repository = repository_from_config(&config)?;
            for recipe in repository.search(&query)? {
                println!("{}\t{}\t{}", recipe.id, recipe.name, recipe.cuisine);
            }
        }
        Commands::Tables => {
            let customizer = customizer_from_config(&config)?;
            let knowledge = customizer.knowledge();
            let diets: BTreeSet<&str> = knowledge
                .diet_rules
                .dietary_types()
                .into_iter()
                .chain(knowledge.substitutions.dietary_types())
                .collect();

            println!("Allergen categories:");
            for category in knowledge.allergens.categories() {
                println!("  {}", category);
            }
            println!("Dietary types:");
            for diet in diets {
                println!("  {}", diet);
            }
        }
    }

    Ok(())
}

fn render_text(recipe: &Recipe, result: &CustomizationResult) -> String {
    let mut out = format!("{}\n\nIngredients:\n", recipe.name);
    for ingredient in &result.modified_ingredients {
        out.push_str(&format!(
            "  - {} {} {}\n",
            ingredient.quantity, ingredient.unit, ingredient.name
        ));
    }
    out.push_str("\nInstructions:\n");
    for (i, step) in result.instructions.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, step));
    }
    out.push('\n');
    out.push_str(&result.summary);
    out
}

fn render_nutrition(
    nutrition: &dyn NutritionRepository,
    result: &CustomizationResult,
) -> recipe_customizer::Result<String> {
    let mut out = String::from("Nutrition:");
    for ingredient in &result.modified_ingredients {
        let values = nutrition.get_nutrition(&ingredient.name)?;
        out.push_str(&format!(
            "\n  {}: {}",
            ingredient.name,
            explain_nutrition(&values)
        ));
    }
    Ok(out)
}

fn render_json(recipe: &Recipe, result: &CustomizationResult) -> serde_json::Result<String> {
    let ingredients: Vec<_> = result
        .modified_ingredients
        .iter()
        .map(|i| json!({"name": i.name, "quantity": i.quantity, "unit": i.unit}))
        .collect();

    serde_json::to_string_pretty(&json!({
        "modified_recipe": {
            "name": recipe.name,
            "ingredients": ingredients,
            "instructions": result.instructions,
        },
        "substitutions": result.substitutions,
        "summary": result.summary,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flavor() {
        assert_eq!(parse_flavor("spicy=0.6").unwrap(), ("spicy".to_string(), 0.6));
        assert_eq!(parse_flavor(" sweet = 1 ").unwrap(), ("sweet".to_string(), 1.0));
        assert!(parse_flavor("spicy").is_err());
        assert!(parse_flavor("spicy=hot").is_err());
        assert!(parse_flavor("spicy=1.5").is_err());
    }

    #[test]
    fn test_cli_parses_customize() {
        let cli = Cli::try_parse_from([
            "recipe-customizer",
            "customize",
            "1",
            "--diet",
            "vegan",
            "--allergen",
            "nuts",
            "--allergen",
            "soy",
            "--flavor",
            "spicy=0.8",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Customize {
                recipe_id,
                diet,
                allergens,
                flavors,
                json,
                explain,
                nutrition,
                ..
            } => {
                assert_eq!(recipe_id, "1");
                assert_eq!(diet, "vegan");
                assert_eq!(allergens, ["nuts", "soy"]);
                assert_eq!(flavors, [("spicy".to_string(), 0.8)]);
                assert!(json);
                assert!(!explain);
                assert!(!nutrition);
            }
            _ => panic!("expected customize"),
        }
    }

    #[test]
    fn test_render_json_shape() {
        let customizer = recipe_customizer::RecipeCustomizer::bundled().unwrap();
        let recipe = recipe_customizer::JsonRecipeRepository::bundled()
            .unwrap()
            .get("1")
            .unwrap()
            .unwrap();
        let result = customizer.customize(&recipe, &UserPreference::anonymous("vegan"));

        let rendered: serde_json::Value =
            serde_json::from_str(&render_json(&recipe, &result).unwrap()).unwrap();
        assert_eq!(rendered["modified_recipe"]["name"], "Chicken Pasta");
        assert_eq!(rendered["modified_recipe"]["ingredients"][0]["name"], "tofu");
        assert_eq!(rendered["substitutions"].as_array().unwrap().len(), 2);
        assert!(rendered["summary"].as_str().unwrap().starts_with("Made 2"));
    }

    #[test]
    fn test_render_nutrition_lists_each_ingredient() {
        let customizer = recipe_customizer::RecipeCustomizer::bundled().unwrap();
        let recipe = recipe_customizer::JsonRecipeRepository::bundled()
            .unwrap()
            .get("1")
            .unwrap()
            .unwrap();
        let result = customizer.customize(&recipe, &UserPreference::anonymous("vegan"));
        let table = recipe_customizer::JsonNutritionRepository::bundled().unwrap();

        let rendered = render_nutrition(&table, &result).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Nutrition:");
        assert_eq!(lines[1], "  tofu: Estimated calories: 76");
        assert_eq!(lines.len(), result.modified_ingredients.len() + 1);
    }
}
