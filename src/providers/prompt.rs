use crate::model::{CustomizationResult, Ingredient, Recipe};

/// The system prompt used when asking a model to explain a customization.
///
/// Loaded from `prompt.txt` at compile time.
pub const EXPLANATION_PROMPT: &str = include_str!("prompt.txt");

fn format_ingredients(ingredients: &[Ingredient]) -> String {
    ingredients
        .iter()
        .map(|i| format!("- {} {} {}", i.quantity, i.unit, i.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the user message describing what the customizer changed
pub fn build_explanation_prompt(recipe: &Recipe, result: &CustomizationResult) -> String {
    let kept: Vec<&str> = result
        .modified_ingredients
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    let substituted: Vec<&str> = result
        .substitutions
        .iter()
        .map(|s| s.original.as_str())
        .collect();
    let removed: Vec<&str> = recipe
        .ingredients
        .iter()
        .map(|i| i.name.as_str())
        .filter(|name| !kept.contains(name) && !substituted.contains(name))
        .collect();

    let mut prompt = format!(
        "Recipe: {}\n\nOriginal ingredients:\n{}\n\nAdapted ingredients:\n{}\n\n{}",
        recipe.name,
        format_ingredients(&recipe.ingredients),
        format_ingredients(&result.modified_ingredients),
        result.summary
    );
    if !removed.is_empty() {
        prompt.push_str(&format!("\n\nRemoved: {}", removed.join(", ")));
    }
    prompt
}
