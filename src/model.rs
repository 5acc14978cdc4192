use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// A single recipe line: what to use and how much of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: String,
    pub unit: String,
    /// Free-form classification tags such as "meat", "dairy" or "vegan"
    #[serde(default)]
    pub categories: BTreeSet<String>,
}

impl Ingredient {
    pub fn new<I, S>(
        name: impl Into<String>,
        quantity: impl Into<String>,
        unit: impl Into<String>,
        categories: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ingredient {
            name: name.into(),
            quantity: quantity.into(),
            unit: unit.into(),
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// A copy of this ingredient under a different name.
    ///
    /// Quantity, unit and categories are carried over unchanged.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Ingredient {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains(category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub dietary_tags: BTreeSet<String>,
}

impl Recipe {
    pub fn ingredient_names(&self) -> Vec<String> {
        self.ingredients.iter().map(|i| i.name.clone()).collect()
    }
}

/// A named dietary constraint profile.
///
/// Unrecognized values are kept verbatim so that new diets can be added to
/// the rule tables without touching this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DietaryType {
    Vegan,
    Vegetarian,
    NonVeg,
    Other(String),
}

impl DietaryType {
    /// Key used for rule table lookups
    pub fn as_str(&self) -> &str {
        match self {
            DietaryType::Vegan => "vegan",
            DietaryType::Vegetarian => "vegetarian",
            DietaryType::NonVeg => "non-veg",
            DietaryType::Other(name) => name,
        }
    }
}

impl From<&str> for DietaryType {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "vegan" => DietaryType::Vegan,
            "vegetarian" => DietaryType::Vegetarian,
            "non-veg" => DietaryType::NonVeg,
            _ => DietaryType::Other(value.trim().to_string()),
        }
    }
}

impl From<String> for DietaryType {
    fn from(value: String) -> Self {
        DietaryType::from(value.as_str())
    }
}

impl From<DietaryType> for String {
    fn from(value: DietaryType) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for DietaryType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DietaryType::from(s))
    }
}

impl fmt::Display for DietaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreference {
    pub user_id: String,
    pub dietary_type: DietaryType,
    #[serde(default)]
    pub allergens: BTreeSet<String>,
    #[serde(default)]
    pub blocked_ingredients: BTreeSet<String>,
    /// Flavor axis to intensity in `[0, 1]`, e.g. `{"spicy": 0.8}`
    #[serde(default)]
    pub flavor_preferences: BTreeMap<String, f64>,
}

impl UserPreference {
    /// A preference for a caller without an account
    pub fn anonymous(dietary_type: impl Into<DietaryType>) -> Self {
        UserPreference {
            user_id: "temp".to_string(),
            dietary_type: dietary_type.into(),
            allergens: BTreeSet::new(),
            blocked_ingredients: BTreeSet::new(),
            flavor_preferences: BTreeMap::new(),
        }
    }

    pub fn with_allergens<I, S>(mut self, allergens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allergens.extend(allergens.into_iter().map(Into::into));
        self
    }

    pub fn with_blocked<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocked_ingredients
            .extend(ingredients.into_iter().map(Into::into));
        self
    }

    pub fn with_flavor(mut self, axis: impl Into<String>, intensity: f64) -> Self {
        self.flavor_preferences.insert(axis.into(), intensity);
        self
    }

    /// Intensity for a flavor axis, 0 when the user did not state one
    pub fn flavor(&self, axis: &str) -> f64 {
        self.flavor_preferences.get(axis).copied().unwrap_or(0.0)
    }
}

/// Outcome of one substitution attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionResult {
    pub original: String,
    /// `None` means the ingredient is removed without a replacement
    pub substitute: Option<String>,
    pub reason: String,
    pub confidence: f64,
}

impl SubstitutionResult {
    pub fn is_resolved(&self) -> bool {
        self.substitute.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizationResult {
    pub modified_ingredients: Vec<Ingredient>,
    pub substitutions: Vec<SubstitutionResult>,
    pub instructions: Vec<String>,
    pub summary: String,
}
