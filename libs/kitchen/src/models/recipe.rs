//! Recipe and ingredient models

use chrono::{DateTime, Utc};
use ingredients::Measure;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named dish imported from a URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub total_time: Option<String>,
    pub owner_id: Uuid,
}

/// Recipe creation payload
#[derive(Debug, Clone, Default)]
pub struct NewRecipe {
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub total_time: Option<String>,
    pub owner_id: Uuid,
}

/// Ingredient of a recipe, snapshotted at import time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub recipe_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub measure: Measure,
}

/// Ingredient creation payload
#[derive(Debug, Clone)]
pub struct NewIngredient {
    pub recipe_id: Uuid,
    /// Zero-based line position inside the recipe
    pub position: i32,
    pub name: String,
    pub description: Option<String>,
    pub measure: Measure,
}

/// A recipe together with its ingredients in line order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeWithIngredients {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<Ingredient>,
}
