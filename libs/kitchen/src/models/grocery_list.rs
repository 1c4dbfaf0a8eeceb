//! Grocery list, item and meal models

use chrono::{DateTime, Utc};
use ingredients::Measure;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Named shopping list owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryList {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub owner_id: Uuid,
}

/// Grocery list creation payload
#[derive(Debug, Clone)]
pub struct NewGroceryList {
    pub name: String,
    pub owner_id: Uuid,
}

/// Completion state of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Incomplete,
    Complete,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Incomplete => "incomplete",
            ItemStatus::Complete => "complete",
        }
    }

    pub fn is_complete(self) -> bool {
        self == ItemStatus::Complete
    }

    pub fn from_complete(is_complete: bool) -> Self {
        if is_complete {
            ItemStatus::Complete
        } else {
            ItemStatus::Incomplete
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incomplete" => Ok(ItemStatus::Incomplete),
            "complete" => Ok(ItemStatus::Complete),
            other => Err(format!("unknown item status: {}", other)),
        }
    }
}

/// Where an item came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemSource {
    /// Added directly to the list
    Manual,
    /// Materialized from a recipe ingredient when a meal was created
    Meal { meal_id: Uuid, ingredient_id: Uuid },
}

impl ItemSource {
    pub fn meal_id(&self) -> Option<Uuid> {
        match self {
            ItemSource::Manual => None,
            ItemSource::Meal { meal_id, .. } => Some(*meal_id),
        }
    }

    pub fn ingredient_id(&self) -> Option<Uuid> {
        match self {
            ItemSource::Manual => None,
            ItemSource::Meal { ingredient_id, .. } => Some(*ingredient_id),
        }
    }

    /// Rebuild from the two nullable columns; `None` when exactly one is set
    pub fn from_columns(meal_id: Option<Uuid>, ingredient_id: Option<Uuid>) -> Option<Self> {
        match (meal_id, ingredient_id) {
            (None, None) => Some(ItemSource::Manual),
            (Some(meal_id), Some(ingredient_id)) => Some(ItemSource::Meal {
                meal_id,
                ingredient_id,
            }),
            _ => None,
        }
    }
}

/// Trackable shopping-list entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub grocery_list_id: Uuid,
    pub source: ItemSource,
    pub name: String,
    pub description: Option<String>,
    pub measure: Measure,
    pub status: ItemStatus,
}

/// Item creation payload
#[derive(Debug, Clone)]
pub struct NewItem {
    pub grocery_list_id: Uuid,
    pub source: ItemSource,
    pub name: String,
    pub description: Option<String>,
    pub measure: Measure,
}

/// What a caller supplies to add an item by hand
#[derive(Debug, Clone, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub description: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub units: String,
}

/// A recipe added to a grocery list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub grocery_list_id: Uuid,
    pub recipe_id: Uuid,
}

/// Meal creation payload
#[derive(Debug, Clone)]
pub struct NewMeal {
    pub grocery_list_id: Uuid,
    pub recipe_id: Uuid,
}

/// A meal together with the items it materialized
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealWithItems {
    #[serde(flatten)]
    pub meal: Meal,
    pub items: Vec<Item>,
}
