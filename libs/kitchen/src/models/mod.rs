//! Kitchen domain models

pub mod grocery_list;
pub mod recipe;
pub mod user;

// Re-export for convenience
pub use grocery_list::{
    GroceryList, Item, ItemDraft, ItemSource, ItemStatus, Meal, MealWithItems, NewGroceryList, NewItem,
    NewMeal,
};
pub use recipe::{Ingredient, NewIngredient, NewRecipe, Recipe, RecipeWithIngredients};
pub use user::{NewUser, User};
