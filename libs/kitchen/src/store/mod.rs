//! Storage seam for the domain layer
//!
//! [`Store`] covers single-statement reads and writes; [`StoreTx`] is an open
//! transaction for multi-row writes that must land atomically. Dropping a
//! `StoreTx` without calling [`StoreTx::commit`] discards its writes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{
    GroceryList, Ingredient, Item, ItemStatus, Meal, NewGroceryList, NewIngredient, NewItem,
    NewMeal, NewRecipe, NewUser, Recipe, User,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persistent storage for kitchen entities
#[async_trait]
pub trait Store: Send + Sync {
    /// Open a transaction
    async fn begin(&self) -> DatabaseResult<Box<dyn StoreTx>>;

    async fn insert_user(&self, user: &NewUser) -> DatabaseResult<User>;
    async fn get_user(&self, id: Uuid) -> DatabaseResult<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> DatabaseResult<Option<User>>;

    async fn get_recipe(&self, id: Uuid) -> DatabaseResult<Option<Recipe>>;
    async fn get_recipes_for_user(&self, owner_id: Uuid) -> DatabaseResult<Vec<Recipe>>;
    /// Ingredients in recipe line order
    async fn get_ingredients_for_recipe(&self, recipe_id: Uuid) -> DatabaseResult<Vec<Ingredient>>;

    async fn get_grocery_list(&self, id: Uuid) -> DatabaseResult<Option<GroceryList>>;
    async fn get_grocery_lists_for_user(&self, owner_id: Uuid) -> DatabaseResult<Vec<GroceryList>>;

    async fn get_item(&self, id: Uuid) -> DatabaseResult<Option<Item>>;
    async fn get_items_for_grocery_list(&self, grocery_list_id: Uuid) -> DatabaseResult<Vec<Item>>;
    /// Items of a list whose name matches `name`, ignoring case
    async fn get_items_for_grocery_list_by_name(
        &self,
        grocery_list_id: Uuid,
        name: &str,
    ) -> DatabaseResult<Vec<Item>>;
    async fn get_items_for_meal(&self, meal_id: Uuid) -> DatabaseResult<Vec<Item>>;

    /// Persist a new completion flag together with its modification time
    async fn set_item_status(
        &self,
        id: Uuid,
        status: ItemStatus,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<()>;

    async fn get_meal(&self, id: Uuid) -> DatabaseResult<Option<Meal>>;
    async fn get_meals_in_grocery_list(&self, grocery_list_id: Uuid) -> DatabaseResult<Vec<Meal>>;
}

/// An open storage transaction
#[async_trait]
pub trait StoreTx: Send {
    async fn insert_recipe(&mut self, recipe: &NewRecipe) -> DatabaseResult<Recipe>;
    async fn insert_ingredient(&mut self, ingredient: &NewIngredient) -> DatabaseResult<Ingredient>;
    async fn insert_grocery_list(&mut self, list: &NewGroceryList) -> DatabaseResult<GroceryList>;
    async fn insert_meal(&mut self, meal: &NewMeal) -> DatabaseResult<Meal>;
    async fn insert_item(&mut self, item: &NewItem) -> DatabaseResult<Item>;

    async fn get_recipe(&mut self, id: Uuid) -> DatabaseResult<Option<Recipe>>;
    async fn get_ingredients_for_recipe(
        &mut self,
        recipe_id: Uuid,
    ) -> DatabaseResult<Vec<Ingredient>>;

    async fn commit(self: Box<Self>) -> DatabaseResult<()>;
    async fn rollback(self: Box<Self>) -> DatabaseResult<()>;
}
