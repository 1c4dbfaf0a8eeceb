//! In-memory storage backend
//!
//! Mirrors the relational schema closely enough for the domain layer to be
//! exercised without a database: uniqueness and reference checks surface as
//! [`DatabaseError::Constraint`], and a transaction works on a private copy
//! of the tables that is published only on commit. An open transaction holds
//! the store lock, so transactions are serialized.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use common::error::{DatabaseError, DatabaseResult};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{Store, StoreTx};
use crate::models::{
    GroceryList, Ingredient, Item, ItemStatus, Meal, NewGroceryList, NewIngredient, NewItem,
    NewMeal, NewRecipe, NewUser, Recipe, User,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    users: Vec<User>,
    recipes: Vec<Recipe>,
    /// (line position, ingredient)
    ingredients: Vec<(i32, Ingredient)>,
    grocery_lists: Vec<GroceryList>,
    meals: Vec<Meal>,
    items: Vec<Item>,
}

/// Timestamps are kept at the precision Postgres stores them with
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn missing(what: &str, id: Uuid) -> DatabaseError {
    DatabaseError::Constraint(format!("{} {} does not exist", what, id))
}

impl Tables {
    fn insert_recipe(&mut self, recipe: &NewRecipe) -> DatabaseResult<Recipe> {
        if !self.users.iter().any(|u| u.id == recipe.owner_id) {
            return Err(missing("user", recipe.owner_id));
        }

        let now = now();
        let recipe = Recipe {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            name: recipe.name.clone(),
            description: recipe.description.clone(),
            url: recipe.url.clone(),
            prep_time: recipe.prep_time.clone(),
            cook_time: recipe.cook_time.clone(),
            total_time: recipe.total_time.clone(),
            owner_id: recipe.owner_id,
        };
        self.recipes.push(recipe.clone());
        Ok(recipe)
    }

    fn insert_ingredient(&mut self, ingredient: &NewIngredient) -> DatabaseResult<Ingredient> {
        if !self.recipes.iter().any(|r| r.id == ingredient.recipe_id) {
            return Err(missing("recipe", ingredient.recipe_id));
        }

        let now = now();
        let stored = Ingredient {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            recipe_id: ingredient.recipe_id,
            name: ingredient.name.clone(),
            description: ingredient.description.clone(),
            measure: ingredient.measure.clone(),
        };
        self.ingredients.push((ingredient.position, stored.clone()));
        Ok(stored)
    }

    fn insert_grocery_list(&mut self, list: &NewGroceryList) -> DatabaseResult<GroceryList> {
        if !self.users.iter().any(|u| u.id == list.owner_id) {
            return Err(missing("user", list.owner_id));
        }

        let now = now();
        let list = GroceryList {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            name: list.name.clone(),
            owner_id: list.owner_id,
        };
        self.grocery_lists.push(list.clone());
        Ok(list)
    }

    fn insert_meal(&mut self, meal: &NewMeal) -> DatabaseResult<Meal> {
        if !self.grocery_lists.iter().any(|l| l.id == meal.grocery_list_id) {
            return Err(missing("grocery list", meal.grocery_list_id));
        }
        if !self.recipes.iter().any(|r| r.id == meal.recipe_id) {
            return Err(missing("recipe", meal.recipe_id));
        }

        let now = now();
        let meal = Meal {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            grocery_list_id: meal.grocery_list_id,
            recipe_id: meal.recipe_id,
        };
        self.meals.push(meal.clone());
        Ok(meal)
    }

    fn insert_item(&mut self, item: &NewItem) -> DatabaseResult<Item> {
        if !self.grocery_lists.iter().any(|l| l.id == item.grocery_list_id) {
            return Err(missing("grocery list", item.grocery_list_id));
        }
        if let Some(meal_id) = item.source.meal_id() {
            if !self.meals.iter().any(|m| m.id == meal_id) {
                return Err(missing("meal", meal_id));
            }
        }
        if let Some(ingredient_id) = item.source.ingredient_id() {
            if !self.ingredients.iter().any(|(_, i)| i.id == ingredient_id) {
                return Err(missing("ingredient", ingredient_id));
            }
        }

        let now = now();
        let item = Item {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            grocery_list_id: item.grocery_list_id,
            source: item.source,
            name: item.name.clone(),
            description: item.description.clone(),
            measure: item.measure.clone(),
            status: ItemStatus::Incomplete,
        };
        self.items.push(item.clone());
        Ok(item)
    }

    fn recipe(&self, id: Uuid) -> Option<Recipe> {
        self.recipes.iter().find(|r| r.id == id).cloned()
    }

    fn ingredients_for_recipe(&self, recipe_id: Uuid) -> Vec<Ingredient> {
        let mut found: Vec<&(i32, Ingredient)> = self
            .ingredients
            .iter()
            .filter(|(_, i)| i.recipe_id == recipe_id)
            .collect();
        found.sort_by_key(|(position, _)| *position);
        found.into_iter().map(|(_, i)| i.clone()).collect()
    }
}

/// Store holding every table in process memory
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

/// Transaction over a private copy of the tables
pub struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> DatabaseResult<Box<dyn StoreTx>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTx { guard, working }))
    }

    async fn insert_user(&self, user: &NewUser) -> DatabaseResult<User> {
        let mut tables = self.state.lock().await;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(DatabaseError::Constraint(format!(
                "username {} already exists",
                user.username
            )));
        }

        let now = now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            username: user.username.clone(),
            hashed_password: user.hashed_password.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let tables = self.state.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let tables = self.state.lock().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn get_recipe(&self, id: Uuid) -> DatabaseResult<Option<Recipe>> {
        Ok(self.state.lock().await.recipe(id))
    }

    async fn get_recipes_for_user(&self, owner_id: Uuid) -> DatabaseResult<Vec<Recipe>> {
        let tables = self.state.lock().await;
        Ok(tables
            .recipes
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn get_ingredients_for_recipe(&self, recipe_id: Uuid) -> DatabaseResult<Vec<Ingredient>> {
        Ok(self.state.lock().await.ingredients_for_recipe(recipe_id))
    }

    async fn get_grocery_list(&self, id: Uuid) -> DatabaseResult<Option<GroceryList>> {
        let tables = self.state.lock().await;
        Ok(tables.grocery_lists.iter().find(|l| l.id == id).cloned())
    }

    async fn get_grocery_lists_for_user(&self, owner_id: Uuid) -> DatabaseResult<Vec<GroceryList>> {
        let tables = self.state.lock().await;
        Ok(tables
            .grocery_lists
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn get_item(&self, id: Uuid) -> DatabaseResult<Option<Item>> {
        let tables = self.state.lock().await;
        Ok(tables.items.iter().find(|i| i.id == id).cloned())
    }

    async fn get_items_for_grocery_list(&self, grocery_list_id: Uuid) -> DatabaseResult<Vec<Item>> {
        let tables = self.state.lock().await;
        Ok(tables
            .items
            .iter()
            .filter(|i| i.grocery_list_id == grocery_list_id)
            .cloned()
            .collect())
    }

    async fn get_items_for_grocery_list_by_name(
        &self,
        grocery_list_id: Uuid,
        name: &str,
    ) -> DatabaseResult<Vec<Item>> {
        let name = name.to_lowercase();
        let tables = self.state.lock().await;
        Ok(tables
            .items
            .iter()
            .filter(|i| i.grocery_list_id == grocery_list_id && i.name.to_lowercase() == name)
            .cloned()
            .collect())
    }

    async fn get_items_for_meal(&self, meal_id: Uuid) -> DatabaseResult<Vec<Item>> {
        let tables = self.state.lock().await;
        Ok(tables
            .items
            .iter()
            .filter(|i| i.source.meal_id() == Some(meal_id))
            .cloned()
            .collect())
    }

    async fn set_item_status(
        &self,
        id: Uuid,
        status: ItemStatus,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<()> {
        let mut tables = self.state.lock().await;
        if let Some(item) = tables.items.iter_mut().find(|i| i.id == id) {
            item.status = status;
            item.updated_at = updated_at;
        }
        Ok(())
    }

    async fn get_meal(&self, id: Uuid) -> DatabaseResult<Option<Meal>> {
        let tables = self.state.lock().await;
        Ok(tables.meals.iter().find(|m| m.id == id).cloned())
    }

    async fn get_meals_in_grocery_list(&self, grocery_list_id: Uuid) -> DatabaseResult<Vec<Meal>> {
        let tables = self.state.lock().await;
        Ok(tables
            .meals
            .iter()
            .filter(|m| m.grocery_list_id == grocery_list_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn insert_recipe(&mut self, recipe: &NewRecipe) -> DatabaseResult<Recipe> {
        self.working.insert_recipe(recipe)
    }

    async fn insert_ingredient(&mut self, ingredient: &NewIngredient) -> DatabaseResult<Ingredient> {
        self.working.insert_ingredient(ingredient)
    }

    async fn insert_grocery_list(&mut self, list: &NewGroceryList) -> DatabaseResult<GroceryList> {
        self.working.insert_grocery_list(list)
    }

    async fn insert_meal(&mut self, meal: &NewMeal) -> DatabaseResult<Meal> {
        self.working.insert_meal(meal)
    }

    async fn insert_item(&mut self, item: &NewItem) -> DatabaseResult<Item> {
        self.working.insert_item(item)
    }

    async fn get_recipe(&mut self, id: Uuid) -> DatabaseResult<Option<Recipe>> {
        Ok(self.working.recipe(id))
    }

    async fn get_ingredients_for_recipe(
        &mut self,
        recipe_id: Uuid,
    ) -> DatabaseResult<Vec<Ingredient>> {
        Ok(self.working.ingredients_for_recipe(recipe_id))
    }

    async fn commit(self: Box<Self>) -> DatabaseResult<()> {
        let MemoryTx { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DatabaseResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingredients::Measure;

    async fn store_with_user() -> (MemoryStore, User) {
        let store = MemoryStore::new();
        let user = store
            .insert_user(&NewUser {
                username: "cook".to_string(),
                hashed_password: "hash".to_string(),
                first_name: None,
                last_name: None,
            })
            .await
            .unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn test_duplicate_username_is_constraint_error() {
        let (store, user) = store_with_user().await;
        let result = store
            .insert_user(&NewUser {
                username: user.username.clone(),
                hashed_password: "other".to_string(),
                first_name: None,
                last_name: None,
            })
            .await;
        assert!(matches!(result, Err(DatabaseError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_dropped_transaction_discards_writes() {
        let (store, user) = store_with_user().await;

        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_grocery_list(&NewGroceryList {
                name: "Weekly".to_string(),
                owner_id: user.id,
            })
            .await
            .unwrap();
        }

        assert!(store.get_grocery_lists_for_user(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_committed_transaction_is_visible() {
        let (store, user) = store_with_user().await;

        let mut tx = store.begin().await.unwrap();
        let list = tx
            .insert_grocery_list(&NewGroceryList {
                name: "Weekly".to_string(),
                owner_id: user.id,
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let fetched = store.get_grocery_list(list.id).await.unwrap();
        assert_eq!(fetched, Some(list));
    }

    #[tokio::test]
    async fn test_ingredients_come_back_in_line_order() {
        let (store, user) = store_with_user().await;

        let mut tx = store.begin().await.unwrap();
        let recipe = tx
            .insert_recipe(&NewRecipe {
                name: "Pancakes".to_string(),
                owner_id: user.id,
                ..Default::default()
            })
            .await
            .unwrap();
        for (position, name) in [(1, "milk"), (0, "flour"), (2, "eggs")] {
            tx.insert_ingredient(&NewIngredient {
                recipe_id: recipe.id,
                position,
                name: name.to_string(),
                description: None,
                measure: Measure::new(1.0, "cup"),
            })
            .await
            .unwrap();
        }
        tx.commit().await.unwrap();

        let names: Vec<String> = store
            .get_ingredients_for_recipe(recipe.id)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["flour", "milk", "eggs"]);
    }

    #[tokio::test]
    async fn test_item_requires_existing_list() {
        let (store, _user) = store_with_user().await;

        let mut tx = store.begin().await.unwrap();
        let result = tx
            .insert_item(&NewItem {
                grocery_list_id: Uuid::new_v4(),
                source: crate::models::ItemSource::Manual,
                name: "milk".to_string(),
                description: None,
                measure: Measure::new(1.0, "cup"),
            })
            .await;
        assert!(matches!(result, Err(DatabaseError::Constraint(_))));
    }
}
