//! Shared fixtures for the kitchen integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::{DatabaseError, DatabaseResult};
use kitchen::Kitchen;
use kitchen::models::{
    GroceryList, Ingredient, Item, ItemStatus, Meal, NewGroceryList, NewIngredient, NewItem,
    NewMeal, NewRecipe, NewUser, Recipe, RecipeWithIngredients, User,
};
use kitchen::scraper::{RecipeScraper, ScrapeError, ScrapedRecipe};
use kitchen::store::{MemoryStore, Store, StoreTx};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

pub const PANCAKES_URL: &str = "https://example.com/pancakes";

/// Scraper serving canned pages; unknown URLs answer 404
#[derive(Default)]
pub struct FakeScraper {
    pages: HashMap<String, ScrapedRecipe>,
}

impl FakeScraper {
    pub fn with_page(mut self, url: &str, recipe: ScrapedRecipe) -> Self {
        self.pages.insert(url.to_string(), recipe);
        self
    }
}

#[async_trait]
impl RecipeScraper for FakeScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedRecipe, ScrapeError> {
        self.pages.get(url).cloned().ok_or(ScrapeError::Status(404))
    }
}

pub fn pancakes() -> ScrapedRecipe {
    ScrapedRecipe {
        name: Some("Pancakes".to_string()),
        description: Some("Fluffy".to_string()),
        prep_time: Some("PT10M".to_string()),
        cook_time: Some("PT15M".to_string()),
        total_time: None,
        ingredient_lines: Some(vec![
            "2 cups flour".to_string(),
            "1 1/2 cups milk".to_string(),
            "2 large eggs".to_string(),
            "salt to taste".to_string(),
        ]),
    }
}

pub fn scraper() -> FakeScraper {
    FakeScraper::default().with_page(PANCAKES_URL, pancakes())
}

pub fn kitchen_with(store: Arc<dyn Store>) -> Kitchen {
    Kitchen::new(store, Arc::new(scraper()))
}

pub fn memory_kitchen() -> Kitchen {
    kitchen_with(Arc::new(MemoryStore::new()))
}

pub async fn make_user(kitchen: &Kitchen, username: &str) -> User {
    kitchen
        .create_user(&NewUser {
            username: username.to_string(),
            hashed_password: "not-a-real-hash".to_string(),
            first_name: None,
            last_name: None,
        })
        .await
        .unwrap()
}

pub async fn import_pancakes(kitchen: &Kitchen, user: &User) -> RecipeWithIngredients {
    kitchen
        .create_recipe_from_url(user, PANCAKES_URL)
        .await
        .unwrap()
}

pub async fn make_list(kitchen: &Kitchen, user: &User) -> GroceryList {
    kitchen.create_grocery_list(user, "Weekend").await.unwrap()
}

fn injected() -> DatabaseError {
    DatabaseError::Query(sqlx::Error::Protocol("injected failure".to_string()))
}

/// Memory store that fails the k-th ingredient or item insert
#[derive(Clone)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_ingredient_at: Option<usize>,
    fail_item_at: Option<usize>,
    ingredient_inserts: Arc<AtomicUsize>,
    item_inserts: Arc<AtomicUsize>,
}

impl FailingStore {
    pub fn new(inner: MemoryStore) -> Self {
        FailingStore {
            inner,
            fail_ingredient_at: None,
            fail_item_at: None,
            ingredient_inserts: Arc::new(AtomicUsize::new(0)),
            item_inserts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fail the zero-based `k`-th ingredient insert
    pub fn fail_ingredient_insert_at(mut self, k: usize) -> Self {
        self.fail_ingredient_at = Some(k);
        self
    }

    /// Fail the zero-based `k`-th item insert
    pub fn fail_item_insert_at(mut self, k: usize) -> Self {
        self.fail_item_at = Some(k);
        self
    }
}

struct FailingTx {
    inner: Box<dyn StoreTx>,
    fail_ingredient_at: Option<usize>,
    fail_item_at: Option<usize>,
    ingredient_inserts: Arc<AtomicUsize>,
    item_inserts: Arc<AtomicUsize>,
}

#[async_trait]
impl Store for FailingStore {
    async fn begin(&self) -> DatabaseResult<Box<dyn StoreTx>> {
        Ok(Box::new(FailingTx {
            inner: self.inner.begin().await?,
            fail_ingredient_at: self.fail_ingredient_at,
            fail_item_at: self.fail_item_at,
            ingredient_inserts: Arc::clone(&self.ingredient_inserts),
            item_inserts: Arc::clone(&self.item_inserts),
        }))
    }

    async fn insert_user(&self, user: &NewUser) -> DatabaseResult<User> {
        self.inner.insert_user(user).await
    }

    async fn get_user(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        self.inner.get_user(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        self.inner.get_user_by_username(username).await
    }

    async fn get_recipe(&self, id: Uuid) -> DatabaseResult<Option<Recipe>> {
        self.inner.get_recipe(id).await
    }

    async fn get_recipes_for_user(&self, owner_id: Uuid) -> DatabaseResult<Vec<Recipe>> {
        self.inner.get_recipes_for_user(owner_id).await
    }

    async fn get_ingredients_for_recipe(&self, recipe_id: Uuid) -> DatabaseResult<Vec<Ingredient>> {
        self.inner.get_ingredients_for_recipe(recipe_id).await
    }

    async fn get_grocery_list(&self, id: Uuid) -> DatabaseResult<Option<GroceryList>> {
        self.inner.get_grocery_list(id).await
    }

    async fn get_grocery_lists_for_user(&self, owner_id: Uuid) -> DatabaseResult<Vec<GroceryList>> {
        self.inner.get_grocery_lists_for_user(owner_id).await
    }

    async fn get_item(&self, id: Uuid) -> DatabaseResult<Option<Item>> {
        self.inner.get_item(id).await
    }

    async fn get_items_for_grocery_list(&self, grocery_list_id: Uuid) -> DatabaseResult<Vec<Item>> {
        self.inner.get_items_for_grocery_list(grocery_list_id).await
    }

    async fn get_items_for_grocery_list_by_name(
        &self,
        grocery_list_id: Uuid,
        name: &str,
    ) -> DatabaseResult<Vec<Item>> {
        self.inner
            .get_items_for_grocery_list_by_name(grocery_list_id, name)
            .await
    }

    async fn get_items_for_meal(&self, meal_id: Uuid) -> DatabaseResult<Vec<Item>> {
        self.inner.get_items_for_meal(meal_id).await
    }

    async fn set_item_status(
        &self,
        id: Uuid,
        status: ItemStatus,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<()> {
        self.inner.set_item_status(id, status, updated_at).await
    }

    async fn get_meal(&self, id: Uuid) -> DatabaseResult<Option<Meal>> {
        self.inner.get_meal(id).await
    }

    async fn get_meals_in_grocery_list(&self, grocery_list_id: Uuid) -> DatabaseResult<Vec<Meal>> {
        self.inner.get_meals_in_grocery_list(grocery_list_id).await
    }
}

#[async_trait]
impl StoreTx for FailingTx {
    async fn insert_recipe(&mut self, recipe: &NewRecipe) -> DatabaseResult<Recipe> {
        self.inner.insert_recipe(recipe).await
    }

    async fn insert_ingredient(&mut self, ingredient: &NewIngredient) -> DatabaseResult<Ingredient> {
        let n = self.ingredient_inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_ingredient_at == Some(n) {
            return Err(injected());
        }
        self.inner.insert_ingredient(ingredient).await
    }

    async fn insert_grocery_list(&mut self, list: &NewGroceryList) -> DatabaseResult<GroceryList> {
        self.inner.insert_grocery_list(list).await
    }

    async fn insert_meal(&mut self, meal: &NewMeal) -> DatabaseResult<Meal> {
        self.inner.insert_meal(meal).await
    }

    async fn insert_item(&mut self, item: &NewItem) -> DatabaseResult<Item> {
        let n = self.item_inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_item_at == Some(n) {
            return Err(injected());
        }
        self.inner.insert_item(item).await
    }

    async fn get_recipe(&mut self, id: Uuid) -> DatabaseResult<Option<Recipe>> {
        self.inner.get_recipe(id).await
    }

    async fn get_ingredients_for_recipe(
        &mut self,
        recipe_id: Uuid,
    ) -> DatabaseResult<Vec<Ingredient>> {
        self.inner.get_ingredients_for_recipe(recipe_id).await
    }

    async fn commit(self: Box<Self>) -> DatabaseResult<()> {
        self.inner.commit().await
    }

    async fn rollback(self: Box<Self>) -> DatabaseResult<()> {
        self.inner.rollback().await
    }
}
