//! PostgreSQL storage backend

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::{DatabaseError, DatabaseResult};
use ingredients::{Measure, StandardMeasure};
use sqlx::postgres::PgRow;
use sqlx::{PgExecutor, PgPool, Postgres, Row, Transaction};
use tracing::debug;
use uuid::Uuid;

use super::{Store, StoreTx};
use crate::models::{
    GroceryList, Ingredient, Item, ItemSource, ItemStatus, Meal, NewGroceryList, NewIngredient,
    NewItem, NewMeal, NewRecipe, NewUser, Recipe, User,
};

/// Store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// An open PostgreSQL transaction; rolls back when dropped
pub struct PgTransaction {
    tx: Transaction<'static, Postgres>,
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        username: row.try_get("username")?,
        hashed_password: row.try_get("hashed_password")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
    })
}

fn recipe_from_row(row: &PgRow) -> Result<Recipe, sqlx::Error> {
    Ok(Recipe {
        id: row.try_get("id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        url: row.try_get("url")?,
        prep_time: row.try_get("prep_time")?,
        cook_time: row.try_get("cook_time")?,
        total_time: row.try_get("total_time")?,
        owner_id: row.try_get("owner_id")?,
    })
}

fn measure_from_row(row: &PgRow) -> Result<Measure, sqlx::Error> {
    let standard_amount: Option<f64> = row.try_get("standard_amount")?;
    let standard_units: String = row.try_get("standard_units")?;

    Ok(Measure {
        original_amount: row.try_get("amount")?,
        original_units: row.try_get("units")?,
        standard: StandardMeasure::from_parts(standard_amount, &standard_units),
    })
}

fn ingredient_from_row(row: &PgRow) -> Result<Ingredient, sqlx::Error> {
    Ok(Ingredient {
        id: row.try_get("id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        recipe_id: row.try_get("recipe_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        measure: measure_from_row(row)?,
    })
}

fn grocery_list_from_row(row: &PgRow) -> Result<GroceryList, sqlx::Error> {
    Ok(GroceryList {
        id: row.try_get("id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        name: row.try_get("name")?,
        owner_id: row.try_get("owner_id")?,
    })
}

fn item_from_row(row: &PgRow) -> Result<Item, sqlx::Error> {
    let meal_id: Option<Uuid> = row.try_get("meal_id")?;
    let ingredient_id: Option<Uuid> = row.try_get("ingredient_id")?;
    let source = ItemSource::from_columns(meal_id, ingredient_id)
        .ok_or_else(|| sqlx::Error::Decode("item has only one of meal_id and ingredient_id".into()))?;
    let is_complete: bool = row.try_get("is_complete")?;

    Ok(Item {
        id: row.try_get("id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        grocery_list_id: row.try_get("grocery_list_id")?,
        source,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        measure: measure_from_row(row)?,
        status: ItemStatus::from_complete(is_complete),
    })
}

fn meal_from_row(row: &PgRow) -> Result<Meal, sqlx::Error> {
    Ok(Meal {
        id: row.try_get("id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        grocery_list_id: row.try_get("grocery_list_id")?,
        recipe_id: row.try_get("recipe_id")?,
    })
}

fn collect<T>(
    rows: Vec<PgRow>,
    map: fn(&PgRow) -> Result<T, sqlx::Error>,
) -> DatabaseResult<Vec<T>> {
    rows.iter()
        .map(|row| map(row).map_err(DatabaseError::from))
        .collect()
}

async fn fetch_recipe<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> DatabaseResult<Option<Recipe>> {
    let row = sqlx::query(
        r#"
        SELECT id, created_at, updated_at, name, description, url,
               prep_time, cook_time, total_time, owner_id
        FROM recipes
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(row.as_ref().map(recipe_from_row).transpose()?)
}

async fn fetch_ingredients<'e, E: PgExecutor<'e>>(
    executor: E,
    recipe_id: Uuid,
) -> DatabaseResult<Vec<Ingredient>> {
    let rows = sqlx::query(
        r#"
        SELECT id, created_at, updated_at, recipe_id, name, description,
               amount, units, standard_amount, standard_units
        FROM ingredients
        WHERE recipe_id = $1
        ORDER BY position
        "#,
    )
    .bind(recipe_id)
    .fetch_all(executor)
    .await?;

    collect(rows, ingredient_from_row)
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> DatabaseResult<Box<dyn StoreTx>> {
        let tx = self.pool.begin().await.map_err(DatabaseError::Connection)?;
        Ok(Box::new(PgTransaction { tx }))
    }

    async fn insert_user(&self, user: &NewUser) -> DatabaseResult<User> {
        debug!("Inserting user: {}", user.username);

        let row = sqlx::query(
            r#"
            INSERT INTO users (id, username, hashed_password, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_at, updated_at, username, hashed_password, first_name, last_name
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.hashed_password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(&row)?)
    }

    async fn get_user(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, created_at, updated_at, username, hashed_password, first_name, last_name
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn get_user_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, created_at, updated_at, username, hashed_password, first_name, last_name
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn get_recipe(&self, id: Uuid) -> DatabaseResult<Option<Recipe>> {
        fetch_recipe(&self.pool, id).await
    }

    async fn get_recipes_for_user(&self, owner_id: Uuid) -> DatabaseResult<Vec<Recipe>> {
        let rows = sqlx::query(
            r#"
            SELECT id, created_at, updated_at, name, description, url,
                   prep_time, cook_time, total_time, owner_id
            FROM recipes
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        collect(rows, recipe_from_row)
    }

    async fn get_ingredients_for_recipe(&self, recipe_id: Uuid) -> DatabaseResult<Vec<Ingredient>> {
        fetch_ingredients(&self.pool, recipe_id).await
    }

    async fn get_grocery_list(&self, id: Uuid) -> DatabaseResult<Option<GroceryList>> {
        let row = sqlx::query(
            r#"
            SELECT id, created_at, updated_at, name, owner_id
            FROM grocery_lists
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(grocery_list_from_row).transpose()?)
    }

    async fn get_grocery_lists_for_user(&self, owner_id: Uuid) -> DatabaseResult<Vec<GroceryList>> {
        let rows = sqlx::query(
            r#"
            SELECT id, created_at, updated_at, name, owner_id
            FROM grocery_lists
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        collect(rows, grocery_list_from_row)
    }

    async fn get_item(&self, id: Uuid) -> DatabaseResult<Option<Item>> {
        let row = sqlx::query(
            r#"
            SELECT id, created_at, updated_at, grocery_list_id, meal_id, ingredient_id,
                   name, description, amount, units, standard_amount, standard_units, is_complete
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(item_from_row).transpose()?)
    }

    async fn get_items_for_grocery_list(&self, grocery_list_id: Uuid) -> DatabaseResult<Vec<Item>> {
        let rows = sqlx::query(
            r#"
            SELECT id, created_at, updated_at, grocery_list_id, meal_id, ingredient_id,
                   name, description, amount, units, standard_amount, standard_units, is_complete
            FROM items
            WHERE grocery_list_id = $1
            ORDER BY created_at, name
            "#,
        )
        .bind(grocery_list_id)
        .fetch_all(&self.pool)
        .await?;

        collect(rows, item_from_row)
    }

    async fn get_items_for_grocery_list_by_name(
        &self,
        grocery_list_id: Uuid,
        name: &str,
    ) -> DatabaseResult<Vec<Item>> {
        let rows = sqlx::query(
            r#"
            SELECT id, created_at, updated_at, grocery_list_id, meal_id, ingredient_id,
                   name, description, amount, units, standard_amount, standard_units, is_complete
            FROM items
            WHERE grocery_list_id = $1 AND LOWER(name) = LOWER($2)
            ORDER BY created_at
            "#,
        )
        .bind(grocery_list_id)
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        collect(rows, item_from_row)
    }

    async fn get_items_for_meal(&self, meal_id: Uuid) -> DatabaseResult<Vec<Item>> {
        let rows = sqlx::query(
            r#"
            SELECT id, created_at, updated_at, grocery_list_id, meal_id, ingredient_id,
                   name, description, amount, units, standard_amount, standard_units, is_complete
            FROM items
            WHERE meal_id = $1
            ORDER BY created_at, name
            "#,
        )
        .bind(meal_id)
        .fetch_all(&self.pool)
        .await?;

        collect(rows, item_from_row)
    }

    async fn set_item_status(
        &self,
        id: Uuid,
        status: ItemStatus,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            UPDATE items
            SET is_complete = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.is_complete())
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_meal(&self, id: Uuid) -> DatabaseResult<Option<Meal>> {
        let row = sqlx::query(
            r#"
            SELECT id, created_at, updated_at, grocery_list_id, recipe_id
            FROM meals
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(meal_from_row).transpose()?)
    }

    async fn get_meals_in_grocery_list(&self, grocery_list_id: Uuid) -> DatabaseResult<Vec<Meal>> {
        let rows = sqlx::query(
            r#"
            SELECT id, created_at, updated_at, grocery_list_id, recipe_id
            FROM meals
            WHERE grocery_list_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(grocery_list_id)
        .fetch_all(&self.pool)
        .await?;

        collect(rows, meal_from_row)
    }
}

#[async_trait]
impl StoreTx for PgTransaction {
    async fn insert_recipe(&mut self, recipe: &NewRecipe) -> DatabaseResult<Recipe> {
        let row = sqlx::query(
            r#"
            INSERT INTO recipes (id, name, description, url, prep_time, cook_time, total_time, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, created_at, updated_at, name, description, url,
                      prep_time, cook_time, total_time, owner_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&recipe.name)
        .bind(&recipe.description)
        .bind(&recipe.url)
        .bind(&recipe.prep_time)
        .bind(&recipe.cook_time)
        .bind(&recipe.total_time)
        .bind(recipe.owner_id)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(recipe_from_row(&row)?)
    }

    async fn insert_ingredient(&mut self, ingredient: &NewIngredient) -> DatabaseResult<Ingredient> {
        let (standard_amount, standard_units) = ingredient.measure.standard.to_parts();

        let row = sqlx::query(
            r#"
            INSERT INTO ingredients (id, recipe_id, position, name, description,
                                     amount, units, standard_amount, standard_units)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, created_at, updated_at, recipe_id, name, description,
                      amount, units, standard_amount, standard_units
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(ingredient.recipe_id)
        .bind(ingredient.position)
        .bind(&ingredient.name)
        .bind(&ingredient.description)
        .bind(ingredient.measure.original_amount)
        .bind(&ingredient.measure.original_units)
        .bind(standard_amount)
        .bind(standard_units)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(ingredient_from_row(&row)?)
    }

    async fn insert_grocery_list(&mut self, list: &NewGroceryList) -> DatabaseResult<GroceryList> {
        let row = sqlx::query(
            r#"
            INSERT INTO grocery_lists (id, name, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, created_at, updated_at, name, owner_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&list.name)
        .bind(list.owner_id)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(grocery_list_from_row(&row)?)
    }

    async fn insert_meal(&mut self, meal: &NewMeal) -> DatabaseResult<Meal> {
        let row = sqlx::query(
            r#"
            INSERT INTO meals (id, grocery_list_id, recipe_id)
            VALUES ($1, $2, $3)
            RETURNING id, created_at, updated_at, grocery_list_id, recipe_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(meal.grocery_list_id)
        .bind(meal.recipe_id)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(meal_from_row(&row)?)
    }

    async fn insert_item(&mut self, item: &NewItem) -> DatabaseResult<Item> {
        let (standard_amount, standard_units) = item.measure.standard.to_parts();

        let row = sqlx::query(
            r#"
            INSERT INTO items (id, grocery_list_id, meal_id, ingredient_id, name, description,
                               amount, units, standard_amount, standard_units, is_complete)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, FALSE)
            RETURNING id, created_at, updated_at, grocery_list_id, meal_id, ingredient_id,
                      name, description, amount, units, standard_amount, standard_units, is_complete
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(item.grocery_list_id)
        .bind(item.source.meal_id())
        .bind(item.source.ingredient_id())
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.measure.original_amount)
        .bind(&item.measure.original_units)
        .bind(standard_amount)
        .bind(standard_units)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(item_from_row(&row)?)
    }

    async fn get_recipe(&mut self, id: Uuid) -> DatabaseResult<Option<Recipe>> {
        fetch_recipe(&mut *self.tx, id).await
    }

    async fn get_ingredients_for_recipe(
        &mut self,
        recipe_id: Uuid,
    ) -> DatabaseResult<Vec<Ingredient>> {
        fetch_ingredients(&mut *self.tx, recipe_id).await
    }

    async fn commit(self: Box<Self>) -> DatabaseResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DatabaseResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
