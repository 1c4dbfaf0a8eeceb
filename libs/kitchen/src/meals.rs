//! Adding recipes to grocery lists

use tracing::info;
use uuid::Uuid;

use crate::models::{GroceryList, Item, ItemSource, Meal, MealWithItems, NewItem, NewMeal, User};
use crate::{DomainError, DomainResult, Kitchen, ensure_owner};

impl Kitchen {
    /// Add a recipe to a grocery list.
    ///
    /// Within one transaction the meal row is created and every ingredient of
    /// the recipe is copied into the list as an item tagged with the meal.
    /// Any failure rolls the whole thing back.
    pub async fn create_meal(
        &self,
        user: &User,
        list: &GroceryList,
        recipe_id: Uuid,
    ) -> DomainResult<MealWithItems> {
        ensure_owner(user, list.owner_id)?;

        let mut tx = self.store.begin().await?;

        let recipe = tx.get_recipe(recipe_id).await?.ok_or(DomainError::NotFound)?;
        ensure_owner(user, recipe.owner_id)?;

        let meal = tx
            .insert_meal(&NewMeal {
                grocery_list_id: list.id,
                recipe_id: recipe.id,
            })
            .await?;

        let ingredients = tx.get_ingredients_for_recipe(recipe.id).await?;
        let mut items = Vec::with_capacity(ingredients.len());
        for ingredient in ingredients {
            let item = tx
                .insert_item(&NewItem {
                    grocery_list_id: list.id,
                    source: ItemSource::Meal {
                        meal_id: meal.id,
                        ingredient_id: ingredient.id,
                    },
                    name: ingredient.name,
                    description: ingredient.description,
                    measure: ingredient.measure,
                })
                .await?;
            items.push(item);
        }

        tx.commit().await?;

        info!(
            "Added recipe {} to grocery list {} as meal {} ({} items)",
            recipe.id,
            list.id,
            meal.id,
            items.len()
        );

        Ok(MealWithItems { meal, items })
    }

    /// Fetch a meal whose grocery list the user owns
    pub async fn get_meal(&self, user: &User, id: Uuid) -> DomainResult<Meal> {
        let meal = self
            .store
            .get_meal(id)
            .await?
            .ok_or(DomainError::NotFound)?;
        let list = self
            .store
            .get_grocery_list(meal.grocery_list_id)
            .await?
            .ok_or(DomainError::NotFound)?;
        ensure_owner(user, list.owner_id)?;
        Ok(meal)
    }

    pub async fn get_meals_in_grocery_list(
        &self,
        user: &User,
        list: &GroceryList,
    ) -> DomainResult<Vec<Meal>> {
        ensure_owner(user, list.owner_id)?;
        Ok(self.store.get_meals_in_grocery_list(list.id).await?)
    }

    /// Items materialized by a meal
    pub async fn get_items_for_meal(&self, meal: &Meal) -> DomainResult<Vec<Item>> {
        Ok(self.store.get_items_for_meal(meal.id).await?)
    }
}
