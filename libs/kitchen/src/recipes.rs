//! Recipe import and recipe reads

use ingredients::ParsedIngredient;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::{Ingredient, NewIngredient, NewRecipe, Recipe, RecipeWithIngredients, User};
use crate::{DomainError, DomainResult, Kitchen, ensure_owner};

impl Kitchen {
    /// Scrape a recipe page and store it with its parsed ingredients.
    ///
    /// Lines are parsed concurrently; the recipe row and every ingredient are
    /// then written in line order inside a single transaction, so a failure
    /// leaves nothing behind.
    pub async fn create_recipe_from_url(
        &self,
        user: &User,
        url: &str,
    ) -> DomainResult<RecipeWithIngredients> {
        let scraped = self.scraper.scrape(url).await.map_err(|e| {
            warn!("Failed to scrape recipe at {}: {}", url, e);
            DomainError::from(e)
        })?;

        let lines: Vec<String> = scraped
            .ingredient_lines
            .unwrap_or_default()
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect();
        let parsed = self.parse_ingredient_lines(lines).await?;

        let mut tx = self.store.begin().await?;

        let recipe = tx
            .insert_recipe(&NewRecipe {
                name: scraped.name.unwrap_or_else(|| url.to_string()),
                description: scraped.description,
                url: Some(url.to_string()),
                prep_time: scraped.prep_time,
                cook_time: scraped.cook_time,
                total_time: scraped.total_time,
                owner_id: user.id,
            })
            .await?;

        let mut ingredients = Vec::with_capacity(parsed.len());
        for (position, ingredient) in parsed.into_iter().enumerate() {
            let position = ingredient_position(position)?;
            let stored = tx
                .insert_ingredient(&NewIngredient {
                    recipe_id: recipe.id,
                    position,
                    name: ingredient.name,
                    description: ingredient.description,
                    measure: ingredient.measure,
                })
                .await?;
            ingredients.push(stored);
        }

        tx.commit().await?;

        info!(
            "Imported recipe {} ({}) with {} ingredients for user {}",
            recipe.name,
            recipe.id,
            ingredients.len(),
            user.id
        );

        Ok(RecipeWithIngredients {
            recipe,
            ingredients,
        })
    }

    /// Parse every line on its own task and return the results in line order.
    ///
    /// Lines holding no ingredient, such as section headers, contribute
    /// nothing. All tasks are joined before returning; the error of the
    /// earliest failing line wins.
    async fn parse_ingredient_lines(&self, lines: Vec<String>) -> DomainResult<Vec<ParsedIngredient>> {
        let mut tasks = JoinSet::new();
        for (position, line) in lines.into_iter().enumerate() {
            let parser = Arc::clone(&self.parser);
            tasks.spawn(async move { (position, parser.parse_lines(&[line])) });
        }

        let mut parsed: Vec<Vec<ParsedIngredient>> = vec![Vec::new(); tasks.len()];
        let mut first_error: Option<(usize, DomainError)> = None;

        while let Some(joined) = tasks.join_next().await {
            let (position, err) = match joined {
                Ok((position, Ok(ingredients))) => {
                    parsed[position] = ingredients;
                    continue;
                }
                Ok((position, Err(e))) => (position, DomainError::from(e)),
                Err(e) => {
                    error!("Ingredient parse task failed: {}", e);
                    (usize::MAX, DomainError::Internal(e.to_string()))
                }
            };
            if first_error.as_ref().is_none_or(|(first, _)| position < *first) {
                first_error = Some((position, err));
            }
        }

        if let Some((_, err)) = first_error {
            warn!("Failed to parse ingredients: {}", err);
            return Err(err);
        }

        Ok(parsed.into_iter().flatten().collect())
    }

    /// Fetch a recipe the user owns
    pub async fn get_recipe(&self, user: &User, id: Uuid) -> DomainResult<Recipe> {
        let recipe = self
            .store
            .get_recipe(id)
            .await?
            .ok_or(DomainError::NotFound)?;
        ensure_owner(user, recipe.owner_id)?;
        Ok(recipe)
    }

    pub async fn get_recipes_for_user(&self, user: &User) -> DomainResult<Vec<Recipe>> {
        Ok(self.store.get_recipes_for_user(user.id).await?)
    }

    /// Ingredients of a recipe the user owns, in line order
    pub async fn get_ingredients_for_recipe(
        &self,
        user: &User,
        recipe: &Recipe,
    ) -> DomainResult<Vec<Ingredient>> {
        ensure_owner(user, recipe.owner_id)?;
        Ok(self.store.get_ingredients_for_recipe(recipe.id).await?)
    }
}

/// Column value for the ingredient at `index` in line order
fn ingredient_position(index: usize) -> DomainResult<i32> {
    i32::try_from(index)
        .map_err(|_| DomainError::Internal(format!("ingredient position {} out of range", index)))
}
