//! Grocery list creation and reads

use tracing::info;
use uuid::Uuid;

use crate::models::{GroceryList, NewGroceryList, User};
use crate::{DomainError, DomainResult, Kitchen, ensure_owner};

impl Kitchen {
    pub async fn create_grocery_list(&self, user: &User, name: &str) -> DomainResult<GroceryList> {
        let mut tx = self.store.begin().await?;
        let list = tx
            .insert_grocery_list(&NewGroceryList {
                name: name.to_string(),
                owner_id: user.id,
            })
            .await?;
        tx.commit().await?;

        info!("Created grocery list {} for user {}", list.id, user.id);
        Ok(list)
    }

    /// Fetch a grocery list the user owns
    pub async fn get_grocery_list(&self, user: &User, id: Uuid) -> DomainResult<GroceryList> {
        let list = self
            .store
            .get_grocery_list(id)
            .await?
            .ok_or(DomainError::NotFound)?;
        ensure_owner(user, list.owner_id)?;
        Ok(list)
    }

    pub async fn get_grocery_lists_for_user(&self, user: &User) -> DomainResult<Vec<GroceryList>> {
        Ok(self.store.get_grocery_lists_for_user(user.id).await?)
    }
}
