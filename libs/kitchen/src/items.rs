//! Item creation, status updates and aggregation

use chrono::{SubsecRound, Utc};
use ingredients::Measure;
use tracing::{debug, info};
use uuid::Uuid;

use crate::grouping::{GroupingMode, ItemGroup, group_items, group_name};
use crate::models::{GroceryList, Item, ItemDraft, ItemSource, ItemStatus, NewItem, User};
use crate::{DomainError, DomainResult, Kitchen, ensure_owner};

impl Kitchen {
    /// Add an item to a list by hand; its measure is standardized here
    pub async fn create_item(
        &self,
        user: &User,
        list: &GroceryList,
        draft: ItemDraft,
    ) -> DomainResult<Item> {
        ensure_owner(user, list.owner_id)?;

        let mut tx = self.store.begin().await?;
        let item = tx
            .insert_item(&NewItem {
                grocery_list_id: list.id,
                source: ItemSource::Manual,
                name: draft.name,
                description: draft.description,
                measure: Measure::new(draft.amount, draft.units),
            })
            .await?;
        tx.commit().await?;

        info!("Added item {} to grocery list {}", item.id, list.id);
        Ok(item)
    }

    /// Fetch an item whose grocery list the user owns
    pub async fn get_item(&self, user: &User, id: Uuid) -> DomainResult<Item> {
        let item = self
            .store
            .get_item(id)
            .await?
            .ok_or(DomainError::NotFound)?;
        let list = self
            .store
            .get_grocery_list(item.grocery_list_id)
            .await?
            .ok_or(DomainError::NotFound)?;
        ensure_owner(user, list.owner_id)?;
        Ok(item)
    }

    pub async fn get_items_for_grocery_list(
        &self,
        user: &User,
        list: &GroceryList,
    ) -> DomainResult<Vec<Item>> {
        ensure_owner(user, list.owner_id)?;
        Ok(self.store.get_items_for_grocery_list(list.id).await?)
    }

    /// Items of a list matching `name`, ignoring case
    pub async fn get_items_for_grocery_list_by_name(
        &self,
        user: &User,
        list: &GroceryList,
        name: &str,
    ) -> DomainResult<Vec<Item>> {
        ensure_owner(user, list.owner_id)?;
        Ok(self
            .store
            .get_items_for_grocery_list_by_name(list.id, name)
            .await?)
    }

    /// Set an item's completion status.
    ///
    /// Marking an item with the status it already has writes nothing and
    /// returns it unchanged.
    pub async fn mark_item_status(&self, item: Item, status: ItemStatus) -> DomainResult<Item> {
        if item.status == status {
            debug!("Item {} already {}", item.id, status);
            return Ok(item);
        }

        let updated_at = Utc::now().trunc_subsecs(6);
        self.store
            .set_item_status(item.id, status, updated_at)
            .await?;

        Ok(Item {
            status,
            updated_at,
            ..item
        })
    }

    /// Aggregate every item of a list
    pub async fn get_item_groups_for_grocery_list(
        &self,
        user: &User,
        list: &GroceryList,
        mode: GroupingMode,
    ) -> DomainResult<Vec<ItemGroup>> {
        let items = self.get_items_for_grocery_list(user, list).await?;
        Ok(group_items(items, mode))
    }

    /// Aggregate the items matching `name` into one group.
    ///
    /// No match yields an empty group rather than an error.
    pub async fn get_item_group_for_grocery_list_by_name(
        &self,
        user: &User,
        list: &GroceryList,
        name: &str,
    ) -> DomainResult<ItemGroup> {
        let items = self
            .get_items_for_grocery_list_by_name(user, list, name)
            .await?;

        let mut group = ItemGroup::empty(group_name(name), None);
        for item in items {
            group.push(item);
        }
        Ok(group)
    }
}
