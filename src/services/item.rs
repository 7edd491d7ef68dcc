//! Item service
//!
//! Business logic for cost items: creation and edits (with name
//! normalization and field validation), and sharing items between members
//! of the item's group through partitions.

use tracing::{debug, info};

use crate::audit::EntityType;
use crate::error::{SplitterError, SplitterResult};
use crate::models::{
    split_cost, Field, GroupId, Item, ItemId, Partition, User, UserId, ValidationErrors,
};
use crate::storage::Storage;

/// Message attached to `users` when sharing with a non-member
pub const NOT_A_MEMBER_MESSAGE: &str = "is not a member of the item's group";

/// Service for item management and sharing
pub struct ItemService<'a> {
    storage: &'a Storage,
}

/// An item with the users sharing it and each sharer's portion
#[derive(Debug, Clone)]
pub struct ItemSummary {
    pub item: Item,
    pub sharers: Vec<User>,
    pub user_cost: f64,
}

impl<'a> ItemService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    // === Item CRUD ===

    /// Create an item in a group from raw name/cost input
    pub fn create_item(&self, group_id: GroupId, name: &str, cost: &str) -> SplitterResult<Item> {
        if self.storage.groups.get_group(group_id)?.is_none() {
            return Err(SplitterError::group_not_found(group_id.to_string()));
        }

        let item = Item::build(group_id, name, cost)?;

        self.storage.items.upsert_item(item.clone())?;
        self.storage.items.save()?;
        self.storage.log_create(
            EntityType::Item,
            item.id.to_string(),
            Some(item.name.clone()),
            &item,
        )?;

        info!(item = %item.id, group = %group_id, "created {}", item);
        Ok(item)
    }

    pub fn get_item(&self, id: ItemId) -> SplitterResult<Option<Item>> {
        self.storage.items.get_item(id)
    }

    /// Find an item within a group by name or ID
    pub fn find_item(&self, group_id: GroupId, identifier: &str) -> SplitterResult<Option<Item>> {
        if let Some(item) = self.storage.items.find_in_group(group_id, identifier)? {
            return Ok(Some(item));
        }

        if let Ok(id) = identifier.parse::<ItemId>() {
            return Ok(self
                .storage
                .items
                .get_item(id)?
                .filter(|item| item.group_id() == group_id));
        }

        Ok(None)
    }

    /// Like `find_item`, but a missing item is an error
    pub fn require_item(&self, group_id: GroupId, identifier: &str) -> SplitterResult<Item> {
        self.find_item(group_id, identifier)?
            .ok_or_else(|| SplitterError::item_not_found(identifier))
    }

    /// Items in a group, ordered by name
    pub fn list_items_in_group(&self, group_id: GroupId) -> SplitterResult<Vec<Item>> {
        self.storage.items.get_items_in_group(group_id)
    }

    /// Edit name and/or cost; the owning group never changes
    pub fn update_item(
        &self,
        id: ItemId,
        name: Option<&str>,
        cost: Option<&str>,
    ) -> SplitterResult<Item> {
        let mut item = self
            .storage
            .items
            .get_item(id)?
            .ok_or_else(|| SplitterError::item_not_found(id.to_string()))?;
        let before = item.clone();

        item.apply_changes(name, cost)?;

        self.storage.items.upsert_item(item.clone())?;
        self.storage.items.save()?;

        let mut changes = Vec::new();
        if before.name != item.name {
            changes.push(format!("name: {} -> {}", before.name, item.name));
        }
        if before.cost != item.cost {
            changes.push(format!("cost: {} -> {}", before.cost, item.cost));
        }
        self.storage.log_update(
            EntityType::Item,
            item.id.to_string(),
            Some(item.name.clone()),
            &before,
            &item,
            (!changes.is_empty()).then(|| changes.join(", ")),
        )?;

        Ok(item)
    }

    /// Delete an item and all of its partitions
    pub fn delete_item(&self, id: ItemId) -> SplitterResult<()> {
        let (removed, partitions) = self.storage.items.delete_item(id)?;
        let item = removed.ok_or_else(|| SplitterError::item_not_found(id.to_string()))?;
        self.storage.items.save()?;

        self.storage
            .log_deletes(EntityType::Partition, &partitions, |p| p.id.to_string())?;
        self.storage.log_delete(
            EntityType::Item,
            item.id.to_string(),
            Some(item.name.clone()),
            &item,
        )?;

        info!(item = %item.id, partitions = partitions.len(), "item deleted");
        Ok(())
    }

    // === Sharing ===

    /// Whether `item` is shared with `user_id`
    pub fn include_user(&self, item: &Item, user_id: UserId) -> SplitterResult<bool> {
        Ok(self.storage.items.get_partition(item.id, user_id)?.is_some())
    }

    /// Number of users sharing `item`
    pub fn count_users(&self, item: &Item) -> SplitterResult<usize> {
        self.storage.items.count_partitions(item.id)
    }

    /// Each sharer's portion of the cost; 0 when nobody shares the item
    pub fn user_cost(&self, item: &Item) -> SplitterResult<f64> {
        Ok(split_cost(item.cost, self.count_users(item)?))
    }

    /// Share `item` with `user_id`
    ///
    /// Idempotent for members: an existing partition is returned unchanged.
    /// A user outside the item's group gets an `Invalid` error carrying a
    /// `users` field error, and nothing is written. The item is re-read from
    /// storage, so a deleted item gives `NotFound`.
    pub fn add_user(&self, item: &Item, user_id: UserId) -> SplitterResult<Partition> {
        let item = self
            .get_item(item.id)?
            .ok_or_else(|| SplitterError::item_not_found(item.id.to_string()))?;
        if !self.storage.groups.is_member(item.group_id(), user_id)? {
            debug!(item = %item.id, user = %user_id, "refusing to share with non-member");
            return Err(ValidationErrors::single(Field::Users, NOT_A_MEMBER_MESSAGE).into());
        }

        let (partition, created) = self.storage.items.find_or_create_partition(item.id, user_id)?;
        if created {
            self.storage.items.save()?;
            self.storage.log_create(
                EntityType::Partition,
                partition.id.to_string(),
                Some(item.name.clone()),
                &partition,
            )?;
            info!(item = %item.id, user = %user_id, "item shared");
        }

        Ok(partition)
    }

    /// The partition linking `item` and `user_id`, if any
    pub fn get_partition(&self, item: &Item, user_id: UserId) -> SplitterResult<Option<Partition>> {
        self.storage.items.get_partition(item.id, user_id)
    }

    /// Stop sharing `item` with `user_id`; a no-op when not shared
    pub fn remove_user(&self, item: &Item, user_id: UserId) -> SplitterResult<()> {
        let removed = self.storage.items.remove_partitions(item.id, user_id)?;
        if removed.is_empty() {
            return Ok(());
        }

        self.storage.items.save()?;
        self.storage
            .log_deletes(EntityType::Partition, &removed, |p| p.id.to_string())?;
        info!(item = %item.id, user = %user_id, "item unshared");
        Ok(())
    }

    /// Users sharing `item`, in the order they were added
    ///
    /// Partitions whose user no longer exists are skipped.
    pub fn users(&self, item: &Item) -> SplitterResult<Vec<User>> {
        let mut users = Vec::new();
        for partition in self.storage.items.get_partitions(item.id)? {
            if let Some(user) = self.storage.users.get(partition.user_id)? {
                users.push(user);
            }
        }
        Ok(users)
    }

    pub fn summarize(&self, item: Item) -> SplitterResult<ItemSummary> {
        let sharers = self.users(&item)?;
        let user_cost = self.user_cost(&item)?;
        Ok(ItemSummary {
            item,
            sharers,
            user_cost,
        })
    }
}
