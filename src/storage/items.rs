//! Item and Partition repository for JSON storage
//!
//! Manages loading and saving items and the partitions that share them to
//! items.json. Deleting an item always takes its partitions with it.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitterError;
use crate::models::{normalize_name, GroupId, Item, ItemId, Partition, PartitionId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::{drain_where, read_lock, write_lock};

/// Serializable item data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ItemData {
    pub items: Vec<Item>,
    #[serde(default)]
    pub partitions: Vec<Partition>,
}

/// Repository for item and partition persistence
pub struct ItemRepository {
    path: PathBuf,
    items: RwLock<HashMap<ItemId, Item>>,
    partitions: RwLock<HashMap<PartitionId, Partition>>,
}

impl ItemRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            items: RwLock::new(HashMap::new()),
            partitions: RwLock::new(HashMap::new()),
        }
    }

    /// Load items and partitions from disk
    pub fn load(&self) -> Result<(), SplitterError> {
        let file_data: ItemData = read_json(&self.path)?;

        let mut items = write_lock(&self.items)?;
        let mut partitions = write_lock(&self.partitions)?;
        items.clear();
        partitions.clear();

        for mut item in file_data.items {
            let normalized = normalize_name(&item.name);
            if normalized != item.name {
                tracing::debug!(
                    item = %item.id,
                    from = %item.name,
                    to = %normalized,
                    "renormalized item name"
                );
                item.name = normalized;
            }
            item.validate().map_err(|e| {
                SplitterError::Storage(format!("Invalid item {} in {}: {}", item.id, self.path.display(), e))
            })?;
            items.insert(item.id, item);
        }
        for partition in file_data.partitions {
            partitions.insert(partition.id, partition);
        }

        Ok(())
    }

    /// Save items and partitions to disk
    pub fn save(&self) -> Result<(), SplitterError> {
        let items = read_lock(&self.items)?;
        let partitions = read_lock(&self.partitions)?;

        let mut item_list: Vec<_> = items.values().cloned().collect();
        item_list.sort_by(|a, b| (a.group_id(), &a.name).cmp(&(b.group_id(), &b.name)));

        let mut partition_list: Vec<_> = partitions.values().cloned().collect();
        partition_list.sort_by_key(|p| (p.item_id, p.created_at));

        write_json_atomic(
            &self.path,
            &ItemData {
                items: item_list,
                partitions: partition_list,
            },
        )
    }

    // Item operations

    pub fn get_item(&self, id: ItemId) -> Result<Option<Item>, SplitterError> {
        Ok(read_lock(&self.items)?.get(&id).cloned())
    }

    /// Items in a group, ordered by name
    pub fn get_items_in_group(&self, group_id: GroupId) -> Result<Vec<Item>, SplitterError> {
        let items = read_lock(&self.items)?;
        let mut list: Vec<_> = items
            .values()
            .filter(|i| i.group_id() == group_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    /// Find an item in a group by name (case-insensitive) or short id
    ///
    /// Names are not unique within a group; the oldest match wins.
    pub fn find_in_group(
        &self,
        group_id: GroupId,
        identifier: &str,
    ) -> Result<Option<Item>, SplitterError> {
        let items = read_lock(&self.items)?;
        let wanted = normalize_name(identifier).to_lowercase();
        Ok(items
            .values()
            .filter(|i| i.group_id() == group_id)
            .filter(|i| i.name.to_lowercase() == wanted || i.id.matches_short(identifier))
            .min_by_key(|i| (i.created_at, i.id))
            .cloned())
    }

    pub fn upsert_item(&self, item: Item) -> Result<(), SplitterError> {
        write_lock(&self.items)?.insert(item.id, item);
        Ok(())
    }

    /// Delete an item and its partitions
    ///
    /// Returns the removed item (if it existed) and the removed partitions.
    pub fn delete_item(&self, id: ItemId) -> Result<(Option<Item>, Vec<Partition>), SplitterError> {
        let mut items = write_lock(&self.items)?;
        let mut partitions = write_lock(&self.partitions)?;

        let removed = drain_where(&mut partitions, |p| p.item_id == id);
        Ok((items.remove(&id), removed))
    }

    pub fn item_count(&self) -> Result<usize, SplitterError> {
        Ok(read_lock(&self.items)?.len())
    }

    // Partition operations

    pub fn get_partition(
        &self,
        item_id: ItemId,
        user_id: UserId,
    ) -> Result<Option<Partition>, SplitterError> {
        let partitions = read_lock(&self.partitions)?;
        Ok(partitions
            .values()
            .find(|p| p.links(item_id, user_id))
            .cloned())
    }

    /// Find or create the partition for (item, user)
    ///
    /// The lookup and insert happen under one write lock, so concurrent
    /// callers in this process never create duplicates. The flag is true
    /// when a new partition was created.
    pub fn find_or_create_partition(
        &self,
        item_id: ItemId,
        user_id: UserId,
    ) -> Result<(Partition, bool), SplitterError> {
        let mut partitions = write_lock(&self.partitions)?;

        if let Some(existing) = partitions.values().find(|p| p.links(item_id, user_id)) {
            return Ok((existing.clone(), false));
        }

        let partition = Partition::new(item_id, user_id);
        partitions.insert(partition.id, partition.clone());
        Ok((partition, true))
    }

    /// Remove all partitions matching (item, user); empty when none existed
    pub fn remove_partitions(
        &self,
        item_id: ItemId,
        user_id: UserId,
    ) -> Result<Vec<Partition>, SplitterError> {
        let mut partitions = write_lock(&self.partitions)?;
        Ok(drain_where(&mut partitions, |p| p.links(item_id, user_id)))
    }

    /// Remove every partition held by `user_id`
    pub fn remove_user_partitions(&self, user_id: UserId) -> Result<Vec<Partition>, SplitterError> {
        let mut partitions = write_lock(&self.partitions)?;
        Ok(drain_where(&mut partitions, |p| p.user_id == user_id))
    }

    /// Partitions of an item, oldest first
    pub fn get_partitions(&self, item_id: ItemId) -> Result<Vec<Partition>, SplitterError> {
        let partitions = read_lock(&self.partitions)?;
        let mut list: Vec<_> = partitions
            .values()
            .filter(|p| p.item_id == item_id)
            .cloned()
            .collect();
        list.sort_by_key(|p| p.created_at);
        Ok(list)
    }

    pub fn count_partitions(&self, item_id: ItemId) -> Result<usize, SplitterError> {
        let partitions = read_lock(&self.partitions)?;
        Ok(partitions.values().filter(|p| p.item_id == item_id).count())
    }
}
