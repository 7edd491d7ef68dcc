//! Partition model
//!
//! A partition records that one user shares one item. It carries no other
//! data; its existence is the whole fact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ItemId, PartitionId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    pub id: PartitionId,
    pub item_id: ItemId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Partition {
    pub fn new(item_id: ItemId, user_id: UserId) -> Self {
        Self {
            id: PartitionId::new(),
            item_id,
            user_id,
            created_at: Utc::now(),
        }
    }

    /// Whether this partition links `item_id` and `user_id`
    pub fn links(&self, item_id: ItemId, user_id: UserId) -> bool {
        self.item_id == item_id && self.user_id == user_id
    }
}
