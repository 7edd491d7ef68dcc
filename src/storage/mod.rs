//! Storage layer for the bill splitter
//!
//! Provides JSON file repositories with atomic writes, in-memory indexes
//! behind `RwLock`s, and an audit trail of every mutation.

pub mod file_io;
pub mod groups;
pub mod items;
pub mod users;

pub use file_io::{read_json, write_json_atomic};
pub use groups::GroupRepository;
pub use items::ItemRepository;
pub use users::UserRepository;

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::SplitterPaths;
use crate::error::SplitterError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: SplitterPaths,
    audit: AuditLogger,
    pub users: UserRepository,
    pub groups: GroupRepository,
    pub items: ItemRepository,
}

impl Storage {
    /// Create a new Storage instance, creating the data directories
    pub fn new(paths: SplitterPaths) -> Result<Self, SplitterError> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            users: UserRepository::new(paths.users_file()),
            groups: GroupRepository::new(paths.groups_file()),
            items: ItemRepository::new(paths.items_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &SplitterPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), SplitterError> {
        self.users.load()?;
        self.groups.load()?;
        self.items.load()?;
        tracing::debug!(
            users = self.users.count()?,
            groups = self.groups.group_count()?,
            items = self.items.item_count()?,
            "storage loaded"
        );
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), SplitterError> {
        self.users.save()?;
        self.groups.save()?;
        self.items.save()?;
        Ok(())
    }

    // Audit helpers

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), SplitterError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Result<(), SplitterError> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), SplitterError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Log a batch of deletes (cascades) with a single flush
    pub fn log_deletes<T: Serialize>(
        &self,
        entity_type: EntityType,
        entities: &[T],
        id_of: impl Fn(&T) -> String,
    ) -> Result<(), SplitterError> {
        let entries: Vec<_> = entities
            .iter()
            .map(|e| AuditEntry::delete(entity_type, id_of(e), None, e))
            .collect();
        self.audit.log_batch(&entries)
    }
}

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, SplitterError> {
    lock.read()
        .map_err(|e| SplitterError::Storage(format!("Failed to acquire read lock: {}", e)))
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, SplitterError> {
    lock.write()
        .map_err(|e| SplitterError::Storage(format!("Failed to acquire write lock: {}", e)))
}

/// Remove and return every value matching `pred`
pub(crate) fn drain_where<K, V, F>(map: &mut HashMap<K, V>, pred: F) -> Vec<V>
where
    K: Hash + Eq + Copy,
    F: Fn(&V) -> bool,
{
    let keys: Vec<K> = map
        .iter()
        .filter(|(_, v)| pred(v))
        .map(|(k, _)| *k)
        .collect();
    keys.into_iter().filter_map(|k| map.remove(&k)).collect()
}
