//! User repository for JSON storage
//!
//! Manages loading and saving users to users.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitterError;
use crate::models::{User, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct UserData {
    pub users: Vec<User>,
}

/// Repository for user persistence
pub struct UserRepository {
    path: PathBuf,
    users: RwLock<HashMap<UserId, User>>,
}

impl UserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Load users from disk
    pub fn load(&self) -> Result<(), SplitterError> {
        let file_data: UserData = read_json(&self.path)?;

        let mut users = write_lock(&self.users)?;
        users.clear();
        for user in file_data.users {
            users.insert(user.id, user);
        }

        Ok(())
    }

    /// Save users to disk, sorted by name
    pub fn save(&self) -> Result<(), SplitterError> {
        let users = read_lock(&self.users)?;

        let mut list: Vec<_> = users.values().cloned().collect();
        list.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        write_json_atomic(&self.path, &UserData { users: list })
    }

    pub fn get(&self, id: UserId) -> Result<Option<User>, SplitterError> {
        Ok(read_lock(&self.users)?.get(&id).cloned())
    }

    /// Get a user by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<User>, SplitterError> {
        let users = read_lock(&self.users)?;
        let name_lower = name.trim().to_lowercase();
        Ok(users
            .values()
            .find(|u| u.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Get a user by its short display id ("usr-1a2b3c4d")
    pub fn get_by_short_id(&self, short: &str) -> Result<Option<User>, SplitterError> {
        let users = read_lock(&self.users)?;
        Ok(users.values().find(|u| u.id.matches_short(short)).cloned())
    }

    /// All users, sorted by name
    pub fn get_all(&self) -> Result<Vec<User>, SplitterError> {
        let users = read_lock(&self.users)?;
        let mut list: Vec<_> = users.values().cloned().collect();
        list.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(list)
    }

    pub fn upsert(&self, user: User) -> Result<(), SplitterError> {
        write_lock(&self.users)?.insert(user.id, user);
        Ok(())
    }

    pub fn delete(&self, id: UserId) -> Result<bool, SplitterError> {
        Ok(write_lock(&self.users)?.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, SplitterError> {
        Ok(read_lock(&self.users)?.len())
    }
}
