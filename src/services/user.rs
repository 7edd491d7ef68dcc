//! User service
//!
//! Creates, edits and removes users. Removing a user also removes every
//! membership and partition that references them.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{SplitterError, SplitterResult};
use crate::models::{User, UserId};
use crate::storage::Storage;

/// Service for user management
pub struct UserService<'a> {
    storage: &'a Storage,
}

impl<'a> UserService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new user with a unique name
    pub fn create_user(&self, name: &str, email: Option<&str>) -> SplitterResult<User> {
        let name = name.trim();

        if self.storage.users.get_by_name(name)?.is_some() {
            return Err(SplitterError::Duplicate {
                entity_type: "User",
                identifier: name.to_string(),
            });
        }

        let mut user = User::new(name);
        user.email = email.map(|e| e.trim().to_string());
        user.validate()
            .map_err(|e| SplitterError::Validation(e.to_string()))?;

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;
        self.storage.log_create(
            EntityType::User,
            user.id.to_string(),
            Some(user.name.clone()),
            &user,
        )?;

        info!(user = %user.id, name = %user.name, "user created");
        Ok(user)
    }

    pub fn get_user(&self, id: UserId) -> SplitterResult<Option<User>> {
        self.storage.users.get(id)
    }

    /// Find a user by name, short ID, or full UUID
    pub fn find_user(&self, identifier: &str) -> SplitterResult<Option<User>> {
        if let Some(user) = self.storage.users.get_by_name(identifier)? {
            return Ok(Some(user));
        }

        if let Some(user) = self.storage.users.get_by_short_id(identifier)? {
            return Ok(Some(user));
        }

        if let Ok(id) = identifier.parse::<UserId>() {
            return self.storage.users.get(id);
        }

        Ok(None)
    }

    /// Like `find_user`, but a missing user is an error
    pub fn require_user(&self, identifier: &str) -> SplitterResult<User> {
        self.find_user(identifier)?
            .ok_or_else(|| SplitterError::user_not_found(identifier))
    }

    pub fn list_users(&self) -> SplitterResult<Vec<User>> {
        self.storage.users.get_all()
    }

    /// Rename a user and/or change their email
    pub fn update_user(
        &self,
        id: UserId,
        name: Option<&str>,
        email: Option<&str>,
    ) -> SplitterResult<User> {
        let mut user = self
            .storage
            .users
            .get(id)?
            .ok_or_else(|| SplitterError::user_not_found(id.to_string()))?;
        let before = user.clone();

        if let Some(new_name) = name {
            let new_name = new_name.trim();
            if let Some(existing) = self.storage.users.get_by_name(new_name)? {
                if existing.id != id {
                    return Err(SplitterError::Duplicate {
                        entity_type: "User",
                        identifier: new_name.to_string(),
                    });
                }
            }
            user.name = new_name.to_string();
        }

        if let Some(new_email) = email {
            let new_email = new_email.trim();
            user.email = if new_email.is_empty() {
                None
            } else {
                Some(new_email.to_string())
            };
        }

        user.validate()
            .map_err(|e| SplitterError::Validation(e.to_string()))?;
        user.updated_at = chrono::Utc::now();

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        let summary = (before.name != user.name)
            .then(|| format!("name: {} -> {}", before.name, user.name));
        self.storage.log_update(
            EntityType::User,
            user.id.to_string(),
            Some(user.name.clone()),
            &before,
            &user,
            summary,
        )?;

        Ok(user)
    }

    /// Delete a user along with their memberships and partitions
    pub fn delete_user(&self, id: UserId) -> SplitterResult<()> {
        let user = self
            .storage
            .users
            .get(id)?
            .ok_or_else(|| SplitterError::user_not_found(id.to_string()))?;

        let memberships = self.storage.groups.remove_user_memberships(id)?;
        let partitions = self.storage.items.remove_user_partitions(id)?;
        self.storage.users.delete(id)?;
        self.storage.save_all()?;

        self.storage
            .log_deletes(EntityType::Membership, &memberships, |m| m.id.to_string())?;
        self.storage
            .log_deletes(EntityType::Partition, &partitions, |p| p.id.to_string())?;
        self.storage.log_delete(
            EntityType::User,
            user.id.to_string(),
            Some(user.name.clone()),
            &user,
        )?;

        info!(
            user = %user.id,
            memberships = memberships.len(),
            partitions = partitions.len(),
            "user deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::create_test_storage;

    #[test]
    fn test_create_user() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::new(&storage);

        let user = service.create_user("  alice ", Some("alice@example.com")).unwrap();
        assert_eq!(user.name, "alice");
        assert_eq!(user.email.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::new(&storage);

        service.create_user("alice", None).unwrap();
        let result = service.create_user("ALICE", None);
        assert!(matches!(result, Err(SplitterError::Duplicate { .. })));
    }

    #[test]
    fn test_empty_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let result = UserService::new(&storage).create_user("   ", None);
        assert!(matches!(result, Err(SplitterError::Validation(_))));
    }

    #[test]
    fn test_find_user_by_name_or_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::new(&storage);
        let user = service.create_user("bob", None).unwrap();

        assert_eq!(service.find_user("Bob").unwrap().unwrap().id, user.id);
        assert_eq!(
            service.find_user(&user.id.to_string()).unwrap().unwrap().id,
            user.id
        );
        assert_eq!(
            service.find_user(&user.id.as_uuid().to_string()).unwrap().unwrap().id,
            user.id
        );
        assert!(service.require_user("nobody").unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_user() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::new(&storage);
        let user = service.create_user("bob", Some("bob@example.com")).unwrap();
        service.create_user("carol", None).unwrap();

        let updated = service.update_user(user.id, Some("robert"), Some("")).unwrap();
        assert_eq!(updated.name, "robert");
        assert!(updated.email.is_none());

        let clash = service.update_user(user.id, Some("Carol"), None);
        assert!(matches!(clash, Err(SplitterError::Duplicate { .. })));
    }
}
