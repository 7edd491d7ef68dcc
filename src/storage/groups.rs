//! Group and Membership repository for JSON storage
//!
//! Manages loading and saving groups and their memberships to groups.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitterError;
use crate::models::{Group, GroupId, Membership, MembershipId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::{drain_where, read_lock, write_lock};

/// Serializable group data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct GroupData {
    pub groups: Vec<Group>,
    #[serde(default)]
    pub memberships: Vec<Membership>,
}

/// Repository for group and membership persistence
pub struct GroupRepository {
    path: PathBuf,
    groups: RwLock<HashMap<GroupId, Group>>,
    memberships: RwLock<HashMap<MembershipId, Membership>>,
}

impl GroupRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            groups: RwLock::new(HashMap::new()),
            memberships: RwLock::new(HashMap::new()),
        }
    }

    /// Load groups and memberships from disk
    pub fn load(&self) -> Result<(), SplitterError> {
        let file_data: GroupData = read_json(&self.path)?;

        let mut groups = write_lock(&self.groups)?;
        let mut memberships = write_lock(&self.memberships)?;
        groups.clear();
        memberships.clear();

        for group in file_data.groups {
            groups.insert(group.id, group);
        }
        for membership in file_data.memberships {
            memberships.insert(membership.id, membership);
        }

        Ok(())
    }

    /// Save groups and memberships to disk
    pub fn save(&self) -> Result<(), SplitterError> {
        let groups = read_lock(&self.groups)?;
        let memberships = read_lock(&self.memberships)?;

        let mut group_list: Vec<_> = groups.values().cloned().collect();
        group_list.sort_by(|a, b| a.name.cmp(&b.name));

        let mut membership_list: Vec<_> = memberships.values().cloned().collect();
        membership_list.sort_by_key(|m| (m.group_id, m.created_at));

        write_json_atomic(
            &self.path,
            &GroupData {
                groups: group_list,
                memberships: membership_list,
            },
        )
    }

    // Group operations

    pub fn get_group(&self, id: GroupId) -> Result<Option<Group>, SplitterError> {
        Ok(read_lock(&self.groups)?.get(&id).cloned())
    }

    /// Get a group by name (case-insensitive)
    pub fn get_group_by_name(&self, name: &str) -> Result<Option<Group>, SplitterError> {
        let groups = read_lock(&self.groups)?;
        let name_lower = name.trim().to_lowercase();
        Ok(groups
            .values()
            .find(|g| g.name.to_lowercase() == name_lower)
            .cloned())
    }

    pub fn get_group_by_short_id(&self, short: &str) -> Result<Option<Group>, SplitterError> {
        let groups = read_lock(&self.groups)?;
        Ok(groups.values().find(|g| g.id.matches_short(short)).cloned())
    }

    /// All groups, sorted by name
    pub fn get_all_groups(&self) -> Result<Vec<Group>, SplitterError> {
        let groups = read_lock(&self.groups)?;
        let mut list: Vec<_> = groups.values().cloned().collect();
        list.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(list)
    }

    pub fn upsert_group(&self, group: Group) -> Result<(), SplitterError> {
        write_lock(&self.groups)?.insert(group.id, group);
        Ok(())
    }

    /// Delete a group together with its memberships
    ///
    /// Returns the removed memberships so callers can audit them.
    pub fn delete_group(&self, id: GroupId) -> Result<Vec<Membership>, SplitterError> {
        let mut groups = write_lock(&self.groups)?;
        let mut memberships = write_lock(&self.memberships)?;

        let removed = drain_where(&mut memberships, |m| m.group_id == id);
        groups.remove(&id);
        Ok(removed)
    }

    pub fn group_count(&self) -> Result<usize, SplitterError> {
        Ok(read_lock(&self.groups)?.len())
    }

    // Membership operations

    pub fn is_member(&self, group_id: GroupId, user_id: UserId) -> Result<bool, SplitterError> {
        let memberships = read_lock(&self.memberships)?;
        Ok(memberships
            .values()
            .any(|m| m.group_id == group_id && m.user_id == user_id))
    }

    /// Find or create the membership for (group, user)
    ///
    /// The lookup and insert happen under one write lock. The flag is true
    /// when a new membership was created.
    pub fn find_or_create_membership(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<(Membership, bool), SplitterError> {
        let mut memberships = write_lock(&self.memberships)?;

        if let Some(existing) = memberships
            .values()
            .find(|m| m.group_id == group_id && m.user_id == user_id)
        {
            return Ok((existing.clone(), false));
        }

        let membership = Membership::new(group_id, user_id);
        memberships.insert(membership.id, membership.clone());
        Ok((membership, true))
    }

    /// Remove the membership for (group, user), if any
    pub fn remove_membership(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<Vec<Membership>, SplitterError> {
        let mut memberships = write_lock(&self.memberships)?;
        Ok(drain_where(&mut memberships, |m| {
            m.group_id == group_id && m.user_id == user_id
        }))
    }

    /// Remove every membership held by `user_id`
    pub fn remove_user_memberships(&self, user_id: UserId) -> Result<Vec<Membership>, SplitterError> {
        let mut memberships = write_lock(&self.memberships)?;
        Ok(drain_where(&mut memberships, |m| m.user_id == user_id))
    }

    /// Memberships of a group, oldest first
    pub fn get_memberships(&self, group_id: GroupId) -> Result<Vec<Membership>, SplitterError> {
        let memberships = read_lock(&self.memberships)?;
        let mut list: Vec<_> = memberships
            .values()
            .filter(|m| m.group_id == group_id)
            .cloned()
            .collect();
        list.sort_by_key(|m| m.created_at);
        Ok(list)
    }

    /// Groups the user belongs to
    pub fn get_groups_for_user(&self, user_id: UserId) -> Result<Vec<GroupId>, SplitterError> {
        let memberships = read_lock(&self.memberships)?;
        Ok(memberships
            .values()
            .filter(|m| m.user_id == user_id)
            .map(|m| m.group_id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, GroupRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = GroupRepository::new(temp_dir.path().join("groups.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.group_count().unwrap(), 0);
    }

    #[test]
    fn test_membership_is_idempotent() {
        let (_temp_dir, repo) = create_test_repo();
        let group = Group::new("Roommates");
        let user = UserId::new();
        repo.upsert_group(group.clone()).unwrap();

        let (first, created) = repo.find_or_create_membership(group.id, user).unwrap();
        assert!(created);
        let (second, created) = repo.find_or_create_membership(group.id, user).unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
        assert_eq!(repo.get_memberships(group.id).unwrap().len(), 1);
        assert!(repo.is_member(group.id, user).unwrap());
    }

    #[test]
    fn test_remove_membership_absent_is_empty() {
        let (_temp_dir, repo) = create_test_repo();
        let removed = repo.remove_membership(GroupId::new(), UserId::new()).unwrap();
        assert!(removed.is_empty());
    }

    #[test]
    fn test_delete_group_cascades_memberships() {
        let (_temp_dir, repo) = create_test_repo();
        let keep = Group::new("Keep");
        let drop = Group::new("Drop");
        let user = UserId::new();
        repo.upsert_group(keep.clone()).unwrap();
        repo.upsert_group(drop.clone()).unwrap();
        repo.find_or_create_membership(keep.id, user).unwrap();
        repo.find_or_create_membership(drop.id, user).unwrap();

        let removed = repo.delete_group(drop.id).unwrap();
        assert_eq!(removed.len(), 1);
        assert!(repo.get_group(drop.id).unwrap().is_none());
        assert!(repo.is_member(keep.id, user).unwrap());
        assert_eq!(repo.get_groups_for_user(user).unwrap(), vec![keep.id]);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let group = Group::new("Ski Trip");
        let user = UserId::new();
        repo.upsert_group(group.clone()).unwrap();
        repo.find_or_create_membership(group.id, user).unwrap();
        repo.save().unwrap();

        let repo2 = GroupRepository::new(temp_dir.path().join("groups.json"));
        repo2.load().unwrap();
        assert!(repo2.get_group_by_name("ski trip").unwrap().is_some());
        assert!(repo2.is_member(group.id, user).unwrap());
    }
}
