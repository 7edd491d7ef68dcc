//! Group service
//!
//! Group CRUD, membership management, and per-member balances computed
//! from the items each member shares.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{SplitterError, SplitterResult};
use crate::models::{Group, GroupId, Membership, Money, User, UserId};
use crate::storage::Storage;

use super::item::{ItemService, ItemSummary};

/// Service for groups and their members
pub struct GroupService<'a> {
    storage: &'a Storage,
}

/// What one member owes within a group
#[derive(Debug, Clone)]
pub struct MemberBalance {
    pub user: User,
    /// Number of the group's items this member shares
    pub shared_items: usize,
    /// Sum of this member's portions
    pub total: f64,
}

/// A group with its members and item summaries
#[derive(Debug, Clone)]
pub struct GroupOverview {
    pub group: Group,
    pub members: Vec<User>,
    pub items: Vec<ItemSummary>,
}

impl GroupOverview {
    /// Sum of all item costs in the group
    pub fn total_cost(&self) -> Money {
        self.items.iter().map(|s| s.item.cost).sum()
    }
}

impl<'a> GroupService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    // === Group Operations ===

    /// Create a group, optionally adding initial members
    pub fn create_group(&self, name: &str, members: &[UserId]) -> SplitterResult<Group> {
        let name = name.trim();

        if self.storage.groups.get_group_by_name(name)?.is_some() {
            return Err(SplitterError::Duplicate {
                entity_type: "Group",
                identifier: name.to_string(),
            });
        }

        for user_id in members {
            if self.storage.users.get(*user_id)?.is_none() {
                return Err(SplitterError::user_not_found(user_id.to_string()));
            }
        }

        let group = Group::new(name);
        group
            .validate()
            .map_err(|e| SplitterError::Validation(e.to_string()))?;

        self.storage.groups.upsert_group(group.clone())?;
        self.storage.groups.save()?;
        self.storage.log_create(
            EntityType::Group,
            group.id.to_string(),
            Some(group.name.clone()),
            &group,
        )?;
        info!(group = %group.id, name = %group.name, "group created");

        for user_id in members {
            self.add_member(group.id, *user_id)?;
        }

        Ok(group)
    }

    pub fn get_group(&self, id: GroupId) -> SplitterResult<Option<Group>> {
        self.storage.groups.get_group(id)
    }

    /// Find a group by name, short ID, or full UUID
    pub fn find_group(&self, identifier: &str) -> SplitterResult<Option<Group>> {
        if let Some(group) = self.storage.groups.get_group_by_name(identifier)? {
            return Ok(Some(group));
        }

        if let Some(group) = self.storage.groups.get_group_by_short_id(identifier)? {
            return Ok(Some(group));
        }

        if let Ok(id) = identifier.parse::<GroupId>() {
            return self.storage.groups.get_group(id);
        }

        Ok(None)
    }

    /// Like `find_group`, but a missing group is an error
    pub fn require_group(&self, identifier: &str) -> SplitterResult<Group> {
        self.find_group(identifier)?
            .ok_or_else(|| SplitterError::group_not_found(identifier))
    }

    pub fn list_groups(&self) -> SplitterResult<Vec<Group>> {
        self.storage.groups.get_all_groups()
    }

    /// Rename a group
    pub fn update_group(&self, id: GroupId, name: &str) -> SplitterResult<Group> {
        let mut group = self
            .storage
            .groups
            .get_group(id)?
            .ok_or_else(|| SplitterError::group_not_found(id.to_string()))?;
        let before = group.clone();
        let name = name.trim();

        if let Some(existing) = self.storage.groups.get_group_by_name(name)? {
            if existing.id != id {
                return Err(SplitterError::Duplicate {
                    entity_type: "Group",
                    identifier: name.to_string(),
                });
            }
        }

        group.name = name.to_string();
        group
            .validate()
            .map_err(|e| SplitterError::Validation(e.to_string()))?;
        group.updated_at = chrono::Utc::now();

        self.storage.groups.upsert_group(group.clone())?;
        self.storage.groups.save()?;
        self.storage.log_update(
            EntityType::Group,
            group.id.to_string(),
            Some(group.name.clone()),
            &before,
            &group,
            Some(format!("name: {} -> {}", before.name, group.name)),
        )?;

        Ok(group)
    }

    /// Delete a group with its items, their partitions, and its memberships
    pub fn delete_group(&self, id: GroupId) -> SplitterResult<()> {
        let group = self
            .storage
            .groups
            .get_group(id)?
            .ok_or_else(|| SplitterError::group_not_found(id.to_string()))?;

        let mut items = Vec::new();
        let mut partitions = Vec::new();
        for item in self.storage.items.get_items_in_group(id)? {
            let (removed, item_partitions) = self.storage.items.delete_item(item.id)?;
            items.extend(removed);
            partitions.extend(item_partitions);
        }
        let memberships = self.storage.groups.delete_group(id)?;
        self.storage.save_all()?;

        self.storage
            .log_deletes(EntityType::Partition, &partitions, |p| p.id.to_string())?;
        self.storage
            .log_deletes(EntityType::Item, &items, |i| i.id.to_string())?;
        self.storage
            .log_deletes(EntityType::Membership, &memberships, |m| m.id.to_string())?;
        self.storage.log_delete(
            EntityType::Group,
            group.id.to_string(),
            Some(group.name.clone()),
            &group,
        )?;

        info!(
            group = %group.id,
            items = items.len(),
            memberships = memberships.len(),
            "group deleted"
        );
        Ok(())
    }

    // === Membership Operations ===

    /// Whether `user_id` belongs to the group
    pub fn include_user(&self, group_id: GroupId, user_id: UserId) -> SplitterResult<bool> {
        self.storage.groups.is_member(group_id, user_id)
    }

    /// Add a user to a group; returns the existing membership if present
    pub fn add_member(&self, group_id: GroupId, user_id: UserId) -> SplitterResult<Membership> {
        if self.storage.groups.get_group(group_id)?.is_none() {
            return Err(SplitterError::group_not_found(group_id.to_string()));
        }
        let user = self
            .storage
            .users
            .get(user_id)?
            .ok_or_else(|| SplitterError::user_not_found(user_id.to_string()))?;

        let (membership, created) = self
            .storage
            .groups
            .find_or_create_membership(group_id, user_id)?;

        if created {
            self.storage.groups.save()?;
            self.storage.log_create(
                EntityType::Membership,
                membership.id.to_string(),
                Some(user.name.clone()),
                &membership,
            )?;
            info!(group = %group_id, user = %user_id, "member added");
        }

        Ok(membership)
    }

    /// Remove a user from a group; a no-op when they are not a member
    ///
    /// Partitions the user already holds on the group's items are kept.
    pub fn remove_member(&self, group_id: GroupId, user_id: UserId) -> SplitterResult<()> {
        let removed = self.storage.groups.remove_membership(group_id, user_id)?;
        if removed.is_empty() {
            return Ok(());
        }

        self.storage.groups.save()?;
        self.storage
            .log_deletes(EntityType::Membership, &removed, |m| m.id.to_string())?;
        info!(group = %group_id, user = %user_id, "member removed");
        Ok(())
    }

    /// Members of a group, in the order they joined
    pub fn list_members(&self, group_id: GroupId) -> SplitterResult<Vec<User>> {
        let mut members = Vec::new();
        for membership in self.storage.groups.get_memberships(group_id)? {
            if let Some(user) = self.storage.users.get(membership.user_id)? {
                members.push(user);
            }
        }
        Ok(members)
    }

    /// Groups `user_id` belongs to, ordered by name
    pub fn groups_for_user(&self, user_id: UserId) -> SplitterResult<Vec<Group>> {
        let mut groups = Vec::new();
        for group_id in self.storage.groups.get_groups_for_user(user_id)? {
            if let Some(group) = self.storage.groups.get_group(group_id)? {
                groups.push(group);
            }
        }
        groups.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(groups)
    }

    /// The member with `user_id`, or `None` if they are not in the group
    pub fn get_member(&self, group_id: GroupId, user_id: UserId) -> SplitterResult<Option<User>> {
        if !self.include_user(group_id, user_id)? {
            return Ok(None);
        }
        self.storage.users.get(user_id)
    }

    // === Balances ===

    /// Sum of `user_id`'s portions over the group's items
    pub fn user_total(&self, group_id: GroupId, user_id: UserId) -> SplitterResult<f64> {
        Ok(self.member_share(group_id, user_id)?.1)
    }

    /// One balance per current member, in join order
    pub fn balances(&self, group_id: GroupId) -> SplitterResult<Vec<MemberBalance>> {
        let mut balances = Vec::new();
        for user in self.list_members(group_id)? {
            let (shared_items, total) = self.member_share(group_id, user.id)?;
            balances.push(MemberBalance {
                user,
                shared_items,
                total,
            });
        }
        Ok(balances)
    }

    /// Group, members and item summaries in one read
    pub fn overview(&self, group_id: GroupId) -> SplitterResult<GroupOverview> {
        let group = self
            .storage
            .groups
            .get_group(group_id)?
            .ok_or_else(|| SplitterError::group_not_found(group_id.to_string()))?;

        let item_service = ItemService::new(self.storage);
        let items = self
            .storage
            .items
            .get_items_in_group(group_id)?
            .into_iter()
            .map(|item| item_service.summarize(item))
            .collect::<SplitterResult<Vec<_>>>()?;

        Ok(GroupOverview {
            group,
            members: self.list_members(group_id)?,
            items,
        })
    }

    fn member_share(&self, group_id: GroupId, user_id: UserId) -> SplitterResult<(usize, f64)> {
        let item_service = ItemService::new(self.storage);
        let mut shared = 0;
        let mut total = 0.0;
        for item in self.storage.items.get_items_in_group(group_id)? {
            if item_service.include_user(&item, user_id)? {
                shared += 1;
                total += item_service.user_cost(&item)?;
            }
        }
        Ok((shared, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{create_test_storage, seed_group};
    use crate::services::UserService;

    #[test]
    fn test_create_group_with_members() {
        let (_temp_dir, storage) = create_test_storage();
        let (group, users) = seed_group(&storage, "Roommates", &["alice", "bob"]);
        let service = GroupService::new(&storage);

        let members = service.list_members(group.id).unwrap();
        assert_eq!(members.len(), 2);
        assert!(service.include_user(group.id, users[0].id).unwrap());
        assert!(service.include_user(group.id, users[1].id).unwrap());
    }

    #[test]
    fn test_create_group_rejects_duplicate_and_blank() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GroupService::new(&storage);
        service.create_group("Trip", &[]).unwrap();

        assert!(matches!(
            service.create_group("trip", &[]),
            Err(SplitterError::Duplicate { .. })
        ));
        assert!(matches!(
            service.create_group("  ", &[]),
            Err(SplitterError::Validation(_))
        ));
    }

    #[test]
    fn test_create_group_with_unknown_member_writes_nothing() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GroupService::new(&storage);

        let result = service.create_group("Trip", &[UserId::new()]);
        assert!(result.unwrap_err().is_not_found());
        assert_eq!(storage.groups.group_count().unwrap(), 0);
    }

    #[test]
    fn test_add_member_is_idempotent() {
        let (_temp_dir, storage) = create_test_storage();
        let (group, users) = seed_group(&storage, "Trip", &["alice"]);
        let service = GroupService::new(&storage);

        let first = service.add_member(group.id, users[0].id).unwrap();
        let second = service.add_member(group.id, users[0].id).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(service.list_members(group.id).unwrap().len(), 1);
    }

    #[test]
    fn test_remove_member() {
        let (_temp_dir, storage) = create_test_storage();
        let (group, users) = seed_group(&storage, "Trip", &["alice", "bob"]);
        let service = GroupService::new(&storage);

        service.remove_member(group.id, users[0].id).unwrap();
        assert!(!service.include_user(group.id, users[0].id).unwrap());
        assert!(service.get_member(group.id, users[0].id).unwrap().is_none());

        // removing again is fine
        service.remove_member(group.id, users[0].id).unwrap();
        assert_eq!(service.list_members(group.id).unwrap().len(), 1);
    }

    #[test]
    fn test_groups_for_user() {
        let (_temp_dir, storage) = create_test_storage();
        let (trip, users) = seed_group(&storage, "Trip", &["alice"]);
        let service = GroupService::new(&storage);
        let home = service.create_group("Home", &[users[0].id]).unwrap();
        service.create_group("Office", &[]).unwrap();

        let groups = service.groups_for_user(users[0].id).unwrap();
        let ids: Vec<_> = groups.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![home.id, trip.id]);
    }

    #[test]
    fn test_find_group() {
        let (_temp_dir, storage) = create_test_storage();
        let (group, _) = seed_group(&storage, "Ski Trip", &[]);
        let service = GroupService::new(&storage);

        assert_eq!(service.find_group("ski trip").unwrap().unwrap().id, group.id);
        assert_eq!(
            service.find_group(&group.id.to_string()).unwrap().unwrap().id,
            group.id
        );
        assert!(service.require_group("Beach").unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_group() {
        let (_temp_dir, storage) = create_test_storage();
        let (group, _) = seed_group(&storage, "Trip", &[]);
        let service = GroupService::new(&storage);

        let renamed = service.update_group(group.id, "Road Trip").unwrap();
        assert_eq!(renamed.name, "Road Trip");
        assert!(service.update_group(group.id, "").is_err());
    }

    #[test]
    fn test_balances() {
        let (_temp_dir, storage) = create_test_storage();
        let (group, users) = seed_group(&storage, "Roommates", &["a", "b", "c"]);
        let items = ItemService::new(&storage);

        let pizza = items.create_item(group.id, "pizza", "12.00").unwrap();
        items.add_user(&pizza, users[0].id).unwrap();
        items.add_user(&pizza, users[1].id).unwrap();

        let rent = items.create_item(group.id, "rent", "900").unwrap();
        for user in &users {
            items.add_user(&rent, user.id).unwrap();
        }

        let balances = GroupService::new(&storage).balances(group.id).unwrap();
        assert_eq!(balances.len(), 3);
        assert_eq!(balances[0].shared_items, 2);
        assert_eq!(balances[0].total, 6.0 + 900.0 * (1.0 / 3.0));
        assert_eq!(balances[2].shared_items, 1);
        assert_eq!(balances[2].total, 900.0 * (1.0 / 3.0));

        let service = GroupService::new(&storage);
        assert_eq!(service.user_total(group.id, users[1].id).unwrap(), balances[1].total);
    }

    #[test]
    fn test_overview() {
        let (_temp_dir, storage) = create_test_storage();
        let (group, users) = seed_group(&storage, "Trip", &["a"]);
        let items = ItemService::new(&storage);
        let gas = items.create_item(group.id, "gas", "40").unwrap();
        items.create_item(group.id, "snacks", "2.50").unwrap();
        items.add_user(&gas, users[0].id).unwrap();

        let overview = GroupService::new(&storage).overview(group.id).unwrap();
        assert_eq!(overview.members.len(), 1);
        assert_eq!(overview.items.len(), 2);
        assert_eq!(overview.items[0].item.name, "Gas");
        assert_eq!(overview.total_cost(), Money::from_cents(4250));
    }

    #[test]
    fn test_overview_total_with_largest_cost() {
        let (_temp_dir, storage) = create_test_storage();
        let (group, _) = seed_group(&storage, "Trip", &[]);
        let items = ItemService::new(&storage);
        items.create_item(group.id, "yacht", "92233720368547758.07").unwrap();
        items.create_item(group.id, "gum", "1").unwrap();

        let overview = GroupService::new(&storage).overview(group.id).unwrap();
        assert_eq!(overview.total_cost(), Money::from_cents(i64::MAX));
        assert!(!overview.total_cost().is_negative());
    }

    #[test]
    fn test_delete_group_cascades() {
        let (_temp_dir, storage) = create_test_storage();
        let (group, users) = seed_group(&storage, "Trip", &["a", "b"]);
        let items = ItemService::new(&storage);
        let gas = items.create_item(group.id, "gas", "40").unwrap();
        items.add_user(&gas, users[0].id).unwrap();

        GroupService::new(&storage).delete_group(group.id).unwrap();

        assert_eq!(storage.groups.group_count().unwrap(), 0);
        assert_eq!(storage.items.item_count().unwrap(), 0);
        assert_eq!(storage.items.count_partitions(gas.id).unwrap(), 0);
        assert!(storage.groups.get_memberships(group.id).unwrap().is_empty());
        assert_eq!(storage.users.count().unwrap(), 2);
    }

    #[test]
    fn test_delete_user_cascades() {
        let (_temp_dir, storage) = create_test_storage();
        let (group, users) = seed_group(&storage, "Trip", &["a", "b"]);
        let items = ItemService::new(&storage);
        let gas = items.create_item(group.id, "gas", "40").unwrap();
        items.add_user(&gas, users[0].id).unwrap();
        items.add_user(&gas, users[1].id).unwrap();

        UserService::new(&storage).delete_user(users[0].id).unwrap();

        let service = GroupService::new(&storage);
        assert_eq!(service.list_members(group.id).unwrap().len(), 1);
        assert_eq!(items.count_users(&gas).unwrap(), 1);
        assert_eq!(items.user_cost(&gas).unwrap(), 40.0);
    }
}
