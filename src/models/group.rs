//! Group and Membership models
//!
//! A group owns items and has users through memberships. Membership decides
//! who is allowed to share the group's items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GroupId, MembershipId, UserId};

pub const GROUP_NAME_MAX_LENGTH: usize = 50;

/// A set of users splitting bills together (e.g., "Roommates", "Ski Trip")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier
    pub id: GroupId,

    /// Group name
    pub name: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: GroupId::new(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate the group
    pub fn validate(&self) -> Result<(), GroupValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(GroupValidationError::EmptyName);
        }

        let len = name.chars().count();
        if len > GROUP_NAME_MAX_LENGTH {
            return Err(GroupValidationError::NameTooLong(len));
        }

        Ok(())
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Records that a user belongs to a group (the "group user" resource)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub id: MembershipId,
    pub group_id: GroupId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(group_id: GroupId, user_id: UserId) -> Self {
        Self {
            id: MembershipId::new(),
            group_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for GroupValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Group name cannot be empty"),
            Self::NameTooLong(len) => write!(
                f,
                "Group name too long ({} chars, max {})",
                len, GROUP_NAME_MAX_LENGTH
            ),
        }
    }
}

impl std::error::Error for GroupValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_validation() {
        let mut group = Group::new("Roommates");
        assert!(group.validate().is_ok());

        group.name = String::new();
        assert_eq!(group.validate(), Err(GroupValidationError::EmptyName));

        group.name = "g".repeat(51);
        assert!(matches!(
            group.validate(),
            Err(GroupValidationError::NameTooLong(_))
        ));
    }

    #[test]
    fn test_membership_links_ids() {
        let group = Group::new("Trip");
        let user_id = UserId::new();
        let membership = Membership::new(group.id, user_id);
        assert_eq!(membership.group_id, group.id);
        assert_eq!(membership.user_id, user_id);
    }
}
