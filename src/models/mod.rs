//! Core data models for the bill splitter
//!
//! This module contains the data structures of the bill-splitting domain:
//! users, groups and their memberships, cost items, and the partitions that
//! share items between users.

pub mod group;
pub mod ids;
pub mod item;
pub mod money;
pub mod partition;
pub mod user;
pub mod validation;

pub use group::{Group, Membership};
pub use ids::{GroupId, ItemId, MembershipId, PartitionId, UserId};
pub use item::{normalize_name, split_cost, Item};
pub use money::{format_currency, validate_currency, Money};
pub use partition::Partition;
pub use user::User;
pub use validation::{Field, FieldError, ValidationErrors};
