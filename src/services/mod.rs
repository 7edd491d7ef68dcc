//! Service layer for the bill splitter
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, computed fields, and cross-entity operations such as
//! cascading deletes.

pub mod group;
pub mod item;
pub mod user;

pub use group::{GroupOverview, GroupService, MemberBalance};
pub use item::{ItemService, ItemSummary, NOT_A_MEMBER_MESSAGE};
pub use user::UserService;
