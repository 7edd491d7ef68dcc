//! Bill Splitter - shared-cost tracking for groups of people
//!
//! Users belong to groups. A group owns cost items, and each item is shared
//! by some of the group's members through partitions. An item's cost is
//! divided evenly among the users sharing it.
//!
//! # Architecture
//!
//! - `config`: Path resolution and settings
//! - `error`: Custom error types
//! - `models`: Users, groups, items, partitions, money and validation
//! - `storage`: JSON file repositories
//! - `audit`: Append-only audit log
//! - `services`: Business logic (validation, sharing, cascades, balances)
//! - `routes`: The web route table
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `splitter` binary
//! - `logging`: Tracing subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use bill_splitter::config::SplitterPaths;
//! use bill_splitter::services::{GroupService, ItemService, UserService};
//! use bill_splitter::storage::Storage;
//!
//! let mut storage = Storage::new(SplitterPaths::new()?)?;
//! storage.load_all()?;
//!
//! let alice = UserService::new(&storage).create_user("alice", None)?;
//! let group = GroupService::new(&storage).create_group("Roommates", &[alice.id])?;
//! let items = ItemService::new(&storage);
//! let pizza = items.create_item(group.id, "pizza", "12.00")?;
//! items.add_user(&pizza, alice.id)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;

pub use error::{SplitterError, SplitterResult};
