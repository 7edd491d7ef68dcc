//! Display formatting for terminal output
//!
//! Provides utilities for formatting users, groups, items and routes for
//! terminal display.

pub mod group;
pub mod item;
pub mod routes;
pub mod user;

pub use group::{format_balances, format_group_details, format_group_list};
pub use item::format_item_details;
pub use routes::{format_route_match, format_route_table};
pub use user::{format_user_details, format_user_list};
