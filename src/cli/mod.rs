//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod group;
pub mod item;
pub mod routes;
pub mod user;

pub use audit::handle_audit_command;
pub use group::{handle_group_command, GroupCommands};
pub use item::{handle_item_command, ItemCommands};
pub use routes::handle_routes_command;
pub use user::{handle_user_command, UserCommands};
