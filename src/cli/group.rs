//! Group CLI commands
//!
//! Group management plus the membership subcommands (`add-user`,
//! `remove-user`, `show-user`) and per-member balances.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::group::{format_balances, format_group_details, format_group_list};
use crate::error::{SplitterError, SplitterResult};
use crate::models::{format_currency, Money};
use crate::services::{GroupService, UserService};
use crate::storage::Storage;

/// Group subcommands
#[derive(Subcommand)]
pub enum GroupCommands {
    /// List all groups
    List,

    /// Create a new group
    Create {
        /// Group name
        name: String,
        /// Initial member (name or ID); repeat for more
        #[arg(short, long = "member")]
        members: Vec<String>,
    },

    /// Show a group with its members and items
    Show {
        /// Group name or ID
        group: String,
    },

    /// Rename a group
    Edit {
        /// Group name or ID
        group: String,
        /// New name
        #[arg(short, long)]
        name: String,
    },

    /// Delete a group with all its items
    Delete {
        /// Group name or ID
        group: String,
    },

    /// Add a user to a group
    #[command(name = "add-user")]
    AddUser {
        /// Group name or ID
        group: String,
        /// User name or ID
        user: String,
    },

    /// Remove a user from a group
    #[command(name = "remove-user")]
    RemoveUser {
        /// Group name or ID
        group: String,
        /// User name or ID
        user: String,
    },

    /// Show one member of a group and what they owe
    #[command(name = "show-user")]
    ShowUser {
        /// Group name or ID
        group: String,
        /// User name or ID
        user: String,
    },

    /// Show what each member owes
    Balances {
        /// Group name or ID
        group: String,
    },
}

/// Handle a group command
pub fn handle_group_command(
    storage: &Storage,
    settings: &Settings,
    cmd: GroupCommands,
) -> SplitterResult<()> {
    let service = GroupService::new(storage);
    let users = UserService::new(storage);
    let unit = settings.currency_symbol.as_str();

    match cmd {
        GroupCommands::List => {
            let overviews = service
                .list_groups()?
                .into_iter()
                .map(|g| service.overview(g.id))
                .collect::<SplitterResult<Vec<_>>>()?;
            print!("{}", format_group_list(&overviews, unit));
        }

        GroupCommands::Create { name, members } => {
            let member_ids = members
                .iter()
                .map(|m| users.require_user(m).map(|u| u.id))
                .collect::<SplitterResult<Vec<_>>>()?;
            let group = service.create_group(&name, &member_ids)?;
            println!("Created group: {} ({})", group.name, group.id);
            if !member_ids.is_empty() {
                println!("  with {} member(s)", member_ids.len());
            }
        }

        GroupCommands::Show { group } => {
            let group = service.require_group(&group)?;
            print!("{}", format_group_details(&service.overview(group.id)?, unit));
        }

        GroupCommands::Edit { group, name } => {
            let group = service.require_group(&group)?;
            let updated = service.update_group(group.id, &name)?;
            println!("Renamed group: {} -> {}", group.name, updated.name);
        }

        GroupCommands::Delete { group } => {
            let group = service.require_group(&group)?;
            service.delete_group(group.id)?;
            println!("Deleted group: {}", group.name);
        }

        GroupCommands::AddUser { group, user } => {
            let group = service.require_group(&group)?;
            let user = users.require_user(&user)?;
            service.add_member(group.id, user.id)?;
            println!("Added {} to {}", user.name, group.name);
        }

        GroupCommands::RemoveUser { group, user } => {
            let group = service.require_group(&group)?;
            let user = users.require_user(&user)?;
            service.remove_member(group.id, user.id)?;
            println!("Removed {} from {}", user.name, group.name);
        }

        GroupCommands::ShowUser { group, user } => {
            let group = service.require_group(&group)?;
            let user = users.require_user(&user)?;
            let member = service
                .get_member(group.id, user.id)?
                .ok_or_else(|| SplitterError::NotFound {
                    entity_type: "Member",
                    identifier: format!("{} in {}", user.name, group.name),
                })?;
            let total = service.user_total(group.id, member.id)?;
            println!("{} ({})", member.name, member.id);
            println!("  Group: {}", group.name);
            println!(
                "  Owes:  {}",
                format_currency(Money::from_f64_rounded(total), unit)
            );
        }

        GroupCommands::Balances { group } => {
            let group = service.require_group(&group)?;
            let balances = service.balances(group.id)?;
            print!("{}", format_balances(&group.name, &balances, unit));
        }
    }

    Ok(())
}
