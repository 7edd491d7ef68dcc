//! Item CLI commands
//!
//! Items always live in a group, so every subcommand takes `--group`.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::item::format_item_details;
use crate::error::SplitterResult;
use crate::services::{GroupService, ItemService, UserService};
use crate::storage::Storage;

/// Item subcommands
#[derive(Subcommand)]
pub enum ItemCommands {
    /// Add an item to a group
    Create {
        /// Group name or ID
        #[arg(short, long)]
        group: String,
        /// Item name (at most 20 characters)
        name: String,
        /// Cost (e.g., "12", "12.50", "$1,200.00")
        #[arg(allow_hyphen_values = true)]
        cost: String,
    },

    /// Edit an item's name or cost
    Edit {
        /// Group name or ID
        #[arg(short, long)]
        group: String,
        /// Item name or ID
        item: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New cost
        #[arg(short, long, allow_hyphen_values = true)]
        cost: Option<String>,
    },

    /// Delete an item
    Delete {
        /// Group name or ID
        #[arg(short, long)]
        group: String,
        /// Item name or ID
        item: String,
    },

    /// Share an item with one or more group members
    Share {
        /// Group name or ID
        #[arg(short, long)]
        group: String,
        /// Item name or ID
        item: String,
        /// User names or IDs
        #[arg(required = true)]
        users: Vec<String>,
    },

    /// Stop sharing an item with a user
    Unshare {
        /// Group name or ID
        #[arg(short, long)]
        group: String,
        /// Item name or ID
        item: String,
        /// User name or ID
        user: String,
    },

    /// Show an item, who shares it and each portion
    Show {
        /// Group name or ID
        #[arg(short, long)]
        group: String,
        /// Item name or ID
        item: String,
    },
}

/// Handle an item command
pub fn handle_item_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ItemCommands,
) -> SplitterResult<()> {
    let service = ItemService::new(storage);
    let groups = GroupService::new(storage);
    let users = UserService::new(storage);
    let unit = settings.currency_symbol.as_str();

    match cmd {
        ItemCommands::Create { group, name, cost } => {
            let group = groups.require_group(&group)?;
            let item = service.create_item(group.id, &name, &cost)?;
            println!("Created item: {}", item.format_with_unit(unit));
            println!("  ID: {}", item.id);
        }

        ItemCommands::Edit {
            group,
            item,
            name,
            cost,
        } => {
            let group = groups.require_group(&group)?;
            let item = service.require_item(group.id, &item)?;
            if name.is_none() && cost.is_none() {
                println!("Nothing to change. Use --name or --cost.");
                return Ok(());
            }
            let updated = service.update_item(item.id, name.as_deref(), cost.as_deref())?;
            println!("Updated item: {}", updated.format_with_unit(unit));
        }

        ItemCommands::Delete { group, item } => {
            let group = groups.require_group(&group)?;
            let item = service.require_item(group.id, &item)?;
            service.delete_item(item.id)?;
            println!("Deleted item: {}", item.name);
        }

        ItemCommands::Share {
            group,
            item,
            users: sharers,
        } => {
            let group = groups.require_group(&group)?;
            let item = service.require_item(group.id, &item)?;
            for identifier in &sharers {
                let user = users.require_user(identifier)?;
                service.add_user(&item, user.id)?;
                println!("Shared {} with {}", item.name, user.name);
            }
        }

        ItemCommands::Unshare { group, item, user } => {
            let group = groups.require_group(&group)?;
            let item = service.require_item(group.id, &item)?;
            let user = users.require_user(&user)?;
            service.remove_user(&item, user.id)?;
            println!("{} no longer shares {}", user.name, item.name);
        }

        ItemCommands::Show { group, item } => {
            let group = groups.require_group(&group)?;
            let item = service.require_item(group.id, &item)?;
            let summary = service.summarize(item)?;
            print!("{}", format_item_details(&summary, &group.name, unit));
        }
    }

    Ok(())
}
