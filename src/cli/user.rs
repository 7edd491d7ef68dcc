//! User CLI commands

use clap::Subcommand;

use crate::display::user::{format_user_details, format_user_list};
use crate::error::SplitterResult;
use crate::services::{GroupService, UserService};
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a new user
    Create {
        /// User name (must be unique)
        name: String,
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
    },

    /// List all users
    List,

    /// Show a user and the groups they belong to
    Show {
        /// User name or ID
        user: String,
    },

    /// Edit a user
    Edit {
        /// User name or ID
        user: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New email (empty to clear)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Delete a user, their memberships and their shares
    Delete {
        /// User name or ID
        user: String,
    },
}

/// Handle a user command
pub fn handle_user_command(storage: &Storage, cmd: UserCommands) -> SplitterResult<()> {
    let service = UserService::new(storage);

    match cmd {
        UserCommands::Create { name, email } => {
            let user = service.create_user(&name, email.as_deref())?;
            println!("Created user: {} ({})", user.name, user.id);
        }

        UserCommands::List => {
            let users = service.list_users()?;
            print!("{}", format_user_list(&users));
        }

        UserCommands::Show { user } => {
            let user = service.require_user(&user)?;
            let groups = GroupService::new(storage).groups_for_user(user.id)?;
            print!("{}", format_user_details(&user, &groups));
        }

        UserCommands::Edit { user, name, email } => {
            let user = service.require_user(&user)?;
            if name.is_none() && email.is_none() {
                println!("Nothing to change. Use --name or --email.");
                return Ok(());
            }
            let updated = service.update_user(user.id, name.as_deref(), email.as_deref())?;
            println!("Updated user: {}", updated.name);
        }

        UserCommands::Delete { user } => {
            let user = service.require_user(&user)?;
            service.delete_user(user.id)?;
            println!("Deleted user: {}", user.name);
        }
    }

    Ok(())
}
