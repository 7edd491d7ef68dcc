use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use bill_splitter::cli::{
    handle_audit_command, handle_group_command, handle_item_command, handle_routes_command,
    handle_user_command,
};
use bill_splitter::config::{paths::DATA_DIR_ENV, Settings, SplitterPaths};
use bill_splitter::storage::Storage;

#[derive(Parser)]
#[command(
    name = "splitter",
    version,
    about = "Split shared bills between the members of a group",
    long_about = "Track groups of people, the items they pay for together, and who \
                  shares each item. Every item's cost is divided evenly among the \
                  users sharing it."
)]
struct Cli {
    /// Directory holding config.json, audit.log and data/
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    #[command(subcommand)]
    User(bill_splitter::cli::UserCommands),

    /// Group and membership commands
    #[command(subcommand)]
    Group(bill_splitter::cli::GroupCommands),

    /// Item and sharing commands
    #[command(subcommand)]
    Item(bill_splitter::cli::ItemCommands),

    /// List routes, or resolve one request
    Routes {
        /// Request to resolve, e.g. "GET /groups/1"
        #[arg(long)]
        resolve: Option<String>,
    },

    /// Show recent changes from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Create the data directory and empty data files
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => SplitterPaths::with_base_dir(dir),
        None => SplitterPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;
    bill_splitter::logging::init(&settings.log_filter);

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::User(cmd)) => handle_user_command(&storage, cmd)?,
        Some(Commands::Group(cmd)) => handle_group_command(&storage, &settings, cmd)?,
        Some(Commands::Item(cmd)) => handle_item_command(&storage, &settings, cmd)?,
        Some(Commands::Routes { resolve }) => handle_routes_command(resolve)?,
        Some(Commands::Audit { limit }) => handle_audit_command(&storage, limit)?,
        Some(Commands::Init) => {
            println!("Initializing bill splitter at: {}", paths.base_dir().display());
            storage.save_all()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  splitter user create <NAME>");
            println!("  splitter group create <NAME> --member <USER>");
            println!("  splitter item create --group <GROUP> <NAME> <COST>");
        }
        Some(Commands::Config) => {
            println!("Bill Splitter Configuration");
            println!("===========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!("Initialized:    {}", if paths.is_initialized() { "yes" } else { "no" });
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Log filter:      {}", settings.log_filter);
        }
        None => {
            println!("Bill Splitter - split shared costs within a group");
            println!();
            println!("Run 'splitter --help' for usage information.");
        }
    }

    Ok(())
}
