use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::Priority;

#[derive(Parser)]
#[command(name = "td", about = concat!("td v", env!("CARGO_PKG_VERSION"), " - a small TODO list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory (default: $TD_DATA_DIR, then $XDG_DATA_HOME/td)
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List items
    List(ListArgs),
    /// Add an item
    Add(AddArgs),
    /// Change an item's title, priority or done state
    Edit(EditArgs),
    /// Mark an item done
    Done(IdArg),
    /// Mark an item not done
    Undone(IdArg),
    /// Delete one or more items
    Rm(RmArgs),
    /// Show or change configuration
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Only done items
    #[arg(long, conflicts_with = "pending")]
    pub done: bool,
    /// Only items not yet done
    #[arg(long)]
    pub pending: bool,
    /// Filter titles by regex (case-insensitive)
    #[arg(long, value_name = "REGEX")]
    pub grep: Option<String>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Item title
    pub title: String,
    /// Priority (default from config: defaults.priority)
    #[arg(long, short)]
    pub priority: Option<Priority>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Item ID
    pub id: i64,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New priority
    #[arg(long, short)]
    pub priority: Option<Priority>,
    /// Mark done
    #[arg(long, conflicts_with = "undone")]
    pub done: bool,
    /// Mark not done
    #[arg(long)]
    pub undone: bool,
}

#[derive(Args)]
pub struct IdArg {
    /// Item ID
    pub id: i64,
}

#[derive(Args)]
pub struct RmArgs {
    /// Item ID(s). A single missing ID is an error; with several, missing IDs are skipped.
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<i64>,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Set a key (e.g. ui.show_key_hints false)
    Set(ConfigSetArgs),
    /// Print the config file path
    Path,
}

#[derive(Args)]
pub struct ConfigSetArgs {
    /// Dotted key, e.g. defaults.priority
    pub key: String,
    /// New value
    pub value: String,
}
