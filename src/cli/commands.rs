use clap::{Args, Parser, Subcommand};

use crate::model::state::ThemePreference;
use crate::model::task::ListType;

#[derive(Parser)]
#[command(name = "dl", about = concat!("daylist v", env!("CARGO_PKG_VERSION"), " - today, this week, every day"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Keep data in a different directory
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show tasks (both lists by default)
    List(ListArgs),
    /// Add a task to the top of a list
    Add(AddArgs),
    /// Change a task's text, checkbox, recurrence or rank
    Update(UpdateArgs),
    /// Delete a task
    Delete(TaskRefArgs),
    /// Check or uncheck a task
    Toggle(TaskRefArgs),
    /// Put a list in the given order (unnamed tasks are removed)
    Reorder(ReorderArgs),
    /// Move a task up (negative) or down (positive)
    Mv(MvArgs),
    /// Show or set the theme preference
    Theme(ThemeArgs),
    /// Run the daily reset now
    Reset,
    /// Delete all tasks and settings
    Clear(ClearArgs),
    /// Edit or locate the config file
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// List to show (daily or weekly)
    pub list: Option<ListType>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Target list (daily or weekly)
    pub list: ListType,
    /// Task text
    pub text: String,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// List holding the task
    pub list: ListType,
    /// Task ID (any unique prefix)
    pub id: String,
    /// New text
    #[arg(long)]
    pub text: Option<String>,
    /// Set the checkbox (true or false); no completion reordering
    #[arg(long)]
    pub checked: Option<bool>,
    /// Mark as recurring (true or false)
    #[arg(long)]
    pub recurring: Option<bool>,
    /// Set the display rank
    #[arg(long, allow_negative_numbers = true)]
    pub order: Option<i64>,
    /// JSON patch, e.g. '{"text":"...","isRecurring":true}'
    #[arg(long)]
    pub patch: Option<String>,
}

#[derive(Args)]
pub struct TaskRefArgs {
    /// List holding the task
    pub list: ListType,
    /// Task ID (any unique prefix)
    pub id: String,
}

#[derive(Args)]
pub struct ReorderArgs {
    /// List to reorder
    pub list: ListType,
    /// Task IDs in their new order
    #[arg(required = true)]
    pub ids: Vec<String>,
}

#[derive(Args)]
pub struct MvArgs {
    /// List holding the task
    pub list: ListType,
    /// Task ID (any unique prefix)
    pub id: String,
    /// Positions to move; negative moves up
    #[arg(allow_negative_numbers = true)]
    pub delta: i64,
}

#[derive(Args)]
pub struct ThemeArgs {
    /// light, dark or system (omit to show the current theme)
    pub preference: Option<ThemePreference>,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Don't ask for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Config args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Set a key, e.g. `storage.debounce_ms 250`
    Set(ConfigSetArgs),
    /// Print the config file location
    Path,
}

#[derive(Args)]
pub struct ConfigSetArgs {
    /// Dotted key
    pub key: String,
    /// New value
    pub value: String,
}
