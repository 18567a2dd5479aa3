use std::path::PathBuf;

use autoflow_logging::LogDestination;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

pub const DEFAULT_SETTINGS_FILE: &str = "./autoflow_settings.json";

/// Manage AutoFlow automation settings and the job queue.
#[derive(Debug, Parser)]
#[command(name = "autoflow", version)]
pub struct Cli {
    /// Settings file to read and update.
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,

    /// Where log output goes.
    #[arg(long, global = true, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,

    /// Log debug output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rewrite the settings file in the current schema.
    Migrate,
    /// Print categories, queue and run estimate.
    Show {
        /// Print the normalized settings as JSON instead.
        #[arg(long)]
        json: bool,
    },
    /// Add URL list files or folders to the job queue.
    Enqueue {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Remove a queued entry.
    Dequeue {
        index: usize,
        /// Remove the entry even while it is being processed.
        #[arg(long)]
        force: bool,
    },
    /// Move a queued entry.
    Move { from: usize, to: usize },
    /// Empty the job queue.
    Clear,
    /// Edit error categories.
    #[command(subcommand)]
    Category(CategoryCommand),
    /// Edit the keywords of a category.
    #[command(subcommand)]
    Keyword(KeywordCommand),
    /// Remember whether the job queue panel is collapsed.
    Collapse {
        #[arg(action = ArgAction::Set)]
        collapsed: bool,
    },
    /// Run history kept by the automation backend.
    #[command(subcommand)]
    History(HistoryCommand),
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    Add { name: String },
    Remove { index: usize },
    Move { from: usize, to: usize },
    /// Pause the run when a page matches this category.
    Pause {
        name: String,
        #[arg(action = ArgAction::Set, default_value_t = true)]
        enabled: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// Delete the run history and statistics.
    Clear,
    /// Write the run history to a CSV file.
    Export,
}

#[derive(Debug, Subcommand)]
pub enum KeywordCommand {
    Add { category: String, value: String },
    Remove { category: String, index: usize },
}
