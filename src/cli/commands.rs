//! CLI command definitions

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tcache")]
#[command(about = "Daily developer task log with GitHub sync", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture today's task cache (default when no command is given)
    New,

    /// Show a task cache
    View {
        /// Date reference (e.g., today, yesterday, friday, last monday, 2025-01-17)
        #[arg(value_name = "DATE")]
        date: Option<String>,
    },

    /// List cached task logs, newest first
    List {
        /// Show at most this many entries
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Search all task logs for a term (case-insensitive)
    Search {
        term: String,
    },

    /// GitHub sync management
    Github {
        #[command(subcommand)]
        action: Option<GithubCommand>,
    },
}

impl Commands {
    /// Whether the sync-on-start pull runs before this command
    pub fn pulls_on_start(&self) -> bool {
        !matches!(self, Commands::Github { .. })
    }
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GithubCommand {
    /// Show sync configuration
    Status,
    /// Configure sync interactively
    Setup,
    /// Commit and push local logs
    Push,
    /// Pull remote logs
    Pull,
    /// Create the configured repository on GitHub if missing
    CreateRepo,
    /// Print diagnostic information
    Debug,
}
