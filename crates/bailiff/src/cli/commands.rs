//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bailiff - Discord moderation bot with tempbans and slow mode
#[derive(Parser, Debug)]
#[command(name = "bailiff")]
#[command(about = "Discord moderation bot with tempbans and slow mode", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file layered over the defaults
    #[arg(long, global = true, env = "BAILIFF_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to Discord and start moderating
    Run,

    /// Inspect persisted tempbans
    #[command(subcommand)]
    Bans(BansCommands),

    /// Parse a ban duration such as 3d, 2w or 1y
    CheckDuration {
        /// Duration text
        text: String,
    },
}

/// Tempban inspection subcommands
#[derive(Subcommand, Debug)]
pub enum BansCommands {
    /// List every stored tempban with its unban time
    List {
        /// Ban file, defaults to bans.data_file from the configuration
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Show the report for one tempban
    Show {
        /// Server (guild) ID
        server_id: u64,

        /// Banned user ID
        user_id: u64,

        /// Ban file, defaults to bans.data_file from the configuration
        #[arg(long)]
        data: Option<PathBuf>,
    },
}
