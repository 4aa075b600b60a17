//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the bailiff binary.

mod bans;
mod commands;
mod run;

pub use bans::handle_bans_command;
pub use commands::{BansCommands, Cli, Commands};
pub use run::run_bot;
