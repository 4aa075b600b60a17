//! Bailiff CLI binary.
//!
//! This binary provides command-line access to Bailiff:
//! - Run the Discord bot
//! - Inspect persisted tempbans
//! - Check ban duration syntax

use bailiff::{BailiffConfig, LoggingConfig, check_duration, init_logging};
use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, handle_bans_command, run_bot};

    // Parse command-line arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            let config = BailiffConfig::load(cli.config.as_deref())?;
            init_logging(cli.verbose, &config.logging)?;
            run_bot(&config).await?;
        }

        Commands::Bans(bans_cmd) => {
            let config = BailiffConfig::load(cli.config.as_deref())?;
            init_logging(cli.verbose, &config.logging)?;
            handle_bans_command(bans_cmd, &config).await?;
        }

        Commands::CheckDuration { text } => {
            init_logging(cli.verbose, &LoggingConfig::default())?;
            println!("{}", check_duration(&text)?);
        }
    }

    Ok(())
}
