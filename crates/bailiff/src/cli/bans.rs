//! `bans` subcommand handlers.

use super::BansCommands;
use bailiff::{BailiffConfig, BailiffResult, ServerId, UserId, ban_lines, open_bans, show_ban};
use std::path::PathBuf;

/// Run a `bans` subcommand against the configured or given ban file.
pub async fn handle_bans_command(cmd: BansCommands, config: &BailiffConfig) -> BailiffResult<()> {
    match cmd {
        BansCommands::List { data } => {
            let store = open_bans(&data_path(data, config)).await?;
            if store.is_empty() {
                println!("No active tempbans.");
                return Ok(());
            }
            for line in ban_lines(&store) {
                println!("{}", line);
            }
            println!("{} tempban(s) across {} server(s)", store.len(), store.servers().count());
        }

        BansCommands::Show {
            server_id,
            user_id,
            data,
        } => {
            let store = open_bans(&data_path(data, config)).await?;
            let report = show_ban(&store, ServerId::new(server_id), UserId::new(user_id))?;
            println!("{}", report);
        }
    }

    Ok(())
}

fn data_path(data: Option<PathBuf>, config: &BailiffConfig) -> PathBuf {
    data.unwrap_or_else(|| config.bans.data_file.clone())
}
