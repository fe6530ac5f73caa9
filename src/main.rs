//! Candle aggregation CLI application.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        config,
        log_level,
        json_logs,
        command,
    } = Cli::parse();

    match command {
        Commands::Run(args) => {
            cli::commands::run::run(args, config.as_deref(), log_level, json_logs).await
        }
        Commands::Models => cli::commands::models::run().await,
        Commands::CheckConfig => cli::commands::check_config::run(config.as_deref()).await,
    }
}
