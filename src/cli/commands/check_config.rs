//! Validate configuration command.

use anyhow::Result;
use std::path::Path;

use candleflow_config::{load_config, load_default_config};

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    match config_path {
        Some(path) => println!("Validating configuration: {:?}", path),
        None => println!("Validating configuration: defaults and environment"),
    }

    let result = match config_path {
        Some(path) => load_config(path),
        None => load_default_config(),
    };

    match result {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Instruments: {}", config.feed.instruments.join(", "));
            println!("Timeframes: {}", config.engine.timeframes.join(", "));
            println!("History capacity: {}", config.engine.history_capacity);
            println!("Models: {}", config.models.enabled.join(", "));
            println!("Executor enabled: {}", config.executor.enabled);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
