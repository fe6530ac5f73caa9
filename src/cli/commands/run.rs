//! Run command implementation.
//!
//! Wires the full pipeline: websocket feed, candle engine, models and
//! the optional paper execution sink, then runs until Ctrl-C or a
//! "stop" line on stdin.

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use candleflow_config::{load_config, load_default_config};
use candleflow_core::{ExecutionSink, Timeframe, TradeFeed};
use candleflow_engine::{CandleEngine, SignalDispatcher};
use candleflow_exec::PaperExecutor;
use candleflow_feed::BinanceTradeFeed;
use candleflow_models::ModelRegistry;
use candleflow_monitor::setup_logging;

use crate::cli::{LogLevel, RunArgs};

pub async fn run(
    args: RunArgs,
    config_path: Option<&Path>,
    log_level: Option<LogLevel>,
    json_logs: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => load_config(path),
        None => load_default_config(),
    }
    .context("Failed to load configuration")?;

    let level = log_level
        .map(|l| l.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    let json = json_logs || config.logging.format == "json";
    let _log_guard = setup_logging(&level, json, config.logging.file.as_deref());

    info!(
        name = %config.app.name,
        environment = %config.app.environment,
        "starting aggregation engine"
    );

    // CLI selections override the configured ones
    let instruments = if args.instruments.is_empty() {
        config.feed.instruments.clone()
    } else {
        args.instruments
    };
    let timeframe_labels = if args.timeframes.is_empty() {
        config.engine.timeframes.clone()
    } else {
        args.timeframes
    };
    let timeframes: Vec<Timeframe> = timeframe_labels
        .iter()
        .map(|label| label.parse().map_err(anyhow::Error::msg))
        .collect::<Result<_>>()
        .context("Failed to parse timeframes")?;
    let model_names = if args.models.is_empty() {
        config.models.enabled.clone()
    } else {
        args.models
    };

    // Execution sink
    let executor = if args.no_exec || !config.executor.enabled {
        None
    } else {
        Some(Arc::new(
            PaperExecutor::new()
                .with_default_quantity(config.executor.default_quantity)
                .with_default_target_move(config.executor.default_target_move),
        ))
    };

    // Models
    let registry = ModelRegistry::new();
    let mut dispatcher = match &executor {
        Some(executor) => {
            let sink: Arc<dyn ExecutionSink> = executor.clone();
            SignalDispatcher::new().with_sink(sink)
        }
        None => SignalDispatcher::new(),
    };
    for name in &model_names {
        let model = registry
            .create(
                name,
                config.models.params_for(name),
                instruments.clone(),
                timeframes.clone(),
            )
            .with_context(|| {
                format!(
                    "Failed to create model '{}' (available: {})",
                    name,
                    registry
                        .names()
                        .iter()
                        .map(|n| n.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })?;
        dispatcher.register(model);
    }

    info!(
        instruments = %instruments.join(","),
        timeframes = %timeframe_labels.join(","),
        models = dispatcher.model_count(),
        executor = executor.is_some(),
        "pipeline configured"
    );

    let engine = CandleEngine::new(
        timeframes,
        Utc::now(),
        config.engine.history_capacity,
        dispatcher,
    );

    let (trade_tx, trade_rx) = mpsc::channel(config.feed.queue_size);
    let stop = CancellationToken::new();

    let feed = BinanceTradeFeed::new(instruments)
        .with_ws_url(&config.feed.ws_url)
        .with_reconnect_delay(config.feed.reconnect_delay());

    let engine_task = tokio::spawn(engine.run(trade_rx));
    let feed_task = tokio::spawn({
        let stop = stop.clone();
        async move { feed.run(trade_tx, stop).await }
    });

    spawn_shutdown_listener(stop.clone());
    println!("Running. Type 'stop' or press Ctrl-C to shut down.");

    match feed_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %e, "trade feed terminated with error"),
        Err(e) => error!(error = %e, "trade feed task failed"),
    }

    // The feed dropped its sender, so the engine drains and stops.
    let stats = engine_task.await.context("Engine task failed")?;
    info!(
        trades = stats.trades_processed,
        candles = stats.candles_closed,
        "engine stopped"
    );

    if let Some(executor) = &executor {
        let trades = executor.open_trades();
        println!();
        println!("Paper trades booked: {}", trades.len());
        for trade in trades {
            println!(
                "  [{}] {} {} {} qty {} target {:.2}%",
                trade.id,
                trade.direction,
                trade.symbol,
                trade.timeframe,
                trade.quantity,
                trade.target_move * 100.0
            );
        }
    }

    Ok(())
}

/// Stop on Ctrl-C or a "stop" line on stdin.
fn spawn_shutdown_listener(stop: CancellationToken) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupt received, shutting down");
                    stop.cancel();
                    break;
                }
                line = lines.next_line() => match line {
                    Ok(Some(line)) if line.trim().eq_ignore_ascii_case("stop") => {
                        info!("stop requested, shutting down");
                        stop.cancel();
                        break;
                    }
                    Ok(Some(_)) => {}
                    Ok(None) | Err(_) => {
                        // Stdin is gone; only Ctrl-C can stop us now.
                        let _ = tokio::signal::ctrl_c().await;
                        info!("interrupt received, shutting down");
                        stop.cancel();
                        break;
                    }
                }
            }
        }
    });
}
