//! Configuration structures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use candleflow_core::{ConfigError, Timeframe};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub feed: FeedSettings,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub models: ModelSettings,
    #[serde(default)]
    pub executor: ExecutorSettings,
}

impl AppConfig {
    /// Validate the configuration as a whole.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.instruments.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "feed.instruments".to_string(),
                reason: "at least one instrument required".to_string(),
            });
        }
        if self.feed.queue_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "feed.queue_size".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.feed.reconnect_delay_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "feed.reconnect_delay_secs".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.engine.timeframes.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "engine.timeframes".to_string(),
                reason: "at least one timeframe required".to_string(),
            });
        }
        self.engine.parsed_timeframes()?;
        if self.executor.enabled && self.executor.default_quantity <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "executor.default_quantity".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "candleflow".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Trade feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSettings {
    pub ws_url: String,
    pub instruments: Vec<String>,
    pub reconnect_delay_secs: u64,
    pub queue_size: usize,
}

impl FeedSettings {
    /// Delay between reconnect attempts.
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            ws_url: "wss://fstream.binance.com".to_string(),
            instruments: vec!["btcusdt".to_string(), "ethusdt".to_string()],
            reconnect_delay_secs: 5,
            queue_size: 1024,
        }
    }
}

/// Candle engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    pub timeframes: Vec<String>,
    pub history_capacity: usize,
}

impl EngineSettings {
    /// Parse the configured timeframe labels.
    pub fn parsed_timeframes(&self) -> Result<Vec<Timeframe>, ConfigError> {
        self.timeframes
            .iter()
            .map(|label| {
                label
                    .parse::<Timeframe>()
                    .map_err(|_| ConfigError::InvalidTimeframe(label.clone()))
            })
            .collect()
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            timeframes: vec!["1m".to_string(), "5m".to_string()],
            history_capacity: 500,
        }
    }
}

/// Signal model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Models to run
    pub enabled: Vec<String>,
    /// Per-model parameter overrides, keyed by model name
    #[serde(default)]
    pub params: HashMap<String, serde_json::Value>,
}

impl ModelSettings {
    /// Parameter overrides for one model, or an empty table.
    pub fn params_for(&self, name: &str) -> serde_json::Value {
        self.params
            .get(name)
            .cloned()
            .unwrap_or_else(|| serde_json::json!({}))
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            enabled: vec!["candle_color".to_string()],
            params: HashMap::new(),
        }
    }
}

/// Execution sink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorSettings {
    pub enabled: bool,
    pub default_quantity: Decimal,
    pub default_target_move: f64,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        use rust_decimal_macros::dec;
        Self {
            enabled: true,
            default_quantity: dec!(0.001),
            default_target_move: 0.005,
        }
    }
}
