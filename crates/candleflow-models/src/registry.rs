//! Model registry for dynamic model loading.

use crate::{CandleColorConfig, CandleColorModel, DeltaPressureConfig, DeltaPressureModel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use candleflow_core::{Model, ModelConfig, ModelError, Timeframe};

/// Information about a registered model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model name
    pub name: String,
    /// Model description
    pub description: String,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

/// Registry for available signal models.
pub struct ModelRegistry {
    models: HashMap<String, ModelInfo>,
}

impl ModelRegistry {
    /// Create a new model registry with all built-in models.
    pub fn new() -> Self {
        let mut models = HashMap::new();

        models.insert(
            "candle_color".to_string(),
            ModelInfo {
                name: "candle_color".to_string(),
                description: "Follows the direction of the last closed candle".to_string(),
                default_config: serde_json::to_value(CandleColorConfig::default()).unwrap(),
            },
        );

        models.insert(
            "delta_pressure".to_string(),
            ModelInfo {
                name: "delta_pressure".to_string(),
                description: "Follows sustained aggressor-flow imbalance across the window"
                    .to_string(),
                default_config: serde_json::to_value(DeltaPressureConfig::default()).unwrap(),
            },
        );

        Self { models }
    }

    /// List all available models.
    pub fn list(&self) -> Vec<&ModelInfo> {
        self.models.values().collect()
    }

    /// Get model info by name.
    pub fn get(&self, name: &str) -> Option<&ModelInfo> {
        self.models.get(name)
    }

    /// Check if a model exists.
    pub fn exists(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Get all model names.
    pub fn names(&self) -> Vec<&String> {
        self.models.keys().collect()
    }

    /// Create a model instance from configuration.
    ///
    /// The run-scoped `symbols` and `timeframes` act as defaults; a
    /// subscription pinned in the model configuration wins over them.
    pub fn create(
        &self,
        name: &str,
        config: serde_json::Value,
        symbols: Vec<String>,
        timeframes: Vec<Timeframe>,
    ) -> Result<Box<dyn Model>, ModelError> {
        match name {
            "candle_color" => {
                let mut config: CandleColorConfig = serde_json::from_value(config)
                    .map_err(|e| ModelError::InvalidConfig(e.to_string()))?;
                if config.symbols.is_empty() {
                    config.symbols = symbols;
                }
                if config.timeframes.is_empty() {
                    config.timeframes = timeframes;
                }
                config.validate()?;
                Ok(Box::new(CandleColorModel::new(config)))
            }
            "delta_pressure" => {
                let mut config: DeltaPressureConfig = serde_json::from_value(config)
                    .map_err(|e| ModelError::InvalidConfig(e.to_string()))?;
                if config.symbols.is_empty() {
                    config.symbols = symbols;
                }
                if config.timeframes.is_empty() {
                    config.timeframes = timeframes;
                }
                config.validate()?;
                Ok(Box::new(DeltaPressureModel::new(config)))
            }
            _ => Err(ModelError::NotFound(name.to_string())),
        }
    }

    /// Create a model with default configuration.
    pub fn create_default(
        &self,
        name: &str,
        symbols: Vec<String>,
        timeframes: Vec<Timeframe>,
    ) -> Result<Box<dyn Model>, ModelError> {
        let info = self
            .get(name)
            .ok_or_else(|| ModelError::NotFound(name.to_string()))?;
        self.create(name, info.default_config.clone(), symbols, timeframes)
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_scope() -> (Vec<String>, Vec<Timeframe>) {
        (
            vec!["btcusdt".to_string()],
            vec![Timeframe::minutes(1), Timeframe::minutes(5)],
        )
    }

    #[test]
    fn test_registry_list() {
        let registry = ModelRegistry::new();
        let models = registry.list();

        assert_eq!(models.len(), 2);
    }

    #[test]
    fn test_registry_get() {
        let registry = ModelRegistry::new();

        assert!(registry.get("candle_color").is_some());
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_create_default_inherits_run_scope() {
        let registry = ModelRegistry::new();
        let (symbols, timeframes) = run_scope();

        let model = registry.create_default("candle_color", symbols, timeframes.clone());
        assert!(model.is_ok());

        let model = model.unwrap();
        assert_eq!(model.name(), "candle_color");
        assert_eq!(model.timeframes(), timeframes.as_slice());
        assert!(model.subscribes_to("btcusdt", Timeframe::minutes(1)));
        assert!(!model.subscribes_to("ethusdt", Timeframe::minutes(1)));
    }

    #[test]
    fn test_create_with_pinned_subscription() {
        let registry = ModelRegistry::new();
        let (symbols, timeframes) = run_scope();

        let config = serde_json::json!({
            "symbols": ["ethusdt"],
            "timeframes": ["5m"],
            "context_len": 2
        });

        let model = registry
            .create("candle_color", config, symbols, timeframes)
            .unwrap();
        assert!(model.subscribes_to("ethusdt", Timeframe::minutes(5)));
        assert!(!model.subscribes_to("ethusdt", Timeframe::minutes(1)));
        assert!(!model.subscribes_to("btcusdt", Timeframe::minutes(5)));
        assert_eq!(model.context_len(), 2);
    }

    #[test]
    fn test_create_rejects_bad_config() {
        let registry = ModelRegistry::new();
        let (symbols, timeframes) = run_scope();

        let config = serde_json::json!({ "threshold": 2.0 });
        let result = registry.create("delta_pressure", config, symbols, timeframes);
        assert!(matches!(result, Err(ModelError::InvalidConfig(_))));
    }

    #[test]
    fn test_create_unknown_model() {
        let registry = ModelRegistry::new();
        let (symbols, timeframes) = run_scope();

        let result = registry.create_default("unknown", symbols, timeframes);
        assert!(matches!(result, Err(ModelError::NotFound(_))));
    }
}
