use std::path::Path;

use crate::config::schema::{Config, CONFIG_VERSION};
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    config.parse_timezone()?;
    config.parse_schedule()?;

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation {
            message: "timeout_secs must be greater than zero".to_string(),
        });
    }

    if !(1..=365).contains(&config.active_window_days) {
        return Err(ConfigError::Validation {
            message: format!(
                "active_window_days must be between 1 and 365, got {}",
                config.active_window_days
            ),
        });
    }

    let model = &config.modeling;
    for (name, value) in [
        ("watch_minutes_per_view", model.watch_minutes_per_view),
        ("avg_watch_time", model.avg_watch_time),
        ("completion_rate", model.completion_rate),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Validation {
                message: format!("modeling.{} must be a non-negative number", name),
            });
        }
    }

    Ok(())
}
