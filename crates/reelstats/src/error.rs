use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReelstatsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Aggregation error: {0}")]
    Aggregation(#[from] crate::analytics::AggregationError),

    #[error("Scheduler error: {0}")]
    Scheduler(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid time zone '{name}': {reason}")]
    InvalidTimezone { name: String, reason: String },

    #[error("Invalid schedule '{expression}': {reason}")]
    InvalidSchedule { expression: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ReelstatsError>;
