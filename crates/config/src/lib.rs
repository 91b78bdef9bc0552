//! Configuration management for call evaluation
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default.*`, `config/{env}.*`)
//! - Environment variables (`CALL_EVAL__` prefix, `__` separated)

pub mod scoring;
pub mod settings;

pub use scoring::{MetricWeights, ScoringConfig};
pub use settings::{
    load_settings, EmbeddingBackend, EmbeddingSettings, EmpathyProvider, FixedEmpathyConfig,
    LlmConfig, ObservabilityConfig, ServerConfig, Settings, SpeakerProvider, TranscriptionConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => ConfigError::MissingField(key),
            other => ConfigError::ParseError(other.to_string()),
        }
    }
}

impl From<ConfigError> for call_eval_core::Error {
    fn from(err: ConfigError) -> Self {
        call_eval_core::Error::Config(err.to_string())
    }
}
