//! Configuration management for nomsops
//!
//! This module handles loading, validation, and management of
//! nomsops configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Synthetic dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Seed for reproducible datasets; omit for a fresh dataset on
    /// every start
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_prisoner_count")]
    pub prisoner_count: usize,
    #[serde(default = "default_sender_count")]
    pub sender_count: usize,
    #[serde(default = "default_recipient_count")]
    pub recipient_count: usize,
    #[serde(default = "default_credit_count")]
    pub credit_count: usize,
    #[serde(default = "default_disbursement_count")]
    pub disbursement_count: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            seed: None,
            prisoner_count: default_prisoner_count(),
            sender_count: default_sender_count(),
            recipient_count: default_recipient_count(),
            credit_count: default_credit_count(),
            disbursement_count: default_disbursement_count(),
        }
    }
}

fn default_prisoner_count() -> usize {
    40
}

fn default_sender_count() -> usize {
    45
}

fn default_recipient_count() -> usize {
    35
}

fn default_credit_count() -> usize {
    50
}

fn default_disbursement_count() -> usize {
    40
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Synthetic dataset settings
    #[serde(default)]
    pub dataset: DatasetConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(&path).map_err(|_| ConfigError::IoError)?;

        let config: Config = serde_yaml::from_str(&content).map_err(|_| ConfigError::InvalidYaml)?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is
    /// absent (the prototype should run without any setup)
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path.to_path_buf())
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        let counts = [
            ("dataset.prisoner_count", self.dataset.prisoner_count),
            ("dataset.sender_count", self.dataset.sender_count),
            ("dataset.recipient_count", self.dataset.recipient_count),
        ];
        for (field, count) in counts {
            if count == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "At least one record is required".to_string(),
                });
            }
        }

        match self.logging.level.as_str() {
            "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Unknown log level: {}", other),
            }),
        }
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}

// ==================== Tests ====================
