//! Configuration management for the cognitive load estimator

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Default config file location, overridable with `APP_CONFIG`.
const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactsConfig,
    pub models: ModelsConfig,
    pub persistence: PersistenceConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Fitted artifact locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Path to the ONNX prediction model
    pub model_path: String,
    /// Path to the JSON scaler parameters
    pub scaler_path: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            model_path: "model/dt_full_1.onnx".to_string(),
            scaler_path: "model/scaler_1.json".to_string(),
        }
    }
}

/// ONNX runtime configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Number of threads for ONNX inference (default: 1)
    pub onnx_threads: usize,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self { onnx_threads: 1 }
    }
}

/// Optional persistence sink configuration.
///
/// The sink is enabled iff `mongo_uri` is set; everything else has
/// working defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// MongoDB connection string; absent means persistence is disabled
    pub mongo_uri: Option<String>,
    /// Database name
    pub database: String,
    /// Collection receiving estimate records
    pub collection: String,
    /// Upper bound on one sink write, in milliseconds
    pub timeout_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            mongo_uri: None,
            database: "brainlag".to_string(),
            collection: "estimates".to_string(),
            timeout_ms: 2000,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration with the documented precedence:
    /// environment variables override the config file, which overrides
    /// built-in defaults. A missing config file is fine; defaults apply.
    pub fn load() -> Result<Self> {
        let path = std::env::var("APP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = if Path::new(&path).exists() {
            Self::load_from_path(&path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Apply the recognized environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(uri) = std::env::var("MONGO_URI") {
            self.persistence.mongo_uri = Some(uri);
        }
        if let Ok(path) = std::env::var("MODEL_PATH") {
            self.artifacts.model_path = path;
        }
        if let Ok(path) = std::env::var("SCALER_PATH") {
            self.artifacts.scaler_path = path;
        }
    }

    /// Whether the persistence sink is enabled.
    pub fn persistence_enabled(&self) -> bool {
        self.persistence.mongo_uri.is_some()
    }
}
