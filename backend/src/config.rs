//! Configuration management for the freight enquiry service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with ENQ_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Other-services directory source
    pub directory: DirectoryConfig,

    /// Cargo derivation settings
    pub derivation: DerivationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DirectoryConfig {
    /// CSV file with service_code,label,transport_mode,full_groupage columns
    pub csv_path: Option<String>,

    /// External directory service endpoint returning the list as JSON
    pub url: Option<String>,

    /// API key sent to the directory service
    pub api_key: Option<String>,

    /// Seconds before a fetched directory is considered stale
    pub refresh_secs: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DerivationConfig {
    /// Coalescing window advertised to wizard hosts
    pub debounce_ms: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("ENQ_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("directory.refresh_secs", 900)?
            .set_default("derivation.debounce_ms", shared::DEFAULT_DEBOUNCE_MS)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (ENQ_ prefix)
            .add_source(
                Environment::with_prefix("ENQ")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            debounce_ms: shared::DEFAULT_DEBOUNCE_MS,
        }
    }
}
