//! Configuration management for Leihwerk

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Lending policy knobs.
#[derive(Debug, Deserialize, Clone)]
pub struct LendingConfig {
    /// Whether one equipment item may collect several open requests at
    /// once. On, first come first served at handover time; off, a second
    /// submission for a busy item is refused outright.
    pub allow_multiple_pending_per_asset: bool,
    /// Whether approving a request already blocks the equipment, or only
    /// handing it over does.
    pub reserve_on_approve: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub lending: LendingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (LEIHWERK_LENDING__RESERVE_ON_APPROVE=true);
            // the double underscore keeps multi-word keys intact
            .add_source(
                Environment::with_prefix("LEIHWERK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self {
            // Matches the behavior the lab has lived with so far:
            // several people may queue on one item, and nothing is
            // blocked before handover.
            allow_multiple_pending_per_asset: true,
            reserve_on_approve: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
