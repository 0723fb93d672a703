use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory the log file lands in when nothing else is configured
pub const DEFAULT_LOG_DIR: &str = "./logs";

/// LoggingConfig controls the two sinks of a logger
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Minimum severity for both sinks (trace, debug, info, warn, error, off)
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_true")]
    pub color: bool,
    /// Attach source file and line to every record
    #[serde(default = "default_true")]
    pub caller: bool,
    #[serde(default = "default_true")]
    pub console: bool,
    #[serde(default = "default_true")]
    pub file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_dir() -> String {
    DEFAULT_LOG_DIR.to_string()
}
fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: default_log_dir(),
            color: true,
            caller: true,
            console: true,
            file: true,
        }
    }
}

impl LoggingConfig {
    /// Load the configuration from a file (toml, yaml or json by extension).
    /// Missing keys fall back to their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Config::builder()
            .set_default("level", default_log_level())?
            .set_default("log_dir", DEFAULT_LOG_DIR)?
            .set_default("color", true)?
            .set_default("caller", true)?
            .set_default("console", true)?
            .set_default("file", true)?
            .add_source(File::from(path).required(true))
            .build()?;

        let cfg: LoggingConfig = config.try_deserialize()?;

        if cfg.level.trim().is_empty() {
            return Err(ConfigError::Message("logging level must not be empty".to_string()));
        }

        Ok(cfg)
    }
}
