//! # Logging Configuration
//!
//! Environment-driven configuration for the logging subsystem.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, Registry};

/// Logging configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format (json, pretty, compact)
    #[serde(default = "default_format")]
    pub format: String,

    /// Optional log file path
    #[serde(default)]
    pub log_file: Option<String>,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "json".to_string()
}

impl LoggingConfig {
    /// Create configuration from environment variables, falling back to the
    /// provided defaults.
    pub fn from_env(level: &str, format: &str, log_file: Option<&str>) -> Self {
        Self {
            level: std::env::var("RUST_LOG").ok().unwrap_or_else(|| level.to_string()),
            format: std::env::var("MERIDIAN_LOG_FORMAT")
                .ok()
                .unwrap_or_else(|| format.to_string()),
            log_file: std::env::var("MERIDIAN_LOG_FILE")
                .ok()
                .or_else(|| log_file.map(|s| s.to_string())),
        }
    }

    /// Build the tracing subscriber from this configuration.
    pub fn build(&self) -> Box<dyn tracing::Subscriber + Send + Sync> {
        let level: LevelFilter = self.level.parse().unwrap_or(LevelFilter::INFO);

        match self.format.as_str() {
            "pretty" => {
                let layer = fmt::layer().pretty().with_timer(fmt::time::UtcTime::rfc_3339());
                Box::new(Registry::default().with(level).with(layer))
            }
            "compact" => {
                let layer = fmt::layer().compact().with_timer(fmt::time::UtcTime::rfc_3339());
                Box::new(Registry::default().with(level).with(layer))
            }
            // json is the default for anything unrecognized
            _ => {
                let layer = fmt::layer().json().with_timer(fmt::time::UtcTime::rfc_3339());
                if let Some(ref log_file) = self.log_file {
                    let path = PathBuf::from(log_file);
                    let file_appender = tracing_appender::rolling::hourly(
                        path.parent().unwrap_or(&PathBuf::from(".")),
                        path.file_name().unwrap_or_default().to_string_lossy().as_ref(),
                    );
                    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
                    let file_layer = fmt::layer().json().with_writer(non_blocking);
                    Box::new(Registry::default().with(level).with(layer).with(file_layer))
                } else {
                    Box::new(Registry::default().with(level).with(layer))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = LoggingConfig::from_env("info", "json", None);
        assert_eq!(config.level, "info");
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_build_json_subscriber() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: "json".to_string(),
            log_file: None,
        };
        let _subscriber = config.build();
    }

    #[test]
    fn test_build_pretty_subscriber() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            format: "pretty".to_string(),
            log_file: None,
        };
        let _subscriber = config.build();
    }

    #[test]
    fn test_unknown_format_falls_back_to_json() {
        let config = LoggingConfig {
            level: "info".to_string(),
            format: "xml".to_string(),
            log_file: None,
        };
        let _subscriber = config.build();
    }
}
