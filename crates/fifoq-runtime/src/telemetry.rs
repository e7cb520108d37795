//! Tracing subscriber setup

use serde::{Deserialize, Serialize};
use std::env;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
    #[error("Subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Explicit filter directives (e.g. "fifoq_runtime=debug"); overrides verbosity
    pub filter: Option<String>,
    /// 0 = warn, 1 = info, 2 = debug, 3+ = trace
    pub verbosity: u8,
}

impl TelemetryConfig {
    /// Load the filter from `FIFOQ_LOG`
    pub fn from_env() -> Self {
        Self {
            filter: env::var("FIFOQ_LOG").ok(),
            verbosity: 0,
        }
    }

    /// Directives used when `RUST_LOG` is not set
    pub fn directives(&self) -> String {
        if let Some(filter) = &self.filter {
            return filter.clone();
        }
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
        .to_string()
    }
}

/// Install a global fmt subscriber. `RUST_LOG` takes precedence over the config.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.directives())
            .map_err(|e| TelemetryError::InvalidFilter(e.to_string()))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        let levels: Vec<String> = (0..5)
            .map(|verbosity| {
                TelemetryConfig {
                    filter: None,
                    verbosity,
                }
                .directives()
            })
            .collect();
        assert_eq!(levels, ["warn", "info", "debug", "trace", "trace"]);
    }

    #[test]
    fn test_filter_overrides_verbosity() {
        let config = TelemetryConfig {
            filter: Some("fifoq_runtime=debug".to_string()),
            verbosity: 3,
        };
        assert_eq!(config.directives(), "fifoq_runtime=debug");
    }
}
