//! Runtime configuration read from the environment.

use nodegate_canonical::DEFAULT_MAX_ID_LEN;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable did not parse.
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    /// Unknown log format.
    #[error("{var} must be 'text' or 'json', got '{value}'")]
    InvalidLogFormat { var: &'static str, value: String },
}

/// Filter used when neither `NODEGATE_LOG`, `--log` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Explicit filter from `NODEGATE_LOG` or `--log`.
    pub log_level: Option<String>,
    pub log_format: String, // "json" or "text"
    pub max_id_len: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            log_level: lookup("NODEGATE_LOG").or(defaults.log_level),
            log_format: lookup("NODEGATE_LOG_FORMAT").unwrap_or(defaults.log_format),
            max_id_len: match lookup("NODEGATE_MAX_ID_LEN") {
                Some(raw) => parse_positive("NODEGATE_MAX_ID_LEN", &raw)?,
                None => defaults.max_id_len,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Applies command-line overrides.
    pub fn with_overrides(
        mut self,
        log_level: Option<String>,
        log_format: Option<String>,
        max_id_len: Option<usize>,
    ) -> Result<Self, ConfigError> {
        if log_level.is_some() {
            self.log_level = log_level;
        }
        if let Some(format) = log_format {
            self.log_format = format;
        }
        if let Some(max) = max_id_len {
            if max == 0 {
                return Err(ConfigError::InvalidNumber {
                    var: "--max-id-len",
                    value: max.to_string(),
                });
            }
            self.max_id_len = max;
        }
        self.validate()?;
        Ok(self)
    }

    /// Filter directive for the subscriber. An explicit level wins over
    /// `rust_log`, which wins over [`DEFAULT_LOG_LEVEL`].
    pub fn log_directive(&self, rust_log: Option<String>) -> String {
        self.log_level
            .clone()
            .or(rust_log)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.log_format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(ConfigError::InvalidLogFormat {
                var: "NODEGATE_LOG_FORMAT",
                value: other.to_string(),
            }),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: None,
            log_format: "text".to_string(),
            max_id_len: DEFAULT_MAX_ID_LEN,
        }
    }
}

fn parse_positive(var: &'static str, raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: raw.to_string(),
        }),
    }
}
