//! Run configuration for conformance tests.

use std::env;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use weight_types::TextFormat;

/// Environment variable overriding [`TesterConfig::seed`].
pub const SEED_VAR: &str = "WEIGHT_TEST_SEED";
/// Environment variable overriding [`TesterConfig::repeat`].
pub const REPEAT_VAR: &str = "WEIGHT_TEST_REPEAT";
/// Environment variable overriding the parentheses flag of [`TesterConfig::format`].
pub const PARENTHESES_VAR: &str = "WEIGHT_TEST_PARENTHESES";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name}={value:?} is not a valid {expected}")]
    InvalidVar {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Seed, iteration count and text format of a conformance run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TesterConfig {
    pub seed: u64,
    pub repeat: usize,
    pub format: TextFormat,
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            seed: 403,
            repeat: 10_000,
            format: TextFormat::default(),
        }
    }
}

impl TesterConfig {
    /// Defaults overridden by the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overridden_from_env()
    }

    /// `self` with every variable set in the environment applied.
    pub fn overridden_from_env(self) -> Result<Self, ConfigError> {
        self.overridden_by(|name| env::var(name).ok())
    }

    fn overridden_by(
        mut self,
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(SEED_VAR) {
            self.seed = parse_var(SEED_VAR, value, "unsigned integer")?;
        }
        if let Some(value) = lookup(REPEAT_VAR) {
            self.repeat = parse_var(REPEAT_VAR, value, "unsigned integer")?;
        }
        if let Some(value) = lookup(PARENTHESES_VAR) {
            self.format.parentheses = match value.trim() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidVar {
                        name: PARENTHESES_VAR,
                        value,
                        expected: "boolean",
                    })
                }
            };
        }
        tracing::debug!(
            seed = self.seed,
            repeat = self.repeat,
            parentheses = self.format.parentheses,
            "tester configuration resolved"
        );
        Ok(self)
    }

    pub fn with_repeat(self, repeat: usize) -> Self {
        Self { repeat, ..self }
    }

    pub fn with_format(self, format: TextFormat) -> Self {
        Self { format, ..self }
    }
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    value: String,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidVar {
        name,
        value,
        expected,
    })
}
