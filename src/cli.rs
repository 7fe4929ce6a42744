//! CLI command implementations for Linewar.

pub(crate) mod batch;
pub(crate) mod config;
pub(crate) mod run;

mod output;

use clap::ValueEnum;
use linewar::{ConfigError, MatchError, MatchOptions, SimConfig};
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `batch` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum BatchFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Match settings shared by `run` and `batch`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MatchArgs {
    /// Seed, or a clock-derived one when absent.
    pub(crate) seed: Option<u64>,
    pub(crate) max_ticks: u64,
    pub(crate) level: u32,
    pub(crate) autopilot: bool,
}

impl MatchArgs {
    /// Options for the match with the given seed.
    pub(crate) const fn options(self, seed: u64) -> MatchOptions {
        MatchOptions {
            seed,
            max_ticks: self.max_ticks,
            autopilot: self.autopilot,
            level: self.level,
        }
    }

    /// The configured seed or one taken from the wall clock.
    pub(crate) fn seed_or_clock(self) -> u64 {
        self.seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() ^ u64::from(d.subsec_nanos()))
                .unwrap_or(42)
        })
    }
}

/// Load the configuration file, or the defaults when none is given.
pub(crate) fn load_config(path: Option<&Path>) -> Result<SimConfig, CliError> {
    let config = match path {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    Ok(config)
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<MatchError> for CliError {
    fn from(e: MatchError) -> Self {
        Self::new(e.to_string())
    }
}
