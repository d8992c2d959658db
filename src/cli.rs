//! Command-line interface parsing for the mirrorcache demo binary
//!
//! The binary is a thin embedding of [`Cache`](crate::Cache): it bootstraps a
//! cache for one URL and either prints the content once or keeps it fresh and
//! logs changes until interrupted.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::config::CacheConfig;

/// Error types for CLI argument validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    /// A duration flag was given as zero seconds
    #[error("Invalid value for --{0}: must be at least 1 second")]
    ZeroDuration(&'static str),
}

/// mirrorcache - keep a local, self-refreshing copy of a remote file
#[derive(Parser, Debug)]
#[command(name = "mirrorcache")]
#[command(about = "Keep a self-refreshing in-memory copy of a remote file with an on-disk fallback")]
#[command(version)]
pub struct Cli {
    /// URL of the remote resource
    pub url: String,

    /// Local file used when the URL is unreachable at startup, and updated after every refresh
    #[arg(long, short = 'f', value_name = "PATH")]
    pub fallback: PathBuf,

    /// Seconds between timer-driven refreshes
    #[arg(long, value_name = "SECS", default_value_t = 20)]
    pub period: u64,

    /// Seconds before a single fetch is abandoned
    #[arg(long, value_name = "SECS", default_value_t = 15)]
    pub timeout: u64,

    /// Print the bootstrapped content to stdout and exit
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    /// Builds the cache configuration from the parsed flags.
    ///
    /// # Returns
    /// * `Ok(CacheConfig)` with the requested timings
    /// * `Err(CliError)` if a duration is zero
    pub fn cache_config(&self) -> Result<CacheConfig, CliError> {
        if self.period == 0 {
            return Err(CliError::ZeroDuration("period"));
        }
        if self.timeout == 0 {
            return Err(CliError::ZeroDuration("timeout"));
        }

        Ok(CacheConfig::default()
            .with_refresh_period(Duration::from_secs(self.period))
            .with_fetch_timeout(Duration::from_secs(self.timeout)))
    }
}
