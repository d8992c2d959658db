//! Timing and file settings for a [`Cache`](crate::Cache)

use std::time::Duration;

/// Timeout applied to every remote fetch, bootstrap included
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Period of the background refresh timer
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(20);

/// Smallest refresh period the timer accepts
pub const MIN_REFRESH_PERIOD: Duration = Duration::from_millis(1);

/// Permissions for a newly created fallback file (owner rw, group/other r)
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Configuration for a cache instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Upper bound on a single remote fetch, including reading the body
    pub fetch_timeout: Duration,
    /// Interval between timer-driven refreshes
    pub refresh_period: Duration,
    /// Unix permission bits used when the fallback file is created
    pub file_mode: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            refresh_period: DEFAULT_REFRESH_PERIOD,
            file_mode: DEFAULT_FILE_MODE,
        }
    }
}

impl CacheConfig {
    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Sets the refresh period.
    ///
    /// Periods below [`MIN_REFRESH_PERIOD`] are raised to it, here and again
    /// when the refresh task starts.
    pub fn with_refresh_period(mut self, refresh_period: Duration) -> Self {
        self.refresh_period = refresh_period.max(MIN_REFRESH_PERIOD);
        self
    }

    pub fn with_file_mode(mut self, file_mode: u32) -> Self {
        self.file_mode = file_mode;
        self
    }
}
