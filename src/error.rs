//! Error types for fetching and bootstrapping the cache

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when fetching the remote resource
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be built
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// Transport failure, timeout, or an error while reading the body
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with anything other than 200 OK
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    /// The fetch did not complete within the configured timeout
    #[error("fetch timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// A non-HTTP source could not produce the resource
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned when constructing a cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// Neither the remote source nor the fallback file could be read
    #[error("cannot load {source_name} ({remote}) nor fallback file {} ({local})", .path.display())]
    Bootstrap {
        source_name: String,
        remote: FetchError,
        path: PathBuf,
        local: io::Error,
    },

    /// The HTTP source could not be set up at all
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
