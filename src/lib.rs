//! mirrorcache library
//!
//! A read-through cache for a single remote file. Readers get the last good
//! copy instantly; a background task refreshes it on a timer and on demand, and
//! mirrors it to a local file used as a fallback at startup.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fallback;
pub mod source;

pub use cache::{Cache, Origin, Snapshot};
pub use config::CacheConfig;
pub use error::{CacheError, FetchError};
pub use source::{HttpSource, Source};
