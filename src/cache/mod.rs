//! Self-refreshing cache of a single remote resource
//!
//! A [`Cache`] serves an in-memory snapshot of one remote resource without
//! ever blocking the caller, while a background task keeps the snapshot fresh
//! on a timer and whenever a reader asks for it. The last good copy is mirrored
//! to a local file, which is used to bootstrap when the remote source is down
//! at startup.
//!
//! ```no_run
//! # async fn demo() -> Result<(), mirrorcache::CacheError> {
//! let cache = mirrorcache::Cache::new("https://example.com/config.yaml", "/var/lib/app/config.yaml").await?;
//!
//! // In a request handler: returns immediately and nudges a refresh.
//! let body = cache.get();
//! # drop(body);
//!
//! cache.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod refresh;
mod snapshot;

pub use snapshot::{Origin, Snapshot};

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::CacheConfig;
use crate::error::CacheError;
use crate::fallback::FallbackFile;
use crate::source::{HttpSource, Source};
use refresh::{fetch_with_timeout, RefreshTask};

/// In-memory copy of a remote resource, refreshed in the background
///
/// Readers call [`get`](Cache::get) or [`snapshot`](Cache::snapshot) from any
/// thread. The snapshot is swapped atomically by the refresh task, so a reader
/// sees either the old or the new content, never a mix. Dropping the cache
/// stops the refresh task at its next check; call [`shutdown`](Cache::shutdown)
/// to also wait for it.
#[derive(Debug)]
pub struct Cache {
    /// Current snapshot, written only by the refresh task
    snapshot: Arc<ArcSwap<Snapshot>>,
    /// Capacity-one queue of pending refresh requests
    refresh_tx: mpsc::Sender<()>,
    /// Tells the refresh task to stop
    shutdown: CancellationToken,
    /// Refresh task handle, taken by the first shutdown
    task: Mutex<Option<JoinHandle<()>>>,
    /// Description of the remote source
    source_name: String,
    /// Location of the fallback copy
    fallback_path: PathBuf,
}

impl Cache {
    /// Creates a cache of the resource at `url`, with default timings
    ///
    /// # Arguments
    /// * `url` - Location of the remote resource
    /// * `fallback_path` - Local copy used when `url` is unreachable at startup
    ///
    /// # Returns
    /// * `Ok(Cache)` holding either the remote content or the fallback copy
    /// * `Err(CacheError::Bootstrap)` if neither could be read
    pub async fn new(
        url: impl Into<String>,
        fallback_path: impl Into<PathBuf>,
    ) -> Result<Self, CacheError> {
        Self::with_config(url, fallback_path, CacheConfig::default()).await
    }

    /// Creates a cache of the resource at `url` with explicit settings
    pub async fn with_config(
        url: impl Into<String>,
        fallback_path: impl Into<PathBuf>,
        config: CacheConfig,
    ) -> Result<Self, CacheError> {
        let source = HttpSource::new(url, config.fetch_timeout)?;
        Self::with_source(source, fallback_path, config).await
    }

    /// Creates a cache backed by an arbitrary [`Source`]
    ///
    /// Fetches the resource once before returning, falling back to the file at
    /// `fallback_path` if the fetch fails. The background refresh task is
    /// spawned on the current Tokio runtime.
    pub async fn with_source<S: Source>(
        source: S,
        fallback_path: impl Into<PathBuf>,
        config: CacheConfig,
    ) -> Result<Self, CacheError> {
        let fallback = FallbackFile::new(fallback_path, config.file_mode);
        let initial = bootstrap(&source, &fallback, &config).await?;

        let snapshot = Arc::new(ArcSwap::from_pointee(initial));
        let (refresh_tx, requests) = mpsc::channel(1);
        let shutdown = CancellationToken::new();
        let source_name = source.describe();
        let fallback_path = fallback.path().to_path_buf();

        let task = tokio::spawn(
            RefreshTask {
                source,
                fallback,
                snapshot: snapshot.clone(),
                requests,
                shutdown: shutdown.clone(),
                period: config.refresh_period,
                fetch_timeout: config.fetch_timeout,
            }
            .run(),
        );

        Ok(Self {
            snapshot,
            refresh_tx,
            shutdown,
            task: Mutex::new(Some(task)),
            source_name,
            fallback_path,
        })
    }

    /// Returns the current content and requests a background refresh
    ///
    /// Never blocks. If a refresh request is already pending, no new one is
    /// queued.
    pub fn get(&self) -> Bytes {
        let content = self.snapshot.load().content.clone();
        self.refresh();
        content
    }

    /// Returns the current snapshot with its metadata and requests a refresh
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let snapshot = self.snapshot.load_full();
        self.refresh();
        snapshot
    }

    /// Requests a background refresh without reading
    ///
    /// Requests coalesce: while one is pending, further calls are dropped.
    pub fn refresh(&self) {
        // Full means a request is already pending; closed means the task is gone
        let _ = self.refresh_tx.try_send(());
    }

    /// Stops the background refresh task and waits for it to exit
    ///
    /// A fetch in flight is allowed to finish first. Calling this more than
    /// once is harmless; later calls return as soon as the first one has taken
    /// the task handle.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();

        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(task) = task {
            if let Err(err) = task.await {
                warn!(source = %self.source_name, "refresh task ended abnormally: {err}");
            }
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn fallback_path(&self) -> &Path {
        &self.fallback_path
    }
}

impl Drop for Cache {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Loads the initial snapshot: remote first, then the fallback file
async fn bootstrap<S: Source>(
    source: &S,
    fallback: &FallbackFile,
    config: &CacheConfig,
) -> Result<Snapshot, CacheError> {
    let remote = match fetch_with_timeout(source, config.fetch_timeout).await {
        Ok(content) => {
            info!(source = %source.describe(), bytes = content.len(), "loaded from remote");
            return Ok(Snapshot::new(content, Origin::Remote));
        }
        Err(err) => err,
    };

    warn!(
        source = %source.describe(),
        "cannot load from remote: {remote}, trying fallback file {}",
        fallback.path().display()
    );

    match fallback.read().await {
        Ok(content) => {
            info!(
                bytes = content.len(),
                "loaded from fallback file {}",
                fallback.path().display()
            );
            Ok(Snapshot::new(content, Origin::Fallback))
        }
        Err(local) => Err(CacheError::Bootstrap {
            source_name: source.describe(),
            remote,
            path: fallback.path().to_path_buf(),
            local,
        }),
    }
}
