//! Background refresh loop
//!
//! One task per cache. Each iteration waits for the periodic timer or a
//! coalesced refresh request, fetches the resource, and on success swaps the
//! snapshot and mirrors the bytes to the fallback file. Shutdown is checked
//! while waiting and again after every fetch; a fetch in flight is always
//! allowed to finish.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::snapshot::{Origin, Snapshot};
use crate::config::MIN_REFRESH_PERIOD;
use crate::error::FetchError;
use crate::fallback::FallbackFile;
use crate::source::Source;

/// Runs `source.fetch()` bounded by `timeout`
pub(crate) async fn fetch_with_timeout<S: Source>(
    source: &S,
    timeout: Duration,
) -> Result<Bytes, FetchError> {
    match time::timeout(timeout, source.fetch()).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(timeout)),
    }
}

/// State owned by the background refresh task
pub(crate) struct RefreshTask<S> {
    pub(crate) source: S,
    pub(crate) fallback: FallbackFile,
    pub(crate) snapshot: Arc<ArcSwap<Snapshot>>,
    pub(crate) requests: mpsc::Receiver<()>,
    pub(crate) shutdown: CancellationToken,
    pub(crate) period: Duration,
    pub(crate) fetch_timeout: Duration,
}

impl<S: Source> RefreshTask<S> {
    pub(crate) async fn run(mut self) {
        // interval_at panics on a zero period
        let period = self.period.max(MIN_REFRESH_PERIOD);
        // First timer-driven refresh happens one full period after bootstrap
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                _ = interval.tick() => {}
                request = self.requests.recv() => {
                    // Every sender is gone, so the cache itself was dropped
                    if request.is_none() {
                        break;
                    }
                }
            }

            self.refresh_once().await;

            if self.shutdown.is_cancelled() {
                break;
            }
        }

        debug!(source = %self.source.describe(), "refresh task stopped");
    }

    /// Performs one refresh attempt. Failures are logged and swallowed.
    async fn refresh_once(&self) {
        let content = match fetch_with_timeout(&self.source, self.fetch_timeout).await {
            Ok(content) => content,
            Err(err) => {
                warn!(source = %self.source.describe(), "refresh failed, keeping stale content: {err}");
                return;
            }
        };

        self.snapshot
            .store(Arc::new(Snapshot::new(content.clone(), Origin::Remote)));
        debug!(source = %self.source.describe(), bytes = content.len(), "refreshed");

        if let Err(err) = self.fallback.write(&content).await {
            warn!(
                "cannot write to fallback file {}: {err}",
                self.fallback.path().display()
            );
        }
    }
}
