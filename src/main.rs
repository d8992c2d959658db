//! mirrorcache - keep a self-refreshing copy of a remote file
//!
//! Bootstraps a [`Cache`] for one URL. With `--once` the content is written to
//! stdout; otherwise the cache keeps running and every content change is
//! logged until Ctrl-C.

use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use mirrorcache::cli::Cli;
use mirrorcache::Cache;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so `--once` output stays clean
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Polls the cache like a request handler would and logs whenever the content changes
async fn watch(cache: &Cache, period: Duration) {
    let mut last = cache.snapshot();
    let mut ticker = tokio::time::interval(period);
    // Skip the first tick (immediate)
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let current = cache.snapshot();
                if current.content != last.content {
                    info!(
                        bytes = current.content.len(),
                        fetched_at = %current.fetched_at,
                        "content changed"
                    );
                }
                last = current;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, shutting down");
                break;
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let config = match cli.cache_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };
    let period = config.refresh_period;

    let cache = match Cache::with_config(cli.url.as_str(), &cli.fallback, config).await {
        Ok(cache) => cache,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if cli.once {
        let content = cache.get();
        cache.shutdown().await;
        let mut stdout = io::stdout().lock();
        if let Err(err) = stdout.write_all(&content).and_then(|()| stdout.flush()) {
            eprintln!("error: cannot write to stdout: {err}");
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }

    watch(&cache, period).await;
    cache.shutdown().await;
    ExitCode::SUCCESS
}
