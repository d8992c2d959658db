//! On-disk fallback copy of the cached resource
//!
//! The file is a raw mirror of the last successfully fetched body. It is read
//! only when the remote source is unreachable at construction time, and
//! overwritten after every successful refresh. Writes go straight to the target
//! path (no temp file, no rename), so a crash mid-write can leave a truncated
//! copy behind.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Reads and writes the local fallback copy
#[derive(Debug, Clone)]
pub struct FallbackFile {
    /// Location of the fallback copy
    path: PathBuf,
    /// Permission bits used when the file is created
    #[cfg_attr(not(unix), allow(dead_code))]
    mode: u32,
}

impl FallbackFile {
    pub fn new(path: impl Into<PathBuf>, mode: u32) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole fallback copy
    pub async fn read(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path).await
    }

    /// Overwrites the fallback copy with `content`
    ///
    /// The file is created with the configured mode if it does not exist yet;
    /// an existing file keeps its permissions.
    pub async fn write(&self, content: &[u8]) -> io::Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(self.mode);

        let mut file = options.open(&self.path).await?;
        file.write_all(content).await?;
        file.flush().await
    }
}
