use bytes::Bytes;
use chrono::{DateTime, Utc};

/// Where the content of a snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Fetched from the remote source
    Remote,
    /// Read from the fallback file during bootstrap
    Fallback,
}

/// An immutable view of the cached resource
///
/// Snapshots are replaced as a whole, so the content and its metadata are
/// always consistent with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Raw bytes of the resource
    pub content: Bytes,
    /// When the content was obtained
    pub fetched_at: DateTime<Utc>,
    /// Where the content was obtained from
    pub origin: Origin,
}

impl Snapshot {
    pub(crate) fn new(content: impl Into<Bytes>, origin: Origin) -> Self {
        Self {
            content: content.into(),
            fetched_at: Utc::now(),
            origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_records_fetch_time() {
        let before = Utc::now();
        let snapshot = Snapshot::new(b"v1".to_vec(), Origin::Remote);
        let after = Utc::now();

        assert_eq!(snapshot.content, Bytes::from_static(b"v1"));
        assert_eq!(snapshot.origin, Origin::Remote);
        assert!(snapshot.fetched_at >= before);
        assert!(snapshot.fetched_at <= after);
    }
}
