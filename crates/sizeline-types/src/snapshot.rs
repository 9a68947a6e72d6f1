use serde::{Deserialize, Serialize};

use crate::bucket::BucketId;

/// One recorded observation of a bucket's aggregate size.
///
/// `object_count` and `total_size` always come from a single complete
/// listing pass; a snapshot is never built from a partial listing. Snapshots
/// are immutable once written and are keyed by `(bucket, timestamp)`.
/// Two snapshots for the same bucket may share a timestamp; both are valid.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BucketSnapshot {
    pub bucket: BucketId,
    /// Seconds since the unix epoch, taken after the listing completed.
    pub timestamp: i64,
    pub object_count: u64,
    /// Sum of object sizes in bytes.
    pub total_size: u64,
}

impl BucketSnapshot {
    pub fn new(bucket: BucketId, timestamp: i64, object_count: u64, total_size: u64) -> Self {
        Self {
            bucket,
            timestamp,
            object_count,
            total_size,
        }
    }

    /// The chart projection of this snapshot. `object_count` is dropped.
    pub fn point(&self) -> SeriesPoint {
        SeriesPoint {
            timestamp: self.timestamp,
            total_size: self.total_size,
        }
    }
}

/// A `(timestamp, total_size)` pair as plotted by the chart renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: i64,
    pub total_size: u64,
}

impl SeriesPoint {
    pub fn new(timestamp: i64, total_size: u64) -> Self {
        Self {
            timestamp,
            total_size,
        }
    }
}

impl From<&BucketSnapshot> for SeriesPoint {
    fn from(snapshot: &BucketSnapshot) -> Self {
        snapshot.point()
    }
}
