//! Write seam between the aggregator and the series store.
//!
//! Aggregations of the same bucket are not coordinated: each one appends
//! its own snapshot. The [`SnapshotAppender`] trait is where a coordinated
//! write (for example a conditional put keyed by a monotonic version) would
//! plug in without changing [`Aggregator::handle`](crate::Aggregator::handle).

use async_trait::async_trait;
use sizeline_store::{SeriesItem, SeriesStore, StoreResult};
use sizeline_types::BucketSnapshot;

/// Strategy for committing one snapshot to a series store.
#[async_trait]
pub trait SnapshotAppender: Send + Sync {
    async fn append(&self, series: &dyn SeriesStore, snapshot: &BucketSnapshot) -> StoreResult<()>;
}

/// Plain append with no cross-invocation guard.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnguardedAppend;

#[async_trait]
impl SnapshotAppender for UnguardedAppend {
    async fn append(&self, series: &dyn SeriesStore, snapshot: &BucketSnapshot) -> StoreResult<()> {
        series.put_item(SeriesItem::from_snapshot(snapshot)).await
    }
}
