use std::sync::Arc;

use sizeline_store::{ObjectEntry, ObjectStore, SeriesStore};
use sizeline_types::{BucketId, BucketSnapshot, Clock};
use tracing::{debug, error, info};

use crate::appender::{SnapshotAppender, UnguardedAppend};
use crate::error::{PipelineError, PipelineResult};
use crate::paging::{PageCursor, PagingError};

/// Running totals of one listing pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SizeTally {
    pub object_count: u64,
    pub total_size: u64,
    /// Listing pages fetched, including a final empty page.
    pub pages: usize,
}

impl SizeTally {
    /// Fold one page into the totals. Fails rather than wrapping.
    fn add(&mut self, entries: &[ObjectEntry]) -> Result<(), PagingError> {
        for entry in entries {
            let overflow = PagingError::Overflow(self.object_count);
            self.object_count = self.object_count.checked_add(1).ok_or(overflow.clone())?;
            self.total_size = self.total_size.checked_add(entry.size).ok_or(overflow)?;
        }
        Ok(())
    }
}

/// Recomputes a bucket's size on every mutation and appends one snapshot.
///
/// Totals always come from a full listing; the mutation itself is never
/// applied as a delta. Concurrent calls for the same bucket are not
/// coordinated: each lists independently and appends its own snapshot, so
/// the recorded history is only eventually consistent with the true order of
/// mutations. Coordination, if ever needed, belongs in the
/// [`SnapshotAppender`].
pub struct Aggregator {
    objects: Arc<dyn ObjectStore>,
    series: Arc<dyn SeriesStore>,
    clock: Arc<dyn Clock>,
    appender: Arc<dyn SnapshotAppender>,
    max_pages: Option<usize>,
}

impl Aggregator {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        series: Arc<dyn SeriesStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            objects,
            series,
            clock,
            appender: Arc::new(UnguardedAppend),
            max_pages: None,
        }
    }

    /// Replace the default unguarded append.
    pub fn with_appender(mut self, appender: Arc<dyn SnapshotAppender>) -> Self {
        self.appender = appender;
        self
    }

    /// Fail the listing with [`PipelineError::Listing`] past this many pages.
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Sum sizes and count objects over every page of the bucket listing.
    pub async fn tally(&self, bucket: &BucketId) -> PipelineResult<SizeTally> {
        let listing_failed = |source: PagingError| PipelineError::Listing {
            bucket: bucket.clone(),
            source,
        };

        let mut cursor = PageCursor::new(self.max_pages);
        let mut tally = SizeTally::default();
        loop {
            cursor.start_page().map_err(listing_failed)?;
            let page = self
                .objects
                .list_page(bucket.as_str(), cursor.token())
                .await
                .map_err(|e| listing_failed(e.into()))?;
            tally.add(&page.entries).map_err(listing_failed)?;
            debug!(
                bucket = %bucket,
                page = cursor.pages(),
                entries = page.entries.len(),
                "listed page"
            );
            if !cursor.advance(page.next_token).map_err(listing_failed)? {
                break;
            }
        }
        tally.pages = cursor.pages();
        Ok(tally)
    }

    /// Handle one mutation notification for `bucket`.
    ///
    /// Lists the whole bucket, then reads the clock once, then appends one
    /// snapshot keyed `(bucket, timestamp)`. A listing failure writes
    /// nothing. Nothing is retried here.
    pub async fn handle(&self, bucket: &BucketId) -> PipelineResult<BucketSnapshot> {
        let tally = self.tally(bucket).await.map_err(|e| {
            error!(bucket = %bucket, error = %e, "error calculating bucket size");
            e
        })?;

        let timestamp = self.clock.now_unix();
        let snapshot =
            BucketSnapshot::new(bucket.clone(), timestamp, tally.object_count, tally.total_size);

        self.appender
            .append(self.series.as_ref(), &snapshot)
            .await
            .map_err(|source| {
                error!(bucket = %bucket, timestamp, error = %source, "error writing snapshot");
                PipelineError::StoreWrite {
                    target: format!("snapshot ({bucket}, {timestamp})"),
                    source,
                }
            })?;

        info!(
            bucket = %bucket,
            timestamp,
            object_count = snapshot.object_count,
            total_size = snapshot.total_size,
            pages = tally.pages,
            "recorded bucket snapshot"
        );
        Ok(snapshot)
    }
}
