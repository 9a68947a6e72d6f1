use std::sync::Arc;

use sizeline_store::SeriesStore;
use sizeline_types::{BucketId, BucketSnapshot};
use tracing::{debug, error, info};

use crate::error::{PipelineError, PipelineResult};
use crate::paging::{PageCursor, PagingError};

/// Reads a bucket's full series in timestamp order.
///
/// The reader passes the bucket as a partition hint but does not rely on
/// it: rows from other partitions are dropped client-side. Against a backend
/// without server-side partition filtering every fetch is therefore a
/// full-table scan, and its cost grows with the history of *all* buckets.
pub struct SeriesReader {
    series: Arc<dyn SeriesStore>,
    max_pages: Option<usize>,
}

impl SeriesReader {
    pub fn new(series: Arc<dyn SeriesStore>) -> Self {
        Self {
            series,
            max_pages: None,
        }
    }

    /// Fail the scan with [`PipelineError::StoreRead`] past this many pages.
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Every snapshot recorded for `bucket`, ascending by timestamp.
    ///
    /// All scan pages are exhausted before sorting. Snapshots sharing a
    /// timestamp keep their scan order. An empty history is `Ok(vec![])`.
    pub async fn fetch(&self, bucket: &BucketId) -> PipelineResult<Vec<BucketSnapshot>> {
        let read_failed = |source: PagingError| {
            error!(bucket = %bucket, error = %source, "error fetching series");
            PipelineError::StoreRead {
                bucket: bucket.clone(),
                source,
            }
        };

        let mut cursor = PageCursor::new(self.max_pages);
        let mut snapshots = Vec::new();
        let mut foreign = 0usize;
        loop {
            cursor.start_page().map_err(read_failed)?;
            let page = self
                .series
                .scan_page(Some(bucket.as_str()), cursor.token())
                .await
                .map_err(|e| read_failed(e.into()))?;

            for item in &page.items {
                if item.partition_key != bucket.as_str() {
                    foreign += 1;
                    continue;
                }
                snapshots.push(item.to_snapshot().map_err(|e| read_failed(e.into()))?);
            }
            debug!(bucket = %bucket, page = cursor.pages(), total = snapshots.len(), "scanned page");

            if !cursor.advance(page.next_token).map_err(read_failed)? {
                break;
            }
        }

        snapshots.sort_by_key(|s| s.timestamp);
        info!(
            bucket = %bucket,
            snapshots = snapshots.len(),
            skipped = foreign,
            pages = cursor.pages(),
            "fetched series"
        );
        Ok(snapshots)
    }
}
