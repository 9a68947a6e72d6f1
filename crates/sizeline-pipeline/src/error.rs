use sizeline_store::StoreError;
use sizeline_types::BucketId;

use crate::paging::PagingError;
use crate::render::RenderError;

/// Failures of one pipeline invocation.
///
/// An empty series is not an error: the report path returns
/// [`ReportOutcome::NoData`](crate::ReportOutcome::NoData) for it.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Listing the bucket failed or could not be completed. Nothing was
    /// written.
    #[error("listing bucket {bucket} failed: {source}")]
    Listing {
        bucket: BucketId,
        #[source]
        source: PagingError,
    },

    /// A snapshot row or chart artifact could not be written.
    #[error("writing {target} failed: {source}")]
    StoreWrite {
        target: String,
        #[source]
        source: StoreError,
    },

    /// The series for a bucket could not be read or decoded.
    #[error("reading series for {bucket} failed: {source}")]
    StoreRead {
        bucket: BucketId,
        #[source]
        source: PagingError,
    },

    /// The chart could not be produced from the series.
    #[error("rendering chart failed: {0}")]
    Render(#[from] RenderError),
}

impl PipelineError {
    /// Short stable name of the failure class, for logs and responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Listing { .. } => "listing",
            Self::StoreWrite { .. } => "store_write",
            Self::StoreRead { .. } => "store_read",
            Self::Render(_) => "render",
        }
    }
}

/// Result alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
