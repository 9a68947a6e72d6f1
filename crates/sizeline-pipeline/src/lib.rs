//! Bucket-size aggregation and reporting pipeline.
//!
//! Two entry points, each one stateless unit of work per invocation:
//!
//! - [`Aggregator::handle`] -- on an object mutation, recompute the bucket's
//!   total size and object count from a full listing and append one
//!   [`BucketSnapshot`](sizeline_types::BucketSnapshot)
//! - [`ReportHandler::handle`] -- read the bucket's series, render it as a
//!   PNG line chart, store the chart at a fixed key, and return its locator
//!
//! Supporting pieces:
//!
//! - [`SeriesReader`] -- exhausts the series scan and orders it by timestamp
//! - [`ChartRenderer`] -- pure `points -> PNG bytes`
//! - [`SnapshotAppender`] -- seam for cross-invocation coordination on write
//!
//! # Design Rules
//!
//! 1. Every total is recomputed from a complete listing; event payloads are
//!    never applied as deltas.
//! 2. Nothing is partially committed: an aggregation writes one whole
//!    snapshot or none, a report writes one whole artifact or none.
//! 3. Nothing retries internally. Failures surface as [`PipelineError`] and
//!    the invoking trigger decides whether to redeliver.
//! 4. There is no lock across invocations. Concurrent aggregations of the
//!    same bucket each append their own snapshot.
//! 5. Every pagination loop terminates once the adapter stops returning a
//!    continuation token, and fails instead of following any token it has
//!    already followed. Running totals fail rather than overflow.

pub mod aggregator;
pub mod appender;
pub mod config;
pub mod error;
pub mod paging;
pub mod reader;
pub mod render;
pub mod report;

pub use aggregator::{Aggregator, SizeTally};
pub use appender::{SnapshotAppender, UnguardedAppend};
pub use config::{ChartConfig, PipelineConfig};
pub use error::{PipelineError, PipelineResult};
pub use paging::PagingError;
pub use reader::SeriesReader;
pub use render::{AxisRange, ChartLayout, ChartMetadata, ChartRenderer, RenderError};
pub use report::{ArtifactTarget, ReportHandler, ReportOutcome, ReportQuery, ReportStatus};

#[cfg(test)]
pub(crate) mod testing;
