use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sizeline_store::ObjectStore;
use sizeline_types::{BucketId, SeriesPoint};
use tracing::{error, info, warn};

use crate::config::{ChartConfig, PipelineConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::reader::SeriesReader;
use crate::render::ChartRenderer;

/// Content type of the chart artifact.
pub const ARTIFACT_CONTENT_TYPE: &str = "image/png";

/// Where the chart artifact lives. Each report overwrites it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactTarget {
    pub container: String,
    pub key: String,
}

impl ArtifactTarget {
    pub fn new(container: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            key: key.into(),
        }
    }

    /// `s3://{container}/{key}`
    pub fn locator(&self) -> String {
        format!("s3://{}/{}", self.container, self.key)
    }
}

/// A report request. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportQuery {
    /// Bucket to chart; the handler's default bucket when absent.
    #[serde(default)]
    pub bucket: Option<BucketId>,
}

/// Coarse result class of a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Success,
    NoData,
    Error,
}

/// Outcome of one report invocation.
///
/// "No data yet" is a normal outcome, distinct from failure.
#[derive(Debug)]
pub enum ReportOutcome {
    /// The chart was written; `locator` points at it.
    Success { locator: String, points: usize },
    /// The bucket has no recorded snapshots. Nothing was rendered or written.
    NoData { bucket: BucketId },
    /// Some stage failed. Nothing was written.
    Error(PipelineError),
}

impl ReportOutcome {
    pub fn status(&self) -> ReportStatus {
        match self {
            Self::Success { .. } => ReportStatus::Success,
            Self::NoData { .. } => ReportStatus::NoData,
            Self::Error(_) => ReportStatus::Error,
        }
    }

    pub fn locator(&self) -> Option<&str> {
        match self {
            Self::Success { locator, .. } => Some(locator),
            _ => None,
        }
    }
}

/// Reads a bucket's series, renders it, and stores the chart.
///
/// Stages run strictly in sequence: fetch, screen for empty, project to
/// points, render, put. There are no retries.
pub struct ReportHandler {
    reader: SeriesReader,
    renderer: ChartRenderer,
    objects: Arc<dyn ObjectStore>,
    target: ArtifactTarget,
    default_bucket: BucketId,
}

impl ReportHandler {
    pub fn new(
        reader: SeriesReader,
        renderer: ChartRenderer,
        objects: Arc<dyn ObjectStore>,
        target: ArtifactTarget,
        default_bucket: BucketId,
    ) -> Self {
        Self {
            reader,
            renderer,
            objects,
            target,
            default_bucket,
        }
    }

    /// Wire a handler from configuration.
    pub fn from_config(
        config: &PipelineConfig,
        chart: ChartConfig,
        series: Arc<dyn sizeline_store::SeriesStore>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        Self::new(
            SeriesReader::new(series).with_max_pages(config.max_scan_pages),
            ChartRenderer::new(chart),
            objects,
            ArtifactTarget::new(&config.report_container, &config.artifact_key),
            config.bucket.clone(),
        )
    }

    pub fn target(&self) -> &ArtifactTarget {
        &self.target
    }

    pub async fn handle(&self, query: &ReportQuery) -> ReportOutcome {
        let bucket = query.bucket.as_ref().unwrap_or(&self.default_bucket);
        match self.run(bucket).await {
            Ok(Some(points)) => {
                let locator = self.target.locator();
                info!(bucket = %bucket, points, locator = %locator, "plot generated and saved");
                ReportOutcome::Success { locator, points }
            }
            Ok(None) => {
                warn!(bucket = %bucket, "no snapshots recorded");
                ReportOutcome::NoData {
                    bucket: bucket.clone(),
                }
            }
            Err(e) => {
                error!(bucket = %bucket, kind = e.kind(), error = %e, "report failed");
                ReportOutcome::Error(e)
            }
        }
    }

    /// Returns the number of points charted, or `None` for an empty series.
    async fn run(&self, bucket: &BucketId) -> PipelineResult<Option<usize>> {
        let snapshots = self.reader.fetch(bucket).await?;
        if snapshots.is_empty() {
            return Ok(None);
        }

        let points: Vec<SeriesPoint> = snapshots.iter().map(SeriesPoint::from).collect();
        let png = self.renderer.render(&points)?;

        self.objects
            .put(
                &self.target.container,
                &self.target.key,
                Bytes::from(png),
                Some(ARTIFACT_CONTENT_TYPE),
            )
            .await
            .map_err(|source| PipelineError::StoreWrite {
                target: self.target.locator(),
                source,
            })?;
        Ok(Some(points.len()))
    }
}
