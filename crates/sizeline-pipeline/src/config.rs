use serde::{Deserialize, Serialize};
use sizeline_types::BucketId;

/// Default name of the series table.
pub const DEFAULT_SERIES_TABLE: &str = "S3-object-size-history";
/// Default tracked bucket, which also receives the rendered chart.
pub const DEFAULT_BUCKET: &str = "lecture2-yaqundeng";
/// Default key of the chart artifact.
pub const DEFAULT_ARTIFACT_KEY: &str = "plot.png";

/// Configuration for the aggregation and report pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Bucket charted by a report query that does not name one.
    pub bucket: BucketId,
    /// Name of the table holding snapshot rows.
    pub series_table: String,
    /// Container the chart artifact is written to.
    pub report_container: String,
    /// Fixed key of the chart artifact; every report overwrites it.
    pub artifact_key: String,
    /// Upper bound on listing pages per aggregation. `None` means unbounded.
    pub max_listing_pages: Option<usize>,
    /// Upper bound on scan pages per report. `None` means unbounded.
    pub max_scan_pages: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bucket: BucketId::new(DEFAULT_BUCKET).expect("default bucket id is valid"),
            series_table: DEFAULT_SERIES_TABLE.into(),
            report_container: DEFAULT_BUCKET.into(),
            artifact_key: DEFAULT_ARTIFACT_KEY.into(),
            max_listing_pages: None,
            max_scan_pages: None,
        }
    }
}

/// Raster size of the rendered chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartConfig {
    /// A 10x6 inch figure at 100 dpi.
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
        }
    }
}
