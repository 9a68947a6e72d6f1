use std::sync::Arc;

use sizeline_pipeline::{Aggregator, ReportHandler};
use sizeline_store::{InMemoryObjectStore, InMemorySeriesStore, ObjectStore, SeriesStore};
use sizeline_types::{Clock, SystemClock};

use crate::config::SizelineConfig;
use crate::error::ServerResult;

/// Shared handler state. Cloned per request; everything inside is `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub objects: Arc<dyn ObjectStore>,
    pub series: Arc<dyn SeriesStore>,
    pub aggregator: Arc<Aggregator>,
    pub reports: Arc<ReportHandler>,
}

impl AppState {
    /// Wire the pipeline onto the given adapters.
    pub fn new(
        config: &SizelineConfig,
        objects: Arc<dyn ObjectStore>,
        series: Arc<dyn SeriesStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let aggregator = Aggregator::new(objects.clone(), series.clone(), clock)
            .with_max_pages(config.pipeline.max_listing_pages);
        let reports = ReportHandler::from_config(
            &config.pipeline,
            config.chart,
            series.clone(),
            objects.clone(),
        );
        Self {
            objects,
            series,
            aggregator: Arc::new(aggregator),
            reports: Arc::new(reports),
        }
    }

    /// In-memory adapters and the system clock, with the tracked bucket and
    /// the report container already created.
    pub fn in_memory(config: &SizelineConfig) -> ServerResult<Self> {
        let objects = InMemoryObjectStore::new();
        objects.create_container(config.pipeline.bucket.as_str())?;
        objects.create_container(&config.pipeline.report_container)?;
        let series = InMemorySeriesStore::new(&config.pipeline.series_table);
        Ok(Self::new(
            config,
            Arc::new(objects),
            Arc::new(series),
            Arc::new(SystemClock),
        ))
    }
}
