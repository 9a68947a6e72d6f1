use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use bytes::Bytes;
use colored::Colorize;
use sizeline_pipeline::{Aggregator, ReportHandler, ReportOutcome, ReportQuery};
use sizeline_server::{SizelineConfig, SizelineServer};
use sizeline_store::{InMemoryObjectStore, InMemorySeriesStore, ObjectStore};
use sizeline_types::{BucketId, BucketSnapshot, Clock, SteppingClock, SystemClock};

use crate::cli::*;

/// Seconds between simulated mutations.
const SIMULATION_STEP_SECS: i64 = 10;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = SizelineConfig::load_or_default(cli.config.as_deref())?;
    match cli.command {
        Command::Serve(args) => cmd_serve(config, args).await,
        Command::Simulate(args) => cmd_simulate(config, args, &cli.format).await,
        Command::Config(_) => cmd_config(&config),
    }
}

async fn cmd_serve(mut config: SizelineConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }
    println!(
        "sizeline server on {} (bucket: {})",
        config.server.bind_addr.to_string().bold(),
        config.pipeline.bucket.as_str().yellow()
    );
    SizelineServer::in_memory(config)?.serve().await?;
    Ok(())
}

async fn cmd_simulate(
    mut config: SizelineConfig,
    args: SimulateArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    if let Some(bucket) = args.bucket {
        config.pipeline.bucket = BucketId::new(bucket)?;
    }
    let clock = SteppingClock::new(SystemClock.now_unix(), SIMULATION_STEP_SECS);
    let run = simulate(&config, Arc::new(clock)).await?;

    std::fs::write(&args.out, &run.chart)
        .with_context(|| format!("writing chart to {}", args.out.display()))?;

    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "snapshots": run.snapshots,
                "plot_url": run.locator,
                "out": args.out,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            for (step, snapshot) in SCENARIO.iter().zip(&run.snapshots) {
                println!(
                    "{} {:<28} {} objects, {} bytes at {}",
                    "✓".green(),
                    step.to_string(),
                    snapshot.object_count.to_string().bold(),
                    snapshot.total_size.to_string().bold(),
                    snapshot.timestamp.to_string().dimmed()
                );
            }
            println!("Chart stored at {}", run.locator.cyan());
            println!("Written to {}", args.out.display().to_string().bold());
        }
    }
    Ok(())
}

fn cmd_config(config: &SizelineConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}

/// One step of the simulated mutation sequence.
#[derive(Clone, Copy, Debug)]
pub enum Mutation {
    Put { key: &'static str, content: &'static str },
    Delete { key: &'static str },
}

impl std::fmt::Display for Mutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Put { key, .. } => write!(f, "put {key}"),
            Self::Delete { key } => write!(f, "delete {key}"),
        }
    }
}

pub const SCENARIO: [Mutation; 4] = [
    Mutation::Put { key: "assignment1.txt", content: "Empty Assignment 1" },
    Mutation::Put { key: "assignment1.txt", content: "Empty Assignment 1222222222" },
    Mutation::Delete { key: "assignment1.txt" },
    Mutation::Put { key: "assignment2.txt", content: "Empty Assignment 2" },
];

pub struct SimulationRun {
    /// One snapshot per scenario step, in order.
    pub snapshots: Vec<BucketSnapshot>,
    pub locator: String,
    pub chart: Bytes,
}

/// Apply [`SCENARIO`] to the configured bucket on in-memory stores,
/// aggregating after every step, then render the report.
pub async fn simulate(config: &SizelineConfig, clock: Arc<dyn Clock>) -> anyhow::Result<SimulationRun> {
    let bucket = &config.pipeline.bucket;
    let objects = Arc::new(InMemoryObjectStore::new());
    objects.create_container(bucket.as_str())?;
    objects.create_container(&config.pipeline.report_container)?;
    let series = Arc::new(InMemorySeriesStore::new(&config.pipeline.series_table));

    let aggregator = Aggregator::new(objects.clone(), series.clone(), clock)
        .with_max_pages(config.pipeline.max_listing_pages);
    let reports = ReportHandler::from_config(&config.pipeline, config.chart, series, objects.clone());

    let mut snapshots = Vec::with_capacity(SCENARIO.len());
    for step in SCENARIO {
        match step {
            Mutation::Put { key, content } => {
                objects
                    .put(bucket.as_str(), key, Bytes::from_static(content.as_bytes()), Some("text/plain"))
                    .await?;
            }
            Mutation::Delete { key } => {
                objects.delete(bucket.as_str(), key).await?;
            }
        }
        tracing::debug!(bucket = %bucket, step = %step, "applied mutation");
        snapshots.push(aggregator.handle(bucket).await?);
    }

    let query = ReportQuery {
        bucket: Some(bucket.clone()),
    };
    let locator = match reports.handle(&query).await {
        ReportOutcome::Success { locator, .. } => locator,
        ReportOutcome::NoData { bucket } => bail!("no snapshots recorded for {bucket}"),
        ReportOutcome::Error(e) => return Err(e.into()),
    };

    let target = reports.target();
    let chart = objects
        .get(&target.container, &target.key)
        .await?
        .ok_or_else(|| anyhow!("chart missing at {locator}"))?
        .data;
    Ok(SimulationRun {
        snapshots,
        locator,
        chart,
    })
}
