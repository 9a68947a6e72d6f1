use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use sizeline_pipeline::{ReportOutcome, ReportQuery};
use tracing::{info, warn};

use crate::error::ServerResult;
use crate::notification::MutationNotification;
use crate::state::AppState;

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": "sizeline-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Storage mutation notification.
///
/// Each distinct bucket in the batch is aggregated once, in order. The first
/// failure aborts the batch with a 500 so the sender redelivers it.
pub async fn events_handler(State(state): State<AppState>, body: Bytes) -> ServerResult<Response> {
    let notification = MutationNotification::from_slice(&body)?;
    let buckets = notification.buckets()?;
    info!(records = notification.records.len(), buckets = buckets.len(), "mutation notification");

    let mut snapshots = Vec::with_capacity(buckets.len());
    for bucket in &buckets {
        snapshots.push(state.aggregator.handle(bucket).await?);
    }
    Ok(Json(json!({ "status": "success", "snapshots": snapshots })).into_response())
}

/// Render the bucket's size history and return where the chart was stored.
pub async fn plot_handler(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let outcome = state.reports.handle(&query).await;
    let status = outcome.status();
    match outcome {
        ReportOutcome::Success { locator, .. } => (
            StatusCode::OK,
            Json(json!({ "status": status, "plot_url": locator })),
        )
            .into_response(),
        ReportOutcome::NoData { bucket } => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "status": status,
                "message": format!("no data found for bucket {bucket}"),
            })),
        )
            .into_response(),
        ReportOutcome::Error(e) => {
            warn!(kind = e.kind(), "plot request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": status, "message": e.to_string() })),
            )
                .into_response()
        }
    }
}
