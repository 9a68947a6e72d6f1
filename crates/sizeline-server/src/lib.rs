//! HTTP trigger layer for sizeline.
//!
//! Storage mutation notifications arrive on `POST /v1/events` and drive the
//! aggregator; `GET /v1/plot` renders the size history and reports where the
//! chart was stored. Adapters are injected through [`AppState`].

pub mod config;
pub mod error;
pub mod handler;
pub mod notification;
pub mod router;
pub mod server;
pub mod state;

pub use config::{ServerConfig, SizelineConfig};
pub use error::{ServerError, ServerResult};
pub use notification::{MutationNotification, NotificationError};
pub use server::SizelineServer;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use bytes::Bytes;
    use serde_json::Value;
    use sizeline_store::{InMemoryObjectStore, InMemorySeriesStore, ObjectStore, SeriesStore};
    use sizeline_types::SteppingClock;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    struct Fixture {
        objects: Arc<InMemoryObjectStore>,
        series: Arc<InMemorySeriesStore>,
        app: axum::Router,
    }

    fn fixture() -> Fixture {
        let mut config = SizelineConfig::default();
        config.pipeline.bucket = "photos".parse().unwrap();
        config.pipeline.report_container = "reports".into();

        let objects = Arc::new(InMemoryObjectStore::new());
        objects.create_container("photos").unwrap();
        objects.create_container("reports").unwrap();
        let series = Arc::new(InMemorySeriesStore::new("history"));
        let state = AppState::new(
            &config,
            objects.clone(),
            series.clone(),
            Arc::new(SteppingClock::new(10, 10)),
        );
        Fixture {
            objects,
            series,
            app: router::build_router(state),
        }
    }

    fn event_body(buckets: &[&str]) -> String {
        let records: Vec<Value> = buckets
            .iter()
            .map(|b| {
                serde_json::json!({
                    "eventName": "ObjectCreated:Put",
                    "s3": { "bucket": { "name": b }, "object": { "key": "k" } }
                })
            })
            .collect();
        serde_json::json!({ "Records": records }).to_string()
    }

    async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn post_events(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/events")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let f = fixture();
        let (status, body) = send(&f.app, get("/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn info_endpoint() {
        let f = fixture();
        let (status, body) = send(&f.app, get("/v1/info")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "sizeline-server");
    }

    #[tokio::test]
    async fn event_records_snapshot() {
        let f = fixture();
        f.objects
            .put("photos", "a", Bytes::from(vec![0u8; 100]), None)
            .await
            .unwrap();

        let (status, body) = send(&f.app, post_events(event_body(&["photos"]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["snapshots"][0]["total_size"], 100);
        assert_eq!(body["snapshots"][0]["object_count"], 1);
        assert_eq!(f.series.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn repeated_bucket_in_batch_aggregates_once() {
        let f = fixture();
        let (status, body) = send(&f.app, post_events(event_body(&["photos", "photos"]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["snapshots"].as_array().unwrap().len(), 1);
        assert_eq!(f.series.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn malformed_event_is_400() {
        let f = fixture();
        let (status, body) = send(&f.app, post_events("{\"Records\": 3}".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");

        let (status, _) = send(&f.app, post_events(event_body(&[]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(f.series.is_empty().unwrap());
    }

    #[tokio::test]
    async fn unknown_bucket_is_500() {
        let f = fixture();
        let (status, body) = send(&f.app, post_events(event_body(&["missing"]))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["message"].as_str().unwrap().contains("missing"));
        assert!(f.series.is_empty().unwrap());
    }

    #[tokio::test]
    async fn plot_without_history_is_404() {
        let f = fixture();
        let (status, body) = send(&f.app, get("/v1/plot")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "no_data");
        assert!(f.objects.get("reports", "plot.png").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn events_then_plot() {
        let f = fixture();
        f.objects
            .put("photos", "a", Bytes::from(vec![0u8; 100]), None)
            .await
            .unwrap();
        send(&f.app, post_events(event_body(&["photos"]))).await;
        f.objects
            .put("photos", "b", Bytes::from(vec![0u8; 50]), None)
            .await
            .unwrap();
        send(&f.app, post_events(event_body(&["photos"]))).await;

        let (status, body) = send(&f.app, get("/v1/plot")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["plot_url"], "s3://reports/plot.png");

        let blob = f.objects.get("reports", "plot.png").await.unwrap().unwrap();
        let meta = sizeline_pipeline::ChartMetadata::from_png(&blob.data).unwrap();
        assert_eq!((meta.x.min, meta.x.max), (10, 20));
        assert_eq!((meta.y.min, meta.y.max), (100, 150));
    }

    #[tokio::test]
    async fn plot_for_named_bucket() {
        let f = fixture();
        let (status, body) = send(&f.app, get("/v1/plot?bucket=elsewhere")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["message"].as_str().unwrap().contains("elsewhere"));
    }

    #[tokio::test]
    async fn series_is_shared_with_state() {
        let f = fixture();
        send(&f.app, post_events(event_body(&["photos"]))).await;
        let page = f.series.scan_page(Some("photos"), None).await.unwrap();
        assert_eq!(page.items.len(), 1);
    }
}
