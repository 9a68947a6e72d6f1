use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all sizeline endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route("/v1/events", post(handler::events_handler))
        .route("/v1/plot", get(handler::plot_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
