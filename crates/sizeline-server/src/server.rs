use tokio::net::TcpListener;

use crate::config::SizelineConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// sizeline trigger server.
pub struct SizelineServer {
    config: SizelineConfig,
    state: AppState,
}

impl SizelineServer {
    pub fn new(config: SizelineConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Server on in-memory adapters.
    pub fn in_memory(config: SizelineConfig) -> ServerResult<Self> {
        let state = AppState::in_memory(&config)?;
        Ok(Self::new(config, state))
    }

    pub fn config(&self) -> &SizelineConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(self.config.server.bind_addr).await?;
        tracing::info!(
            addr = %self.config.server.bind_addr,
            bucket = %self.config.pipeline.bucket,
            "sizeline server listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
