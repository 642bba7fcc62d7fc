use crate::health::HealthState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Minimal liveness/readiness server for the scan loop.
///
/// Exposes a single `GET /healthz` endpoint reporting uptime, seconds
/// since the last completed scan tick, and the last scan's summary
/// counters. There is no authentication: this endpoint is meant to sit
/// behind the deployment's own network boundary, the same way the
/// exchange credentials never touch it.
pub struct ApiServer {
    state: Arc<HealthState>,
    max_staleness_secs: i64,
}

impl ApiServer {
    #[must_use]
    pub fn new(state: Arc<HealthState>, max_staleness_secs: i64) -> Self {
        Self {
            state,
            max_staleness_secs,
        }
    }

    /// Builds the router.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/healthz", get(healthz))
            .with_state(ServerState {
                health: self.state.clone(),
                max_staleness_secs: self.max_staleness_secs,
            })
            .layer(TraceLayer::new_for_http())
    }

    /// Starts the web server listening on the specified address, running
    /// until `shutdown` resolves.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or
    /// serve requests.
    pub async fn serve(
        self,
        addr: &str,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, "health endpoint listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}

#[derive(Clone)]
struct ServerState {
    health: Arc<HealthState>,
    max_staleness_secs: i64,
}

async fn healthz(State(state): State<ServerState>) -> impl IntoResponse {
    let snapshot = state.health.snapshot();
    let status = if snapshot.is_live(state.max_staleness_secs) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(snapshot))
}
