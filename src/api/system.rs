use axum::{Json, extract::State};
use std::sync::Arc;

use super::{AppState, HealthResponse, ProviderStatus};

/// `GET /api/v1/health`
///
/// Reports which providers have credentials. Does not call upstream.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let config = &state.shared.config;

    Json(HealthResponse {
        status: "healthy",
        providers: ProviderStatus {
            omdb: config.omdb_enabled(),
            tmdb: config.tmdb_enabled(),
        },
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
