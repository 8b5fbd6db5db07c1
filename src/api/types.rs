use serde::Serialize;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    pub error_code: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub providers: ProviderStatus,
    pub uptime_seconds: u64,
}

/// Which providers have an API key configured.
#[derive(Debug, Serialize)]
pub struct ProviderStatus {
    pub omdb: bool,
    pub tmdb: bool,
}
