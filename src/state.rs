use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::clients::omdb::OmdbClient;
use crate::clients::tmdb::TmdbClient;
use crate::config::Config;
use crate::services::{
    MovieProvider, OmdbProvider, RateLimiter, ResultCache, SearchService, TmdbProvider,
};

/// Build the HTTP client shared by every provider adapter. Reusing one client
/// keeps a single connection pool for the whole process.
pub fn build_shared_http_client(
    timeout_seconds: u64,
    user_agent: &str,
) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(user_agent)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub search_service: Arc<SearchService>,

    pub cache: Arc<ResultCache>,

    pub rate_limiter: Arc<RateLimiter>,
}

impl SharedState {
    /// Wires the providers that have an API key configured, in the fixed
    /// OMDb then TMDB order.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client =
            build_shared_http_client(config.http.timeout_seconds, &config.http.user_agent)?;

        let mut providers: Vec<Arc<dyn MovieProvider>> = Vec::new();

        if config.omdb_enabled() {
            let client = OmdbClient::with_shared_client(
                http_client.clone(),
                config.providers.omdb.api_key.clone(),
                config.providers.omdb.base_url.clone(),
            );
            providers.push(Arc::new(OmdbProvider::new(client)));
            info!("OMDb provider enabled");
        }

        if config.tmdb_enabled() {
            let client = TmdbClient::with_shared_client(
                http_client,
                config.providers.tmdb.api_key.clone(),
                &config.providers.tmdb.base_url,
            );
            providers.push(Arc::new(TmdbProvider::new(
                client,
                &config.providers.tmdb.image_base_url,
            )));
            info!("TMDB provider enabled");
        }

        if providers.is_empty() {
            warn!("No provider API keys configured; searches will fail until one is set");
        }

        Ok(Self::with_providers(config, providers))
    }

    /// Builds the state around an explicit provider list.
    #[must_use]
    pub fn with_providers(config: Config, providers: Vec<Arc<dyn MovieProvider>>) -> Self {
        let cache = Arc::new(ResultCache::new(config.cache.ttl(), config.cache.max_size));
        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit.per_minute));
        let search_service = Arc::new(SearchService::new(providers, Arc::clone(&cache)));

        Self {
            config: Arc::new(config),
            search_service,
            cache,
            rate_limiter,
        }
    }
}
