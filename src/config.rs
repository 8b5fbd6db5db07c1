use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::models::search::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub providers: ProvidersConfig,

    pub cache: CacheConfig,

    pub rate_limit: RateLimitConfig,

    pub http: HttpConfig,

    pub pagination: PaginationConfig,

    pub observability: ObservabilityConfig,

    #[serde(skip)]
    pub origin: ConfigOrigin,
}

/// Where the loaded values came from. Recorded at load time and logged once
/// the subscriber is installed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOrigin {
    pub file: Option<PathBuf>,

    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// `pretty` for human readable lines, `json` for one object per event
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Proxy addresses allowed to supply the client address via `X-Forwarded-For`.
    ///
    /// When empty, forwarded headers are ignored and the socket peer address
    /// identifies the client for rate limiting.
    pub trusted_proxy_ips: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_allowed_origins: vec!["*".to_string()],
            trusted_proxy_ips: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub omdb: OmdbConfig,

    pub tmdb: TmdbConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OmdbConfig {
    /// Leave empty to disable the provider.
    pub api_key: String,

    pub base_url: String,
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://www.omdbapi.com/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    /// Leave empty to disable the provider.
    pub api_key: String,

    pub base_url: String,

    pub image_base_url: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds a search result stays valid, measured from insertion.
    pub ttl_seconds: u64,

    pub max_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            max_size: 1000,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub per_minute: u32,

    /// Reserved; the sliding window limiter does not use it.
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_minute: 60,
            burst: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Timeout applied to every outbound provider call.
    pub timeout_seconds: u64,

    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: format!("Marquee/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_page_size: u32,

    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies `.env` and process
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;

        config.origin.env_file = dotenvy::dotenv().ok();
        config.apply_env(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    fn load_file() -> Result<Self> {
        match Self::config_paths().iter().find(|path| path.exists()) {
            Some(path) => Self::load_from_path(path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.origin.file = Some(path.to_path_buf());

        Ok(config)
    }

    pub fn log_origin(&self) {
        match &self.origin.file {
            Some(path) => info!("Loaded config from: {}", path.display()),
            None => info!("No config file found, using defaults"),
        }
        if let Some(path) = &self.origin.env_file {
            info!("Loaded environment from: {}", path.display());
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("marquee").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".marquee").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    /// Overrides file values with environment variables. `lookup` is injected
    /// so tests do not touch the process environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(key) = lookup("OMDB_API_KEY") {
            self.providers.omdb.api_key = key;
        }
        if let Some(key) = lookup("TMDB_API_KEY") {
            self.providers.tmdb.api_key = key;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.general.log_level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.general.log_format = format;
        }

        override_parsed(&lookup, "CACHE_TTL", &mut self.cache.ttl_seconds)?;
        override_parsed(&lookup, "CACHE_MAX_SIZE", &mut self.cache.max_size)?;
        override_parsed(&lookup, "RATE_LIMIT_PER_MINUTE", &mut self.rate_limit.per_minute)?;
        override_parsed(&lookup, "RATE_LIMIT_BURST", &mut self.rate_limit.burst)?;
        override_parsed(&lookup, "API_TIMEOUT", &mut self.http.timeout_seconds)?;
        override_parsed(
            &lookup,
            "DEFAULT_PAGE_SIZE",
            &mut self.pagination.default_page_size,
        )?;
        override_parsed(&lookup, "MAX_PAGE_SIZE", &mut self.pagination.max_page_size)?;
        override_parsed(&lookup, "MARQUEE_PORT", &mut self.server.port)?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !matches!(self.general.log_format.as_str(), "pretty" | "json") {
            anyhow::bail!(
                "Log format must be 'pretty' or 'json', got '{}'",
                self.general.log_format
            );
        }

        if self.cache.max_size < 1 {
            anyhow::bail!("Cache max size must be positive");
        }

        if self.rate_limit.per_minute < 1 {
            anyhow::bail!("Rate limit must be positive");
        }

        if self.http.timeout_seconds < 1 {
            anyhow::bail!("API timeout must be positive");
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.pagination.max_page_size) {
            anyhow::bail!("Max page size must be between 1 and {MAX_PAGE_SIZE}");
        }

        if !(1..=self.pagination.max_page_size).contains(&self.pagination.default_page_size) {
            anyhow::bail!(
                "Default page size must be between 1 and {}",
                self.pagination.max_page_size
            );
        }

        Ok(())
    }

    #[must_use]
    pub fn omdb_enabled(&self) -> bool {
        !self.providers.omdb.api_key.is_empty()
    }

    #[must_use]
    pub fn tmdb_enabled(&self) -> bool {
        !self.providers.tmdb.api_key.is_empty()
    }
}

fn override_parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    target: &mut T,
) -> Result<()>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if let Some(raw) = lookup(key) {
        *target = raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {key}: {raw}"))?;
    }
    Ok(())
}
