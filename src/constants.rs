pub mod providers {

    /// Detail lookups in flight at once per provider search.
    pub const DETAIL_FETCH_CONCURRENCY: usize = 4;

    /// TMDB exposes the full credits list; only the top billed names are kept.
    pub const MAX_CAST: usize = 5;

    pub const TMDB_POSTER_SIZE: &str = "w500";
}

pub mod rate_limit {
    use std::time::Duration;

    pub const WINDOW: Duration = Duration::from_secs(60);

    pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);
}
