//! Provider configuration report

use crate::config::Config;

pub fn cmd_health(config: &Config) {
    let mark = |enabled: bool| if enabled { "✓ configured" } else { "✗ no API key" };

    println!("Marquee v{}", env!("CARGO_PKG_VERSION"));
    println!("{:-<40}", "");
    println!("OMDb: {}", mark(config.omdb_enabled()));
    println!("TMDB: {}", mark(config.tmdb_enabled()));
    println!();
    println!(
        "Cache: {}s TTL, {} entries | Rate limit: {}/min",
        config.cache.ttl_seconds, config.cache.max_size, config.rate_limit.per_minute
    );

    if !config.omdb_enabled() && !config.tmdb_enabled() {
        println!();
        println!("Set OMDB_API_KEY or TMDB_API_KEY to enable searching.");
    }
}
