pub mod cache;
pub mod provider;
pub mod providers;
pub mod rate_limiter;
pub mod search;

pub use cache::ResultCache;
pub use provider::{MovieProvider, ProviderError, ProviderOutcome};
pub use providers::{OmdbProvider, TmdbProvider};
pub use rate_limiter::{RateDecision, RateLimiter, SweeperHandle};
pub use search::{SearchError, SearchService};
