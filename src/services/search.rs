use futures::future;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::models::{MovieRecord, QueryError, SearchQuery, SearchResult, Source};
use crate::services::cache::ResultCache;
use crate::services::provider::{MovieProvider, ProviderError, ProviderOutcome};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),

    #[error("No movie providers are configured")]
    NoProvidersConfigured,
}

/// Fans a query out to every configured provider, merges the lists in
/// provider order and serves repeats from the result cache.
pub struct SearchService {
    providers: Vec<Arc<dyn MovieProvider>>,
    cache: Arc<ResultCache>,
}

impl SearchService {
    #[must_use]
    pub const fn new(providers: Vec<Arc<dyn MovieProvider>>, cache: Arc<ResultCache>) -> Self {
        Self { providers, cache }
    }

    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn sources(&self) -> Vec<Source> {
        self.providers.iter().map(|p| p.source()).collect()
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult, SearchError> {
        query.validate()?;

        if self.providers.is_empty() {
            return Err(SearchError::NoProvidersConfigured);
        }

        let key = query.cache_key();
        if let Some(cached) = self.cache.get(&key) {
            debug!(key = %key, "Search cache hit");
            metrics::counter!("search_cache_total", "result" => "hit").increment(1);
            return Ok(cached);
        }
        metrics::counter!("search_cache_total", "result" => "miss").increment(1);

        let records = self.fan_out(query).await;
        info!(
            total = records.len(),
            page = query.page,
            limit = query.limit,
            "Aggregated provider results"
        );

        let result = SearchResult::paginate(records, query.page, query.limit)?;
        self.cache.put(key, result.clone());

        Ok(result)
    }

    /// Runs every provider on its own task and concatenates the records in
    /// registration order. A provider task that panics counts as a failed
    /// provider.
    ///
    /// The tasks are detached: if the caller is dropped mid-search they still
    /// run to completion and their records are discarded.
    async fn fan_out(&self, query: &SearchQuery) -> Vec<MovieRecord> {
        let handles = self.providers.iter().map(|provider| {
            let provider = Arc::clone(provider);
            let query = query.clone();
            tokio::spawn(async move { provider.search(&query).await })
        });

        let joined = future::join_all(handles).await;

        let mut records = Vec::new();
        for (provider, result) in self.providers.iter().zip(joined) {
            let outcome = result.unwrap_or_else(|e| {
                error!(provider = %provider.source(), "Provider task panicked: {}", e);
                ProviderOutcome::Failed(ProviderError::Crashed {
                    provider: provider.source(),
                    message: e.to_string(),
                })
            });

            match &outcome {
                ProviderOutcome::Found(found) => {
                    debug!(provider = %provider.source(), count = found.len(), "Provider returned results");
                }
                ProviderOutcome::Empty => {
                    debug!(provider = %provider.source(), "Provider returned no results");
                }
                ProviderOutcome::Failed(_) => {}
            }

            records.extend(outcome.into_records());
        }

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaType, NewMovieRecord};
    use std::time::Duration;

    struct Fixed(Source, usize);

    #[async_trait::async_trait]
    impl MovieProvider for Fixed {
        fn source(&self) -> Source {
            self.0
        }

        async fn fetch(&self, _query: &SearchQuery) -> Result<Vec<MovieRecord>, ProviderError> {
            Ok((0..self.1)
                .map(|n| {
                    MovieRecord::new(NewMovieRecord {
                        title: format!("{} {n}", self.0),
                        year: "2000".to_string(),
                        media_type: MediaType::Movie,
                        poster: None,
                        plot: None,
                        actors: vec!["Actor".to_string()],
                        genre: vec!["Drama".to_string()],
                        source: self.0,
                    })
                    .unwrap()
                })
                .collect())
        }
    }

    struct Panics;

    #[async_trait::async_trait]
    impl MovieProvider for Panics {
        fn source(&self) -> Source {
            Source::Tmdb
        }

        async fn fetch(&self, _query: &SearchQuery) -> Result<Vec<MovieRecord>, ProviderError> {
            panic!("provider blew up");
        }
    }

    fn service(providers: Vec<Arc<dyn MovieProvider>>) -> SearchService {
        SearchService::new(
            providers,
            Arc::new(ResultCache::new(Duration::from_secs(60), 10)),
        )
    }

    fn title_query() -> SearchQuery {
        SearchQuery {
            title: Some("anything".to_string()),
            ..SearchQuery::default()
        }
    }

    #[tokio::test]
    async fn test_merges_in_provider_order() {
        let svc = service(vec![
            Arc::new(Fixed(Source::Omdb, 2)),
            Arc::new(Fixed(Source::Tmdb, 2)),
        ]);

        let result = svc.search(&title_query()).await.unwrap();
        let sources: Vec<Source> = result.results().iter().map(MovieRecord::source).collect();
        assert_eq!(
            sources,
            [Source::Omdb, Source::Omdb, Source::Tmdb, Source::Tmdb]
        );
        assert_eq!(svc.sources(), [Source::Omdb, Source::Tmdb]);
    }

    #[tokio::test]
    async fn test_panicking_provider_is_isolated() {
        let svc = service(vec![Arc::new(Fixed(Source::Omdb, 3)), Arc::new(Panics)]);

        let result = svc.search(&title_query()).await.unwrap();
        assert_eq!(result.total(), 3);
    }

    #[tokio::test]
    async fn test_no_providers() {
        let svc = service(Vec::new());
        assert!(matches!(
            svc.search(&title_query()).await,
            Err(SearchError::NoProvidersConfigured)
        ));
        assert_eq!(svc.provider_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_query_checked_before_providers() {
        let svc = service(Vec::new());
        assert!(matches!(
            svc.search(&SearchQuery::default()).await,
            Err(SearchError::InvalidQuery(QueryError::NoCriteria))
        ));
    }
}
