use futures::{StreamExt, future, stream};
use tracing::{debug, warn};
use url::Url;

use crate::clients::omdb::{OmdbClient, OmdbDetail, OmdbSearchItem, available, split_list};
use crate::constants::providers::DETAIL_FETCH_CONCURRENCY;
use crate::models::{MovieRecord, NewMovieRecord, RecordError, SearchQuery, Source};
use crate::services::provider::{MovieProvider, ProviderError};

/// OMDb adapter: title search followed by one detail lookup per hit.
pub struct OmdbProvider {
    client: OmdbClient,
}

impl OmdbProvider {
    #[must_use]
    pub const fn new(client: OmdbClient) -> Self {
        Self { client }
    }

    async fn lookup(&self, item: OmdbSearchItem, query: &SearchQuery) -> Option<MovieRecord> {
        let detail = match self.client.get_detail(&item.imdb_id).await {
            Ok(detail) => detail,
            Err(e) => {
                warn!("Error fetching OMDb details for {}: {}", item.imdb_id, e);
                return None;
            }
        };

        if !matches_filters(&detail, query) {
            return None;
        }

        to_record(detail)
            .inspect_err(|e| debug!("Skipping OMDb item {}: {}", item.imdb_id, e))
            .ok()
    }
}

#[async_trait::async_trait]
impl MovieProvider for OmdbProvider {
    fn source(&self) -> Source {
        Source::Omdb
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<MovieRecord>, ProviderError> {
        let Some(title) = query.title() else {
            debug!("OMDb search needs a title, skipping provider");
            return Ok(Vec::new());
        };

        let response = self
            .client
            .search(title, query.media_type, query.page)
            .await
            .map_err(|e| ProviderError::unavailable(Source::Omdb, e))?;

        if !response.is_success() {
            debug!(
                "OMDb returned no results for '{}': {}",
                title,
                response.error.as_deref().unwrap_or("unknown reason")
            );
            return Ok(Vec::new());
        }

        let records: Vec<MovieRecord> = stream::iter(response.search)
            .map(|item| self.lookup(item, query))
            .buffered(DETAIL_FETCH_CONCURRENCY)
            .filter_map(future::ready)
            .collect()
            .await;

        Ok(records)
    }
}

/// Actor filter is a case-insensitive substring match against the cast line;
/// genre likewise against the genre line.
#[must_use]
pub fn matches_filters(detail: &OmdbDetail, query: &SearchQuery) -> bool {
    if query.has_actors() && !query.matches_any_actor(&detail.actors) {
        return false;
    }

    if let Some(genre) = query.genre()
        && !detail.genre.to_lowercase().contains(&genre.to_lowercase())
    {
        return false;
    }

    true
}

pub fn to_record(detail: OmdbDetail) -> Result<MovieRecord, RecordError> {
    let media_type = detail.item_type.parse()?;

    MovieRecord::new(NewMovieRecord {
        title: detail.title,
        year: leading_year(&detail.year),
        media_type,
        poster: available(detail.poster.as_deref()).and_then(|p| Url::parse(p).ok()),
        plot: available(detail.plot.as_deref()).map(ToString::to_string),
        actors: split_list(&detail.actors),
        genre: split_list(&detail.genre),
        source: Source::Omdb,
    })
}

/// Series carry ranges such as `"2008–2013"`; the start year is kept.
fn leading_year(year: &str) -> String {
    year.trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect()
}
