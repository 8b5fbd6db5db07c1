use futures::{StreamExt, future, stream};
use tracing::{debug, warn};
use url::Url;

use crate::clients::tmdb::{TmdbClient, TmdbMovieDetail, TmdbMovieSummary};
use crate::constants::providers::{DETAIL_FETCH_CONCURRENCY, MAX_CAST, TMDB_POSTER_SIZE};
use crate::models::{MediaType, MovieRecord, NewMovieRecord, RecordError, SearchQuery, Source};
use crate::services::provider::{MovieProvider, ProviderError};

/// TMDB adapter.
///
/// With a title it runs a movie search; without one it falls back to an
/// actor-driven search that resolves each name to a person first. TMDB only
/// lists movies here, so series and episode queries yield nothing.
pub struct TmdbProvider {
    client: TmdbClient,
    image_base_url: String,
}

/// Whether the detail step should re-check the requested actors against the
/// credits. Works listed from a person's credits already contain them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActorCheck {
    Required,
    Skip,
}

impl TmdbProvider {
    #[must_use]
    pub fn new(client: TmdbClient, image_base_url: &str) -> Self {
        Self {
            client,
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn search_by_actors(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<MovieRecord>, ProviderError> {
        let mut records = Vec::new();
        let mut attempted = 0usize;
        let mut failed = 0usize;
        let mut last_error = None;

        for actor in query.actors() {
            attempted += 1;

            let credits = match self.works_for(actor).await {
                Ok(Some(credits)) => credits,
                Ok(None) => {
                    debug!("No TMDB person found for '{}'", actor);
                    continue;
                }
                Err(e) => {
                    warn!("TMDB actor lookup for '{}' failed: {}", actor, e);
                    failed += 1;
                    last_error = Some(e);
                    continue;
                }
            };

            records.extend(self.collect_details(credits, query, ActorCheck::Skip).await);
        }

        match last_error {
            Some(e) if failed == attempted => Err(ProviderError::unavailable(Source::Tmdb, e)),
            _ => Ok(records),
        }
    }

    /// Resolves `actor` to the first matching person and lists their movies.
    async fn works_for(&self, actor: &str) -> anyhow::Result<Option<Vec<TmdbMovieSummary>>> {
        let people = self.client.search_people(actor).await?;
        let Some(person) = people.first() else {
            return Ok(None);
        };

        debug!("Resolved '{}' to TMDB person {}", actor, person.id);
        let credits = self.client.person_movie_credits(person.id).await?;
        Ok(Some(credits))
    }

    async fn collect_details(
        &self,
        movies: Vec<TmdbMovieSummary>,
        query: &SearchQuery,
        actor_check: ActorCheck,
    ) -> Vec<MovieRecord> {
        stream::iter(movies)
            .map(|movie| self.lookup(movie.id, query, actor_check))
            .buffered(DETAIL_FETCH_CONCURRENCY)
            .filter_map(future::ready)
            .collect()
            .await
    }

    async fn lookup(
        &self,
        movie_id: u64,
        query: &SearchQuery,
        actor_check: ActorCheck,
    ) -> Option<MovieRecord> {
        let detail = match self.client.get_movie(movie_id).await {
            Ok(detail) => detail,
            Err(e) => {
                warn!("Error fetching TMDB movie details for {}: {}", movie_id, e);
                return None;
            }
        };

        if actor_check == ActorCheck::Required && !matches_actors(&detail, query) {
            return None;
        }
        if !matches_genre(&detail, query) {
            return None;
        }

        to_record(detail, &self.image_base_url)
            .inspect_err(|e| debug!("Skipping TMDB movie {}: {}", movie_id, e))
            .ok()
    }
}

#[async_trait::async_trait]
impl MovieProvider for TmdbProvider {
    fn source(&self) -> Source {
        Source::Tmdb
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<MovieRecord>, ProviderError> {
        if let Some(media_type) = query.media_type
            && media_type != MediaType::Movie
        {
            debug!("TMDB adapter only lists movies, skipping {} query", media_type);
            return Ok(Vec::new());
        }

        if let Some(title) = query.title() {
            let movies = self
                .client
                .search_movies(title, query.page)
                .await
                .map_err(|e| ProviderError::unavailable(Source::Tmdb, e))?;

            return Ok(self
                .collect_details(movies, query, ActorCheck::Required)
                .await);
        }

        if query.has_actors() {
            return self.search_by_actors(query).await;
        }

        debug!("TMDB search needs a title or actors, skipping provider");
        Ok(Vec::new())
    }
}

/// True when no actors were requested or any requested name appears in the
/// full credits list.
fn matches_actors(detail: &TmdbMovieDetail, query: &SearchQuery) -> bool {
    !query.has_actors()
        || detail
            .cast_names()
            .iter()
            .any(|name| query.matches_any_actor(name))
}

/// Whole-name genre match, case-folded beyond ASCII.
fn matches_genre(detail: &TmdbMovieDetail, query: &SearchQuery) -> bool {
    query.genre().is_none_or(|wanted| {
        let wanted = wanted.to_lowercase();
        detail
            .genres
            .iter()
            .any(|g| g.name.to_lowercase() == wanted)
    })
}

fn to_record(detail: TmdbMovieDetail, image_base_url: &str) -> Result<MovieRecord, RecordError> {
    let year = detail.release_year();
    let actors = detail.cast_names().into_iter().take(MAX_CAST).collect();
    let genre = detail.genre_names();
    let poster = detail
        .poster_path
        .as_deref()
        .filter(|p| !p.is_empty())
        .and_then(|p| Url::parse(&format!("{image_base_url}/{TMDB_POSTER_SIZE}{p}")).ok());

    MovieRecord::new(NewMovieRecord {
        title: detail.title,
        year,
        media_type: MediaType::Movie,
        poster,
        plot: detail.overview,
        actors,
        genre,
        source: Source::Tmdb,
    })
}
