use serde::Serialize;
use thiserror::Error;

use super::movie::{MediaType, MovieRecord};

pub const MAX_PAGE_SIZE: u32 = 50;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("At least one search parameter (title, actors, type, or genre) must be provided")]
    NoCriteria,

    #[error("Page number must be greater than 0")]
    InvalidPage,

    #[error("Limit must be between 1 and {max}, got {limit}")]
    InvalidLimit { limit: u32, max: u32 },
}

/// A normalized search request shared by every provider.
///
/// `actors` keeps the caller's order and duplicates; an empty list means no
/// actor filter was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub title: Option<String>,
    pub actors: Vec<String>,
    pub media_type: Option<MediaType>,
    pub genre: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            title: None,
            actors: Vec::new(),
            media_type: None,
            genre: None,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchQuery {
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref().map(str::trim).filter(|g| !g.is_empty())
    }

    pub fn actors(&self) -> impl Iterator<Item = &str> {
        self.actors
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
    }

    #[must_use]
    pub fn has_actors(&self) -> bool {
        self.actors().next().is_some()
    }

    #[must_use]
    pub fn has_criteria(&self) -> bool {
        self.title().is_some()
            || self.has_actors()
            || self.media_type.is_some()
            || self.genre().is_some()
    }

    pub fn validate(&self) -> Result<(), QueryError> {
        if !self.has_criteria() {
            return Err(QueryError::NoCriteria);
        }
        if self.page < 1 {
            return Err(QueryError::InvalidPage);
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.limit) {
            return Err(QueryError::InvalidLimit {
                limit: self.limit,
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(())
    }

    /// Deterministic key over every field. Actor order is significant because
    /// the actor-driven provider path emits results in request order.
    ///
    /// Fields are JSON encoded so separators inside user text cannot make two
    /// different queries share a key.
    #[must_use]
    pub fn cache_key(&self) -> String {
        let actors: Vec<&str> = self.actors().collect();
        serde_json::json!([
            self.title(),
            actors,
            self.media_type.map(MediaType::as_str),
            self.genre(),
            self.page,
            self.limit
        ])
        .to_string()
    }

    #[must_use]
    pub fn matches_any_actor(&self, cast: &str) -> bool {
        let cast = cast.to_lowercase();
        self.actors().any(|a| cast.contains(&a.to_lowercase()))
    }
}

/// One page of merged provider results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    results: Vec<MovieRecord>,
    total: usize,
    page: u32,
    limit: u32,
}

impl SearchResult {
    /// Slices `records` to the requested page. `total` counts every record
    /// before slicing.
    pub fn paginate(records: Vec<MovieRecord>, page: u32, limit: u32) -> Result<Self, QueryError> {
        if page < 1 {
            return Err(QueryError::InvalidPage);
        }
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(QueryError::InvalidLimit {
                limit,
                max: MAX_PAGE_SIZE,
            });
        }

        let total = records.len();
        let start = (page as usize - 1).saturating_mul(limit as usize);
        let results = records
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();

        Ok(Self {
            results,
            total,
            page,
            limit,
        })
    }

    #[must_use]
    pub fn results(&self) -> &[MovieRecord] {
        &self.results
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movie::{NewMovieRecord, Source};

    fn record(n: usize) -> MovieRecord {
        MovieRecord::new(NewMovieRecord {
            title: format!("Movie {n}"),
            year: "2001".to_string(),
            media_type: MediaType::Movie,
            poster: None,
            plot: None,
            actors: vec!["Someone".to_string()],
            genre: vec!["Drama".to_string()],
            source: Source::Tmdb,
        })
        .unwrap()
    }

    #[test]
    fn test_requires_criteria() {
        let query = SearchQuery::default();
        assert_eq!(query.validate(), Err(QueryError::NoCriteria));

        let blank = SearchQuery {
            title: Some("   ".to_string()),
            actors: vec![String::new(), " ".to_string()],
            genre: Some(String::new()),
            ..SearchQuery::default()
        };
        assert_eq!(blank.validate(), Err(QueryError::NoCriteria));

        let typed = SearchQuery {
            media_type: Some(MediaType::Series),
            ..SearchQuery::default()
        };
        assert!(typed.validate().is_ok());
    }

    #[test]
    fn test_page_and_limit_bounds() {
        let base = SearchQuery {
            title: Some("Matrix".to_string()),
            ..SearchQuery::default()
        };

        let zero_page = SearchQuery { page: 0, ..base.clone() };
        assert_eq!(zero_page.validate(), Err(QueryError::InvalidPage));

        let big_limit = SearchQuery { limit: 51, ..base.clone() };
        assert!(matches!(
            big_limit.validate(),
            Err(QueryError::InvalidLimit { limit: 51, .. })
        ));

        let max_limit = SearchQuery { limit: 50, ..base };
        assert!(max_limit.validate().is_ok());
    }

    #[test]
    fn test_cache_key_covers_all_fields() {
        let query = SearchQuery {
            title: Some("Matrix".to_string()),
            actors: vec!["Keanu Reeves".to_string(), "Laurence Fishburne".to_string()],
            media_type: Some(MediaType::Movie),
            genre: Some("Action".to_string()),
            page: 2,
            limit: 5,
        };
        assert_eq!(
            query.cache_key(),
            r#"["Matrix",["Keanu Reeves","Laurence Fishburne"],"movie","Action",2,5]"#
        );

        let next_page = SearchQuery { page: 3, ..query.clone() };
        assert_ne!(query.cache_key(), next_page.cache_key());
    }

    #[test]
    fn test_cache_key_is_actor_order_sensitive() {
        let a = SearchQuery {
            actors: vec!["A".to_string(), "B".to_string()],
            ..SearchQuery::default()
        };
        let b = SearchQuery {
            actors: vec!["B".to_string(), "A".to_string()],
            ..SearchQuery::default()
        };
        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_cache_key_separators_in_text_do_not_collide() {
        let colon_title = SearchQuery {
            title: Some("a:b".to_string()),
            genre: Some("x".to_string()),
            ..SearchQuery::default()
        };
        let colon_actor = SearchQuery {
            title: Some("a".to_string()),
            actors: vec!["b:".to_string()],
            genre: Some("x".to_string()),
            ..SearchQuery::default()
        };
        assert_ne!(colon_title.cache_key(), colon_actor.cache_key());

        let comma_actor = SearchQuery {
            actors: vec!["A,B".to_string()],
            ..SearchQuery::default()
        };
        let two_actors = SearchQuery {
            actors: vec!["A".to_string(), "B".to_string()],
            ..SearchQuery::default()
        };
        assert_ne!(comma_actor.cache_key(), two_actors.cache_key());
    }

    #[test]
    fn test_cache_key_ignores_surrounding_whitespace() {
        let padded = SearchQuery {
            title: Some("  Matrix ".to_string()),
            ..SearchQuery::default()
        };
        let plain = SearchQuery {
            title: Some("Matrix".to_string()),
            ..SearchQuery::default()
        };
        assert_eq!(padded.cache_key(), plain.cache_key());
    }

    #[test]
    fn test_matches_any_actor() {
        let query = SearchQuery {
            actors: vec!["tom hanks".to_string(), "Meg Ryan".to_string()],
            ..SearchQuery::default()
        };
        assert!(query.matches_any_actor("Tom Hanks, Tim Allen"));
        assert!(query.matches_any_actor("Billy Crystal, Meg Ryan"));
        assert!(!query.matches_any_actor("Keanu Reeves"));
    }

    #[test]
    fn test_paginate_slices_and_counts() {
        let records: Vec<_> = (0..15).map(record).collect();

        let first = SearchResult::paginate(records.clone(), 1, 10).unwrap();
        assert_eq!(first.total(), 15);
        assert_eq!(first.results().len(), 10);
        assert_eq!(first.results()[0].title(), "Movie 0");

        let second = SearchResult::paginate(records.clone(), 2, 10).unwrap();
        assert_eq!(second.results().len(), 5);
        assert_eq!(second.results()[0].title(), "Movie 10");

        let beyond = SearchResult::paginate(records, 4, 10).unwrap();
        assert!(beyond.results().is_empty());
        assert_eq!(beyond.total(), 15);
        assert_eq!(beyond.page(), 4);
    }

    #[test]
    fn test_paginate_rejects_invalid_bounds() {
        assert!(SearchResult::paginate(Vec::new(), 0, 10).is_err());
        assert!(SearchResult::paginate(Vec::new(), 1, 0).is_err());
    }
}
