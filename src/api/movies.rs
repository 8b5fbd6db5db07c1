use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::validation::{non_blank, parse_actors, parse_media_type, validate_limit, validate_page};
use super::{ApiError, AppState};
use crate::models::{SearchQuery, SearchResult};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub title: Option<String>,
    /// Comma separated actor names.
    pub actors: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub genre: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl SearchParams {
    pub fn into_query(self, default_limit: u32, max_limit: u32) -> Result<SearchQuery, ApiError> {
        Ok(SearchQuery {
            actors: parse_actors(self.actors.as_deref()),
            media_type: parse_media_type(self.media_type.as_deref())?,
            page: validate_page(self.page)?,
            limit: validate_limit(self.limit, default_limit, max_limit)?,
            title: non_blank(self.title),
            genre: non_blank(self.genre),
        })
    }
}

pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResult>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::validation(e.body_text()))?;

    let pagination = &state.shared.config.pagination;
    let query = params.into_query(pagination.default_page_size, pagination.max_page_size)?;

    info!(
        title = query.title().unwrap_or_default(),
        actors = query.actors.len(),
        page = query.page,
        limit = query.limit,
        "Movie search"
    );

    let result = state.search_service().search(&query).await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;

    #[test]
    fn test_into_query_normalizes_params() {
        let params = SearchParams {
            title: Some("  ".to_string()),
            actors: Some("Tom Hanks, ,Meg Ryan".to_string()),
            media_type: Some("Movie".to_string()),
            genre: Some("Drama".to_string()),
            page: None,
            limit: None,
        };

        let query = params.into_query(10, 50).unwrap();
        assert_eq!(query.title, None);
        assert_eq!(query.actors, ["Tom Hanks", "Meg Ryan"]);
        assert_eq!(query.media_type, Some(MediaType::Movie));
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
    }

    #[test]
    fn test_into_query_rejects_bad_type() {
        let params = SearchParams {
            media_type: Some("game".to_string()),
            ..SearchParams::default()
        };
        assert!(matches!(
            params.into_query(10, 50),
            Err(ApiError::ValidationError(_))
        ));
    }
}
