use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use marquee::config::Config;
use marquee::models::{MediaType, MovieRecord, NewMovieRecord, SearchQuery, Source};
use marquee::services::{MovieProvider, ProviderError};
use marquee::state::SharedState;

struct StaticProvider;

#[async_trait::async_trait]
impl MovieProvider for StaticProvider {
    fn source(&self) -> Source {
        Source::Omdb
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<MovieRecord>, ProviderError> {
        let title = query.title().unwrap_or("Untitled").to_string();
        Ok((1..=3)
            .map(|n| {
                MovieRecord::new(NewMovieRecord {
                    title: format!("{title} {n}"),
                    year: "1999".to_string(),
                    media_type: MediaType::Movie,
                    poster: None,
                    plot: Some("Plot".to_string()),
                    actors: vec!["Keanu Reeves".to_string()],
                    genre: vec!["Action".to_string()],
                    source: Source::Omdb,
                })
                .unwrap()
            })
            .collect())
    }
}

fn spawn_app_with(config: Config, providers: Vec<Arc<dyn MovieProvider>>) -> Router {
    let shared = Arc::new(SharedState::with_providers(config, providers));
    marquee::api::router(marquee::api::create_app_state(shared, None))
}

fn spawn_app() -> Router {
    spawn_app_with(Config::default(), vec![Arc::new(StaticProvider)])
}

async fn get(app: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, headers, json)
}

#[tokio::test]
async fn test_search_returns_page() {
    let app = spawn_app();

    let (status, _, body) = get(&app, "/api/v1/movies/search?title=Matrix&limit=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(body["results"][0]["title"], "Matrix 1");
    assert_eq!(body["results"][0]["type"], "movie");
    assert_eq!(body["results"][0]["source"], "omdb");
}

#[tokio::test]
async fn test_search_without_criteria_is_bad_request() {
    let app = spawn_app();

    let (status, _, body) = get(&app, "/api/v1/movies/search?title=&page=1").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "INVALID_QUERY");
    assert_eq!(
        body["detail"],
        "At least one search parameter (title, actors, type, or genre) must be provided"
    );
}

#[tokio::test]
async fn test_search_parameter_validation() {
    let app = spawn_app();

    for uri in [
        "/api/v1/movies/search?type=game",
        "/api/v1/movies/search?title=Matrix&page=0",
        "/api/v1/movies/search?title=Matrix&limit=0",
        "/api/v1/movies/search?title=Matrix&limit=51",
        "/api/v1/movies/search?title=Matrix&page=abc",
    ] {
        let (status, _, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error_code"], "INVALID_QUERY", "{uri}");
    }
}

#[tokio::test]
async fn test_type_alone_is_enough_criteria() {
    let app = spawn_app();
    let (status, _, _) = get(&app, "/api/v1/movies/search?type=SERIES").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_configured_max_page_size_applies() {
    let mut config = Config::default();
    config.pagination.max_page_size = 20;
    let app = spawn_app_with(config, vec![Arc::new(StaticProvider)]);

    let (status, _, _) = get(&app, "/api/v1/movies/search?title=Matrix&limit=21").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_no_providers_is_server_error() {
    let app = spawn_app_with(Config::default(), Vec::new());

    let (status, _, body) = get(&app, "/api/v1/movies/search?title=Matrix").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error_code"], "NO_PROVIDERS");
}

#[tokio::test]
async fn test_health_reports_configured_providers() {
    let mut config = Config::default();
    config.providers.omdb.api_key = "omdb-key".to_string();
    let app = spawn_app_with(config, Vec::new());

    let (status, _, body) = get(&app, "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["providers"]["omdb"], true);
    assert_eq!(body["providers"]["tmdb"], false);
}

#[tokio::test]
async fn test_requests_over_limit_are_throttled() {
    let mut config = Config::default();
    config.rate_limit.per_minute = 2;
    let app = spawn_app_with(config, vec![Arc::new(StaticProvider)]);

    for _ in 0..2 {
        let (status, _, _) = get(&app, "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, headers, body) = get(&app, "/api/v1/movies/search?title=Matrix").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error_code"], "RATE_LIMITED");

    let retry_after: u64 = headers[header::RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&retry_after));
}

#[tokio::test]
async fn test_metrics_disabled_message() {
    let app = spawn_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&body).contains("Metrics not enabled"));
}
