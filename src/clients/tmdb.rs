use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

#[derive(Debug, Deserialize)]
struct TmdbPage<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPerson {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct TmdbPersonCredits {
    #[serde(default)]
    cast: Vec<TmdbMovieSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetail {
    pub id: u64,
    pub title: String,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    pub credits: Option<TmdbCredits>,
}

impl TmdbMovieDetail {
    /// Cast names in billing order.
    #[must_use]
    pub fn cast_names(&self) -> Vec<String> {
        self.credits
            .as_ref()
            .map(|c| c.cast.iter().map(|m| m.name.clone()).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn genre_names(&self) -> Vec<String> {
        self.genres.iter().map(|g| g.name.clone()).collect()
    }

    /// First four characters of the release date, e.g. `"1999"` for `"1999-03-30"`.
    #[must_use]
    pub fn release_year(&self) -> String {
        self.release_date
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(4)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub id: Option<u64>,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCastMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCastMember {
    pub name: String,
    pub character: Option<String>,
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    #[must_use]
    pub fn with_shared_client(client: Client, api_key: String, base_url: &str) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn search_movies(&self, query: &str, page: u32) -> Result<Vec<TmdbMovieSummary>> {
        let page = page.to_string();
        let response: TmdbPage<TmdbMovieSummary> = self
            .get("/search/movie", &[("query", query), ("page", page.as_str())])
            .await?;
        Ok(response.results)
    }

    pub async fn search_people(&self, name: &str) -> Result<Vec<TmdbPerson>> {
        let response: TmdbPage<TmdbPerson> = self
            .get("/search/person", &[("query", name), ("page", "1")])
            .await?;
        Ok(response.results)
    }

    pub async fn person_movie_credits(&self, person_id: u64) -> Result<Vec<TmdbMovieSummary>> {
        let response: TmdbPersonCredits = self
            .get(&format!("/person/{person_id}/movie_credits"), &[])
            .await?;
        Ok(response.cast)
    }

    /// Movie details with the cast expanded inline.
    pub async fn get_movie(&self, movie_id: u64) -> Result<TmdbMovieDetail> {
        self.get(
            &format!("/movie/{movie_id}"),
            &[("append_to_response", "credits")],
        )
        .await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let mut query = vec![("api_key", self.api_key.as_str())];
        query.extend_from_slice(params);

        let url = Url::parse_with_params(&format!("{}{}", self.base_url, path), &query)
            .with_context(|| format!("Invalid TMDB URL: {}{}", self.base_url, path))?;

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("TMDB API error: {} - {}", status, body));
        }

        Ok(response.json().await?)
    }
}
