use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::models::MediaType;

/// OMDb marks absent fields with this literal instead of omitting them.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Deserialize)]
pub struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Search", default)]
    pub search: Vec<OmdbSearchItem>,
    #[serde(rename = "totalResults")]
    pub total_results: Option<String>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl OmdbSearchResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.response.eq_ignore_ascii_case("false")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchItem {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Type", default)]
    pub item_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OmdbDetail {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Type", default)]
    pub item_type: String,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "Actors", default)]
    pub actors: String,
    #[serde(rename = "Genre", default)]
    pub genre: String,
}

#[derive(Debug, Deserialize)]
struct OmdbErrorEnvelope {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    #[must_use]
    pub const fn with_shared_client(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }

    pub async fn search(
        &self,
        title: &str,
        media_type: Option<MediaType>,
        page: u32,
    ) -> Result<OmdbSearchResponse> {
        let page = page.to_string();
        let mut params = vec![("s", title), ("page", page.as_str())];
        if let Some(media_type) = media_type {
            params.push(("type", media_type.as_str()));
        }

        self.get(&params).await
    }

    pub async fn get_detail(&self, imdb_id: &str) -> Result<OmdbDetail> {
        let body: serde_json::Value = self.get(&[("i", imdb_id)]).await?;

        let envelope: OmdbErrorEnvelope = serde_json::from_value(body.clone())?;
        if envelope
            .response
            .is_some_and(|r| r.eq_ignore_ascii_case("false"))
        {
            anyhow::bail!(
                "OMDb detail lookup failed for {}: {}",
                imdb_id,
                envelope.error.unwrap_or_default()
            );
        }

        serde_json::from_value(body)
            .with_context(|| format!("Malformed OMDb detail for {imdb_id}"))
    }

    async fn get<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T> {
        let mut query = vec![("apikey", self.api_key.as_str())];
        query.extend_from_slice(params);

        let url = Url::parse_with_params(&self.base_url, &query)
            .with_context(|| format!("Invalid OMDb base URL: {}", self.base_url))?;

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("OMDb API error: {} - {}", status, body));
        }

        Ok(response.json().await?)
    }
}

/// Splits OMDb's comma separated lists ("Action, Sci-Fi") into entries.
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    if value.trim() == NOT_AVAILABLE {
        return Vec::new();
    }

    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Returns the value unless OMDb reported it as unavailable.
#[must_use]
pub fn available(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != NOT_AVAILABLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("Keanu Reeves, Laurence Fishburne,Carrie-Anne Moss"),
            vec!["Keanu Reeves", "Laurence Fishburne", "Carrie-Anne Moss"]
        );
        assert!(split_list("N/A").is_empty());
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_available() {
        assert_eq!(available(Some("N/A")), None);
        assert_eq!(available(Some("  ")), None);
        assert_eq!(available(None), None);
        assert_eq!(available(Some("Plot")), Some("Plot"));
    }

    #[test]
    fn test_search_response_failure_flag() {
        let body = r#"{"Response":"False","Error":"Movie not found!"}"#;
        let parsed: OmdbSearchResponse = serde_json::from_str(body).unwrap();
        assert!(!parsed.is_success());
        assert!(parsed.search.is_empty());
        assert_eq!(parsed.error.as_deref(), Some("Movie not found!"));
    }
}
