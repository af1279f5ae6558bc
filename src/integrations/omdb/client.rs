// src/integrations/omdb/client.rs
//
// OMDb API Integration
//
// ARCHITECTURE:
// - Plain GET client for the OMDb JSON API
// - Maps external data → SearchResult / MovieDetail (NO store mutation)
// - Used through the MovieProvider trait
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - The literal "N/A" never leaves this module; it becomes ""
// - Transport and decoding failures are SearchError::Network
// - `Response: "False"` is SearchError::NoResults with the provider message

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;

use crate::config::OmdbConfig;
use crate::error::{AppError, AppResult};
use crate::integrations::{MovieDetail, MovieProvider, SearchError, SearchResult};

/// OMDb sentinel for a missing field
const NOT_AVAILABLE: &str = "N/A";

/// Search response wrapper
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<SearchItem>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
}

/// Detail response
#[derive(Debug, Deserialize)]
struct DetailResponse {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Runtime")]
    runtime: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
}

/// OMDb API Client
pub struct OmdbClient {
    base_url: String,
    api_key: String,
    http_client: Client,
}

impl OmdbClient {
    pub fn new(config: &OmdbConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            http_client,
        })
    }

    /// Search movies by free text
    pub async fn search_movies(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let body = self
            .get(&[
                ("apikey", self.api_key.as_str()),
                ("s", query),
                ("type", "movie"),
            ])
            .await?;

        parse_search_response(&body)
    }

    /// Get one movie by IMDb id
    pub async fn get_movie(&self, imdb_id: &str) -> Result<MovieDetail, SearchError> {
        let body = self
            .get(&[
                ("apikey", self.api_key.as_str()),
                ("i", imdb_id),
                ("plot", "short"),
            ])
            .await?;

        parse_detail_response(&body)
    }

    // ========================================================================
    // INTERNAL: HTTP
    // ========================================================================

    async fn get(&self, query: &[(&str, &str)]) -> Result<String, SearchError> {
        let response = self
            .http_client
            .get(&self.base_url)
            .header(header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| SearchError::Network(format!("OMDb request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SearchError::Network(format!(
                "OMDb returned status: {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| SearchError::Network(format!("Failed to read OMDb response: {}", e)))
    }
}

#[async_trait]
impl MovieProvider for OmdbClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        self.search_movies(query).await
    }

    async fn fetch_detail(&self, external_id: &str) -> Result<MovieDetail, SearchError> {
        self.get_movie(external_id).await
    }
}

fn normalize(value: Option<String>) -> String {
    match value {
        Some(v) if v.trim() != NOT_AVAILABLE => v,
        _ => String::new(),
    }
}

fn is_success(response: &str) -> bool {
    response.eq_ignore_ascii_case("true")
}

fn decode<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, SearchError> {
    serde_json::from_str(body)
        .map_err(|e| SearchError::Network(format!("Failed to parse OMDb response: {}", e)))
}

/// Map a raw search body to results
pub fn parse_search_response(body: &str) -> Result<Vec<SearchResult>, SearchError> {
    let response: SearchResponse = decode(body)?;

    if !is_success(&response.response) {
        return Err(SearchError::NoResults(response.error));
    }

    let results: Vec<SearchResult> = response
        .search
        .into_iter()
        .filter_map(|item| {
            let external_id = normalize(item.imdb_id);
            let title = normalize(item.title);
            if external_id.is_empty() || title.trim().is_empty() {
                return None;
            }
            Some(SearchResult {
                external_id,
                title,
                year: normalize(item.year),
                poster_url: normalize(item.poster),
            })
        })
        .collect();

    if results.is_empty() {
        return Err(SearchError::NoResults(response.error));
    }

    Ok(results)
}

/// Map a raw detail body to a detail record
pub fn parse_detail_response(body: &str) -> Result<MovieDetail, SearchError> {
    let response: DetailResponse = decode(body)?;

    if !is_success(&response.response) {
        return Err(SearchError::NoResults(response.error));
    }

    let detail = MovieDetail {
        id: normalize(response.imdb_id),
        title: normalize(response.title),
        year: normalize(response.year),
        poster: normalize(response.poster),
        plot: normalize(response.plot),
        genre: normalize(response.genre),
        runtime: normalize(response.runtime),
    };

    if detail.id.is_empty() || detail.title.trim().is_empty() {
        return Err(SearchError::NoResults(None));
    }

    Ok(detail)
}
