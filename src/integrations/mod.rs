// src/integrations/mod.rs
//
// External Integrations Module
//
// ARCHITECTURE:
// - `MovieProvider` is the seam to the remote movie database
// - `SearchClient` applies the caller-side rules on top of any provider
// - Providers map external data → plain result types (NO store mutation)

pub mod omdb;

pub use omdb::client::{parse_detail_response, parse_search_response, OmdbClient};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::domain::{MoviePatch, MovieRecord};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error("No results: {}", .0.as_deref().unwrap_or("provider returned nothing"))]
    NoResults(Option<String>),

    #[error("Network error: {0}")]
    Network(String),
}

/// Lightweight search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub external_id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
}

/// Full detail record for one movie
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster: String,
    pub plot: String,
    pub genre: String,
    pub runtime: String,
}

impl MovieDetail {
    /// Descriptive fields as a patch, for materializing or refreshing a record
    pub fn to_patch(&self) -> MoviePatch {
        MoviePatch {
            title: Some(self.title.clone()),
            year: Some(self.year.clone()),
            poster: Some(self.poster.clone()),
            plot: Some(self.plot.clone()),
            genre: Some(self.genre.clone()),
            runtime: Some(self.runtime.clone()),
            ..MoviePatch::default()
        }
    }
}

impl From<&SearchResult> for MovieDetail {
    fn from(result: &SearchResult) -> Self {
        Self {
            id: result.external_id.clone(),
            title: result.title.clone(),
            year: result.year.clone(),
            poster: result.poster_url.clone(),
            ..Self::default()
        }
    }
}

impl From<&MovieRecord> for MovieDetail {
    fn from(record: &MovieRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            year: record.year.clone(),
            poster: record.poster.clone(),
            plot: record.plot.clone(),
            genre: record.genre.clone(),
            runtime: record.runtime.clone(),
        }
    }
}

/// Remote movie database
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;
    async fn fetch_detail(&self, external_id: &str) -> Result<MovieDetail, SearchError>;
}

/// Caller-facing search client
///
/// Blank input is rejected before any request goes out, and an empty hit
/// list is reported as `NoResults` whatever the provider said.
#[derive(Clone)]
pub struct SearchClient {
    provider: Arc<dyn MovieProvider>,
}

impl SearchClient {
    pub fn new(provider: Arc<dyn MovieProvider>) -> Self {
        Self { provider }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let results = self.provider.search(query).await?;
        if results.is_empty() {
            return Err(SearchError::NoResults(None));
        }

        log::debug!("search {:?} returned {} results", query, results.len());
        Ok(results)
    }

    pub async fn fetch_detail(&self, external_id: &str) -> Result<MovieDetail, SearchError> {
        let external_id = external_id.trim();
        if external_id.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        self.provider.fetch_detail(external_id).await
    }
}
