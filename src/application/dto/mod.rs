// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are output-friendly representations
// - DTOs NEVER leak domain invariants
// - DTOs are simple, serializable structs
// - Conversion FROM domain entities only (never TO)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::DatabaseStats;
use crate::domain::{MovieRecord, Theme, ViewState};
use crate::services::{
    card_subtitle, rating_label, AddOutcome, DetailView, PendingDelete, RenderFrame,
    SearchView, SearchStatus,
};

// ============================================================================
// MOVIE DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDto {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster: String,
    pub plot: String,
    pub genre: String,
    pub runtime: String,
    pub rating: Option<u8>,
    pub rating_label: String,
    pub subtitle: String,
    pub fav: bool,
    pub wish: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// One line of the collection list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieCardDto {
    /// Position in the whole collection, usable with `delete`
    pub index: usize,
    pub movie: MovieDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddResultDto {
    pub added: bool,
    pub index: usize,
    pub movie: Option<MovieDto>,
}

// ============================================================================
// COLLECTION VIEW DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryDto {
    pub total: usize,
    pub favorites: usize,
    pub wishlisted: usize,
    pub rated: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionDto {
    pub page: String,
    pub filter: String,
    pub summary: SummaryDto,
    pub items: Vec<MovieCardDto>,
    /// Set when `items` is empty; differs between an empty collection and
    /// a filter with no matches
    pub empty_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewDto {
    pub page: String,
    pub filter: String,
    pub open_detail_id: Option<String>,
    pub theme: String,
}

// ============================================================================
// SEARCH & DETAIL DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultDto {
    pub external_id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchDto {
    pub status: String,
    pub message: String,
    pub results: Vec<SearchResultDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailDto {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster: String,
    pub plot: String,
    pub genre: String,
    pub runtime: String,
    pub tracked: bool,
    pub movie: Option<MovieDto>,
    pub fetch_error: Option<String>,
}

// ============================================================================
// DELETE DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingDeleteDto {
    pub id: String,
    pub requested_index: usize,
    pub due_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDto {
    pub requested: PendingDeleteDto,
    pub removed: Vec<String>,
}

// ============================================================================
// DATABASE DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseInfoDto {
    pub path: Option<String>,
    pub size_bytes: i64,
    pub page_count: i64,
    pub page_size: i64,
    pub slot_count: i64,
    pub integrity_ok: bool,
    pub movies: usize,
}

// ============================================================================
// CONVERSIONS (Domain → DTO)
// ============================================================================

fn millis_to_rfc3339(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

impl From<&MovieRecord> for MovieDto {
    fn from(record: &MovieRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            year: record.year.clone(),
            poster: record.poster.clone(),
            plot: record.plot.clone(),
            genre: record.genre.clone(),
            runtime: record.runtime.clone(),
            rating: record.rating,
            rating_label: rating_label(record),
            subtitle: card_subtitle(record),
            fav: record.fav,
            wish: record.wish,
            created_at: millis_to_rfc3339(record.created_at),
            updated_at: millis_to_rfc3339(record.updated_at),
        }
    }
}

impl AddResultDto {
    pub fn new(outcome: AddOutcome, record: Option<&MovieRecord>) -> Self {
        Self {
            added: matches!(outcome, AddOutcome::Added { .. }),
            index: outcome.index(),
            movie: record.map(MovieDto::from),
        }
    }
}

impl From<&RenderFrame> for ProjectionDto {
    fn from(frame: &RenderFrame) -> Self {
        let projection = &frame.projection;

        Self {
            page: frame.view.active_page.to_string(),
            filter: projection.filter.to_string(),
            summary: SummaryDto {
                total: projection.summary.total,
                favorites: projection.summary.favorites,
                wishlisted: projection.summary.wishlisted,
                rated: projection.summary.rated,
            },
            items: projection
                .visible
                .iter()
                .map(|v| MovieCardDto {
                    index: v.index,
                    movie: MovieDto::from(&v.record),
                })
                .collect(),
            empty_message: projection.state.message().map(str::to_string),
        }
    }
}

impl ViewDto {
    pub fn new(view: &ViewState, theme: Theme) -> Self {
        Self {
            page: view.active_page.to_string(),
            filter: view.active_filter.to_string(),
            open_detail_id: view.open_detail_id.clone(),
            theme: theme.to_string(),
        }
    }
}

fn status_name(status: &SearchStatus) -> &'static str {
    match status {
        SearchStatus::Idle => "idle",
        SearchStatus::Searching { .. } => "searching",
        SearchStatus::Results { .. } => "results",
        SearchStatus::NoResults { .. } => "no_results",
        SearchStatus::EmptyQuery => "empty_query",
        SearchStatus::NetworkError { .. } => "network_error",
    }
}

impl From<SearchView> for SearchDto {
    fn from(view: SearchView) -> Self {
        Self {
            status: status_name(&view.status).to_string(),
            message: view.status.message(),
            results: view
                .results
                .into_iter()
                .map(|r| SearchResultDto {
                    external_id: r.external_id,
                    title: r.title,
                    year: r.year,
                    poster_url: r.poster_url,
                })
                .collect(),
        }
    }
}

impl From<DetailView> for DetailDto {
    fn from(view: DetailView) -> Self {
        let movie = view.record.as_ref().map(MovieDto::from);
        let detail = view.detail;

        Self {
            id: detail.id,
            title: detail.title,
            year: detail.year,
            poster: detail.poster,
            plot: detail.plot,
            genre: detail.genre,
            runtime: detail.runtime,
            tracked: movie.is_some(),
            movie,
            fetch_error: view.fetch_error,
        }
    }
}

impl From<&PendingDelete> for PendingDeleteDto {
    fn from(pending: &PendingDelete) -> Self {
        Self {
            id: pending.id.clone(),
            requested_index: pending.requested_index,
            due_at: millis_to_rfc3339(pending.due_at),
        }
    }
}

impl DatabaseInfoDto {
    pub fn new(
        path: Option<String>,
        stats: &DatabaseStats,
        integrity_ok: bool,
        movies: usize,
    ) -> Self {
        Self {
            path,
            size_bytes: stats.size_bytes,
            page_count: stats.page_count,
            page_size: stats.page_size,
            slot_count: stats.slot_count,
            integrity_ok,
            movies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_dto_display_fields() {
        let mut record = MovieRecord::new("tt1", "Heat", 0);
        record.year = "1995".to_string();
        record.rating = Some(8);

        let dto = MovieDto::from(&record);

        assert_eq!(dto.rating_label, "8");
        assert_eq!(dto.subtitle, "1995 · 8/10");
        assert_eq!(dto.created_at, "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_search_dto_status() {
        let dto = SearchDto::from(SearchView {
            status: SearchStatus::EmptyQuery,
            results: Vec::new(),
        });

        assert_eq!(dto.status, "empty_query");
        assert_eq!(dto.message, "Enter a keyword.");
    }
}
