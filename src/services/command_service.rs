// src/services/command_service.rs
//
// Command Service - the user-facing operations
//
// ARCHITECTURE:
// - Owns the CollectionStore, the ViewState and the search/detail state
// - Every command runs to completion on `&mut self`; the only suspension
//   points are provider calls
// - Presentation learns about changes through the EventBus only
//
// CRITICAL RULES:
// - Flag and rating commands go through upsert, so a movie that is open in
//   the detail view but not yet tracked is materialized on first action
// - Outside the open detail, those commands on an unknown id are NotFound
// - Deletes are requested by index and executed later by id
// - Provider responses carry a ticket; a response older than the latest
//   request of its kind is dropped
// - Search failures are a status, never an Err

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{
    validate_rating, Filter, MoviePatch, MovieRecord, Page, Theme, ViewState,
};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, ThemeChanged, ViewStateChanged};
use crate::infrastructure::Clock;
use crate::integrations::{MovieDetail, SearchClient, SearchError, SearchResult};
use crate::repositories::ThemeRepository;
use crate::services::collection_store::{CollectionStore, StoreError};
use crate::services::deferred_delete::{DeferredDeleteQueue, PendingDelete};
use crate::services::projection::{project, Projection};

// ============================================================================
// SEARCH STATE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchStatus {
    #[default]
    Idle,
    Searching { query: String },
    Results { count: usize },
    NoResults { message: Option<String> },
    EmptyQuery,
    NetworkError { message: String },
}

impl SearchStatus {
    /// Text for the status line under the search box
    pub fn message(&self) -> String {
        match self {
            SearchStatus::Idle => String::new(),
            SearchStatus::Searching { .. } => "Searching...".to_string(),
            SearchStatus::Results { count } => format!("Results: {}", count),
            SearchStatus::NoResults { message } => message
                .clone()
                .unwrap_or_else(|| "No results.".to_string()),
            SearchStatus::EmptyQuery => "Enter a keyword.".to_string(),
            SearchStatus::NetworkError { .. } => "Network error.".to_string(),
        }
    }
}

impl From<&SearchError> for SearchStatus {
    fn from(error: &SearchError) -> Self {
        match error {
            SearchError::EmptyQuery => SearchStatus::EmptyQuery,
            SearchError::NoResults(message) => SearchStatus::NoResults {
                message: message.clone(),
            },
            SearchError::Network(message) => SearchStatus::NetworkError {
                message: message.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchView {
    pub status: SearchStatus,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub detail: MovieDetail,
    /// The tracked record, when the movie is in the collection
    pub record: Option<MovieRecord>,
    /// Why the last enrichment fetch failed, if it did
    pub fetch_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AddOutcome {
    Added { index: usize },
    AlreadyPresent { index: usize },
}

impl AddOutcome {
    pub fn index(&self) -> usize {
        match self {
            AddOutcome::Added { index } | AddOutcome::AlreadyPresent { index } => *index,
        }
    }
}

// ============================================================================
// TICKETS
// ============================================================================

/// Issued when a search starts; hand it back with the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Issued when a detail fetch starts; hand it back with the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    generation: u64,
    id: String,
}

impl DetailTicket {
    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Default)]
struct Generations {
    search: u64,
    detail: u64,
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct CommandService {
    store: CollectionStore,
    view: ViewState,
    search_client: SearchClient,
    theme_repo: ThemeRepository,
    theme: Theme,
    event_bus: Arc<EventBus>,
    clock: Arc<dyn Clock>,
    deletes: DeferredDeleteQueue,
    search_status: SearchStatus,
    search_results: Vec<SearchResult>,
    detail: Option<MovieDetail>,
    detail_error: Option<String>,
    generations: Generations,
}

impl CommandService {
    pub fn new(
        store: CollectionStore,
        search_client: SearchClient,
        theme_repo: ThemeRepository,
        event_bus: Arc<EventBus>,
        clock: Arc<dyn Clock>,
        delete_delay_ms: i64,
    ) -> AppResult<Self> {
        let theme = theme_repo.load()?;

        Ok(Self {
            store,
            view: ViewState::new(),
            search_client,
            theme_repo,
            theme,
            event_bus,
            clock,
            deletes: DeferredDeleteQueue::new(delete_delay_ms),
            search_status: SearchStatus::Idle,
            search_results: Vec::new(),
            detail: None,
            detail_error: None,
            generations: Generations::default(),
        })
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn projection(&self) -> Projection {
        project(self.store.records(), self.view.active_filter)
    }

    pub fn search_view(&self) -> SearchView {
        SearchView {
            status: self.search_status.clone(),
            results: self.search_results.clone(),
        }
    }

    /// The open detail, if any
    pub fn detail_view(&self) -> Option<DetailView> {
        let detail = self.detail.clone()?;
        let record = self.store.get_by_id(&detail.id).cloned();

        Some(DetailView {
            detail,
            record,
            fetch_error: self.detail_error.clone(),
        })
    }

    pub fn pending_deletes(&self) -> &[PendingDelete] {
        self.deletes.pending()
    }

    pub fn next_delete_deadline(&self) -> Option<i64> {
        self.deletes.next_deadline()
    }

    /// Time left until the next queued delete is due, zero if overdue
    pub fn next_delete_wait(&self) -> Option<Duration> {
        self.deletes.next_deadline().map(|deadline| {
            let wait = (deadline - self.clock.now_millis()).max(0);
            Duration::from_millis(wait as u64)
        })
    }

    // ========================================================================
    // SEARCH
    // ========================================================================

    pub fn begin_search(&mut self, query: &str) -> SearchTicket {
        self.generations.search += 1;
        self.search_status = SearchStatus::Searching {
            query: query.trim().to_string(),
        };

        SearchTicket {
            generation: self.generations.search,
            query: query.to_string(),
        }
    }

    /// Apply a search response. Returns `None` when a newer search has
    /// started since the ticket was issued.
    pub fn complete_search(
        &mut self,
        ticket: SearchTicket,
        result: Result<Vec<SearchResult>, SearchError>,
    ) -> Option<SearchView> {
        if ticket.generation != self.generations.search {
            log::debug!("discarding stale search response for {:?}", ticket.query);
            return None;
        }

        match result {
            Ok(results) => {
                self.search_status = SearchStatus::Results {
                    count: results.len(),
                };
                self.search_results = results;
            }
            Err(e) => {
                log::info!("search {:?} failed: {}", ticket.query, e);
                self.search_status = SearchStatus::from(&e);
                self.search_results.clear();
            }
        }

        Some(self.search_view())
    }

    pub async fn search(&mut self, query: &str) -> SearchView {
        let ticket = self.begin_search(query);
        let client = self.search_client.clone();
        let result = client.search(ticket.query()).await;

        self.complete_search(ticket, result)
            .unwrap_or_else(|| self.search_view())
    }

    /// Track a search hit. Adding an id that is already tracked leaves the
    /// record as it is, but cancels a delete still queued for it.
    pub fn add_result(&mut self, result: &SearchResult) -> AppResult<AddOutcome> {
        if let Some(index) = self.store.find_index_by_id(&result.external_id) {
            return Ok(self.already_present(&result.external_id, index));
        }

        let mut record = MovieRecord::new(
            result.external_id.clone(),
            result.title.clone(),
            self.clock.now_millis(),
        );
        record.year = result.year.clone();
        record.poster = result.poster_url.clone();

        let index = self.store.append(record)?;
        log::info!("added {} to the collection", result.external_id);
        Ok(AddOutcome::Added { index })
    }

    /// `add_result` for a hit from the latest search, by its id
    pub fn add_result_by_id(&mut self, external_id: &str) -> AppResult<AddOutcome> {
        let result = self
            .search_results
            .iter()
            .find(|r| r.external_id == external_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(external_id.to_string()))?;

        self.add_result(&result)
    }

    /// Track a movie by id, asking the provider when it is not among the
    /// latest search hits
    pub async fn add_by_external_id(&mut self, external_id: &str) -> AppResult<AddOutcome> {
        let external_id = external_id.trim();
        if let Some(index) = self.store.find_index_by_id(external_id) {
            return Ok(self.already_present(external_id, index));
        }
        if self.search_results.iter().any(|r| r.external_id == external_id) {
            return self.add_result_by_id(external_id);
        }

        let client = self.search_client.clone();
        let detail = client.fetch_detail(external_id).await?;

        self.add_result(&SearchResult {
            external_id: external_id.to_string(),
            title: detail.title,
            year: detail.year,
            poster_url: detail.poster,
        })
    }

    fn already_present(&mut self, id: &str, index: usize) -> AddOutcome {
        if self.deletes.cancel(id) {
            log::info!("re-adding {} cancels its pending delete", id);
        }
        AddOutcome::AlreadyPresent { index }
    }

    // ========================================================================
    // DETAIL
    // ========================================================================

    /// Open the detail for `id` using what is known locally
    ///
    /// The tracked record wins over a search hit. An id known to neither
    /// opens with an empty detail until a fetch fills it.
    pub fn open_detail(&mut self, id: &str) -> DetailView {
        let id = id.trim();
        let detail = self
            .store
            .get_by_id(id)
            .map(MovieDetail::from)
            .or_else(|| {
                self.search_results
                    .iter()
                    .find(|r| r.external_id == id)
                    .map(MovieDetail::from)
            })
            .unwrap_or_else(|| MovieDetail {
                id: id.to_string(),
                ..MovieDetail::default()
            });

        self.show_detail(detail)
    }

    pub fn open_result_detail(&mut self, result: &SearchResult) -> DetailView {
        if self.store.contains(&result.external_id) {
            return self.open_detail(&result.external_id);
        }
        self.show_detail(MovieDetail::from(result))
    }

    /// Start fetching the full detail for the open movie
    pub fn begin_detail_fetch(&mut self) -> Option<DetailTicket> {
        let id = self.view.open_detail_id.clone()?;
        self.generations.detail += 1;

        Some(DetailTicket {
            generation: self.generations.detail,
            id,
        })
    }

    /// Apply a detail response. Returns `None` when the response is stale:
    /// a newer fetch started, or the detail was closed or switched.
    pub fn complete_detail_fetch(
        &mut self,
        ticket: DetailTicket,
        result: Result<MovieDetail, SearchError>,
    ) -> Option<DetailView> {
        if ticket.generation != self.generations.detail
            || !self.view.is_detail_open_for(&ticket.id)
        {
            log::debug!("discarding stale detail response for {}", ticket.id);
            return None;
        }

        match result {
            Ok(mut fetched) => {
                fetched.id = ticket.id;
                self.detail = Some(fetched);
                self.detail_error = None;
            }
            Err(e) => {
                log::info!("detail fetch for {} failed: {}", ticket.id, e);
                self.detail_error = Some(e.to_string());
            }
        }

        self.detail_view()
    }

    /// Open the detail and enrich it from the provider
    pub async fn open_detail_and_fetch(&mut self, id: &str) -> DetailView {
        let opened = self.open_detail(id);
        self.refresh_detail().await.unwrap_or(opened)
    }

    /// Fetch the full detail for whatever is open now
    pub async fn refresh_detail(&mut self) -> Option<DetailView> {
        let ticket = self.begin_detail_fetch()?;
        let client = self.search_client.clone();
        let result = client.fetch_detail(ticket.id()).await;

        self.complete_detail_fetch(ticket, result)
    }

    pub fn close_detail(&mut self) -> Option<String> {
        let closed = self.view.close_detail();
        self.detail = None;
        self.detail_error = None;

        if closed.is_some() {
            self.notify_view();
        }
        closed
    }

    // ========================================================================
    // RECORD COMMANDS
    // ========================================================================

    pub fn toggle_favorite(&mut self, id: &str) -> AppResult<MovieRecord> {
        let current = self.store.get_by_id(id).map(|r| r.fav).unwrap_or(false);
        self.apply_record_patch(id, MoviePatch::favorite(!current))
    }

    pub fn toggle_wishlist(&mut self, id: &str) -> AppResult<MovieRecord> {
        let current = self.store.get_by_id(id).map(|r| r.wish).unwrap_or(false);
        self.apply_record_patch(id, MoviePatch::wishlist(!current))
    }

    pub fn set_rating(&mut self, id: &str, rating: i64) -> AppResult<MovieRecord> {
        let rating = validate_rating(rating)?;
        self.apply_record_patch(id, MoviePatch::rating(Some(rating)))
    }

    pub fn clear_rating(&mut self, id: &str) -> AppResult<MovieRecord> {
        self.apply_record_patch(id, MoviePatch::rating(None))
    }

    fn apply_record_patch(&mut self, id: &str, patch: MoviePatch) -> AppResult<MovieRecord> {
        let index = if self.store.contains(id) {
            self.store.upsert(id, patch)?
        } else if self.view.is_detail_open_for(id) {
            let details = self
                .detail
                .as_ref()
                .filter(|d| d.id == id)
                .map(MovieDetail::to_patch)
                .unwrap_or_default();

            log::info!("materializing {} from the open detail", id);
            self.store.upsert(id, patch.or_details(details))?
        } else {
            return Err(AppError::NotFound(id.to_string()));
        };

        self.store
            .get(index)
            .cloned()
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    // ========================================================================
    // DEFERRED DELETE
    // ========================================================================

    /// Queue removal of the record currently at `index`
    pub fn request_delete(&mut self, index: usize) -> AppResult<PendingDelete> {
        let record = self.store.get(index).ok_or(StoreError::IndexOutOfRange {
            index,
            len: self.store.len(),
        })?;

        let id = record.id.clone();
        let pending = self.deletes.schedule(&id, index, self.clock.now_millis());
        log::debug!("delete of {} due at {}", id, pending.due_at);
        Ok(pending)
    }

    /// Run every delete whose delay has passed, as one batch
    ///
    /// Returns the ids actually removed. Ids no longer in the collection are
    /// skipped.
    pub fn flush_due_deletes(&mut self) -> AppResult<Vec<String>> {
        let due = self.deletes.take_due(self.clock.now_millis());
        if due.is_empty() {
            return Ok(Vec::new());
        }

        let mut removed = Vec::new();
        let outcome = self.store.batch(|batch| {
            for pending in &due {
                match batch.find_index_by_id(&pending.id) {
                    Some(index) => {
                        batch.remove_at(index)?;
                        removed.push(pending.id.clone());
                    }
                    None => log::debug!("delete of {} skipped, already gone", pending.id),
                }
            }
            Ok(())
        });

        if let Err(e) = outcome {
            self.deletes.requeue(due);
            return Err(e);
        }

        Ok(removed)
    }

    /// Wait out the queue and apply every delete in it
    pub async fn run_pending_deletes(&mut self) -> AppResult<Vec<String>> {
        let mut removed = Vec::new();

        while let Some(deadline) = self.deletes.next_deadline() {
            let wait = deadline - self.clock.now_millis();
            if wait > 0 {
                tokio::time::sleep(Duration::from_millis(wait as u64)).await;
            }

            removed.extend(self.flush_due_deletes()?);

            // A clock that did not move would otherwise spin here
            if self.deletes.next_deadline() == Some(deadline) {
                break;
            }
        }

        Ok(removed)
    }

    // ========================================================================
    // VIEW
    // ========================================================================

    pub fn set_filter(&mut self, filter: Filter) {
        if self.view.set_filter(filter) {
            self.notify_view();
        }
    }

    pub fn set_filter_named(&mut self, name: &str) -> AppResult<Filter> {
        let filter: Filter = name.parse()?;
        self.set_filter(filter);
        Ok(filter)
    }

    pub fn set_page(&mut self, page: Page) {
        if self.view.set_page(page) {
            self.notify_view();
        }
    }

    pub fn set_page_named(&mut self, name: &str) -> AppResult<Page> {
        let page: Page = name.parse()?;
        self.set_page(page);
        Ok(page)
    }

    pub fn toggle_theme(&mut self) -> AppResult<Theme> {
        let next = self.theme.toggled();
        self.theme_repo.save(next)?;
        self.theme = next;

        self.event_bus.emit(ThemeChanged::new(next));
        Ok(next)
    }

    // ========================================================================
    // INTERNAL
    // ========================================================================

    fn show_detail(&mut self, detail: MovieDetail) -> DetailView {
        self.view.open_detail(detail.id.clone());
        self.detail = Some(detail.clone());
        self.detail_error = None;
        self.notify_view();

        let record = self.store.get_by_id(&detail.id).cloned();
        DetailView {
            detail,
            record,
            fetch_error: None,
        }
    }

    fn notify_view(&self) {
        self.event_bus.emit(ViewStateChanged::new(self.view.clone()));
    }
}
