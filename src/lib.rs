// src/lib.rs
// MovieTracker - Local-first movie collection tracker
//
// Architecture:
// - Domain-centric: records, view state and their invariants live in domain
// - Explicit store: every mutation is a named operation that persists, then
//   notifies through the event bus
// - Presentation is a subscriber: the core never holds a reference to it
// - Local-first: the collection lives in a local slot database

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod infrastructure;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod cli;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    clamp_rating, validate_movie, validate_rating, DomainError, Filter, MoviePatch, MovieRecord,
    Page, Theme, ViewError, ViewState, MAX_RATING,
};

// ============================================================================
// PUBLIC API - Configuration & Errors
// ============================================================================

pub use config::{AppConfig, OmdbConfig};
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus, register_render_handlers, CollectionChange, CollectionChanged,
    DomainEvent, EventBus, EventLogEntry, ThemeChanged, ViewStateChanged,
};

// ============================================================================
// PUBLIC API - Database & Repositories
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

pub use repositories::{
    InMemorySlotRepository, MovieListRepository, SlotMovieRepository, SlotRepository,
    SqliteSlotRepository, ThemeRepository, MOVIES_SLOT, THEME_SLOT,
};

// ============================================================================
// PUBLIC API - Infrastructure
// ============================================================================

pub use infrastructure::{Clock, ManualClock, SystemClock};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    // Projection
    project,
    // Command Service
    AddOutcome,
    // Collection Store
    CollectionStore,
    CommandService,
    DetailView,
    ListState,
    Projection,
    ProjectionSink,
    // Render Service
    RenderFrame,
    RenderService,
    SearchStatus,
    SearchView,
    StoreError,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::AppState;

pub use application::commands;
pub use application::dto;

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{
    MovieDetail, MovieProvider, OmdbClient, SearchClient, SearchError, SearchResult,
};
