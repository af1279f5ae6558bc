// src/application/state.rs
//
// Application state: everything a command handler needs, wired once.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{
    create_connection_pool, get_connection, get_database_path, initialize_database,
    ConnectionPool,
};
use crate::domain::ViewState;
use crate::error::AppResult;
use crate::events::{register_render_handlers, EventBus};
use crate::infrastructure::{Clock, SystemClock};
use crate::integrations::{MovieProvider, OmdbClient, SearchClient};
use crate::repositories::{
    InMemorySlotRepository, MovieListRepository, SlotMovieRepository, SlotRepository,
    SqliteSlotRepository, ThemeRepository, MOVIES_SLOT, THEME_SLOT,
};
use crate::services::{CollectionStore, CommandService, ProjectionSink, RenderService};

/// Application state owned by the host.
/// Shared pieces are Arc-wrapped; the command service is owned because
/// every command runs to completion before the next one starts.
pub struct AppState {
    pub event_bus: Arc<EventBus>,
    pub render_service: Arc<RenderService>,
    pub commands: CommandService,
    pub pool: Option<Arc<ConnectionPool>>,
    pub database_path: Option<PathBuf>,
}

impl AppState {
    /// Wire the production stack: SQLite slots (or memory), OMDb, wall clock
    pub fn initialize(config: &AppConfig, sink: Arc<dyn ProjectionSink>) -> AppResult<Self> {
        // 1. INFRASTRUCTURE
        let (slots, pool, database_path) = if config.ephemeral {
            log::info!("using in-memory slots; nothing will be saved");
            let slots: Arc<dyn SlotRepository> = Arc::new(InMemorySlotRepository::new());
            (slots, None, None)
        } else {
            let path = match &config.database_path {
                Some(path) => path.clone(),
                None => get_database_path()?,
            };

            let pool = Arc::new(create_connection_pool(&path)?);
            {
                let conn = get_connection(&pool)?;
                initialize_database(&conn)?;
            }

            log::info!("using slot database at {}", path.display());
            let slots: Arc<dyn SlotRepository> = Arc::new(SqliteSlotRepository::new(pool.clone()));
            (slots, Some(pool), Some(path))
        };

        let provider: Arc<dyn MovieProvider> = Arc::new(OmdbClient::new(&config.omdb)?);

        let mut state = Self::assemble(config, slots, provider, Arc::new(SystemClock), sink)?;
        state.pool = pool;
        state.database_path = database_path;
        Ok(state)
    }

    /// Wire repositories, services and handlers over the given backends
    pub fn assemble(
        config: &AppConfig,
        slots: Arc<dyn SlotRepository>,
        provider: Arc<dyn MovieProvider>,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn ProjectionSink>,
    ) -> AppResult<Self> {
        let event_bus = Arc::new(EventBus::new());

        // 2. REPOSITORIES
        let movies: Arc<dyn MovieListRepository> =
            Arc::new(SlotMovieRepository::new(slots.clone(), MOVIES_SLOT));
        let themes = ThemeRepository::new(slots, THEME_SLOT);

        // 3. SERVICES
        let store = CollectionStore::open(movies, event_bus.clone(), clock.clone())?;
        let render_service = Arc::new(RenderService::new(
            sink,
            store.records().to_vec(),
            ViewState::new(),
        ));
        let commands = CommandService::new(
            store,
            SearchClient::new(provider),
            themes,
            event_bus.clone(),
            clock,
            config.delete_delay_ms,
        )?;

        // 4. EVENT HANDLER REGISTRATION (WIRING)
        register_render_handlers(&event_bus, render_service.clone());

        Ok(Self {
            event_bus,
            render_service,
            commands,
            pool: None,
            database_path: None,
        })
    }
}
