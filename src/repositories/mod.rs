// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO event emission
// - NO cross-repository calls
// - Explicit SQL only

pub mod movie_repository;
pub mod slot_repository;
pub mod theme_repository;

pub use movie_repository::{
    parse_movie_list, serialize_movie_list, MovieListRepository, SlotMovieRepository,
    StorageParseError,
};
pub use slot_repository::{InMemorySlotRepository, SlotRepository, SqliteSlotRepository};
pub use theme_repository::ThemeRepository;

/// Slot holding the JSON array of movie records
pub const MOVIES_SLOT: &str = "movieTracker.movies_v1";

/// Slot holding the theme string
pub const THEME_SLOT: &str = "movieTracker.theme_v1";
