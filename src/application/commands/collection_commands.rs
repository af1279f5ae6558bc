// src/application/commands/collection_commands.rs
//
// Collection Command Handlers
//
// RULES:
// - Call services
// - Return DTOs
// - Never contain business logic

use std::time::Duration;

use crate::application::{dto::*, state::AppState};
use crate::error::AppResult;

/// Current collection view, as last rendered
pub fn list_movies(state: &AppState) -> ProjectionDto {
    state.render_service.render_now();
    ProjectionDto::from(&state.render_service.current())
}

/// Add a movie to the collection by its provider id
pub async fn add_movie(state: &mut AppState, external_id: &str) -> AppResult<AddResultDto> {
    let outcome = state.commands.add_by_external_id(external_id).await?;
    let record = state.commands.store().get(outcome.index());

    Ok(AddResultDto::new(outcome, record))
}

/// Flip the favorite flag
pub fn toggle_favorite(state: &mut AppState, id: &str) -> AppResult<MovieDto> {
    let record = state.commands.toggle_favorite(id)?;
    Ok(MovieDto::from(&record))
}

/// Flip the wishlist flag
pub fn toggle_wishlist(state: &mut AppState, id: &str) -> AppResult<MovieDto> {
    let record = state.commands.toggle_wishlist(id)?;
    Ok(MovieDto::from(&record))
}

/// Rate a movie 0..=10
pub fn set_rating(state: &mut AppState, id: &str, rating: i64) -> AppResult<MovieDto> {
    let record = state.commands.set_rating(id, rating)?;
    Ok(MovieDto::from(&record))
}

/// Make a movie unrated again
pub fn clear_rating(state: &mut AppState, id: &str) -> AppResult<MovieDto> {
    let record = state.commands.clear_rating(id)?;
    Ok(MovieDto::from(&record))
}

/// Queue the delete of the record at `index`
pub fn request_delete(state: &mut AppState, index: usize) -> AppResult<PendingDeleteDto> {
    let pending = state.commands.request_delete(index)?;
    Ok(PendingDeleteDto::from(&pending))
}

/// Delete the record at `index`, waiting out the removal delay
pub async fn delete_movie(state: &mut AppState, index: usize) -> AppResult<DeleteDto> {
    let requested = request_delete(state, index)?;
    let removed = state.commands.run_pending_deletes().await?;

    Ok(DeleteDto { requested, removed })
}

/// Apply deletes whose delay has already passed
pub fn flush_deletes(state: &mut AppState) -> AppResult<Vec<String>> {
    state.commands.flush_due_deletes()
}

/// How long until the next queued delete is due
pub fn next_delete_wait(state: &AppState) -> Option<Duration> {
    state.commands.next_delete_wait()
}

/// Wait for and apply every queued delete
pub async fn drain_deletes(state: &mut AppState) -> AppResult<Vec<String>> {
    state.commands.run_pending_deletes().await
}
