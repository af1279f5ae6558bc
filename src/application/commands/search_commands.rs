// src/application/commands/search_commands.rs
//
// Search & Detail Command Handlers
//
// RULES:
// - Call services
// - Return DTOs
// - Never contain business logic

use crate::application::{dto::*, state::AppState};

/// Search the provider; failures come back as a status, not an error
pub async fn search_movies(state: &mut AppState, query: &str) -> SearchDto {
    SearchDto::from(state.commands.search(query).await)
}

/// Open the detail view for a movie, optionally enriching it from the provider
pub async fn open_detail(state: &mut AppState, id: &str, fetch: bool) -> DetailDto {
    let view = if fetch {
        state.commands.open_detail_and_fetch(id).await
    } else {
        state.commands.open_detail(id)
    };

    DetailDto::from(view)
}

/// Close the detail view
pub fn close_detail(state: &mut AppState) -> ViewDto {
    state.commands.close_detail();
    ViewDto::new(state.commands.view(), state.commands.theme())
}
