// src/application/commands/view_commands.rs
//
// View Command Handlers

use crate::application::{dto::*, state::AppState};
use crate::error::AppResult;

fn current_view(state: &AppState) -> ViewDto {
    ViewDto::new(state.commands.view(), state.commands.theme())
}

/// Select the collection filter by name
pub fn set_filter(state: &mut AppState, name: &str) -> AppResult<ViewDto> {
    state.commands.set_filter_named(name)?;
    Ok(current_view(state))
}

/// Select the page by name
pub fn set_page(state: &mut AppState, name: &str) -> AppResult<ViewDto> {
    state.commands.set_page_named(name)?;
    Ok(current_view(state))
}

/// Switch between light and dark
pub fn toggle_theme(state: &mut AppState) -> AppResult<ViewDto> {
    state.commands.toggle_theme()?;
    Ok(current_view(state))
}

pub fn get_view(state: &AppState) -> ViewDto {
    current_view(state)
}
