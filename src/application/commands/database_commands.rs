// src/application/commands/database_commands.rs
//
// Database Command Handlers

use crate::application::{dto::*, state::AppState};
use crate::db::{get_connection, get_database_stats, verify_database_integrity, DatabaseStats};
use crate::error::AppResult;

/// Slot database statistics and an integrity check
///
/// An ephemeral session has no database; it reports zeros.
pub fn database_info(state: &AppState) -> AppResult<DatabaseInfoDto> {
    let movies = state.commands.store().len();
    let path = state
        .database_path
        .as_ref()
        .map(|p| p.display().to_string());

    let Some(pool) = &state.pool else {
        let empty = DatabaseStats {
            size_bytes: 0,
            page_count: 0,
            page_size: 0,
            slot_count: 0,
        };
        return Ok(DatabaseInfoDto::new(path, &empty, true, movies));
    };

    let conn = get_connection(pool)?;
    let stats = get_database_stats(&conn)?;
    let integrity_ok = match verify_database_integrity(&conn) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("integrity check failed: {}", e);
            false
        }
    };

    Ok(DatabaseInfoDto::new(path, &stats, integrity_ok, movies))
}
