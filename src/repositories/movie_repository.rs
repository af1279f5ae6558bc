// src/repositories/movie_repository.rs
//
// Persistent store adapter for the movie collection.
//
// The whole list is one JSON array in one slot. Stored data is advisory:
// a missing or unreadable slot loads as an empty collection.

use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::slot_repository::SlotRepository;
use crate::domain::MovieRecord;
use crate::error::AppResult;

#[derive(Debug, Error)]
#[error("Stored movie list is unreadable: {0}")]
pub struct StorageParseError(#[from] serde_json::Error);

pub trait MovieListRepository: Send + Sync {
    fn load(&self) -> AppResult<Vec<MovieRecord>>;
    fn save(&self, records: &[MovieRecord]) -> AppResult<()>;
}

pub struct SlotMovieRepository {
    slots: Arc<dyn SlotRepository>,
    key: String,
}

impl SlotMovieRepository {
    pub fn new(slots: Arc<dyn SlotRepository>, key: impl Into<String>) -> Self {
        Self {
            slots,
            key: key.into(),
        }
    }
}

impl MovieListRepository for SlotMovieRepository {
    fn load(&self) -> AppResult<Vec<MovieRecord>> {
        let Some(raw) = self.slots.read(&self.key)? else {
            log::debug!("slot {} is empty, starting with an empty collection", self.key);
            return Ok(Vec::new());
        };

        match parse_movie_list(&raw) {
            Ok(records) => {
                log::info!("loaded {} movies from slot {}", records.len(), self.key);
                Ok(records)
            }
            Err(e) => {
                log::warn!("{}; starting with an empty collection", e);
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, records: &[MovieRecord]) -> AppResult<()> {
        let json = serialize_movie_list(records)?;
        self.slots.write(&self.key, &json)?;
        log::debug!("saved {} movies to slot {}", records.len(), self.key);
        Ok(())
    }
}

pub fn serialize_movie_list(records: &[MovieRecord]) -> AppResult<String> {
    Ok(serde_json::to_string(records)?)
}

/// Parse a stored movie list
///
/// The top level must be a JSON array. Individual entries that do not
/// parse, or that have no title, are skipped. Entries written by the first
/// tracker prototype have no `id`; they get a `legacy-` id derived from
/// title, year and creation time, so the same entry keeps its id across
/// loads even before the list is written back. Later
/// duplicates of an id are dropped so the loaded list keeps ids unique.
pub fn parse_movie_list(raw: &str) -> Result<Vec<MovieRecord>, StorageParseError> {
    let entries: Vec<Value> = serde_json::from_str(raw)?;

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(entries.len());

    for (position, entry) in entries.into_iter().enumerate() {
        let mut record: MovieRecord = match serde_json::from_value(entry) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("skipping stored movie #{}: {}", position, e);
                continue;
            }
        };

        if record.title.trim().is_empty() {
            log::warn!("skipping stored movie #{}: empty title", position);
            continue;
        }

        if record.id.trim().is_empty() {
            record.id = legacy_id(&record);
        }

        if record.updated_at == 0 {
            record.updated_at = record.created_at;
        }

        if !seen.insert(record.id.clone()) {
            log::warn!("dropping duplicate stored movie {}", record.id);
            continue;
        }

        records.push(record);
    }

    Ok(records)
}

fn legacy_id(record: &MovieRecord) -> String {
    let name = format!("{}\u{1f}{}\u{1f}{}", record.title, record.year, record.created_at);
    format!("legacy-{}", Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()))
}
