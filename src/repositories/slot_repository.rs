// src/repositories/slot_repository.rs
//
// Named key-value slots: the local storage the tracker persists into.

use rusqlite::{params, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::db::ConnectionPool;
use crate::error::{AppError, AppResult};

pub trait SlotRepository: Send + Sync {
    fn read(&self, key: &str) -> AppResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

pub struct SqliteSlotRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteSlotRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

impl SlotRepository for SqliteSlotRepository {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        let conn = self.pool.get()?;

        let value = conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value],
        )?;

        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM kv_slots WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// Slots that live only as long as the process
#[derive(Default)]
pub struct InMemorySlotRepository {
    slots: Mutex<HashMap<String, String>>,
}

impl InMemorySlotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a slot, as if written by an earlier session
    pub fn with_slot(key: &str, value: &str) -> Self {
        let repo = Self::new();
        if let Ok(mut slots) = repo.slots.lock() {
            slots.insert(key.to_string(), value.to_string());
        }
        repo
    }
}

impl SlotRepository for InMemorySlotRepository {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| AppError::Other("Slot store lock poisoned".to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| AppError::Other("Slot store lock poisoned".to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| AppError::Other("Slot store lock poisoned".to_string()))?;
        slots.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_connection_pool, create_memory_pool, initialize_database};

    fn sqlite_repo() -> SqliteSlotRepository {
        let pool = create_memory_pool().unwrap();
        initialize_database(&pool.get().unwrap()).unwrap();
        SqliteSlotRepository::new(Arc::new(pool))
    }

    #[test]
    fn test_sqlite_read_missing_slot() {
        let repo = sqlite_repo();
        assert_eq!(repo.read("missing").unwrap(), None);
    }

    #[test]
    fn test_sqlite_write_overwrites() {
        let repo = sqlite_repo();

        repo.write("movieTracker.theme_v1", "light").unwrap();
        repo.write("movieTracker.theme_v1", "dark").unwrap();

        assert_eq!(
            repo.read("movieTracker.theme_v1").unwrap(),
            Some("dark".to_string())
        );
    }

    #[test]
    fn test_sqlite_remove() {
        let repo = sqlite_repo();
        repo.write("k", "v").unwrap();
        repo.remove("k").unwrap();
        assert_eq!(repo.read("k").unwrap(), None);
    }

    #[test]
    fn test_sqlite_slots_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slots.db");

        {
            let pool = create_connection_pool(&path).unwrap();
            initialize_database(&pool.get().unwrap()).unwrap();
            let repo = SqliteSlotRepository::new(Arc::new(pool));
            repo.write("k", "[1,2,3]").unwrap();
        }

        let pool = create_connection_pool(&path).unwrap();
        initialize_database(&pool.get().unwrap()).unwrap();
        let repo = SqliteSlotRepository::new(Arc::new(pool));
        assert_eq!(repo.read("k").unwrap(), Some("[1,2,3]".to_string()));
    }

    #[test]
    fn test_in_memory_slots() {
        let repo = InMemorySlotRepository::with_slot("a", "1");
        assert_eq!(repo.read("a").unwrap(), Some("1".to_string()));

        repo.write("b", "2").unwrap();
        repo.remove("a").unwrap();

        assert_eq!(repo.read("a").unwrap(), None);
        assert_eq!(repo.read("b").unwrap(), Some("2".to_string()));
    }
}
