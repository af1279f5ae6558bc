// src/services/test_support.rs
//
// Shared fixtures for service tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::domain::MovieRecord;
use crate::error::{AppError, AppResult};
use crate::repositories::MovieListRepository;

pub fn movie(id: &str) -> MovieRecord {
    MovieRecord::new(id, format!("Movie {}", id), 0)
}

/// Movie repository that remembers every save and can be told to fail
#[derive(Default)]
pub struct RecordingRepository {
    initial: Vec<MovieRecord>,
    saves: Mutex<Vec<Vec<MovieRecord>>>,
    fail: AtomicBool,
}

impl RecordingRepository {
    pub fn with_records(initial: Vec<MovieRecord>) -> Self {
        Self {
            initial,
            ..Self::default()
        }
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }

    pub fn last_saved(&self) -> Option<Vec<MovieRecord>> {
        self.saves.lock().unwrap().last().cloned()
    }
}

impl MovieListRepository for RecordingRepository {
    fn load(&self) -> AppResult<Vec<MovieRecord>> {
        Ok(self.initial.clone())
    }

    fn save(&self, records: &[MovieRecord]) -> AppResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Other("disk full".to_string()));
        }
        self.saves.lock().unwrap().push(records.to_vec());
        Ok(())
    }
}
