// src/services/collection_store.rs
//
// Collection Store - the in-memory ordered movie list
//
// CRITICAL RULES:
// - The list is private; every mutation goes through a named method
// - Each mutation persists the whole list, then emits CollectionChanged,
//   exactly once
// - A failed save rolls the in-memory change back before returning
// - Ids stay unique; insertion order is display order

use std::sync::Arc;
use thiserror::Error;

use crate::domain::{validate_movie, MoviePatch, MovieRecord};
use crate::error::{AppError, AppResult};
use crate::events::{CollectionChange, CollectionChanged, EventBus};
use crate::infrastructure::Clock;
use crate::repositories::MovieListRepository;

/// Store contract violations. The command layer never produces these in
/// normal operation; seeing one means a caller skipped an existence check.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Duplicate movie id: {0}")]
    DuplicateId(String),

    #[error("Index {index} out of range for a collection of {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

pub struct CollectionStore {
    records: Vec<MovieRecord>,
    repository: Arc<dyn MovieListRepository>,
    event_bus: Arc<EventBus>,
    clock: Arc<dyn Clock>,
}

impl CollectionStore {
    /// Load the persisted list and take ownership of it for the session
    pub fn open(
        repository: Arc<dyn MovieListRepository>,
        event_bus: Arc<EventBus>,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        let records = repository.load()?;

        Ok(Self {
            records,
            repository,
            event_bus,
            clock,
        })
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MovieRecord> {
        self.records.get(index)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&MovieRecord> {
        self.find_index_by_id(id).map(|index| &self.records[index])
    }

    pub fn find_index_by_id(&self, id: &str) -> Option<usize> {
        find_index(&self.records, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find_index_by_id(id).is_some()
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Add a record at the end. Fails if the id is already tracked.
    pub fn append(&mut self, record: MovieRecord) -> AppResult<usize> {
        let previous = self.records.clone();
        let (index, change) = append_record(&mut self.records, record)?;
        self.commit(previous, change)?;
        Ok(index)
    }

    /// Merge `patch` into the record with `id`, or create it from the patch
    ///
    /// New records start with `fav=false`, `wish=false`, `created_at=now`.
    /// The touched record always gets `updated_at=now`.
    pub fn upsert(&mut self, id: &str, patch: MoviePatch) -> AppResult<usize> {
        let previous = self.records.clone();
        let now = self.clock.now_millis();
        let (index, change) = upsert_record(&mut self.records, id, patch, now)?;
        self.commit(previous, change)?;
        Ok(index)
    }

    /// Remove the record at `index`, returning it
    pub fn remove_at(&mut self, index: usize) -> AppResult<MovieRecord> {
        let previous = self.records.clone();
        let (removed, change) = remove_record(&mut self.records, index)?;
        self.commit(previous, change)?;
        Ok(removed)
    }

    /// Apply several mutations with a single save and a single notification
    ///
    /// If the closure fails, nothing it did is kept and nothing is saved.
    /// Returns the number of mutations applied; zero means no save happened.
    pub fn batch<F>(&mut self, f: F) -> AppResult<usize>
    where
        F: FnOnce(&mut CollectionBatch<'_>) -> AppResult<()>,
    {
        let previous = self.records.clone();
        let now = self.clock.now_millis();

        let mut batch = CollectionBatch {
            records: &mut self.records,
            now,
            operations: 0,
        };

        if let Err(e) = f(&mut batch) {
            self.records = previous;
            return Err(e);
        }

        let operations = batch.operations;
        if operations == 0 {
            return Ok(0);
        }

        self.commit(previous, CollectionChange::Batch { operations })?;
        Ok(operations)
    }

    /// Persist, then notify. Restores `previous` if the save fails.
    fn commit(&mut self, previous: Vec<MovieRecord>, change: CollectionChange) -> AppResult<()> {
        if let Err(e) = self.repository.save(&self.records) {
            log::error!("failed to persist collection, rolling back: {}", e);
            self.records = previous;
            return Err(e);
        }

        log::debug!("collection committed: {:?}", change);
        self.event_bus
            .emit(CollectionChanged::new(change, self.records.clone()));
        Ok(())
    }
}

/// Mutable view of the list inside `CollectionStore::batch`
pub struct CollectionBatch<'a> {
    records: &'a mut Vec<MovieRecord>,
    now: i64,
    operations: usize,
}

impl CollectionBatch<'_> {
    pub fn records(&self) -> &[MovieRecord] {
        self.records
    }

    pub fn find_index_by_id(&self, id: &str) -> Option<usize> {
        find_index(self.records, id)
    }

    pub fn append(&mut self, record: MovieRecord) -> AppResult<usize> {
        let (index, _) = append_record(self.records, record)?;
        self.operations += 1;
        Ok(index)
    }

    pub fn upsert(&mut self, id: &str, patch: MoviePatch) -> AppResult<usize> {
        let (index, _) = upsert_record(self.records, id, patch, self.now)?;
        self.operations += 1;
        Ok(index)
    }

    pub fn remove_at(&mut self, index: usize) -> AppResult<MovieRecord> {
        let (removed, _) = remove_record(self.records, index)?;
        self.operations += 1;
        Ok(removed)
    }
}

// ============================================================================
// INTERNAL: list operations
//
// Each one validates before touching the list, so a failure leaves the list
// exactly as it was.
// ============================================================================

fn find_index(records: &[MovieRecord], id: &str) -> Option<usize> {
    records.iter().position(|r| r.id == id)
}

fn append_record(
    records: &mut Vec<MovieRecord>,
    record: MovieRecord,
) -> AppResult<(usize, CollectionChange)> {
    validate_movie(&record)?;

    if find_index(records, &record.id).is_some() {
        return Err(StoreError::DuplicateId(record.id).into());
    }

    let id = record.id.clone();
    records.push(record);
    Ok((records.len() - 1, CollectionChange::Appended { id }))
}

fn upsert_record(
    records: &mut Vec<MovieRecord>,
    id: &str,
    patch: MoviePatch,
    now: i64,
) -> AppResult<(usize, CollectionChange)> {
    match find_index(records, id) {
        Some(index) => {
            let mut updated = records[index].clone();
            updated.apply(patch);
            updated.updated_at = now;
            validate_movie(&updated)?;

            records[index] = updated;
            Ok((
                index,
                CollectionChange::Upserted {
                    id: id.to_string(),
                    created: false,
                },
            ))
        }
        None => {
            let created = MovieRecord::from_patch(id, patch, now);
            validate_movie(&created)?;

            records.push(created);
            Ok((
                records.len() - 1,
                CollectionChange::Upserted {
                    id: id.to_string(),
                    created: true,
                },
            ))
        }
    }
}

fn remove_record(
    records: &mut Vec<MovieRecord>,
    index: usize,
) -> AppResult<(MovieRecord, CollectionChange)> {
    if index >= records.len() {
        return Err(AppError::Store(StoreError::IndexOutOfRange {
            index,
            len: records.len(),
        }));
    }

    let removed = records.remove(index);
    let change = CollectionChange::Removed {
        id: removed.id.clone(),
    };
    Ok((removed, change))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectionChanged;
    use crate::infrastructure::ManualClock;
    use crate::services::test_support::{movie, RecordingRepository};
    use std::collections::HashSet;
    use std::sync::Mutex;

    struct Harness {
        store: CollectionStore,
        repo: Arc<RecordingRepository>,
        clock: Arc<ManualClock>,
        events: Arc<Mutex<Vec<CollectionChanged>>>,
    }

    fn harness(initial: Vec<MovieRecord>) -> Harness {
        let repo = Arc::new(RecordingRepository::with_records(initial));
        let clock = Arc::new(ManualClock::new(1_000));
        let bus = Arc::new(EventBus::new());

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        bus.subscribe::<CollectionChanged, _>(move |e| sink.lock().unwrap().push(e.clone()));

        let store = CollectionStore::open(repo.clone(), bus, clock.clone()).unwrap();
        Harness {
            store,
            repo,
            clock,
            events,
        }
    }

    fn ids(records: &[MovieRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_open_loads_persisted_records() {
        let h = harness(vec![movie("a"), movie("b")]);
        assert_eq!(ids(h.store.records()), vec!["a", "b"]);
        assert_eq!(h.repo.save_count(), 0);
    }

    #[test]
    fn test_append_persists_then_notifies_once() {
        let mut h = harness(Vec::new());

        let index = h.store.append(movie("tt1375666")).unwrap();

        assert_eq!(index, 0);
        assert_eq!(h.repo.save_count(), 1);
        assert_eq!(ids(&h.repo.last_saved().unwrap()), vec!["tt1375666"]);

        let events = h.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].change,
            CollectionChange::Appended {
                id: "tt1375666".to_string()
            }
        );
        assert_eq!(events[0].records.len(), 1);
    }

    #[test]
    fn test_append_duplicate_id_fails_without_side_effects() {
        let mut h = harness(vec![movie("a")]);

        let err = h.store.append(movie("a")).unwrap_err();

        assert!(matches!(
            err,
            AppError::Store(StoreError::DuplicateId(ref id)) if id == "a"
        ));
        assert_eq!(h.store.len(), 1);
        assert_eq!(h.repo.save_count(), 0);
        assert!(h.events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_append_rejects_empty_title() {
        let mut h = harness(Vec::new());
        let record = MovieRecord::new("a", " ", 0);

        assert!(matches!(h.store.append(record), Err(AppError::Domain(_))));
        assert!(h.store.is_empty());
    }

    #[test]
    fn test_upsert_creates_with_defaults() {
        let mut h = harness(Vec::new());
        h.clock.set(42_000);

        let patch = MoviePatch {
            title: Some("Blade Runner".to_string()),
            ..MoviePatch::default()
        };
        let index = h.store.upsert("tt0083658", patch).unwrap();

        let record = &h.store.records()[index];
        assert!(!record.fav);
        assert!(!record.wish);
        assert_eq!(record.created_at, 42_000);
        assert_eq!(record.updated_at, 42_000);
        assert_eq!(
            h.events.lock().unwrap()[0].change,
            CollectionChange::Upserted {
                id: "tt0083658".to_string(),
                created: true
            }
        );
    }

    #[test]
    fn test_upsert_patch_overrides_defaults() {
        let mut h = harness(Vec::new());

        let patch = MoviePatch {
            title: Some("Blade Runner".to_string()),
            ..MoviePatch::wishlist(true)
        };
        let index = h.store.upsert("tt0083658", patch).unwrap();

        assert!(h.store.records()[index].wish);
        assert!(!h.store.records()[index].fav);
    }

    #[test]
    fn test_upsert_existing_preserves_created_at() {
        let mut h = harness(vec![movie("a")]);
        let created = h.store.records()[0].created_at;
        h.clock.advance(5_000);

        let index = h.store.upsert("a", MoviePatch::favorite(true)).unwrap();

        let record = &h.store.records()[index];
        assert_eq!(index, 0);
        assert!(record.fav);
        assert_eq!(record.created_at, created);
        assert_eq!(record.updated_at, 6_000);
        assert_eq!(h.store.len(), 1);
    }

    #[test]
    fn test_upsert_without_title_for_new_id_fails() {
        let mut h = harness(Vec::new());

        let result = h.store.upsert("tt1", MoviePatch::favorite(true));

        assert!(matches!(result, Err(AppError::Domain(_))));
        assert!(h.store.is_empty());
        assert_eq!(h.repo.save_count(), 0);
    }

    #[test]
    fn test_upsert_sequences_keep_ids_unique() {
        let mut h = harness(Vec::new());
        let pool = ["a", "b", "c", "d", "e"];

        // Small LCG so the sequence is deterministic but well mixed
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
        for step in 0..200 {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            let id = pool[(seed >> 33) as usize % pool.len()];

            let patch = MoviePatch {
                title: Some(format!("Movie {}", id)),
                fav: Some(step % 2 == 0),
                rating: Some(Some((step % 11) as u8)),
                ..MoviePatch::default()
            };
            h.store.upsert(id, patch).unwrap();

            let unique: HashSet<_> = h.store.records().iter().map(|r| &r.id).collect();
            assert_eq!(unique.len(), h.store.len());
        }

        assert!(h.store.len() <= pool.len());
    }

    #[test]
    fn test_remove_at() {
        let mut h = harness(vec![movie("a"), movie("b"), movie("c")]);

        let removed = h.store.remove_at(1).unwrap();

        assert_eq!(removed.id, "b");
        assert_eq!(ids(h.store.records()), vec!["a", "c"]);
        assert_eq!(ids(&h.repo.last_saved().unwrap()), vec!["a", "c"]);
    }

    #[test]
    fn test_remove_at_out_of_range() {
        let mut h = harness(vec![movie("a")]);

        let err = h.store.remove_at(3).unwrap_err();

        assert!(matches!(
            err,
            AppError::Store(StoreError::IndexOutOfRange { index: 3, len: 1 })
        ));
        assert_eq!(h.repo.save_count(), 0);
    }

    #[test]
    fn test_failed_save_rolls_back() {
        let mut h = harness(vec![movie("a")]);
        h.repo.fail_saves(true);

        assert!(h.store.append(movie("b")).is_err());
        assert!(h.store.upsert("a", MoviePatch::favorite(true)).is_err());
        assert!(h.store.remove_at(0).is_err());

        assert_eq!(ids(h.store.records()), vec!["a"]);
        assert!(!h.store.records()[0].fav);
        assert!(h.events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_batch_saves_and_notifies_once() {
        let mut h = harness(vec![movie("a"), movie("b"), movie("c")]);

        let applied = h
            .store
            .batch(|batch| {
                let b = batch.find_index_by_id("b").unwrap();
                batch.remove_at(b)?;
                batch.upsert("c", MoviePatch::wishlist(true))?;
                batch.append(movie("d"))?;
                Ok(())
            })
            .unwrap();

        assert_eq!(applied, 3);
        assert_eq!(ids(h.store.records()), vec!["a", "c", "d"]);
        assert_eq!(h.repo.save_count(), 1);

        let events = h.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].change, CollectionChange::Batch { operations: 3 });
    }

    #[test]
    fn test_failed_batch_keeps_nothing() {
        let mut h = harness(vec![movie("a"), movie("b")]);

        let result = h.store.batch(|batch| {
            batch.remove_at(0)?;
            batch.append(movie("b"))?;
            Ok(())
        });

        assert!(result.is_err());
        assert_eq!(ids(h.store.records()), vec!["a", "b"]);
        assert_eq!(h.repo.save_count(), 0);
    }

    #[test]
    fn test_empty_batch_does_not_save() {
        let mut h = harness(vec![movie("a")]);

        assert_eq!(h.store.batch(|_| Ok(())).unwrap(), 0);
        assert_eq!(h.repo.save_count(), 0);
        assert!(h.events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_find_index_by_id_is_pure() {
        let h = harness(vec![movie("a"), movie("b")]);

        assert_eq!(h.store.find_index_by_id("b"), Some(1));
        assert_eq!(h.store.find_index_by_id("zzz"), None);
        assert_eq!(h.repo.save_count(), 0);
    }
}
