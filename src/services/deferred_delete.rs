// src/services/deferred_delete.rs
//
// Deletes requested by index, executed later by id.
//
// The index is only used to find the record at request time. When the
// delay expires the id is looked up again, so mutations made in between
// cannot redirect the delete to a different record.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingDelete {
    pub id: String,
    /// Position at request time, informational only
    pub requested_index: usize,
    /// Epoch millis after which the delete may run
    pub due_at: i64,
}

#[derive(Debug, Default)]
pub struct DeferredDeleteQueue {
    delay_ms: i64,
    pending: Vec<PendingDelete>,
}

impl DeferredDeleteQueue {
    pub fn new(delay_ms: i64) -> Self {
        Self {
            delay_ms: delay_ms.max(0),
            pending: Vec::new(),
        }
    }

    pub fn delay_ms(&self) -> i64 {
        self.delay_ms
    }

    /// Queue a delete for `id`. A second request for an id that is already
    /// queued keeps the first deadline and returns it.
    pub fn schedule(&mut self, id: &str, requested_index: usize, now: i64) -> PendingDelete {
        if let Some(existing) = self.pending.iter().find(|p| p.id == id) {
            return existing.clone();
        }

        let pending = PendingDelete {
            id: id.to_string(),
            requested_index,
            due_at: now + self.delay_ms,
        };

        // Constant delay keeps the queue sorted by deadline
        self.pending.push(pending.clone());
        pending
    }

    /// Put back deletes that were taken but could not be applied
    pub fn requeue(&mut self, items: Vec<PendingDelete>) {
        for item in items {
            if !self.is_pending(&item.id) {
                self.pending.push(item);
            }
        }
        self.pending.sort_by_key(|p| p.due_at);
    }

    /// Drop the queued delete for `id`. Returns whether one was queued.
    pub fn cancel(&mut self, id: &str) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    pub fn pending(&self) -> &[PendingDelete] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<i64> {
        self.pending.iter().map(|p| p.due_at).min()
    }

    /// Remove and return every delete whose deadline has passed
    pub fn take_due(&mut self, now: i64) -> Vec<PendingDelete> {
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due_at <= now);
        self.pending = waiting;
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_sets_deadline() {
        let mut queue = DeferredDeleteQueue::new(250);

        let pending = queue.schedule("tt1", 2, 1_000);

        assert_eq!(pending.due_at, 1_250);
        assert_eq!(pending.requested_index, 2);
        assert_eq!(queue.next_deadline(), Some(1_250));
    }

    #[test]
    fn test_duplicate_request_keeps_first_deadline() {
        let mut queue = DeferredDeleteQueue::new(250);

        queue.schedule("tt1", 0, 1_000);
        let second = queue.schedule("tt1", 0, 1_100);

        assert_eq!(second.due_at, 1_250);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_take_due_only_returns_expired() {
        let mut queue = DeferredDeleteQueue::new(250);
        queue.schedule("a", 0, 1_000);
        queue.schedule("b", 1, 1_100);

        assert!(queue.take_due(1_249).is_empty());

        let due = queue.take_due(1_250);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, "a");
        assert!(queue.is_pending("b"));
        assert!(!queue.is_pending("a"));

        assert_eq!(queue.take_due(10_000).len(), 1);
        assert!(queue.is_empty());
        assert_eq!(queue.next_deadline(), None);
    }

    #[test]
    fn test_requeue_restores_order() {
        let mut queue = DeferredDeleteQueue::new(100);
        queue.schedule("a", 0, 0);
        queue.schedule("b", 1, 50);

        let due = queue.take_due(100);
        assert_eq!(due.len(), 1);

        queue.requeue(due);
        assert_eq!(queue.pending()[0].id, "a");
        assert_eq!(queue.next_deadline(), Some(100));
    }

    #[test]
    fn test_cancel_removes_only_that_id() {
        let mut queue = DeferredDeleteQueue::new(250);
        queue.schedule("a", 0, 1_000);
        queue.schedule("b", 1, 1_000);

        assert!(queue.cancel("a"));
        assert!(!queue.cancel("a"));

        assert!(!queue.is_pending("a"));
        assert!(queue.is_pending("b"));
        assert_eq!(queue.take_due(1_250).len(), 1);
    }

    #[test]
    fn test_negative_delay_is_immediate() {
        let mut queue = DeferredDeleteQueue::new(-5);
        let pending = queue.schedule("a", 0, 100);
        assert_eq!(pending.due_at, 100);
    }
}
