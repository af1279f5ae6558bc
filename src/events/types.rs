// events/types.rs
//
// All events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{MovieRecord, Theme, ViewState};

/// Trait that all events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// COLLECTION EVENTS
// ============================================================================

/// What a single store operation did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollectionChange {
    Appended { id: String },
    Upserted { id: String, created: bool },
    Removed { id: String },
    Batch { operations: usize },
}

/// Emitted once per store operation, after the list has been persisted
///
/// Carries a snapshot of the whole ordered list so subscribers never need
/// to reach back into the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub change: CollectionChange,
    pub records: Vec<MovieRecord>,
}

impl CollectionChanged {
    pub fn new(change: CollectionChange, records: Vec<MovieRecord>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            change,
            records,
        }
    }
}

impl DomainEvent for CollectionChanged {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CollectionChanged" }
}

// ============================================================================
// VIEW EVENTS
// ============================================================================

/// Emitted when filter, page or open detail changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewStateChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub view: ViewState,
}

impl ViewStateChanged {
    pub fn new(view: ViewState) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            view,
        }
    }
}

impl DomainEvent for ViewStateChanged {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ViewStateChanged" }
}

/// Emitted after the theme preference was toggled and saved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub theme: Theme,
}

impl ThemeChanged {
    pub fn new(theme: Theme) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            theme,
        }
    }
}

impl DomainEvent for ThemeChanged {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ThemeChanged" }
}
