// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod collection_store;
pub mod command_service;
pub mod deferred_delete;
pub mod projection;
pub mod render_service;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export all services and their types
pub use collection_store::{CollectionBatch, CollectionStore, StoreError};

pub use command_service::{
    AddOutcome,
    CommandService,
    DetailTicket,
    DetailView,
    SearchStatus,
    SearchTicket,
    SearchView,
};

pub use deferred_delete::{DeferredDeleteQueue, PendingDelete};

pub use projection::{
    card_subtitle,
    project,
    rating_label,
    CollectionSummary,
    ListState,
    Projection,
    VisibleRecord,
};

pub use render_service::{LogSink, ProjectionSink, RecordingSink, RenderFrame, RenderService};
