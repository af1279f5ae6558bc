// src/services/render_service.rs
//
// Render Service - keeps the presentation in step with the store
//
// ARCHITECTURE:
// - Subscribes (through events::handlers) to CollectionChanged and
//   ViewStateChanged
// - Recomputes the projection from the latest snapshot
// - Pushes each frame to a ProjectionSink
//
// CRITICAL RULES:
// - Never reads the store directly; the event snapshot is the source
// - Never mutates anything but its own cached frame

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{MovieRecord, ViewState};
use crate::services::projection::{project, Projection};

/// What the presentation layer should draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderFrame {
    pub projection: Projection,
    pub view: ViewState,
}

/// Receiver of rendered frames (a terminal, a UI, a test recorder)
pub trait ProjectionSink: Send + Sync {
    fn render(&self, frame: &RenderFrame);
}

struct RenderState {
    records: Vec<MovieRecord>,
    view: ViewState,
    frame: RenderFrame,
    renders: usize,
}

pub struct RenderService {
    state: Mutex<RenderState>,
    sink: Arc<dyn ProjectionSink>,
}

impl RenderService {
    pub fn new(sink: Arc<dyn ProjectionSink>, records: Vec<MovieRecord>, view: ViewState) -> Self {
        let frame = RenderFrame {
            projection: project(&records, view.active_filter),
            view: view.clone(),
        };

        Self {
            state: Mutex::new(RenderState {
                records,
                view,
                frame,
                renders: 0,
            }),
            sink,
        }
    }

    pub fn on_collection_changed(&self, records: &[MovieRecord]) {
        let mut state = self.lock();
        state.records = records.to_vec();
        self.rerender(&mut state);
    }

    pub fn on_view_changed(&self, view: &ViewState) {
        let mut state = self.lock();
        state.view = view.clone();
        self.rerender(&mut state);
    }

    /// Push the current frame again without any change
    pub fn render_now(&self) {
        let mut state = self.lock();
        self.rerender(&mut state);
    }

    pub fn current(&self) -> RenderFrame {
        self.lock().frame.clone()
    }

    pub fn render_count(&self) -> usize {
        self.lock().renders
    }

    fn rerender(&self, state: &mut RenderState) {
        state.frame = RenderFrame {
            projection: project(&state.records, state.view.active_filter),
            view: state.view.clone(),
        };
        state.renders += 1;
        self.sink.render(&state.frame);
    }

    fn lock(&self) -> MutexGuard<'_, RenderState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Sink that only logs a one-line summary of each frame
#[derive(Debug, Default)]
pub struct LogSink;

impl ProjectionSink for LogSink {
    fn render(&self, frame: &RenderFrame) {
        log::debug!(
            "render: page={} filter={} visible={}/{} state={:?}",
            frame.view.active_page,
            frame.projection.filter,
            frame.projection.visible.len(),
            frame.projection.summary.total,
            frame.projection.state
        );
    }
}

/// Sink that keeps every frame it receives
#[derive(Debug, Default)]
pub struct RecordingSink {
    frames: Mutex<Vec<RenderFrame>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<RenderFrame> {
        self.frames
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<RenderFrame> {
        self.frames().pop()
    }
}

impl ProjectionSink for RecordingSink {
    fn render(&self, frame: &RenderFrame) {
        self.frames
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(frame.clone());
    }
}
