// src/events/handlers/render_handler.rs
//
// Render Event Handler
//
// Bridge between the event bus and the RenderService.
//
// CRITICAL RULES:
// - Only consumes CollectionChanged and ViewStateChanged
// - Delegates all work to RenderService
// - No business logic here

use std::sync::Arc;

use crate::events::{CollectionChanged, EventBus, ViewStateChanged};
use crate::services::RenderService;

// ============================================================================
// HANDLER REGISTRATION
// ============================================================================

/// Registers the render handlers with the event bus
pub fn register_render_handlers(bus: &EventBus, service: Arc<RenderService>) {
    let collection_service = Arc::clone(&service);
    bus.subscribe::<CollectionChanged, _>(move |event| {
        log::trace!(
            "[RENDER] CollectionChanged {:?}, {} records",
            event.change,
            event.records.len()
        );
        collection_service.on_collection_changed(&event.records);
    });

    let view_service = Arc::clone(&service);
    bus.subscribe::<ViewStateChanged, _>(move |event| {
        log::trace!("[RENDER] ViewStateChanged {:?}", event.view);
        view_service.on_view_changed(&event.view);
    });

    log::debug!("[RENDER] Handlers registered");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MovieRecord, ViewState};
    use crate::events::CollectionChange;
    use crate::services::RecordingSink;

    #[test]
    fn test_handlers_forward_events() {
        let bus = EventBus::new();
        let sink = Arc::new(RecordingSink::new());
        let service = Arc::new(RenderService::new(sink.clone(), Vec::new(), ViewState::new()));

        register_render_handlers(&bus, Arc::clone(&service));
        assert_eq!(bus.subscriber_count::<CollectionChanged>(), 1);
        assert_eq!(bus.subscriber_count::<ViewStateChanged>(), 1);

        bus.emit(CollectionChanged::new(
            CollectionChange::Appended { id: "a".to_string() },
            vec![MovieRecord::new("a", "Heat", 0)],
        ));
        bus.emit(ViewStateChanged::new(ViewState::new()));

        assert_eq!(sink.frames().len(), 2);
        assert_eq!(service.current().projection.summary.total, 1);
    }
}
