// src/events/handlers/mod.rs
//
// Event Handlers - INTERNAL MODULE
//
// EventHandler type is internal to the bus module and NOT exported.
// Handlers use closure-based subscription via EventBus::subscribe.

pub mod render_handler;

// Only export the registration function
pub use render_handler::register_render_handlers;
