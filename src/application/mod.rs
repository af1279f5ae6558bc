// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - The boundary between the host (CLI) and the services
// - It translates between DTOs and domain entities
// - It maps errors to a stable response shape

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod state;

pub use commands::*;
pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use state::AppState;
