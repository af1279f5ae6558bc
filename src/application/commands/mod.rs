// src/application/commands/mod.rs
//
// Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between the host and the services
// - Commands return DTOs
// - Commands NEVER contain business logic

pub mod collection_commands;
pub mod database_commands;
pub mod search_commands;
pub mod view_commands;


pub use collection_commands::*;
pub use database_commands::*;
pub use search_commands::*;
pub use view_commands::*;
