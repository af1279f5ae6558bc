// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file MUST declare all domain modules and re-export their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod movie;
pub mod theme;
pub mod view;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Movie Domain
pub use movie::{
    clamp_rating, validate_movie, validate_rating, MoviePatch, MovieRecord, MAX_RATING,
};

// View Domain
pub use view::{Filter, Page, ViewError, ViewState};

// Theme preference
pub use theme::Theme;

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Rating {0} is outside 0..=10")]
    RatingOutOfRange(i64),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
