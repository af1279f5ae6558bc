//! View State Invariants:
//!
//! 1. Exactly one filter is active at any time (default: All)
//! 2. Exactly one page is active at any time (default: Home)
//! 3. At most one movie is open in the detail view
//! 4. The open detail id does not need to exist in the collection
//! 5. Unknown filter/page names are rejected, never coerced

pub mod entity;

pub use entity::{Filter, Page, ViewState};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid page: {0}")]
    InvalidPage(String),
}
