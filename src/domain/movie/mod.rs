pub mod entity;
pub mod invariants;

pub use entity::{clamp_rating, MoviePatch, MovieRecord, MAX_RATING};
pub use invariants::{validate_movie, validate_rating};
