use super::entity::{MovieRecord, MAX_RATING};
use crate::domain::{DomainError, DomainResult};

/// Validates all MovieRecord invariants
/// These are the absolute rules that must hold for a record to be stored
pub fn validate_movie(record: &MovieRecord) -> DomainResult<()> {
    validate_id(&record.id)?;
    validate_title(&record.title)?;
    if let Some(rating) = record.rating {
        validate_rating(rating as i64)?;
    }
    Ok(())
}

/// Validates a rating supplied by a command, returning it narrowed
pub fn validate_rating(rating: i64) -> DomainResult<u8> {
    if !(0..=MAX_RATING as i64).contains(&rating) {
        return Err(DomainError::RatingOutOfRange(rating));
    }
    Ok(rating as u8)
}

fn validate_id(id: &str) -> DomainResult<()> {
    if id.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Movie id cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Movie title cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Invariants that must hold true for the Movie domain:
///
/// 1. Identity (external id) is unique within the collection
/// 2. Title cannot be empty
/// 3. Rating, when present, is 0..=10; zero is a real rating
/// 4. Created timestamp never changes
/// 5. Updated timestamp reflects the last mutating command
/// 6. Insertion order is display order
