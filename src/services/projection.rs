// src/services/projection.rs
//
// Projection - pure derivation of what the collection view shows
//
// CRITICAL RULES:
// - No I/O, no events, no mutation
// - Visible records keep collection order and their collection index
// - Summary counts always cover the whole collection, never the filter

use serde::Serialize;

use crate::domain::{clamp_rating, Filter, MovieRecord, MAX_RATING};

/// A record that passed the filter, with its position in the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleRecord {
    pub index: usize,
    pub record: MovieRecord,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub total: usize,
    pub favorites: usize,
    pub wishlisted: usize,
    pub rated: usize,
}

impl CollectionSummary {
    pub fn of(records: &[MovieRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, record| {
            acc.total += 1;
            acc.favorites += usize::from(record.fav);
            acc.wishlisted += usize::from(record.wish);
            acc.rated += usize::from(record.is_rated());
            acc
        })
    }
}

/// Which of the two empty states applies, if any
///
/// An empty collection and a filter that matches nothing are shown
/// differently, so they are never collapsed into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListState {
    Populated,
    EmptyCollection,
    NoMatches,
}

impl ListState {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            ListState::Populated => None,
            ListState::EmptyCollection => Some("Your collection is empty."),
            ListState::NoMatches => Some("No movies match this filter."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub filter: Filter,
    pub visible: Vec<VisibleRecord>,
    pub summary: CollectionSummary,
    pub state: ListState,
}

/// Derive the filtered list, summary and empty state for `records`
pub fn project(records: &[MovieRecord], filter: Filter) -> Projection {
    let visible: Vec<VisibleRecord> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| filter.matches(record))
        .map(|(index, record)| VisibleRecord {
            index,
            record: record.clone(),
        })
        .collect();

    let state = if records.is_empty() {
        ListState::EmptyCollection
    } else if visible.is_empty() {
        ListState::NoMatches
    } else {
        ListState::Populated
    };

    Projection {
        filter,
        visible,
        summary: CollectionSummary::of(records),
        state,
    }
}

// ============================================================================
// PRESENTATION HELPERS
// ============================================================================

/// Rating as shown on a card: clamped number, or "-" when unrated
pub fn rating_label(record: &MovieRecord) -> String {
    match record.rating {
        Some(rating) => clamp_rating(i64::from(rating)).to_string(),
        None => "-".to_string(),
    }
}

/// Card subtitle, `"{year} · {rating}/10"`
pub fn card_subtitle(record: &MovieRecord) -> String {
    format!("{} · {}/{}", record.year, rating_label(record), MAX_RATING)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, fav: bool, wish: bool, rating: Option<u8>) -> MovieRecord {
        let mut r = MovieRecord::new(id, format!("Movie {}", id), 0);
        r.fav = fav;
        r.wish = wish;
        r.rating = rating;
        r
    }

    fn visible_ids(p: &Projection) -> Vec<&str> {
        p.visible.iter().map(|v| v.record.id.as_str()).collect()
    }

    #[test]
    fn test_favorites_filter_keeps_order_and_indices() {
        let records = vec![
            record("a", true, false, None),
            record("b", false, false, None),
            record("c", true, false, None),
        ];

        let p = project(&records, Filter::Favorites);

        assert_eq!(visible_ids(&p), vec!["a", "c"]);
        assert_eq!(p.visible[1].index, 2);
        assert_eq!(
            p.summary,
            CollectionSummary {
                total: 3,
                favorites: 2,
                wishlisted: 0,
                rated: 0
            }
        );
    }

    #[test]
    fn test_zero_rating_is_rated() {
        let records = vec![
            record("a", false, false, Some(0)),
            record("b", false, false, None),
        ];

        let p = project(&records, Filter::Rated);

        assert_eq!(visible_ids(&p), vec!["a"]);
        assert_eq!(p.summary.rated, 1);
    }

    #[test]
    fn test_wishlist_filter() {
        let records = vec![
            record("a", false, true, None),
            record("b", true, false, Some(7)),
        ];

        let p = project(&records, Filter::Wishlist);

        assert_eq!(visible_ids(&p), vec!["a"]);
        assert_eq!(p.summary.wishlisted, 1);
    }

    #[test]
    fn test_filter_is_sound_and_complete() {
        let records = vec![
            record("a", true, true, Some(3)),
            record("b", false, true, None),
            record("c", true, false, Some(0)),
            record("d", false, false, None),
        ];

        for filter in Filter::VARIANTS {
            let p = project(&records, filter);
            let expected: Vec<&str> = records
                .iter()
                .filter(|r| filter.matches(r))
                .map(|r| r.id.as_str())
                .collect();
            assert_eq!(visible_ids(&p), expected, "filter {}", filter);
            assert_eq!(p.summary.total, 4);
        }
    }

    #[test]
    fn test_empty_collection_state() {
        let p = project(&[], Filter::All);

        assert_eq!(p.state, ListState::EmptyCollection);
        assert_eq!(p.summary, CollectionSummary::default());
    }

    #[test]
    fn test_no_matches_state_differs_from_empty() {
        let records = vec![record("a", false, false, None)];

        let p = project(&records, Filter::Favorites);

        assert_eq!(p.state, ListState::NoMatches);
        assert_ne!(p.state.message(), ListState::EmptyCollection.message());
    }

    #[test]
    fn test_rating_label_and_subtitle() {
        let mut r = record("a", false, false, None);
        r.year = "1982".to_string();
        assert_eq!(rating_label(&r), "-");
        assert_eq!(card_subtitle(&r), "1982 · -/10");

        r.rating = Some(12);
        assert_eq!(rating_label(&r), "10");

        r.rating = Some(0);
        assert_eq!(card_subtitle(&r), "1982 · 0/10");
    }
}
