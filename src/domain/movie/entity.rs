use serde::{Deserialize, Deserializer, Serialize};

/// Highest rating a record can carry
pub const MAX_RATING: u8 = 10;

/// One tracked movie in the personal collection
///
/// The JSON shape (camelCase keys, `rating` omitted when unrated) is the
/// persisted slot format, shared with earlier versions of the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    /// External identifier from the provider (imdbID)
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub title: String,

    /// Provider supplied, not guaranteed numeric ("2010", "2010–2014")
    #[serde(default)]
    pub year: String,

    /// Poster URL, empty when the provider has none
    #[serde(default)]
    pub poster: String,

    #[serde(default)]
    pub plot: String,

    #[serde(default)]
    pub genre: String,

    #[serde(default)]
    pub runtime: String,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_rating"
    )]
    pub rating: Option<u8>,

    #[serde(default)]
    pub fav: bool,

    #[serde(default)]
    pub wish: bool,

    /// Epoch milliseconds, set once
    #[serde(default)]
    pub created_at: i64,

    /// Epoch milliseconds, refreshed by every mutating command
    #[serde(default)]
    pub updated_at: i64,
}

impl MovieRecord {
    /// Create a new record with default flags
    pub fn new(id: impl Into<String>, title: impl Into<String>, now: i64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            year: String::new(),
            poster: String::new(),
            plot: String::new(),
            genre: String::new(),
            runtime: String::new(),
            rating: None,
            fav: false,
            wish: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a record for an id that is not yet tracked
    pub fn from_patch(id: impl Into<String>, patch: MoviePatch, now: i64) -> Self {
        let mut record = Self::new(id, String::new(), now);
        record.apply(patch);
        record
    }

    /// Shallow-merge a patch. `id` and `created_at` are never touched.
    pub fn apply(&mut self, patch: MoviePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(poster) = patch.poster {
            self.poster = poster;
        }
        if let Some(plot) = patch.plot {
            self.plot = plot;
        }
        if let Some(genre) = patch.genre {
            self.genre = genre;
        }
        if let Some(runtime) = patch.runtime {
            self.runtime = runtime;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(fav) = patch.fav {
            self.fav = fav;
        }
        if let Some(wish) = patch.wish {
            self.wish = wish;
        }
    }

    /// Zero is a valid rating; only an absent rating counts as unrated
    pub fn is_rated(&self) -> bool {
        self.rating.is_some()
    }
}

impl std::fmt::Display for MovieRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.year.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{} ({})", self.title, self.year)
        }
    }
}

/// Partial update applied by `CollectionStore::upsert`
///
/// `None` leaves the field alone. `rating: Some(None)` clears the rating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub year: Option<String>,
    pub poster: Option<String>,
    pub plot: Option<String>,
    pub genre: Option<String>,
    pub runtime: Option<String>,
    pub rating: Option<Option<u8>>,
    pub fav: Option<bool>,
    pub wish: Option<bool>,
}

impl MoviePatch {
    pub fn favorite(fav: bool) -> Self {
        Self {
            fav: Some(fav),
            ..Self::default()
        }
    }

    pub fn wishlist(wish: bool) -> Self {
        Self {
            wish: Some(wish),
            ..Self::default()
        }
    }

    pub fn rating(rating: Option<u8>) -> Self {
        Self {
            rating: Some(rating),
            ..Self::default()
        }
    }

    /// Fill descriptive fields from another patch where this one has none
    pub fn or_details(mut self, details: MoviePatch) -> Self {
        self.title = self.title.or(details.title);
        self.year = self.year.or(details.year);
        self.poster = self.poster.or(details.poster);
        self.plot = self.plot.or(details.plot);
        self.genre = self.genre.or(details.genre);
        self.runtime = self.runtime.or(details.runtime);
        self
    }
}

/// Clamp any numeric rating into `0..=MAX_RATING`
pub fn clamp_rating(value: i64) -> u8 {
    value.clamp(0, MAX_RATING as i64) as u8
}

/// Stored ratings may come from older builds as floats or out-of-range
/// numbers; they are clamped rather than rejected so one bad value does not
/// discard the whole collection.
fn deserialize_rating<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = Option::deserialize(deserializer)?;
    Ok(value
        .filter(|v| v.is_finite())
        .map(|v| clamp_rating(v.round() as i64)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = MovieRecord::new("tt1375666", "Inception", 1_000);
        assert!(!record.fav);
        assert!(!record.wish);
        assert_eq!(record.rating, None);
        assert_eq!(record.created_at, 1_000);
        assert_eq!(record.updated_at, 1_000);
    }

    #[test]
    fn test_apply_preserves_identity() {
        let mut record = MovieRecord::new("tt1375666", "Inception", 1_000);
        record.apply(MoviePatch {
            title: Some("Inception (2010)".to_string()),
            fav: Some(true),
            ..MoviePatch::default()
        });

        assert_eq!(record.id, "tt1375666");
        assert_eq!(record.created_at, 1_000);
        assert_eq!(record.title, "Inception (2010)");
        assert!(record.fav);
    }

    #[test]
    fn test_rating_patch_can_clear() {
        let mut record = MovieRecord::new("tt1", "Heat", 0);
        record.apply(MoviePatch::rating(Some(8)));
        assert_eq!(record.rating, Some(8));

        record.apply(MoviePatch::rating(None));
        assert_eq!(record.rating, None);
    }

    #[test]
    fn test_zero_rating_counts_as_rated() {
        let mut record = MovieRecord::new("tt1", "Heat", 0);
        record.rating = Some(0);
        assert!(record.is_rated());
    }

    #[test]
    fn test_serialized_keys_are_camel_case() {
        let record = MovieRecord::new("tt1", "Heat", 5);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["createdAt"], 5);
        assert_eq!(json["updatedAt"], 5);
        assert!(json.get("rating").is_none());
    }

    #[test]
    fn test_legacy_record_without_optional_fields() {
        let json = r#"{"title":"Heat","year":"1995","poster":"","fav":true,"createdAt":42}"#;
        let record: MovieRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, "");
        assert!(record.fav);
        assert!(!record.wish);
        assert_eq!(record.plot, "");
        assert_eq!(record.updated_at, 0);
    }

    #[test]
    fn test_stored_rating_is_clamped() {
        let record: MovieRecord =
            serde_json::from_str(r#"{"id":"a","title":"A","rating":14}"#).unwrap();
        assert_eq!(record.rating, Some(10));

        let record: MovieRecord =
            serde_json::from_str(r#"{"id":"a","title":"A","rating":-3}"#).unwrap();
        assert_eq!(record.rating, Some(0));

        let record: MovieRecord =
            serde_json::from_str(r#"{"id":"a","title":"A","rating":null}"#).unwrap();
        assert_eq!(record.rating, None);
    }

    #[test]
    fn test_or_details_keeps_explicit_fields() {
        let patch = MoviePatch {
            title: Some("Mine".to_string()),
            ..MoviePatch::favorite(true)
        }
        .or_details(MoviePatch {
            title: Some("Theirs".to_string()),
            year: Some("1999".to_string()),
            ..MoviePatch::default()
        });

        assert_eq!(patch.title.as_deref(), Some("Mine"));
        assert_eq!(patch.year.as_deref(), Some("1999"));
        assert_eq!(patch.fav, Some(true));
    }
}
