use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::ViewError;
use crate::domain::MovieRecord;

/// Which subset of the collection is listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    All,
    Favorites,
    Rated,
    Wishlist,
}

impl Filter {
    pub const VARIANTS: [Filter; 4] = [
        Filter::All,
        Filter::Favorites,
        Filter::Rated,
        Filter::Wishlist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Favorites => "favorites",
            Filter::Rated => "rated",
            Filter::Wishlist => "wishlist",
        }
    }

    /// Whether a record is visible under this filter
    pub fn matches(&self, record: &MovieRecord) -> bool {
        match self {
            Filter::All => true,
            Filter::Favorites => record.fav,
            Filter::Rated => record.is_rated(),
            Filter::Wishlist => record.wish,
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "favorites" | "fav" => Ok(Filter::Favorites),
            "rated" => Ok(Filter::Rated),
            "wishlist" | "wish" => Ok(Filter::Wishlist),
            _ => Err(ViewError::InvalidFilter(s.to_string())),
        }
    }
}

/// Top-level navigation page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    Home,
    Search,
    Collection,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Search => "search",
            Page::Collection => "collection",
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Page {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(Page::Home),
            "search" => Ok(Page::Search),
            "collection" => Ok(Page::Collection),
            _ => Err(ViewError::InvalidPage(s.to_string())),
        }
    }
}

/// What the presentation layer should currently show
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub active_filter: Filter,
    pub active_page: Page,
    pub open_detail_id: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the filter actually changed
    pub fn set_filter(&mut self, filter: Filter) -> bool {
        let changed = self.active_filter != filter;
        self.active_filter = filter;
        changed
    }

    /// Returns true when the page actually changed
    pub fn set_page(&mut self, page: Page) -> bool {
        let changed = self.active_page != page;
        self.active_page = page;
        changed
    }

    /// Open the detail view; replaces any detail already open
    pub fn open_detail(&mut self, id: impl Into<String>) {
        self.open_detail_id = Some(id.into());
    }

    /// Close the detail view, returning the id that was open
    pub fn close_detail(&mut self) -> Option<String> {
        self.open_detail_id.take()
    }

    pub fn is_detail_open(&self) -> bool {
        self.open_detail_id.is_some()
    }

    pub fn is_detail_open_for(&self, id: &str) -> bool {
        self.open_detail_id.as_deref() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let view = ViewState::new();
        assert_eq!(view.active_filter, Filter::All);
        assert_eq!(view.active_page, Page::Home);
        assert!(!view.is_detail_open());
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!("Favorites".parse::<Filter>(), Ok(Filter::Favorites));
        assert_eq!(" rated ".parse::<Filter>(), Ok(Filter::Rated));
        assert_eq!("wish".parse::<Filter>(), Ok(Filter::Wishlist));
        assert_eq!(
            "unwatched".parse::<Filter>(),
            Err(ViewError::InvalidFilter("unwatched".to_string()))
        );
    }

    #[test]
    fn test_parse_page() {
        assert_eq!("collection".parse::<Page>(), Ok(Page::Collection));
        assert_eq!(
            "settings".parse::<Page>(),
            Err(ViewError::InvalidPage("settings".to_string()))
        );
    }

    #[test]
    fn test_set_filter_reports_change() {
        let mut view = ViewState::new();
        assert!(view.set_filter(Filter::Rated));
        assert!(!view.set_filter(Filter::Rated));
        assert_eq!(view.active_filter, Filter::Rated);
    }

    #[test]
    fn test_detail_open_close() {
        let mut view = ViewState::new();
        view.open_detail("tt0111161");
        assert!(view.is_detail_open_for("tt0111161"));

        view.open_detail("tt0068646");
        assert!(view.is_detail_open_for("tt0068646"));

        assert_eq!(view.close_detail(), Some("tt0068646".to_string()));
        assert_eq!(view.close_detail(), None);
    }

    #[test]
    fn test_filter_matches_zero_rating() {
        let mut record = MovieRecord::new("tt1", "Heat", 0);
        assert!(!Filter::Rated.matches(&record));

        record.rating = Some(0);
        assert!(Filter::Rated.matches(&record));
        assert!(Filter::All.matches(&record));
        assert!(!Filter::Favorites.matches(&record));
    }
}
