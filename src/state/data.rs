//! Shared data structures for the application state
//!
//! These structs represent the data model that flows between
//! the database layer, the browse session and the UI layer.
use std::fmt;

/// Default for text columns that have no meaningful empty value
pub const UNKNOWN: &str = "Unknown";

/// Default for the `Format` column
pub const DEFAULT_FORMAT: &str = "PlayStation 3";

/// A full row of the `games` table, as written by the import tools
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    /// Unique serial, e.g. "BLES00001"
    pub game_id: String,
    pub arcade_game: bool,
    pub eboot: String,
    pub favorite: bool,
    pub title: String,
    pub genre: String,
    /// Path to ICON0.PNG on disk (not the blob)
    pub icon0: String,
    pub loader: String,
    pub param: String,
    pub pic1: String,
    pub played: bool,
    pub psn: bool,
    pub format: String,
    pub publisher: String,
    /// Region code, or "Unknown"
    pub region: String,
    pub release_date: String,
    pub snd0: String,
    /// Raw icon image bytes
    pub icon_blob: Option<Vec<u8>>,
    pub have: bool,
}

impl GameRecord {
    /// A record with every column at its schema default
    pub fn new(game_id: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            arcade_game: false,
            eboot: String::new(),
            favorite: false,
            title: UNKNOWN.to_string(),
            genre: UNKNOWN.to_string(),
            icon0: String::new(),
            loader: String::new(),
            param: String::new(),
            pic1: String::new(),
            played: false,
            psn: false,
            format: DEFAULT_FORMAT.to_string(),
            publisher: UNKNOWN.to_string(),
            region: UNKNOWN.to_string(),
            release_date: UNKNOWN.to_string(),
            snd0: String::new(),
            icon_blob: None,
            have: false,
        }
    }
}

/// The lightweight projection the browser scans: id, title, icon
#[derive(Debug, Clone, PartialEq)]
pub struct GameSummary {
    pub game_id: String,
    pub title: String,
    pub icon: Option<Vec<u8>>,
}

/// Region codes used by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Us,
    Eu,
    Jp,
    As,
    Ko,
    Cn,
    Un,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::Us,
        Region::Eu,
        Region::Jp,
        Region::As,
        Region::Ko,
        Region::Cn,
        Region::Un,
    ];

    /// The code stored in the `Region` column
    pub fn code(self) -> &'static str {
        match self {
            Region::Us => "US",
            Region::Eu => "EU",
            Region::Jp => "JP",
            Region::As => "AS",
            Region::Ko => "KO",
            Region::Cn => "CN",
            Region::Un => "UN",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.code() == code)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Region dropdown selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RegionFilter {
    #[default]
    All,
    Only(Region),
}

impl RegionFilter {
    /// Dropdown options, in display order
    pub const OPTIONS: [RegionFilter; 8] = [
        RegionFilter::All,
        RegionFilter::Only(Region::Us),
        RegionFilter::Only(Region::Eu),
        RegionFilter::Only(Region::Jp),
        RegionFilter::Only(Region::As),
        RegionFilter::Only(Region::Ko),
        RegionFilter::Only(Region::Cn),
        RegionFilter::Only(Region::Un),
    ];
}

impl fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionFilter::All => f.write_str("All"),
            RegionFilter::Only(region) => region.fmt(f),
        }
    }
}

/// The user's current search and filter selections.
///
/// Every change to a `FilterState` goes through
/// [`BrowseSession::apply_filter`](super::session::BrowseSession::apply_filter),
/// which re-queries and resets paging.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    /// Substring matched against id and title; empty means no constraint
    pub text: String,
    pub arcade_only: bool,
    pub psn_only: bool,
    pub region: RegionFilter,
}

impl FilterState {
    /// Search text with surrounding whitespace removed
    pub fn search_text(&self) -> &str {
        self.text.trim()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_arcade_only(mut self, arcade_only: bool) -> Self {
        self.arcade_only = arcade_only;
        self
    }

    pub fn with_psn_only(mut self, psn_only: bool) -> Self {
        self.psn_only = psn_only;
        self
    }

    pub fn with_region(mut self, region: RegionFilter) -> Self {
        self.region = region;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_codes_round_trip_through_lookup() {
        for region in Region::ALL {
            assert_eq!(Region::from_code(region.code()), Some(region));
        }
        assert_eq!(Region::from_code("Unknown"), None);
    }

    #[test]
    fn region_filter_labels() {
        assert_eq!(RegionFilter::All.to_string(), "All");
        assert_eq!(RegionFilter::Only(Region::Jp).to_string(), "JP");
        assert_eq!(RegionFilter::OPTIONS[0], RegionFilter::default());
    }

    #[test]
    fn default_filter_is_unconstrained() {
        let filter = FilterState::default();
        assert_eq!(filter.search_text(), "");
        assert!(!filter.arcade_only);
        assert!(!filter.psn_only);
        assert_eq!(filter.region, RegionFilter::All);
    }

    #[test]
    fn new_record_uses_schema_defaults() {
        let record = GameRecord::new("BLUS30001");
        assert_eq!(record.title, "Unknown");
        assert_eq!(record.format, "PlayStation 3");
        assert_eq!(record.region, "Unknown");
        assert!(record.icon_blob.is_none());
    }
}
