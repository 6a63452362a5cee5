//! Domain models for the track catalog

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

// =============================================================================
// ID Types
// =============================================================================

/// Identifier of a track: its 0-based position in the raw input.
///
/// Assigned before validation, so the ids of a catalog may have gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub usize);

impl TrackId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for TrackId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Parses the textual id a view attaches to a rendered card.
impl FromStr for TrackId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<usize>()
            .map(TrackId)
            .map_err(|e| CatalogError::InvalidInput {
                field: "track_id".to_string(),
                message: format!("'{}' is not a track id: {}", s, e),
            })
    }
}

// =============================================================================
// Track
// =============================================================================

/// A validated catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    /// Never empty
    pub title: String,
    /// May be empty
    pub artist: String,
    /// Never empty
    pub cover_url: String,
    /// Always greater than zero
    pub stream_count: u64,
    /// Raw fields that are not part of the canonical shape, kept for display
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl Track {
    /// Case-insensitive substring match on title or artist.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.artist.to_lowercase().contains(needle)
    }

    pub fn extra_text(&self, key: &str) -> Option<String> {
        self.extra.get(key).and_then(bridge_traits::value_to_text)
    }
}

// =============================================================================
// Rejection
// =============================================================================

/// Why a raw row did not become a [`Track`].
///
/// Checks run in declaration order; the first failure wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rejection {
    MissingTitle,
    NoStreams,
    MissingCover,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::MissingTitle => "missing_title",
            Rejection::NoStreams => "no_streams",
            Rejection::MissingCover => "missing_cover",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(title: &str, artist: &str) -> Track {
        Track {
            id: TrackId(0),
            title: title.to_string(),
            artist: artist.to_string(),
            cover_url: "cover.jpg".to_string(),
            stream_count: 1,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn test_track_id_parse() {
        assert_eq!("42".parse::<TrackId>().unwrap(), TrackId(42));
        assert_eq!(" 7 ".parse::<TrackId>().unwrap(), TrackId(7));
        assert!(matches!(
            "abc".parse::<TrackId>(),
            Err(CatalogError::InvalidInput { .. })
        ));
        assert!("-1".parse::<TrackId>().is_err());
    }

    #[test]
    fn test_track_matches_title_or_artist() {
        let t = track("Blinding Lights", "The Weeknd");

        assert!(t.matches("lights"));
        assert!(t.matches("weeknd"));
        assert!(!t.matches("drake"));
    }

    #[test]
    fn test_rejection_order_and_display() {
        assert!(Rejection::MissingTitle < Rejection::NoStreams);
        assert!(Rejection::NoStreams < Rejection::MissingCover);
        assert_eq!(Rejection::MissingCover.to_string(), "missing_cover");
    }

    #[test]
    fn test_track_serialization_skips_empty_extra() {
        let json = serde_json::to_string(&track("A", "")).unwrap();
        assert!(!json.contains("extra"));
        assert!(json.contains("\"id\":0"));
    }
}
