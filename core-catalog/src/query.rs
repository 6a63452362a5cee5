//! Read-only queries over a [`Catalog`].
//!
//! Every query borrows the catalog and returns a fresh ordered sequence of
//! references into it. Nothing here mutates or caches.

use crate::catalog::Catalog;
use crate::models::Track;

/// Stateless catalog queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEngine;

impl QueryEngine {
    /// First `limit` tracks in catalog order.
    pub fn list(catalog: &Catalog, limit: usize) -> Vec<&Track> {
        catalog.iter().take(limit).collect()
    }

    /// The `n` most-streamed tracks, highest first.
    ///
    /// Ties keep catalog order.
    pub fn top_n(catalog: &Catalog, n: usize) -> Vec<&Track> {
        let mut ranked: Vec<&Track> = catalog.iter().collect();
        // `sort_by` is stable
        ranked.sort_by(|a, b| b.stream_count.cmp(&a.stream_count));
        ranked.truncate(n);
        ranked
    }

    /// Tracks whose title or artist contains `term`, ignoring case.
    ///
    /// The term is trimmed first; a blank term returns the whole catalog.
    pub fn search<'a>(catalog: &'a Catalog, term: &str) -> Vec<&'a Track> {
        let needle = Self::normalize_term(term);
        if needle.is_empty() {
            return catalog.iter().collect();
        }

        catalog.iter().filter(|track| track.matches(&needle)).collect()
    }

    /// Trimmed, lowercased form of a search term.
    pub fn normalize_term(term: &str) -> String {
        term.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrackId;
    use std::collections::BTreeMap;

    fn track(id: usize, title: &str, artist: &str, streams: u64) -> Track {
        Track {
            id: TrackId(id),
            title: title.to_string(),
            artist: artist.to_string(),
            cover_url: format!("{}.jpg", id),
            stream_count: streams,
            extra: BTreeMap::new(),
        }
    }

    fn ids(tracks: &[&Track]) -> Vec<usize> {
        tracks.iter().map(|t| t.id.0).collect()
    }

    fn sample() -> Catalog {
        Catalog::build(vec![
            track(0, "God's Plan", "Drake", 100),
            track(1, "Flowers", "Miley Cyrus", 500),
            track(2, "Kill Bill", "SZA", 500),
            track(3, "One Dance", "Drake, Wizkid, Kyla", 10),
        ])
    }

    #[test]
    fn test_list_limits() {
        let catalog = sample();

        assert!(QueryEngine::list(&catalog, 0).is_empty());
        assert_eq!(ids(&QueryEngine::list(&catalog, 2)), vec![0, 1]);
        assert_eq!(ids(&QueryEngine::list(&catalog, 50)), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_top_n_is_stable_and_descending() {
        let catalog = sample();

        assert_eq!(ids(&QueryEngine::top_n(&catalog, 3)), vec![1, 2, 0]);
        assert_eq!(ids(&QueryEngine::top_n(&catalog, 10)), vec![1, 2, 0, 3]);
        assert!(QueryEngine::top_n(&catalog, 0).is_empty());
    }

    #[test]
    fn test_search_matches_title_or_artist_case_insensitively() {
        let catalog = sample();

        assert_eq!(ids(&QueryEngine::search(&catalog, "DRAKE")), vec![0, 3]);
        assert_eq!(ids(&QueryEngine::search(&catalog, "  kill ")), vec![2]);
        assert!(QueryEngine::search(&catalog, "taylor").is_empty());
    }

    #[test]
    fn test_blank_search_returns_everything() {
        let catalog = sample();

        assert_eq!(ids(&QueryEngine::search(&catalog, "")), vec![0, 1, 2, 3]);
        assert_eq!(ids(&QueryEngine::search(&catalog, "   ")), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_queries_are_idempotent() {
        let catalog = sample();

        assert_eq!(QueryEngine::top_n(&catalog, 2), QueryEngine::top_n(&catalog, 2));
        assert_eq!(
            QueryEngine::search(&catalog, "drake"),
            QueryEngine::search(&catalog, "drake")
        );
        assert_eq!(QueryEngine::list(&catalog, 3), QueryEngine::list(&catalog, 3));
        assert_eq!(catalog, sample());
    }

    #[test]
    fn test_empty_catalog_queries() {
        let catalog = Catalog::default();

        assert!(QueryEngine::list(&catalog, 10).is_empty());
        assert!(QueryEngine::top_n(&catalog, 10).is_empty());
        assert!(QueryEngine::search(&catalog, "").is_empty());
    }

    #[test]
    fn test_normalize_term() {
        assert_eq!(QueryEngine::normalize_term("  The WEEKND "), "the weeknd");
    }
}
