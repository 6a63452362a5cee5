//! Immutable, id-indexed track collection

use std::collections::HashMap;
use tracing::warn;

use crate::error::{CatalogError, Result};
use crate::models::{Track, TrackId};

/// The tracks of one ingestion run.
///
/// Built once and never mutated; share it behind an `Arc`. Iteration follows
/// the order the tracks were given in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    tracks: Vec<Track>,
    index: HashMap<TrackId, usize>,
}

impl Catalog {
    /// Build a catalog from already-normalized tracks.
    ///
    /// When two tracks share an id the later one wins the index entry; both
    /// stay in iteration order.
    pub fn build(tracks: Vec<Track>) -> Self {
        let mut index = HashMap::with_capacity(tracks.len());

        for (position, track) in tracks.iter().enumerate() {
            if let Some(previous) = index.insert(track.id, position) {
                warn!(
                    track_id = %track.id,
                    previous_position = previous,
                    position,
                    "Duplicate track id; keeping the later track"
                );
            }
        }

        Self { tracks, index }
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.index.get(&id).map(|&position| &self.tracks[position])
    }

    /// Like [`get`](Self::get) but reports a miss as [`CatalogError::NotFound`].
    pub fn lookup(&self, id: TrackId) -> Result<&Track> {
        self.get(id).ok_or(CatalogError::NotFound { id })
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}
