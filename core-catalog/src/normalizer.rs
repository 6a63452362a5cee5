//! Raw row normalization
//!
//! Turns one loosely-typed [`RawRow`] into a canonical [`Track`] or reports
//! why it cannot be one. Field lookup goes through fixed alias tables so
//! catalogs exported by different tools resolve to the same shape.

use bridge_traits::tabular::RawRow;
use std::collections::BTreeMap;

use crate::models::{Rejection, Track, TrackId};

pub const TITLE_KEY: &str = "track_name";

pub const STREAMS_KEY: &str = "streams";

/// Cover image keys, highest priority first.
pub const COVER_ALIASES: [&str; 5] = ["cover_url", "image_url", "cover", "coverUrl", "image"];

/// Artist keys, highest priority first.
pub const ARTIST_ALIASES: [&str; 2] = ["artist(s)_name", "artist"];

/// Normalize the row found at `index` of the raw input.
///
/// Values are taken verbatim; a title of `" "` is kept as is.
pub fn normalize(raw: &RawRow, index: usize) -> Result<Track, Rejection> {
    let title = raw.text(TITLE_KEY).unwrap_or_default();
    if title.is_empty() {
        return Err(Rejection::MissingTitle);
    }

    let stream_count = raw
        .text(STREAMS_KEY)
        .map(|text| parse_stream_count(&text))
        .unwrap_or(0);
    if stream_count == 0 {
        return Err(Rejection::NoStreams);
    }

    let cover_url = resolve_cover(raw);
    if cover_url.is_empty() {
        return Err(Rejection::MissingCover);
    }

    Ok(Track {
        id: TrackId(index),
        title,
        artist: resolve_artist(raw),
        cover_url,
        stream_count,
        extra: extra_fields(raw),
    })
}

/// Parse a decorated count such as `"1,234,567"` or `"$12"`.
///
/// Every non-digit character is dropped and the rest parsed as `u64`. An
/// empty remainder or an overflow yields 0, so `"2.5M"` parses as 25.
/// An overflowing count is a parse failure like any other and the row is
/// rejected as [`Rejection::NoStreams`].
pub fn parse_stream_count(text: &str) -> u64 {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// First non-empty cover alias, or `""`.
pub fn resolve_cover(raw: &RawRow) -> String {
    first_non_empty(raw, &COVER_ALIASES)
}

/// First non-empty artist alias, or `""`.
pub fn resolve_artist(raw: &RawRow) -> String {
    first_non_empty(raw, &ARTIST_ALIASES)
}

fn first_non_empty(raw: &RawRow, aliases: &[&str]) -> String {
    aliases
        .iter()
        .filter_map(|key| raw.text(key))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

fn is_canonical_key(key: &str) -> bool {
    key == TITLE_KEY
        || key == STREAMS_KEY
        || COVER_ALIASES.contains(&key)
        || ARTIST_ALIASES.contains(&key)
}

fn extra_fields(raw: &RawRow) -> BTreeMap<String, serde_json::Value> {
    raw.iter()
        .filter(|(key, _)| !is_canonical_key(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
