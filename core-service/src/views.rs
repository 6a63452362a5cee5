//! Headless presentation adapters.
//!
//! These types turn query results into render models a host UI can draw:
//! listing cards, a ranked bar chart, a detail panel and a search box
//! controller. They never draw anything themselves. Each adapter owns the
//! state the host would otherwise keep in globals (the current chart, the
//! listing's selection handler) and replaces it deterministically on every
//! render.

use core_catalog::{Catalog, CatalogError, QueryEngine, Track, TrackId};
use core_runtime::events::{CoreEvent, EventBus, QueryEvent, ViewEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Group digits in threes with commas: `1234567` becomes `"1,234,567"`.
pub fn format_stream_count(count: u64) -> String {
    let digits = count.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

/// `"1,234,567 streams"`
pub fn streams_label(count: u64) -> String {
    format!("{} streams", format_stream_count(count))
}

// =============================================================================
// Render models
// =============================================================================

/// One card of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackCard {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub cover_url: String,
    pub streams_label: String,
}

impl From<&Track> for TrackCard {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id,
            title: track.title.clone(),
            artist: track.artist.clone(),
            cover_url: track.cover_url.clone(),
            streams_label: streams_label(track.stream_count),
        }
    }
}

/// Content of the detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDetail {
    pub id: TrackId,
    pub cover_url: String,
    pub title: String,
    pub artist: String,
    pub streams_label: String,
}

impl From<&Track> for TrackDetail {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id,
            cover_url: track.cover_url.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            streams_label: streams_label(track.stream_count),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartOrientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartBar {
    pub track_id: TrackId,
    /// Track title
    pub label: String,
    pub value: u64,
    pub tooltip: String,
}

/// Ranked bar chart, highest value first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartModel {
    pub dataset_label: String,
    pub orientation: ChartOrientation,
    pub bars: Vec<ChartBar>,
}

impl ChartModel {
    pub fn labels(&self) -> Vec<&str> {
        self.bars.iter().map(|bar| bar.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<u64> {
        self.bars.iter().map(|bar| bar.value).collect()
    }
}

// =============================================================================
// Listing
// =============================================================================

/// Ids that the current listing rendered, tagged with the render they
/// belong to.
#[derive(Debug, Clone, Default)]
struct SelectionHandler {
    epoch: u64,
    ids: HashSet<TrackId>,
}

/// Capped list of track cards with click-to-detail selection.
#[derive(Debug)]
pub struct ListingView {
    display_limit: usize,
    cards: Vec<TrackCard>,
    selection: Option<SelectionHandler>,
    renders: u64,
    event_bus: EventBus,
}

impl ListingView {
    pub fn new(display_limit: usize, event_bus: EventBus) -> Self {
        Self {
            display_limit,
            cards: Vec::new(),
            selection: None,
            renders: 0,
            event_bus,
        }
    }

    /// Render at most `display_limit` cards and install a fresh selection
    /// handler for them, dropping the previous one.
    pub fn render<'a, I>(&mut self, tracks: I) -> &[TrackCard]
    where
        I: IntoIterator<Item = &'a Track>,
    {
        self.cards = tracks
            .into_iter()
            .take(self.display_limit)
            .map(TrackCard::from)
            .collect();

        self.renders += 1;
        self.selection = Some(SelectionHandler {
            epoch: self.renders,
            ids: self.cards.iter().map(|card| card.id).collect(),
        });

        debug!(cards = self.cards.len(), epoch = self.renders, "Listing rendered");
        &self.cards
    }

    pub fn cards(&self) -> &[TrackCard] {
        &self.cards
    }

    pub fn display_limit(&self) -> usize {
        self.display_limit
    }

    /// Render count of the active selection handler, `None` before the
    /// first render.
    pub fn selection_epoch(&self) -> Option<u64> {
        self.selection.as_ref().map(|handler| handler.epoch)
    }

    /// Resolve a selected card into its detail.
    ///
    /// Only ids of the current render are selectable. A miss is logged and
    /// reported as [`CatalogError::NotFound`]; it never invalidates the view.
    pub fn select(&self, catalog: &Catalog, id: TrackId) -> Result<TrackDetail, CatalogError> {
        let rendered = self
            .selection
            .as_ref()
            .is_some_and(|handler| handler.ids.contains(&id));

        let found = if rendered { catalog.get(id) } else { None };

        match found {
            Some(track) => {
                self.event_bus
                    .emit(CoreEvent::View(ViewEvent::TrackSelected { track_id: id.0 }))
                    .ok();
                Ok(TrackDetail::from(track))
            }
            None => {
                warn!(track_id = %id, rendered, "Selected track not found");
                self.event_bus
                    .emit(CoreEvent::Query(QueryEvent::LookupMissed { track_id: id.0 }))
                    .ok();
                Err(CatalogError::NotFound { id })
            }
        }
    }

    /// [`select`](Self::select) with the textual id a host attaches to a card.
    pub fn select_raw(&self, catalog: &Catalog, raw_id: &str) -> Result<TrackDetail, CatalogError> {
        let id: TrackId = raw_id.parse()?;
        self.select(catalog, id)
    }
}

// =============================================================================
// Chart
// =============================================================================

/// Owner of the single ranked chart.
#[derive(Debug)]
pub struct ChartView {
    chart_size: usize,
    model: Option<ChartModel>,
    event_bus: EventBus,
}

impl ChartView {
    pub fn new(chart_size: usize, event_bus: EventBus) -> Self {
        Self {
            chart_size,
            model: None,
            event_bus,
        }
    }

    /// Destroy the current chart, if any, and build a new one from the
    /// `chart_size` most-streamed tracks of `catalog`.
    pub fn replace(&mut self, catalog: &Catalog) -> &ChartModel {
        self.destroy();

        let bars: Vec<ChartBar> = QueryEngine::top_n(catalog, self.chart_size)
            .into_iter()
            .map(|track| ChartBar {
                track_id: track.id,
                label: track.title.clone(),
                value: track.stream_count,
                tooltip: streams_label(track.stream_count),
            })
            .collect();
        let bar_count = bars.len();

        self.event_bus
            .emit(CoreEvent::View(ViewEvent::ChartReplaced { bars: bar_count }))
            .ok();
        debug!(bars = bar_count, "Chart replaced");

        self.model.insert(ChartModel {
            dataset_label: "Streams".to_string(),
            orientation: ChartOrientation::Horizontal,
            bars,
        })
    }

    /// Clear the chart. Returns whether there was one.
    pub fn destroy(&mut self) -> bool {
        if self.model.take().is_none() {
            return false;
        }

        self.event_bus
            .emit(CoreEvent::View(ViewEvent::ChartDestroyed))
            .ok();
        true
    }

    pub fn model(&self) -> Option<&ChartModel> {
        self.model.as_ref()
    }

    /// Axis tick text for a value.
    pub fn tick_label(value: u64) -> String {
        format_stream_count(value)
    }
}

// =============================================================================
// Detail
// =============================================================================

/// The detail panel: closed, or showing one track.
#[derive(Debug, Clone, Default)]
pub struct DetailView {
    current: Option<TrackDetail>,
}

impl DetailView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, detail: TrackDetail) -> &TrackDetail {
        self.current.insert(detail)
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&TrackDetail> {
        self.current.as_ref()
    }
}

// =============================================================================
// Search
// =============================================================================

/// What a keystroke in the search box produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchUpdate {
    /// Trimmed, lowercased input
    pub query: String,
    /// Tracks that matched, before the listing cap
    pub matches: usize,
    /// Cards the listing now shows
    pub rendered: usize,
}

impl SearchUpdate {
    pub fn is_default_listing(&self) -> bool {
        self.query.is_empty()
    }
}

/// Drives the listing from search box input.
#[derive(Debug, Clone)]
pub struct SearchController {
    event_bus: EventBus,
}

impl SearchController {
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }

    /// Re-render `listing` for the current input text.
    ///
    /// Blank input restores the default listing; anything else renders the
    /// matches, capped by the listing's display limit.
    pub fn on_input(&self, catalog: &Catalog, listing: &mut ListingView, text: &str) -> SearchUpdate {
        let query = QueryEngine::normalize_term(text);

        if query.is_empty() {
            let rendered = listing.render(catalog.iter()).len();
            return SearchUpdate {
                query,
                matches: catalog.len(),
                rendered,
            };
        }

        let results = QueryEngine::search(catalog, &query);
        let matches = results.len();
        let rendered = listing.render(results).len();

        debug!(query = %query, matches, "Search performed");
        self.event_bus
            .emit(CoreEvent::Query(QueryEvent::SearchPerformed {
                term: query.clone(),
                matches,
            }))
            .ok();

        SearchUpdate {
            query,
            matches,
            rendered,
        }
    }
}
