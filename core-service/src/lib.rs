//! Core service façade and bootstrap helpers.
//!
//! This crate wires a [`CatalogConfig`] into the catalog core: it owns the
//! event bus and the ingestion pipeline, answers queries against the latest
//! published catalog, and hosts the headless presentation adapters in
//! [`views`]. Desktop apps typically enable the `desktop-shims` feature so a
//! file path or URL is enough to get a CSV-backed source.

pub mod error;
pub mod views;

pub use error::{Result, ServiceError};
pub use views::{
    format_stream_count, streams_label, ChartModel, ChartView, DetailView, ListingView,
    SearchController, SearchUpdate, TrackCard, TrackDetail,
};

pub use core_catalog::{
    Catalog, CatalogError, IngestionOutcome, IngestionReport, IngestionStatus, QueryEngine,
    Rejection, Track, TrackId,
};
pub use core_runtime::{CatalogConfig, CoreEvent, EventBus, EventStream, DEFAULT_SOURCE_FILE};

use core_catalog::IngestionPipeline;
use core_runtime::events::QueryEvent;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Primary façade exposed to host applications.
///
/// Queries made before the first successful load see an empty catalog.
#[derive(Clone)]
pub struct CatalogService {
    config: Arc<CatalogConfig>,
    event_bus: EventBus,
    pipeline: Arc<IngestionPipeline>,
}

impl CatalogService {
    /// Create a new service from the provided configuration.
    pub fn new(config: CatalogConfig) -> Self {
        let event_bus = EventBus::new(config.event_buffer_size);
        let pipeline = IngestionPipeline::new(Arc::clone(&config.tabular_source), event_bus.clone());

        Self {
            config: Arc::new(config),
            event_bus,
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Subscribe to every event emitted from now on.
    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.event_bus.subscribe())
    }

    /// Load the catalog from the configured source.
    ///
    /// May be called again to reload. When loads overlap, only the most
    /// recently started one is published.
    pub async fn load(&self) -> Result<IngestionOutcome> {
        Ok(self.pipeline.ingest().await?)
    }

    /// The latest published catalog.
    pub fn catalog(&self) -> Option<Arc<Catalog>> {
        self.pipeline.current()
    }

    pub fn is_ready(&self) -> bool {
        self.catalog().is_some()
    }

    fn snapshot(&self) -> Arc<Catalog> {
        self.catalog().unwrap_or_default()
    }

    /// First tracks of the catalog, capped at the configured display limit.
    pub fn list(&self) -> Vec<Track> {
        self.list_with_limit(self.config.display_limit)
    }

    pub fn list_with_limit(&self, limit: usize) -> Vec<Track> {
        let catalog = self.snapshot();
        let tracks = owned(QueryEngine::list(&catalog, limit));
        debug!(limit, results = tracks.len(), "List query");
        tracks
    }

    /// The `n` most-streamed tracks, ties in catalog order.
    pub fn top_n(&self, n: usize) -> Vec<Track> {
        let catalog = self.snapshot();
        let tracks = owned(QueryEngine::top_n(&catalog, n));
        debug!(n, results = tracks.len(), "Top-N query");
        tracks
    }

    /// Top tracks for the ranked chart.
    pub fn chart(&self) -> Vec<Track> {
        self.top_n(self.config.chart_size)
    }

    /// Case-insensitive title or artist search over the whole catalog.
    pub fn search(&self, term: &str) -> Vec<Track> {
        let catalog = self.snapshot();
        let tracks = owned(QueryEngine::search(&catalog, term));

        let normalized = QueryEngine::normalize_term(term);
        debug!(term = %normalized, results = tracks.len(), "Search query");
        if !normalized.is_empty() {
            self.event_bus
                .emit(CoreEvent::Query(QueryEvent::SearchPerformed {
                    term: normalized,
                    matches: tracks.len(),
                }))
                .ok();
        }

        tracks
    }

    /// Detail lookup.
    ///
    /// # Errors
    ///
    /// `CatalogError::NotFound` (wrapped) when the id is unknown. The miss is
    /// logged at warn level and announced as `QueryEvent::LookupMissed`.
    #[instrument(skip(self))]
    pub fn get_by_id(&self, id: TrackId) -> Result<Track> {
        let catalog = self.snapshot();

        match catalog.lookup(id) {
            Ok(track) => Ok(track.clone()),
            Err(err) => {
                warn!(track_id = %id, "Track lookup missed");
                self.event_bus
                    .emit(CoreEvent::Query(QueryEvent::LookupMissed { track_id: id.0 }))
                    .ok();
                Err(err.into())
            }
        }
    }

    /// Views sized from this service's configuration and sharing its bus.
    pub fn listing_view(&self) -> ListingView {
        ListingView::new(self.config.display_limit, self.event_bus.clone())
    }

    pub fn chart_view(&self) -> ChartView {
        ChartView::new(self.config.chart_size, self.event_bus.clone())
    }

    pub fn search_controller(&self) -> SearchController {
        SearchController::new(self.event_bus.clone())
    }
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("config", &self.config)
            .field("pipeline", &self.pipeline)
            .finish()
    }
}

fn owned(tracks: Vec<&Track>) -> Vec<Track> {
    tracks.into_iter().cloned().collect()
}

/// Convenience bootstrapper for desktop hosts: build a service reading CSV
/// from `location` (a file path or an http(s) URL) and load it once.
///
/// ```no_run
/// # async fn example() -> core_service::Result<()> {
/// use core_service::{bootstrap_desktop, DEFAULT_SOURCE_FILE};
///
/// let service = bootstrap_desktop(DEFAULT_SOURCE_FILE).await?;
/// let chart = service.chart();
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "desktop-shims")]
pub async fn bootstrap_desktop(location: &str) -> Result<CatalogService> {
    use bridge_traits::SourceLocation;

    let config = CatalogConfig::builder()
        .source_location(SourceLocation::parse(location))
        .build()?;
    let service = CatalogService::new(config);
    service.load().await?;
    Ok(service)
}
