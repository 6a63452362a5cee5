//! Catalog ingestion
//!
//! Fetches raw rows from a [`TabularSource`], normalizes them, builds a
//! [`Catalog`] and publishes it as the current snapshot.
//!
//! ## Generations
//!
//! Every call to [`IngestionPipeline::ingest`] takes the next generation
//! number. When a run finishes, its catalog is published only if no newer
//! run has started in the meantime; otherwise the result is discarded. Each
//! run emits `IngestionEvent::Started` and then exactly one of `Ready`,
//! `Empty`, `Failed` or `Discarded`.

use bridge_traits::tabular::TabularSource;
use core_runtime::events::{CoreEvent, EventBus, IngestionEvent};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};
use crate::models::Rejection;
use crate::normalizer::normalize;

/// How an ingestion run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionStatus {
    /// Published with at least one track.
    Ready,
    /// Published, but every row was rejected.
    Empty,
    /// Superseded by a newer run; not published.
    Discarded,
}

/// Diagnostics of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestionReport {
    pub source: String,
    /// Rows delivered by the source
    pub total_rows: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub rejections: BTreeMap<Rejection, usize>,
    pub elapsed: Duration,
}

impl IngestionReport {
    pub fn rejected_for(&self, reason: Rejection) -> usize {
        self.rejections.get(&reason).copied().unwrap_or(0)
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct IngestionOutcome {
    pub generation: u64,
    pub status: IngestionStatus,
    pub catalog: Arc<Catalog>,
    pub report: IngestionReport,
}

impl IngestionOutcome {
    pub fn is_published(&self) -> bool {
        self.status != IngestionStatus::Discarded
    }
}

/// Loads catalogs and holds the latest published one.
pub struct IngestionPipeline {
    source: Arc<dyn TabularSource>,
    event_bus: EventBus,
    latest_generation: AtomicU64,
    published: RwLock<Option<Arc<Catalog>>>,
}

impl IngestionPipeline {
    pub fn new(source: Arc<dyn TabularSource>, event_bus: EventBus) -> Self {
        Self {
            source,
            event_bus,
            latest_generation: AtomicU64::new(0),
            published: RwLock::new(None),
        }
    }

    /// The most recently published catalog, if any run has succeeded.
    pub fn current(&self) -> Option<Arc<Catalog>> {
        self.published
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Generation of the newest run started so far (0 before the first).
    pub fn latest_generation(&self) -> u64 {
        self.latest_generation.load(Ordering::SeqCst)
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Load the catalog once.
    ///
    /// # Errors
    ///
    /// [`CatalogError::SourceUnavailable`] when the source cannot be read or
    /// parsed. Nothing is retried and the previously published catalog, if
    /// any, stays current.
    pub async fn ingest(&self) -> Result<IngestionOutcome> {
        let generation = self.latest_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.run(generation).await
    }

    #[instrument(skip(self), fields(source = %self.source.describe()))]
    async fn run(&self, generation: u64) -> Result<IngestionOutcome> {
        let source = self.source.describe();
        let started = Instant::now();

        info!("Catalog ingestion started");
        self.emit(IngestionEvent::Started {
            generation,
            source: source.clone(),
        });

        let rows = match self.source.fetch_rows().await {
            Ok(rows) => rows,
            Err(err) => {
                error!(error = %err, "Catalog source unavailable");
                let failure = CatalogError::source_unavailable(source, &err);

                let latest = self.latest_generation();
                if latest != generation {
                    self.emit(IngestionEvent::Discarded { generation, latest });
                } else {
                    self.emit(IngestionEvent::Failed {
                        generation,
                        message: failure.to_string(),
                    });
                }
                return Err(failure);
            }
        };

        let total_rows = rows.len();
        let mut tracks = Vec::with_capacity(total_rows);
        let mut rejections: BTreeMap<Rejection, usize> = BTreeMap::new();

        for (index, row) in rows.iter().enumerate() {
            match normalize(row, index) {
                Ok(track) => tracks.push(track),
                Err(reason) => {
                    debug!(index, reason = %reason, "Row rejected");
                    *rejections.entry(reason).or_insert(0) += 1;
                }
            }
        }

        let catalog = Arc::new(Catalog::build(tracks));
        let report = IngestionReport {
            source,
            total_rows,
            accepted: catalog.len(),
            rejected: total_rows - catalog.len(),
            rejections,
            elapsed: started.elapsed(),
        };

        let status = self.publish(generation, &catalog, &report);

        Ok(IngestionOutcome {
            generation,
            status,
            catalog,
            report,
        })
    }

    /// Swap in `catalog` if `generation` is still the newest run, and emit
    /// the terminal event.
    fn publish(&self, generation: u64, catalog: &Arc<Catalog>, report: &IngestionReport) -> IngestionStatus {
        let mut published = self
            .published
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let latest = self.latest_generation();
        if latest != generation {
            drop(published);
            info!(generation, latest, "Discarding stale catalog");
            self.emit(IngestionEvent::Discarded { generation, latest });
            return IngestionStatus::Discarded;
        }

        *published = Some(Arc::clone(catalog));
        drop(published);

        if catalog.is_empty() {
            warn!(
                total = report.total_rows,
                "No valid tracks found; check the track_name, streams and cover columns"
            );
            self.emit(IngestionEvent::Empty {
                generation,
                total: report.total_rows,
                rejected: report.rejected,
            });
            IngestionStatus::Empty
        } else {
            info!(
                total = report.total_rows,
                accepted = report.accepted,
                rejected = report.rejected,
                elapsed_ms = report.elapsed.as_millis() as u64,
                "Catalog ready"
            );
            self.emit(IngestionEvent::Ready {
                generation,
                total: report.total_rows,
                accepted: report.accepted,
                rejected: report.rejected,
            });
            IngestionStatus::Ready
        }
    }

    fn emit(&self, event: IngestionEvent) {
        // No subscribers is fine
        self.event_bus.emit(CoreEvent::Ingestion(event)).ok();
    }
}

impl std::fmt::Debug for IngestionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionPipeline")
            .field("source", &self.source.describe())
            .field("latest_generation", &self.latest_generation())
            .field("published", &self.current().map(|c| c.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::tabular::{InMemoryTabularSource, RawRow};
    use core_runtime::events::EventStream;

    fn row(title: &str, streams: &str, cover: &str) -> RawRow {
        RawRow::new()
            .with_field("track_name", title)
            .with_field("streams", streams)
            .with_field("cover_url", cover)
    }

    fn pipeline(rows: Vec<RawRow>) -> (IngestionPipeline, EventStream) {
        let bus = EventBus::new(16);
        let stream = EventStream::new(bus.subscribe());
        let source = Arc::new(InMemoryTabularSource::new("test", rows));
        (IngestionPipeline::new(source, bus), stream)
    }

    #[tokio::test]
    async fn test_ingest_assigns_raw_indices_and_counts_rejections() {
        let (pipeline, _stream) = pipeline(vec![
            row("A", "100", "a.jpg"),
            row("", "50", "b.jpg"),
            row("C", "0", "c.jpg"),
            row("D", "1,000", ""),
            row("E", "7", "e.jpg"),
        ]);

        let outcome = pipeline.ingest().await.unwrap();

        assert_eq!(outcome.status, IngestionStatus::Ready);
        assert_eq!(outcome.generation, 1);
        let ids: Vec<usize> = outcome.catalog.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![0, 4]);

        let report = &outcome.report;
        assert_eq!(report.total_rows, 5);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.rejected, 3);
        assert_eq!(report.rejected_for(Rejection::MissingTitle), 1);
        assert_eq!(report.rejected_for(Rejection::NoStreams), 1);
        assert_eq!(report.rejected_for(Rejection::MissingCover), 1);
        assert_eq!(report.source, "memory:test");

        assert_eq!(pipeline.current().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_all_invalid_rows_yield_empty_status() {
        let (pipeline, mut stream) = pipeline(vec![row("A", "0", "a.jpg"), row("", "5", "b.jpg")]);

        let outcome = pipeline.ingest().await.unwrap();

        assert_eq!(outcome.status, IngestionStatus::Empty);
        assert!(outcome.catalog.is_empty());
        assert!(pipeline.current().unwrap().is_empty());

        assert!(matches!(
            stream.recv().await.unwrap(),
            CoreEvent::Ingestion(IngestionEvent::Started { generation: 1, .. })
        ));
        assert!(matches!(
            stream.recv().await.unwrap(),
            CoreEvent::Ingestion(IngestionEvent::Empty {
                generation: 1,
                total: 2,
                rejected: 2
            })
        ));
        assert!(stream.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_empty_source_is_not_a_failure() {
        let (pipeline, _stream) = pipeline(Vec::new());

        let outcome = pipeline.ingest().await.unwrap();
        assert_eq!(outcome.status, IngestionStatus::Empty);
        assert_eq!(outcome.report.total_rows, 0);
    }

    #[tokio::test]
    async fn test_reload_replaces_snapshot_without_mutating_old_catalog() {
        let (pipeline, _stream) = pipeline(vec![row("A", "1", "a.jpg")]);

        let first = pipeline.ingest().await.unwrap();
        let second = pipeline.ingest().await.unwrap();

        assert_eq!(second.generation, 2);
        assert!(second.is_published());
        assert!(Arc::ptr_eq(&pipeline.current().unwrap(), &second.catalog));
        assert_eq!(first.catalog.len(), 1);
        assert!(!Arc::ptr_eq(&first.catalog, &second.catalog));
    }
}
