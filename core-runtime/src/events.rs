//! # Event Bus System
//!
//! Provides an event-driven architecture for the catalog core using `tokio::sync::broadcast`.
//! This module enables decoupled communication between ingestion, queries and
//! the headless views through typed events.
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **Event Types**: Strongly-typed enum hierarchies for different domains
//! - **EventBus**: Central broadcast channel for publishing events
//! - **EventStream**: Wrapper for consuming events with filtering
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐     emit      ┌───────────┐
//! │ Ingestion  ├──────────────>│           │
//! └────────────┘               │           │
//!                              │ EventBus  │
//! ┌────────────┐     emit      │ (broadcast│     subscribe    ┌────────────┐
//! │ Queries    ├──────────────>│  channel) ├─────────────────>│ Subscriber │
//! └────────────┘               │           │                  └────────────┘
//!                              │           │
//! ┌────────────┐     emit      │           │
//! │ Views      ├──────────────>│           │
//! └────────────┘               └───────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, IngestionEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut stream = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Ingestion(IngestionEvent::Started {
//!         generation: 1,
//!         source: "file:songs.csv".to_string(),
//!     }))
//!     .ok();
//!
//! let event = stream.recv().await.unwrap();
//! assert!(matches!(event, CoreEvent::Ingestion(_)));
//! # }
//! ```
//!
//! ## Event Types
//!
//! ### Ingestion Events
//! - `Started`: a load began
//! - `Ready`: the catalog holds at least one track
//! - `Empty`: the load succeeded but every row was rejected
//! - `Failed`: the source could not be read
//! - `Discarded`: a newer load superseded this one
//!
//! Every ingestion emits `Started` followed by exactly one of the other four.
//!
//! ### Query Events
//! - `SearchPerformed`: a search term was evaluated
//! - `LookupMissed`: a detail lookup named an unknown id
//!
//! ### View Events
//! - `ChartReplaced`, `ChartDestroyed`: ranked chart lifecycle
//! - `TrackSelected`: a listing card was selected

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that can't keep up will receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Catalog loading
    Ingestion(IngestionEvent),
    /// Catalog queries
    Query(QueryEvent),
    /// Headless view lifecycle
    View(ViewEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Ingestion(e) => e.description(),
            CoreEvent::Query(e) => e.description(),
            CoreEvent::View(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Ingestion(IngestionEvent::Failed { .. }) => EventSeverity::Error,
            CoreEvent::Ingestion(IngestionEvent::Empty { .. }) => EventSeverity::Warning,
            CoreEvent::Query(QueryEvent::LookupMissed { .. }) => EventSeverity::Warning,
            CoreEvent::Ingestion(IngestionEvent::Ready { .. }) => EventSeverity::Info,
            CoreEvent::Ingestion(IngestionEvent::Discarded { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }

    /// True for the events that end an ingestion run.
    pub fn is_terminal_ingestion(&self) -> bool {
        matches!(self, CoreEvent::Ingestion(e) if e.is_terminal())
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

// ============================================================================
// Ingestion Events
// ============================================================================

/// Events emitted while loading a catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum IngestionEvent {
    /// Rows are being fetched.
    Started {
        /// Sequence number of this load request.
        generation: u64,
        /// Where the rows come from.
        source: String,
    },
    /// Catalog built with at least one track.
    Ready {
        generation: u64,
        /// Raw rows received from the source.
        total: usize,
        /// Tracks in the catalog.
        accepted: usize,
        /// Rows that failed validation.
        rejected: usize,
    },
    /// Every row was rejected; the catalog is empty.
    Empty {
        generation: u64,
        total: usize,
        rejected: usize,
    },
    /// The source could not be read or parsed.
    Failed {
        generation: u64,
        /// Human-readable error message.
        message: String,
    },
    /// A newer load finished first, so this result was not published.
    Discarded {
        generation: u64,
        /// Generation that was current when this one finished.
        latest: u64,
    },
}

impl IngestionEvent {
    fn description(&self) -> &str {
        match self {
            IngestionEvent::Started { .. } => "Catalog ingestion started",
            IngestionEvent::Ready { .. } => "Catalog ready",
            IngestionEvent::Empty { .. } => "Catalog loaded with no valid tracks",
            IngestionEvent::Failed { .. } => "Catalog source unavailable",
            IngestionEvent::Discarded { .. } => "Stale catalog discarded",
        }
    }

    pub fn generation(&self) -> u64 {
        match self {
            IngestionEvent::Started { generation, .. }
            | IngestionEvent::Ready { generation, .. }
            | IngestionEvent::Empty { generation, .. }
            | IngestionEvent::Failed { generation, .. }
            | IngestionEvent::Discarded { generation, .. } => *generation,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, IngestionEvent::Started { .. })
    }
}

// ============================================================================
// Query Events
// ============================================================================

/// Events emitted by catalog queries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum QueryEvent {
    /// A non-blank search term was evaluated.
    SearchPerformed {
        /// Normalized (trimmed, lowercased) term.
        term: String,
        /// Number of matching tracks.
        matches: usize,
    },
    /// A detail lookup named an id that is not in the catalog.
    LookupMissed { track_id: usize },
}

impl QueryEvent {
    fn description(&self) -> &str {
        match self {
            QueryEvent::SearchPerformed { .. } => "Search performed",
            QueryEvent::LookupMissed { .. } => "Track lookup missed",
        }
    }
}

// ============================================================================
// View Events
// ============================================================================

/// Events emitted by the headless views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum ViewEvent {
    /// The ranked chart model was rebuilt.
    ChartReplaced {
        /// Number of bars in the new chart.
        bars: usize,
    },
    /// The ranked chart model was cleared.
    ChartDestroyed,
    /// A listing card was selected and resolved.
    TrackSelected { track_id: usize },
}

impl ViewEvent {
    fn description(&self) -> &str {
        match self {
            ViewEvent::ChartReplaced { .. } => "Chart replaced",
            ViewEvent::ChartDestroyed => "Chart destroyed",
            ViewEvent::TrackSelected { .. } => "Track selected",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to core events.
///
/// Cloning is cheap; clones share the same channel.
///
/// # Example
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, ViewEvent};
///
/// let event_bus = EventBus::new(100);
/// let _subscriber = event_bus.subscribe();
///
/// event_bus.emit(CoreEvent::View(ViewEvent::ChartDestroyed)).ok();
/// ```
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// When a subscriber falls behind by more than `capacity` events it
    /// receives `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with filtering.
///
/// # Example
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let event_bus = EventBus::new(100);
/// let ingestion_only = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Ingestion(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without waiting.
    ///
    /// Returns `None` if no matching events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(generation: u64) -> CoreEvent {
        CoreEvent::Ingestion(IngestionEvent::Ready {
            generation,
            total: 4,
            accepted: 3,
            rejected: 1,
        })
    }

    #[tokio::test]
    async fn test_event_bus_subscription() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);

        let _sub1 = bus.subscribe();
        let _sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        assert!(bus.emit(ready(1)).is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        assert_eq!(bus.emit(ready(1)).unwrap(), 2);
        assert_eq!(sub1.recv().await.unwrap(), ready(1));
        assert_eq!(sub2.recv().await.unwrap(), ready(1));
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, CoreEvent::Ingestion(_)));

        bus.emit(CoreEvent::Query(QueryEvent::LookupMissed { track_id: 7 }))
            .unwrap();
        bus.emit(ready(2)).unwrap();

        assert_eq!(stream.recv().await.unwrap(), ready(2));
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for generation in 0..5 {
            bus.emit(ready(generation)).ok();
        }

        assert!(matches!(sub.recv().await, Err(RecvError::Lagged(_))));
    }

    #[tokio::test]
    async fn test_try_recv() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe());
        assert!(stream.try_recv().is_none());

        bus.emit(CoreEvent::View(ViewEvent::ChartDestroyed)).unwrap();
        assert!(matches!(
            stream.try_recv(),
            Some(Ok(CoreEvent::View(ViewEvent::ChartDestroyed)))
        ));
    }

    #[test]
    fn test_event_severity() {
        let failed = CoreEvent::Ingestion(IngestionEvent::Failed {
            generation: 1,
            message: "HTTP 404".to_string(),
        });
        let empty = CoreEvent::Ingestion(IngestionEvent::Empty {
            generation: 1,
            total: 2,
            rejected: 2,
        });
        let selected = CoreEvent::View(ViewEvent::TrackSelected { track_id: 3 });

        assert_eq!(failed.severity(), EventSeverity::Error);
        assert_eq!(empty.severity(), EventSeverity::Warning);
        assert_eq!(ready(1).severity(), EventSeverity::Info);
        assert_eq!(selected.severity(), EventSeverity::Debug);
        assert!(EventSeverity::Error > EventSeverity::Warning);
    }

    #[test]
    fn test_terminal_ingestion_events() {
        let started = IngestionEvent::Started {
            generation: 4,
            source: "memory:test".to_string(),
        };
        let discarded = IngestionEvent::Discarded {
            generation: 4,
            latest: 5,
        };

        assert!(!started.is_terminal());
        assert!(discarded.is_terminal());
        assert_eq!(discarded.generation(), 4);
        assert!(ready(1).is_terminal_ingestion());
        assert_eq!(ready(1).description(), "Catalog ready");
    }

    #[test]
    fn test_event_serialization() {
        let event = CoreEvent::Query(QueryEvent::SearchPerformed {
            term: "drake".to_string(),
            matches: 2,
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"Query\""));
        assert!(json.contains("\"event\":\"SearchPerformed\""));

        let back: CoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
