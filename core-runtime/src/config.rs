//! # Catalog Configuration Module
//!
//! Provides configuration management for the stream catalog core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `CatalogConfig` instance that holds the tabular source and the display
//! settings of the catalog views. It enforces fail-fast validation so a host
//! learns about a missing source or an out-of-range limit at startup rather
//! than on first render.
//!
//! ## Required Dependencies
//!
//! - `TabularSource` - where raw rows come from. Either inject one directly
//!   or give a [`SourceLocation`]; with the `desktop-shims` feature enabled a
//!   location is turned into a CSV source automatically.
//!
//! ## Usage
//!
//! ### Desktop defaults
//!
//! ```ignore
//! use core_runtime::config::CatalogConfig;
//!
//! let config = CatalogConfig::builder()
//!     .default_source_file()
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ### Custom source
//!
//! ```ignore
//! use bridge_traits::InMemoryTabularSource;
//! use core_runtime::config::CatalogConfig;
//! use std::sync::Arc;
//!
//! let config = CatalogConfig::builder()
//!     .tabular_source(Arc::new(InMemoryTabularSource::new("fixture", rows)))
//!     .display_limit(25)
//!     .chart_size(5)
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::tabular::{SourceLocation, TabularSource};
use std::path::PathBuf;
use std::sync::Arc;

/// File name of the bundled catalog the reference host ships with.
pub const DEFAULT_SOURCE_FILE: &str = "Spotify Most Streamed Songs.csv";

/// Maximum number of cards the listing shows.
pub const DEFAULT_DISPLAY_LIMIT: usize = 50;

/// Number of bars in the ranked chart.
pub const DEFAULT_CHART_SIZE: usize = 10;

const MAX_DISPLAY_LIMIT: usize = 10_000;
const MAX_CHART_SIZE: usize = 1_000;

/// Catalog configuration.
///
/// Use [`CatalogConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Where the catalog was configured to come from, if given as a location
    pub source_location: Option<SourceLocation>,

    /// Source of raw rows used by ingestion
    pub tabular_source: Arc<dyn TabularSource>,

    /// Listing cap
    pub display_limit: usize,

    /// Number of tracks in the ranked chart
    pub chart_size: usize,

    /// Capacity of the event bus ring buffer
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("source_location", &self.source_location)
            .field("tabular_source", &self.tabular_source.describe())
            .field("display_limit", &self.display_limit)
            .field("chart_size", &self.chart_size)
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

impl CatalogConfig {
    /// Creates a new builder for constructing a `CatalogConfig`.
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Display limit is within 1..=10,000
    /// - Chart size is within 1..=1,000
    /// - Event buffer size is greater than 0
    pub fn validate(&self) -> Result<()> {
        if self.display_limit == 0 {
            return Err(Error::Config(
                "Display limit must be greater than 0".to_string(),
            ));
        }

        if self.display_limit > MAX_DISPLAY_LIMIT {
            return Err(Error::Config(format!(
                "Display limit exceeds maximum of {}",
                MAX_DISPLAY_LIMIT
            )));
        }

        if self.chart_size == 0 {
            return Err(Error::Config("Chart size must be greater than 0".to_string()));
        }

        if self.chart_size > MAX_CHART_SIZE {
            return Err(Error::Config(format!(
                "Chart size exceeds maximum of {}",
                MAX_CHART_SIZE
            )));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_tabular_source(location: &SourceLocation) -> Result<Arc<dyn TabularSource>> {
    use bridge_desktop::CsvTabularSource;

    let source = CsvTabularSource::for_location(location.clone()).map_err(|e| {
        Error::Internal(format!("Failed to create CSV source for {}: {}", location, e))
    })?;
    let source: Arc<dyn TabularSource> = Arc::new(source);
    Ok(source)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_tabular_source(_location: &SourceLocation) -> Result<Arc<dyn TabularSource>> {
    Err(Error::CapabilityMissing {
        capability: "TabularSource".to_string(),
        message: "A TabularSource implementation is required to read the catalog. \
                 Desktop: enable the 'desktop-shims' feature to read CSV files and URLs. \
                 Other hosts: inject a TabularSource with .tabular_source()."
            .to_string(),
    })
}

/// Builder for constructing [`CatalogConfig`] instances.
#[derive(Default)]
pub struct CatalogConfigBuilder {
    source_location: Option<SourceLocation>,
    tabular_source: Option<Arc<dyn TabularSource>>,
    display_limit: Option<usize>,
    chart_size: Option<usize>,
    event_buffer_size: Option<usize>,
}

impl CatalogConfigBuilder {
    /// Sets where the catalog lives.
    pub fn source_location(mut self, location: SourceLocation) -> Self {
        self.source_location = Some(location);
        self
    }

    /// Sets a local CSV file as the catalog location.
    pub fn source_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.source_location = Some(SourceLocation::File(path.into()));
        self
    }

    /// Sets an HTTP(S) URL as the catalog location.
    pub fn source_url(mut self, url: impl Into<String>) -> Self {
        self.source_location = Some(SourceLocation::Url(url.into()));
        self
    }

    /// Uses [`DEFAULT_SOURCE_FILE`] in the working directory.
    pub fn default_source_file(self) -> Self {
        self.source_path(DEFAULT_SOURCE_FILE)
    }

    /// Injects a tabular source. Takes precedence over a location.
    pub fn tabular_source(mut self, source: Arc<dyn TabularSource>) -> Self {
        self.tabular_source = Some(source);
        self
    }

    pub fn display_limit(mut self, limit: usize) -> Self {
        self.display_limit = Some(limit);
        self
    }

    pub fn chart_size(mut self, size: usize) -> Self {
        self.chart_size = Some(size);
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds the final `CatalogConfig` instance.
    ///
    /// # Errors
    ///
    /// - `Error::Config` when neither a source nor a location was given, or
    ///   when a value is out of range
    /// - `Error::CapabilityMissing` when only a location was given and no
    ///   default source implementation is compiled in
    pub fn build(self) -> Result<CatalogConfig> {
        let tabular_source = match (self.tabular_source, &self.source_location) {
            (Some(source), _) => source,
            (None, Some(location)) => provide_default_tabular_source(location)?,
            (None, None) => {
                return Err(Error::Config(
                    "Catalog source is required. Use .source_location(), .source_path(), \
                     .source_url() or .tabular_source() to set it."
                        .to_string(),
                ))
            }
        };

        let config = CatalogConfig {
            source_location: self.source_location,
            tabular_source,
            display_limit: self.display_limit.unwrap_or(DEFAULT_DISPLAY_LIMIT),
            chart_size: self.chart_size.unwrap_or(DEFAULT_CHART_SIZE),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}
