//! # Core Catalog Module
//!
//! Ingestion and querying of a tabular catalog of music tracks.
//!
//! ## Overview
//!
//! - [`normalizer`] turns loosely-typed raw rows into canonical [`Track`]s,
//!   resolving column aliases and rejecting incomplete rows
//! - [`Catalog`] is the immutable, id-indexed result of one ingestion run
//! - [`QueryEngine`] answers listing, ranking and search queries
//! - [`IngestionPipeline`] drives a [`TabularSource`](bridge_traits::TabularSource)
//!   through the steps above and publishes the newest catalog
//!
//! Data flows one way: raw rows, then catalog, then query results. A
//! catalog is never modified after it is built; reloading builds a new one.

pub mod catalog;
pub mod error;
pub mod ingestion;
pub mod models;
pub mod normalizer;
pub mod query;

pub use catalog::Catalog;
pub use error::{CatalogError, Result};
pub use ingestion::{IngestionOutcome, IngestionPipeline, IngestionReport, IngestionStatus};
pub use models::{Rejection, Track, TrackId};
pub use query::QueryEngine;
