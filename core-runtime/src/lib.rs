//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the stream catalog core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the catalog and service
//! crates depend on. It establishes the logging conventions, the
//! configuration builder and the event broadcasting used throughout the
//! system.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{CatalogConfig, CatalogConfigBuilder, DEFAULT_SOURCE_FILE};
pub use error::{Error, Result};
pub use events::{CoreEvent, EventBus, EventSeverity, EventStream};
