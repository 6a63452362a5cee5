//! # Host Bridge Traits
//!
//! Platform abstraction traits that a host implements to feed the catalog core.
//!
//! ## Overview
//!
//! This crate defines the contract between the catalog core and
//! platform-specific code. The core only ever sees loosely-typed rows; where
//! those rows come from (a bundled CSV, a download, a spreadsheet export) is
//! the host's business.
//!
//! ## Traits
//!
//! ### Data
//! - [`TabularSource`](tabular::TabularSource) - Header-keyed raw rows for ingestion
//!
//! ### I/O
//! - [`HttpClient`](http::HttpClient) - Single-attempt HTTP downloads
//! - [`FileSystemAccess`](storage::FileSystemAccess) - Read-only file access
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert platform-specific errors into it and include context such
//! as the path or URL that failed.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can be shared
//! across async tasks behind an `Arc`.

pub mod error;
pub mod http;
pub mod logging;
pub mod storage;
pub mod tabular;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use storage::FileSystemAccess;
pub use tabular::{value_to_text, InMemoryTabularSource, RawRow, SourceLocation, TabularSource};
