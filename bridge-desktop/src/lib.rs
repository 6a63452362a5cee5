//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides production-ready implementations of the bridge traits
//! using desktop-appropriate libraries:
//! - `FileSystemAccess` using `tokio::fs`
//! - `HttpClient` using `reqwest`
//! - `TabularSource` reading CSV through the `csv` crate
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::CsvTabularSource;
//! use bridge_traits::{SourceLocation, TabularSource};
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = CsvTabularSource::for_location(
//!         SourceLocation::parse("Spotify Most Streamed Songs.csv"),
//!     )
//!     .unwrap();
//!     let rows = source.fetch_rows().await.unwrap();
//! }
//! ```

mod csv_source;
mod filesystem;
mod http;

pub use csv_source::{parse_csv, CsvTabularSource};
pub use filesystem::TokioFileSystem;
pub use http::ReqwestHttpClient;
