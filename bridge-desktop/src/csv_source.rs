//! CSV Tabular Source
//!
//! Loads a header-driven CSV catalog from a local file or an HTTP(S) URL and
//! hands it to the core as [`RawRow`]s. Every value is delivered as text;
//! numeric interpretation is the normalizer's job.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{HttpClient, HttpRequest},
    storage::FileSystemAccess,
    tabular::{RawRow, SourceLocation, TabularSource},
};
use bytes::Bytes;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::{ReqwestHttpClient, TokioFileSystem};

const UTF8_BOM: char = '\u{feff}';

/// CSV-backed [`TabularSource`].
pub struct CsvTabularSource {
    location: SourceLocation,
    file_system: Arc<dyn FileSystemAccess>,
    http_client: Option<Arc<dyn HttpClient>>,
}

impl CsvTabularSource {
    /// Create a source with explicit bridges.
    ///
    /// `http_client` is only consulted for [`SourceLocation::Url`].
    pub fn new(
        location: SourceLocation,
        file_system: Arc<dyn FileSystemAccess>,
        http_client: Option<Arc<dyn HttpClient>>,
    ) -> Self {
        Self {
            location,
            file_system,
            http_client,
        }
    }

    /// Create a source wired to the desktop defaults.
    pub fn for_location(location: SourceLocation) -> Result<Self> {
        let http_client: Option<Arc<dyn HttpClient>> = match location {
            SourceLocation::Url(_) => Some(Arc::new(ReqwestHttpClient::new()?)),
            SourceLocation::File(_) => None,
        };

        Ok(Self::new(
            location,
            Arc::new(TokioFileSystem::new()),
            http_client,
        ))
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    async fn load_bytes(&self) -> Result<Bytes> {
        match &self.location {
            SourceLocation::File(path) => self.file_system.read_file(path).await,
            SourceLocation::Url(url) => {
                let client = self.http_client.as_ref().ok_or_else(|| {
                    BridgeError::NotAvailable(format!("No HttpClient configured to fetch {}", url))
                })?;

                let response = client.execute(HttpRequest::get(url.clone())).await?;
                if !response.is_success() {
                    return Err(BridgeError::OperationFailed(format!(
                        "HTTP {} fetching {}",
                        response.status, url
                    )));
                }
                Ok(response.body)
            }
        }
    }
}

#[async_trait]
impl TabularSource for CsvTabularSource {
    #[instrument(skip(self), fields(location = %self.location))]
    async fn fetch_rows(&self) -> Result<Vec<RawRow>> {
        let data = self.load_bytes().await?;
        debug!(size = data.len(), "Loaded CSV payload");

        let rows = parse_csv(&data)?;
        info!(rows = rows.len(), "Parsed CSV catalog");
        Ok(rows)
    }

    fn describe(&self) -> String {
        self.location.to_string()
    }
}

/// Parse CSV bytes into header-keyed rows.
///
/// - The first record is the header row.
/// - Blank lines are skipped.
/// - Rows shorter than the header lack the trailing keys; extra trailing
///   fields are dropped.
/// - Invalid UTF-8 is decoded lossily instead of failing the whole file.
pub fn parse_csv(data: &[u8]) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(|e| BridgeError::Parse(format!("header row: {}", e)))?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let name = String::from_utf8_lossy(h);
            if i == 0 {
                name.trim_start_matches(UTF8_BOM).to_string()
            } else {
                name.into_owned()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for (index, record) in reader.byte_records().enumerate() {
        let record =
            record.map_err(|e| BridgeError::Parse(format!("data row {}: {}", index + 1, e)))?;

        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| {
                (
                    header.clone(),
                    Value::String(String::from_utf8_lossy(value).into_owned()),
                )
            })
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::http::HttpResponse;
    use mockall::mock;
    use std::path::PathBuf;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
        }
    }

    const SAMPLE: &str = "track_name,artist(s)_name,streams,cover_url\n\
Flowers,Miley Cyrus,\"1,316,855,716\",https://img.example/flowers.jpg\n\
\n\
Kill Bill,SZA,\"1,146,500,000\",https://img.example/killbill.jpg\n\
Short Row,Nobody\n";

    #[test]
    fn test_parse_csv_quoted_and_short_rows() {
        let rows = parse_csv(SAMPLE.as_bytes()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].text("track_name").as_deref(), Some("Flowers"));
        assert_eq!(rows[0].text("streams").as_deref(), Some("1,316,855,716"));
        assert_eq!(rows[1].text("artist(s)_name").as_deref(), Some("SZA"));

        assert_eq!(rows[2].text("artist(s)_name").as_deref(), Some("Nobody"));
        assert!(!rows[2].contains_key("streams"));
        assert!(!rows[2].contains_key("cover_url"));
    }

    #[test]
    fn test_parse_csv_strips_bom_and_tolerates_bad_utf8() {
        let mut data = "\u{feff}track_name,streams\n".as_bytes().to_vec();
        data.extend_from_slice(b"Caf\xe9,10\n");

        let rows = parse_csv(&data).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].contains_key("track_name"));
        assert_eq!(rows[0].text("streams").as_deref(), Some("10"));
        assert!(rows[0].text("track_name").unwrap().starts_with("Caf"));
    }

    #[test]
    fn test_parse_csv_empty_input() {
        assert!(parse_csv(b"").unwrap().is_empty());
        assert!(parse_csv(b"track_name,streams\n").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_source_reads_rows() {
        let dir = std::env::temp_dir().join("bridge-desktop-csv-source");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("songs.csv");
        tokio::fs::write(&path, SAMPLE).await.unwrap();

        let source = CsvTabularSource::for_location(SourceLocation::File(path.clone())).unwrap();
        let rows = source.fetch_rows().await.unwrap();

        assert_eq!(rows.len(), 3);
        assert!(source.describe().ends_with("songs.csv"));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_missing_file_fails() {
        let source = CsvTabularSource::for_location(SourceLocation::File(PathBuf::from(
            "/definitely/not/here/songs.csv",
        )))
        .unwrap();

        assert!(matches!(source.fetch_rows().await, Err(BridgeError::Io(_))));
    }

    #[tokio::test]
    async fn test_url_source_uses_http_client_once() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .withf(|req| req.url == "https://data.example/top.csv")
            .returning(|_| {
                Ok(HttpResponse {
                    status: 200,
                    body: Bytes::from(SAMPLE),
                })
            });

        let source = CsvTabularSource::new(
            SourceLocation::Url("https://data.example/top.csv".to_string()),
            Arc::new(TokioFileSystem::new()),
            Some(Arc::new(http)),
        );

        let rows = source.fetch_rows().await.unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn test_url_source_http_error_is_reported() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 404,
                body: Bytes::new(),
            })
        });

        let source = CsvTabularSource::new(
            SourceLocation::Url("https://data.example/missing.csv".to_string()),
            Arc::new(TokioFileSystem::new()),
            Some(Arc::new(http)),
        );

        let err = source.fetch_rows().await.unwrap_err();
        assert!(err.to_string().contains("HTTP 404"));
    }

    #[tokio::test]
    async fn test_url_source_without_client_is_not_available() {
        let source = CsvTabularSource::new(
            SourceLocation::Url("https://data.example/top.csv".to_string()),
            Arc::new(TokioFileSystem::new()),
            None,
        );

        assert!(matches!(
            source.fetch_rows().await,
            Err(BridgeError::NotAvailable(_))
        ));
    }
}
