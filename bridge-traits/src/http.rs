//! HTTP Client Abstraction
//!
//! Minimal async HTTP surface used to download remote catalogs.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// A GET request for a remote resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// HTTP response
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    /// Check if response status is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Async HTTP client trait
///
/// Implementations perform exactly one attempt per call. Catalog ingestion
/// treats a failed download as final, so retry policies do not belong here.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::http::{HttpClient, HttpRequest};
///
/// async fn fetch_csv(client: &dyn HttpClient) -> Result<Bytes> {
///     let response = client.execute(HttpRequest::get("https://example.com/top.csv")).await?;
///     Ok(response.body)
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request
    ///
    /// A non-2xx status is still `Ok`; callers decide what it means.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network connection fails
    /// - TLS validation fails
    /// - Request times out
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_request() {
        let request = HttpRequest::get("https://example.com/songs.csv");
        assert_eq!(request.url, "https://example.com/songs.csv");
    }

    #[test]
    fn test_success_range() {
        let response = |status| HttpResponse {
            status,
            body: Bytes::from("track_name,streams"),
        };

        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(199).is_success());
        assert!(!response(301).is_success());
        assert!(!response(404).is_success());
        assert!(!response(503).is_success());
    }
}
