//! Remote sources the cache can fetch from
//!
//! The cache only needs "give me the whole resource or tell me why not", so a
//! source is a single async `fetch`. [`HttpSource`] is the production
//! implementation: one GET per call, bounded by a client-side timeout, and only
//! a 200 response counts as success.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use reqwest::{Client, StatusCode};

use crate::error::FetchError;

/// Something that can produce the full contents of the cached resource
pub trait Source: Send + Sync + 'static {
    /// Fetches the complete resource.
    fn fetch(&self) -> impl Future<Output = Result<Bytes, FetchError>> + Send;

    /// Human-readable identifier used in logs and errors (e.g. the URL).
    fn describe(&self) -> String;
}

/// Fetches the resource with a single HTTP GET
#[derive(Debug, Clone)]
pub struct HttpSource {
    /// HTTP client carrying the request timeout
    http_client: Client,
    /// URL of the remote resource
    url: String,
}

impl HttpSource {
    /// Creates a new HttpSource for `url`
    ///
    /// # Arguments
    /// * `url` - Location of the remote resource
    /// * `timeout` - Bound on the whole request, body included
    ///
    /// # Returns
    /// * `Ok(HttpSource)` on success
    /// * `Err(FetchError::Client)` if the TLS backend cannot be initialised
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            http_client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Source for HttpSource {
    async fn fetch(&self) -> Result<Bytes, FetchError> {
        let response = self.http_client.get(&self.url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status));
        }

        Ok(response.bytes().await?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "/config.yaml";

    fn source_for(server: &mockito::ServerGuard) -> HttpSource {
        HttpSource::new(format!("{}{}", server.url(), PATH), Duration::from_secs(5))
            .expect("client should build")
    }

    #[tokio::test]
    async fn test_fetch_returns_body_on_200() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", PATH)
            .with_status(200)
            .with_body("v1")
            .create_async()
            .await;

        let body = source_for(&server).fetch().await.expect("fetch should succeed");

        assert_eq!(body, Bytes::from_static(b"v1"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_200_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", PATH)
            .with_status(404)
            .with_body("not here")
            .create_async()
            .await;

        let result = source_for(&server).fetch().await;

        assert!(matches!(result, Err(FetchError::Status(StatusCode::NOT_FOUND))));
    }

    #[tokio::test]
    async fn test_fetch_treats_other_success_codes_as_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", PATH)
            .with_status(204)
            .create_async()
            .await;

        let result = source_for(&server).fetch().await;

        assert!(matches!(result, Err(FetchError::Status(StatusCode::NO_CONTENT))));
    }

    #[tokio::test]
    async fn test_fetch_reports_transport_error() {
        // Nothing listens on the discard port
        let source = HttpSource::new("http://127.0.0.1:9/", Duration::from_secs(5)).unwrap();

        let result = source.fetch().await;

        assert!(matches!(result, Err(FetchError::Http(_))));
    }

    #[test]
    fn test_describe_is_the_url() {
        let source = HttpSource::new("http://example.com/a", Duration::from_secs(1)).unwrap();
        assert_eq!(source.describe(), "http://example.com/a");
        assert_eq!(source.url(), "http://example.com/a");
    }
}
