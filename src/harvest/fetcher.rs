//! HTTP page fetcher
//!
//! Fetches listing pages with bounded retries and a fixed delay between
//! attempts. A fetch only succeeds once the response parses as HTML and
//! the listing container marker is present; a page served without it is
//! treated as not ready and retried.

use crate::config::HarvestConfig;
use crate::harvest::useragent::pick_user_agent;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;

/// CSS selector for the marker that must be present in a ready page
const CONTAINER_MARKER: &str = "div.container";

/// Errors from fetching a listing page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Container marker missing in {url}")]
    MissingMarker { url: String },

    #[error("Fetch failed for {url} after {attempts} attempts: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// A successfully fetched listing page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was fetched
    pub url: String,
    /// Raw HTML body, verified to contain the container marker
    pub body: String,
}

/// Source of listing pages for the walker
///
/// The walker only depends on this contract: a fetch either yields a ready
/// page or fails after bounded retries, which aborts the current walk.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Fetches pages over HTTP with retries and a readiness check
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    /// Builds a fetcher from the harvest configuration
    pub fn new(config: &HarvestConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(pick_user_agent())
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    async fn attempt(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        if !has_container_marker(&body) {
            return Err(FetchError::MissingMarker {
                url: url.to_string(),
            });
        }

        Ok(FetchedPage {
            url: url.to_string(),
            body,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let mut attempt = 1;
        loop {
            match self.attempt(url).await {
                Ok(page) => return Ok(page),
                Err(e) if attempt < self.max_retries => {
                    tracing::warn!(
                        "Fetch attempt {}/{} failed for {}: {}",
                        attempt,
                        self.max_retries,
                        url,
                        e
                    );
                    attempt += 1;
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => {
                    return Err(FetchError::RetriesExhausted {
                        url: url.to_string(),
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
            }
        }
    }
}

/// Checks that the listing container marker is present in the body
fn has_container_marker(body: &str) -> bool {
    let document = Html::parse_document(body);
    match Selector::parse(CONTAINER_MARKER) {
        Ok(selector) => document.select(&selector).next().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> HarvestConfig {
        HarvestConfig {
            max_retries: 3,
            retry_delay_ms: 10,
            page_delay_ms: 0,
            fetch_timeout_secs: 5,
            max_workers: 2,
            freshness: crate::config::Freshness::Yesterday,
        }
    }

    const READY_PAGE: &str =
        r#"<html><body><div class="container"><div class="card mb-3"></div></div></body></html>"#;

    #[test]
    fn test_container_marker_detection() {
        assert!(has_container_marker(READY_PAGE));
        assert!(!has_container_marker("<html><body><p>loading</p></body></html>"));
    }

    #[tokio::test]
    async fn test_fetch_success_with_marker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string(READY_PAGE))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let page = fetcher.fetch(&format!("{}/new", server.uri())).await.unwrap();
        assert!(page.body.contains("card mb-3"));
    }

    #[tokio::test]
    async fn test_server_error_exhausts_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let err = fetcher
            .fetch(&format!("{}/new", server.uri()))
            .await
            .unwrap_err();

        match err {
            FetchError::RetriesExhausted { attempts, last, .. } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, FetchError::Status { status: 500, .. }));
            }
            other => panic!("expected RetriesExhausted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_marker_is_retried_then_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>loading</body></html>"),
            )
            .expect(3)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let err = fetcher
            .fetch(&format!("{}/new", server.uri()))
            .await
            .unwrap_err();

        match err {
            FetchError::RetriesExhausted { last, .. } => {
                assert!(matches!(*last, FetchError::MissingMarker { .. }));
            }
            other => panic!("expected RetriesExhausted, got {:?}", other),
        }
    }
}
