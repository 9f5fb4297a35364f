//! Page fetching and visible-copy extraction.

pub mod extract;
pub mod target;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::errors::AppError;

pub use extract::{extract_visible_text, prepare_content};
pub use target::{domain_label, validate_url};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; OgilvyCopyAnalyzer/0.1)";

/// Bytes of HTML read per page. Later bytes are never downloaded.
pub const MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;

/// Fetches marketing pages over plain HTTP. No JavaScript rendering.
#[derive(Clone)]
pub struct PageScraper {
    client: Client,
    max_bytes: usize,
}

impl PageScraper {
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Internal(e.into()))?;
        Ok(Self {
            client,
            max_bytes: MAX_PAGE_BYTES,
        })
    }

    /// Caps how many bytes of HTML are read from each page.
    pub fn with_body_limit(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Downloads `url` and returns its visible copy.
    pub async fn fetch_text(&self, url: &Url) -> Result<String, AppError> {
        info!(%url, "Fetching page");

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AppError::Scrape(describe_request_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Scrape(format!("HTTP {status}")));
        }

        if let Some(len) = response.content_length() {
            if len as usize > self.max_bytes {
                debug!(len, limit = self.max_bytes, "Page larger than limit; reading prefix");
            }
        }

        let mut body: Vec<u8> = Vec::new();
        while body.len() < self.max_bytes {
            let chunk = response
                .chunk()
                .await
                .map_err(|e| AppError::Scrape(describe_request_error(&e)))?;
            let Some(chunk) = chunk else { break };
            let take = chunk.len().min(self.max_bytes - body.len());
            body.extend_from_slice(&chunk[..take]);
        }
        let html = String::from_utf8_lossy(&body);
        debug!(bytes = body.len(), "Page downloaded");

        let text = extract_visible_text(&html);
        debug!(chars = text.chars().count(), "Visible copy extracted");
        Ok(text)
    }
}

fn describe_request_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "the page took too long to respond".to_string()
    } else if e.is_connect() {
        "could not connect to the site".to_string()
    } else {
        e.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraper() -> PageScraper {
        PageScraper::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_text_extracts_copy() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/landing")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<nav><span>Menu</span></nav><h1>Sleep better</h1><p>Try it free.</p>")
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/landing", server.url())).unwrap();
        let text = scraper().fetch_text(&url).await.unwrap();
        assert_eq!(text, "Sleep better Try it free.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_text_stops_at_body_limit() {
        let mut server = mockito::Server::new_async().await;
        let body = format!("<p>Keep this</p><p>{}</p><p>Never read</p>", "x".repeat(4096));
        server
            .mock("GET", "/huge")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/huge", server.url())).unwrap();
        let text = scraper().with_body_limit(256).fetch_text(&url).await.unwrap();
        assert!(text.starts_with("Keep this"));
        assert!(!text.contains("Never read"));
    }

    #[tokio::test]
    async fn test_fetch_text_rejects_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("<p>Not here</p>")
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/missing", server.url())).unwrap();
        let err = scraper().fetch_text(&url).await.unwrap_err();
        match err {
            AppError::Scrape(msg) => assert!(msg.contains("404"), "got {msg}"),
            other => panic!("expected Scrape error, got {other:?}"),
        }
    }
}
