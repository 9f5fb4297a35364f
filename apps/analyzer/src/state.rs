use crate::llm_client::LlmClient;
use crate::scrape::PageScraper;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub scraper: PageScraper,
}
