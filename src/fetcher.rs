use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

/// A failed retrieval: request construction, connection or body read.
/// Callers treat this as "nothing found at this source" rather than
/// aborting the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Thin wrapper around a shared [`reqwest::Client`] carrying the fixed
/// browser-like header profile sent with every request. Cheap to clone;
/// carries no per-request state.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert("DNT", HeaderValue::from_static("1"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.8"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );

        let client = Client::builder()
            .user_agent("Mozilla/5.0 (KHTML, like Gecko) Safari/537.36")
            .default_headers(headers)
            .build()?;

        Ok(Fetcher { client })
    }

    /// Fetch one URL and return the raw body. The HTTP status is deliberately
    /// ignored: rate-limit and not-found responses still carry bodies the
    /// extraction patterns need to see.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("Requesting URL: {}", url);
        let response = self.client.get(url).send().await?;
        let body = response.text().await?;
        Ok(body)
    }
}
