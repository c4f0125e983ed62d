use async_trait::async_trait;
use crossrate_config::HttpConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};
use crate::SiteError;

/// A fetched document together with the URL it was finally served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,
    pub body: String,
}

/// Retrieves documents by URL.
///
/// Implementations must not retry; retry policy belongs to the caller.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, SiteError>;
}

/// Fetcher backed by `reqwest`, following redirects.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &HttpConfig) -> Self {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&config.accept_language) {
            Ok(value) => {
                headers.insert(ACCEPT_LANGUAGE, value);
            }
            Err(e) => warn!(accept_language = %config.accept_language, error = %e, "Ignoring invalid Accept-Language"),
        }

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self::new(client)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, SiteError> {
        debug!(url = %url, "Fetching");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SiteError::fetch(url, e))?;

        let final_url = response.url().to_string();
        let status = response.status();
        if !status.is_success() {
            return Err(SiteError::fetch(url, format!("HTTP {}", status)));
        }

        let body = response.text().await.map_err(|e| SiteError::fetch(url, e))?;
        debug!(url = %url, final_url = %final_url, bytes = body.len(), "Fetched");
        Ok(FetchedPage { url: final_url, body })
    }
}

/// In-memory fetcher serving canned pages, with a log of requested URLs.
#[derive(Default)]
pub struct MemoryFetcher {
    pages: HashMap<String, FetchedPage>,
    requests: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.insert(url, url, body);
        self
    }

    /// Serve `body` for `url` as if the server redirected to `final_url`
    pub fn with_redirect(mut self, url: &str, final_url: &str, body: impl Into<String>) -> Self {
        self.insert(url, final_url, body);
        self
    }

    pub fn insert(&mut self, url: &str, final_url: &str, body: impl Into<String>) {
        self.pages.insert(
            url.to_string(),
            FetchedPage {
                url: final_url.to_string(),
                body: body.into(),
            },
        );
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|log| log.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, SiteError> {
        if let Ok(mut log) = self.requests.lock() {
            log.push(url.to_string());
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| SiteError::fetch(url, "HTTP 404 Not Found"))
    }
}
