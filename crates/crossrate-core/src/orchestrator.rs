use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use crossrate_config::Config;
use crossrate_models::{MovieInfo, MovieInfoWithRatings, SiteName};
use crossrate_sites::urls::site_for_url;
use crossrate_sites::{factory, DisplayLocale, Document, Fetcher, HttpFetcher, InjectionSummary, SiteAdapter, SiteError};
use crate::query::SearchEngine;
use crate::resolver::CrossSiteResolver;

/// Lookup message sent by a page: who the movie is and which site to ask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    pub movie_info: MovieInfo,
    pub remote_page_name: String,
}

/// Reply to a `LookupRequest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LookupResponse {
    Ratings(MovieInfoWithRatings),
    Error { kind: String, message: String },
}

impl LookupResponse {
    fn from_error(err: &SiteError) -> Self {
        LookupResponse::Error {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Entry point: takes lookup requests and answers with the other site's data.
pub struct Orchestrator {
    resolver: CrossSiteResolver,
}

impl Orchestrator {
    pub fn new(resolver: CrossSiteResolver) -> Self {
        Self { resolver }
    }

    pub fn from_config(config: &Config) -> Self {
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::from_config(&config.http));
        Self::new(CrossSiteResolver::new(fetcher, SearchEngine::from_config(&config.search)))
    }

    pub async fn handle(&self, request: &LookupRequest) -> Result<MovieInfoWithRatings, SiteError> {
        let target = request
            .remote_page_name
            .parse::<SiteName>()
            .map_err(|_| SiteError::UnsupportedSite(request.remote_page_name.clone()))?;
        self.resolver.resolve(&request.movie_info, target).await
    }

    pub async fn handle_request(&self, request: &LookupRequest) -> LookupResponse {
        match self.handle(request).await {
            Ok(data) => LookupResponse::Ratings(data),
            Err(e) => {
                warn!(title = %request.movie_info.title(), remote = %request.remote_page_name, error = %e, "Lookup failed");
                LookupResponse::from_error(&e)
            }
        }
    }

    /// One JSON request in, one JSON response out.
    pub async fn handle_message(&self, message: &str) -> String {
        let response = match serde_json::from_str::<LookupRequest>(message) {
            Ok(request) => self.handle_request(&request).await,
            Err(e) => LookupResponse::Error {
                kind: "invalidRequest".to_string(),
                message: e.to_string(),
            },
        };
        serde_json::to_string(&response).unwrap_or_else(|e| {
            format!(r#"{{"type":"error","kind":"internal","message":"{}"}}"#, e.to_string().replace('"', "'"))
        })
    }

    /// Fetch a movie page and wrap it in its site's adapter. The site is
    /// taken from `site` or recognized from the final URL.
    pub async fn open_page(&self, url: &str, site: Option<SiteName>) -> Result<Box<dyn SiteAdapter>, SiteError> {
        let fetcher = self.resolver.fetcher();
        let page = fetcher.fetch(url).await?;
        let site = site
            .or_else(|| site_for_url(&page.url))
            .or_else(|| site_for_url(url))
            .ok_or_else(|| SiteError::UnsupportedSite(page.url.clone()))?;
        debug!(url = %page.url, site = %site, "Opened page");
        Ok(factory::create_for(site, Document::parse(&page.body), &page.url, fetcher))
    }

    /// Full round trip for one page: read its movie, look the movie up on the
    /// other site, and inject what was found.
    pub async fn cross_link(
        &self,
        adapter: &mut dyn SiteAdapter,
        locale: &DisplayLocale,
    ) -> Result<(MovieInfoWithRatings, InjectionSummary), SiteError> {
        let request = LookupRequest {
            movie_info: adapter.movie_info().await?,
            remote_page_name: adapter.site().other().page_name().to_string(),
        };
        let data = self.handle(&request).await?;
        let summary = adapter.inject_ratings(&data, locale)?;
        Ok((data, summary))
    }
}
