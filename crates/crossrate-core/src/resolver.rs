use scraper::{Html, Selector};
use std::sync::{Arc, LazyLock};
use tracing::{debug, info};
use url::Url;
use crossrate_models::{MovieInfo, MovieInfoWithRatings, SiteName};
use crossrate_sites::urls::{canonical_url, is_movie_page};
use crossrate_sites::{factory, Document, Fetcher, SiteError};
use crate::query::{unwrap_redirect_notice, SearchEngine};

static LINKS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").expect("link selector"));

/// How the target page was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    /// The search engine redirected straight to the page
    Redirect,
    /// The page was the first matching link of a result listing
    Listing,
}

/// Finds a movie's page on the other site and reads its ratings.
pub struct CrossSiteResolver {
    fetcher: Arc<dyn Fetcher>,
    engine: SearchEngine,
}

impl CrossSiteResolver {
    pub fn new(fetcher: Arc<dyn Fetcher>, engine: SearchEngine) -> Self {
        Self { fetcher, engine }
    }

    pub fn fetcher(&self) -> Arc<dyn Fetcher> {
        self.fetcher.clone()
    }

    /// Canonical URL of `info`'s page on `target`.
    pub async fn locate(&self, info: &MovieInfo, target: SiteName) -> Result<(String, Discovery), SiteError> {
        let search_url = self.engine.search_url(info, target);
        debug!(title = %info.title(), target = %target, search_url = %search_url, "Searching");

        let page = self.fetcher.fetch(&search_url).await?;

        let landed = unwrap_redirect_notice(&page.url);
        if is_movie_page(target, &landed) {
            let url = canonical_url(target, &landed);
            debug!(url = %url, "Search redirected to target page");
            return Ok((url, Discovery::Redirect));
        }

        match first_listing_match(&page.body, &page.url, target) {
            Some(url) => {
                debug!(url = %url, "Picked first matching search result");
                Ok((url, Discovery::Listing))
            }
            None => Err(SiteError::NoMatchFound {
                site: target,
                search_url,
            }),
        }
    }

    pub async fn resolve(&self, info: &MovieInfo, target: SiteName) -> Result<MovieInfoWithRatings, SiteError> {
        let (url, discovery) = self.locate(info, target).await?;
        let page = self.fetcher.fetch(&url).await?;

        let adapter = factory::create_for(target, Document::parse(&page.body), &url, self.fetcher.clone());
        let data = adapter.movie_info_with_ratings().await?;

        info!(
            title = %info.title(),
            target = %target,
            url = %data.url(),
            discovery = ?discovery,
            "Resolved cross-site ratings"
        );
        Ok(data)
    }
}

/// First link in document order that points at a `target` movie page,
/// after resolving relative hrefs and unwrapping redirect notices.
pub fn first_listing_match(html: &str, page_url: &str, target: SiteName) -> Option<String> {
    let base = Url::parse(page_url).ok();
    let document = Html::parse_document(html);

    document
        .select(&LINKS)
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| match &base {
            Some(base) => base.join(href).ok().map(String::from),
            None => Url::parse(href).ok().map(String::from),
        })
        .map(|href| unwrap_redirect_notice(&href))
        .find(|href| is_movie_page(target, href))
        .map(|href| canonical_url(target, &href))
}
