//! Adapter factory: maps a site to the constructor of its adapter.
//!
//! Holds no state; every call builds a fresh adapter owning its document.

use std::sync::Arc;
use tracing::debug;
use crossrate_models::SiteName;
use crate::dom::Document;
use crate::fetch::Fetcher;
use crate::imdb::ImdbAdapter;
use crate::rotten::RottenTomatoesAdapter;
use crate::{SiteAdapter, SiteError};

pub type AdapterConstructor = fn(Document, &str, Arc<dyn Fetcher>) -> Box<dyn SiteAdapter>;

fn imdb(document: Document, url: &str, fetcher: Arc<dyn Fetcher>) -> Box<dyn SiteAdapter> {
    Box::new(ImdbAdapter::new(document, url, fetcher))
}

fn rotten(document: Document, url: &str, fetcher: Arc<dyn Fetcher>) -> Box<dyn SiteAdapter> {
    Box::new(RottenTomatoesAdapter::new(document, url, fetcher))
}

pub fn constructor_for(site: SiteName) -> AdapterConstructor {
    match site {
        SiteName::Imdb => imdb,
        SiteName::RottenTomatoes => rotten,
    }
}

pub fn create_for(
    site: SiteName,
    document: Document,
    url: &str,
    fetcher: Arc<dyn Fetcher>,
) -> Box<dyn SiteAdapter> {
    debug!(site = %site, url = %url, "Creating site adapter");
    constructor_for(site)(document, url, fetcher)
}

/// Create an adapter from a page name (`imdb`, `rotten`)
pub fn create(
    site_name: &str,
    document: Document,
    url: &str,
    fetcher: Arc<dyn Fetcher>,
) -> Result<Box<dyn SiteAdapter>, SiteError> {
    let site = site_name
        .parse::<SiteName>()
        .map_err(|_| SiteError::UnsupportedSite(site_name.to_string()))?;
    Ok(create_for(site, document, url, fetcher))
}
