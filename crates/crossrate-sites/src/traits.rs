use async_trait::async_trait;
use crossrate_models::{MovieInfo, MovieInfoWithRatings, SiteName};
use crate::dom::Document;
use crate::numbers::DisplayLocale;
use crate::SiteError;

#[async_trait]
pub trait SiteAdapter: Send + Sync {
    // Page metadata
    fn site(&self) -> SiteName;

    /// Canonical page URL
    fn url(&self) -> &str;

    fn document(&self) -> &Document;

    // Extraction
    /// Identity of the movie on this page. Fails with `NotAMovie` when the
    /// structured data describes something else.
    async fn movie_info(&self) -> Result<MovieInfo, SiteError>;

    /// Identity plus every rating category the page exposes, including the
    /// ones that need supplementary fetches.
    async fn movie_info_with_ratings(&self) -> Result<MovieInfoWithRatings, SiteError>;

    // Injection
    /// Render ratings from the other site into this page. Blocks already
    /// present (by fixed ID) are left untouched.
    fn inject_ratings(
        &mut self,
        ratings: &MovieInfoWithRatings,
        locale: &DisplayLocale,
    ) -> Result<InjectionSummary, SiteError>;
}

/// Which fixed-ID blocks an injection added and which it left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectionSummary {
    pub inserted: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
    /// Anchor containers that had to be created first
    pub synthesized: Vec<&'static str>,
}

impl InjectionSummary {
    pub fn is_noop(&self) -> bool {
        self.inserted.is_empty()
    }
}
