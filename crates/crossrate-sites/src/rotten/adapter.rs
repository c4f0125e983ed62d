use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use crossrate_models::{MovieInfo, MovieInfoWithRatings, SiteName};
use crate::dom::Document;
use crate::fetch::Fetcher;
use crate::numbers::DisplayLocale;
use crate::rotten::{inject, parser};
use crate::traits::{InjectionSummary, SiteAdapter};
use crate::urls::canonical_url;
use crate::SiteError;

/// Adapter for a Rotten Tomatoes movie page (`/m/<slug>`).
pub struct RottenTomatoesAdapter {
    document: Document,
    url: String,
}

impl RottenTomatoesAdapter {
    /// Everything this adapter reports is on the page itself; the fetcher is
    /// accepted so both adapters share one constructor shape.
    pub fn new(document: Document, url: &str, _fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            document,
            url: canonical_url(SiteName::RottenTomatoes, url),
        }
    }
}

#[async_trait]
impl SiteAdapter for RottenTomatoesAdapter {
    fn site(&self) -> SiteName {
        SiteName::RottenTomatoes
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn document(&self) -> &Document {
        &self.document
    }

    async fn movie_info(&self) -> Result<MovieInfo, SiteError> {
        parser::parse_movie_info(&self.document.to_html(), &self.url)
    }

    async fn movie_info_with_ratings(&self) -> Result<MovieInfoWithRatings, SiteError> {
        let page = parser::parse_movie_page(&self.document.to_html(), &self.url)?;

        info!(
            url = %self.url,
            title = %page.info.title(),
            has_user = page.user_ratings.is_some(),
            has_critic = page.critic_ratings.is_some(),
            "Extracted Rotten Tomatoes ratings"
        );

        Ok(MovieInfoWithRatings::new(page.info, self.url.clone(), SiteName::RottenTomatoes)
            .with_summary(page.summary)
            .with_critic_ratings(page.critic_ratings)
            .with_user_ratings(page.user_ratings))
    }

    fn inject_ratings(
        &mut self,
        ratings: &MovieInfoWithRatings,
        locale: &DisplayLocale,
    ) -> Result<InjectionSummary, SiteError> {
        inject::inject(&mut self.document, &self.url, ratings, locale)
    }
}
