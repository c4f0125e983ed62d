use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};
use crossrate_models::{Favorability, MovieInfo, MovieInfoWithRatings, Ratings, SiteName};
use crate::dom::Document;
use crate::fetch::Fetcher;
use crate::imdb::{inject, parser};
use crate::numbers::DisplayLocale;
use crate::traits::{InjectionSummary, SiteAdapter};
use crate::urls::canonical_url;
use crate::SiteError;

/// Decoration stored with IMDb user ratings
pub const STAR_LOGO_URL: &str = "https://m.media-amazon.com/images/G/01/imdb/images/logos/imdb_fb_logo.png";

/// Adapter for an IMDb title page (`/title/tt…/`).
pub struct ImdbAdapter {
    document: Document,
    url: String,
    fetcher: Arc<dyn Fetcher>,
}

impl ImdbAdapter {
    pub fn new(document: Document, url: &str, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            document,
            url: canonical_url(SiteName::Imdb, url),
            fetcher,
        }
    }

    fn critic_reviews_url(&self) -> String {
        format!("{}criticreviews", self.url)
    }

    async fn critic_review_count(&self) -> Result<u64, SiteError> {
        let reviews_url = self.critic_reviews_url();
        let page = self.fetcher.fetch(&reviews_url).await?;
        parser::parse_critic_review_count(&page.body)
            .ok_or_else(|| SiteError::malformed(&reviews_url, "no critic review count"))
    }

    /// Color the site's own stylesheets give the Metascore band. A sheet
    /// that fails to load is skipped; the error is returned only when no
    /// sheet defines the band.
    async fn band_color(&self, stylesheets: &[String], band: Favorability) -> Result<String, SiteError> {
        let mut last_error = None;
        for href in stylesheets {
            let sheet = match self.fetcher.fetch(href).await {
                Ok(sheet) => sheet,
                Err(e) => {
                    warn!(stylesheet = %href, error = %e, "Skipping stylesheet");
                    last_error = Some(e);
                    continue;
                }
            };
            if let Some(color) = parser::extract_band_color(&sheet.body, band) {
                debug!(stylesheet = %href, band = %band, color = %color, "Found Metascore color");
                return Ok(color);
            }
        }
        Err(last_error.unwrap_or_else(|| {
            SiteError::malformed(&self.url, format!("no stylesheet defines .{}", band.css_class()))
        }))
    }
}

#[async_trait]
impl SiteAdapter for ImdbAdapter {
    fn site(&self) -> SiteName {
        SiteName::Imdb
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
        let page = parser::parse_title_page(&self.document.to_html(), &self.url)?;

        let user_ratings = match (page.user_score, page.user_count) {
            (Some(score), Some(count)) => Some(Ratings::rated(score, count, STAR_LOGO_URL)),
            (None, None) => None,
            (score, count) => {
                return Err(SiteError::malformed(
                    &self.url,
                    format!("user rating without its count (score {:?}, count {:?})", score, count),
                ))
            }
        };

        let critic_ratings = match page.metascore {
            Some(metascore) => {
                let (count, color) = futures::join!(
                    self.critic_review_count(),
                    self.band_color(&page.stylesheets, metascore.band)
                );
                let color = color.unwrap_or_else(|e| {
                    warn!(url = %self.url, error = %e, "Using default Metascore color");
                    metascore.band.default_color().to_string()
                });
                Some(Ratings::rated(metascore.score, count?, color))
            }
            None => None,
        };

        info!(
            url = %self.url,
            title = %page.info.title(),
            has_user = user_ratings.is_some(),
            has_critic = critic_ratings.is_some(),
            "Extracted IMDb ratings"
        );

        Ok(MovieInfoWithRatings::new(page.info, self.url.clone(), SiteName::Imdb)
            .with_toplist_position(page.toplist_position)
            .with_user_ratings(user_ratings)
            .with_critic_ratings(critic_ratings))
    }

    fn inject_ratings(
        &mut self,
        ratings: &MovieInfoWithRatings,
        locale: &DisplayLocale,
    ) -> Result<InjectionSummary, SiteError> {
        inject::inject(&mut self.document, &self.url, ratings, locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;
    use crate::imdb::inject::{AUDIENCE_SCORE_ID, TOMATOMETER_ID};
    use crossrate_models::Summary;

    const SHAWSHANK: &str = include_str!("../../tests/fixtures/imdb_shawshank.html");
    const CRITIC_REVIEWS: &str = include_str!("../../tests/fixtures/imdb_shawshank_criticreviews.html");
    const STYLESHEET: &str = include_str!("../../tests/fixtures/imdb_title.css");
    const UPCOMING: &str = include_str!("../../tests/fixtures/imdb_upcoming.html");
    const SERIES: &str = include_str!("../../tests/fixtures/imdb_series.html");

    const URL: &str = "https://www.imdb.com/title/tt0111161/?ref_=fn_al_tt_1";
    const CSS_URL: &str = "https://m.media-amazon.com/images/S/imdb-title-main.css";

    fn full_fetcher() -> Arc<MemoryFetcher> {
        Arc::new(
            MemoryFetcher::new()
                .with_page("https://www.imdb.com/title/tt0111161/criticreviews", CRITIC_REVIEWS)
                .with_page(CSS_URL, STYLESHEET),
        )
    }

    fn adapter(html: &str, url: &str, fetcher: Arc<MemoryFetcher>) -> ImdbAdapter {
        ImdbAdapter::new(Document::parse(html), url, fetcher)
    }

    fn rotten_data() -> MovieInfoWithRatings {
        let info = MovieInfo::new("The Shawshank Redemption", Some(1994), Some("Frank Darabont".to_string())).unwrap();
        MovieInfoWithRatings::new(info, "https://www.rottentomatoes.com/m/shawshank_redemption", SiteName::RottenTomatoes)
            .with_critic_ratings(Some(Ratings::rated(91.0, 77, "certified-fresh")))
            .with_user_ratings(Some(Ratings::rated(98.0, 250_000, "upright")))
            .with_summary(Some(Summary {
                title: "Critics Consensus".to_string(),
                content: "Uplifting.".to_string(),
            }))
    }

    #[test]
    fn test_url_is_canonical() {
        let adapter = adapter(SHAWSHANK, URL, full_fetcher());
        assert_eq!(adapter.url(), "https://www.imdb.com/title/tt0111161/");
        assert_eq!(adapter.site(), SiteName::Imdb);
    }

    #[tokio::test]
    async fn test_ratings_with_supplementary_fetches() {
        let fetcher = full_fetcher();
        let adapter = adapter(SHAWSHANK, URL, fetcher.clone());
        let data = adapter.movie_info_with_ratings().await.unwrap();

        assert_eq!(data.page_name(), SiteName::Imdb);
        assert_eq!(data.url(), "https://www.imdb.com/title/tt0111161/");
        assert_eq!(data.toplist_position(), Some(1));
        assert!(data.summary().is_none());

        let user = data.user_ratings().unwrap();
        assert_eq!(user.score(), Some(9.3));
        assert_eq!(user.count(), Some(2_912_345));
        assert_eq!(user.custom(), STAR_LOGO_URL);

        let critic = data.critic_ratings().unwrap();
        assert_eq!(critic.score(), Some(80.0));
        assert_eq!(critic.count(), Some(22));
        assert_eq!(critic.custom(), "#66CC33");

        let requests = fetcher.requests();
        assert!(requests.contains(&"https://www.imdb.com/title/tt0111161/criticreviews".to_string()));
        assert!(requests.contains(&CSS_URL.to_string()));
    }

    #[tokio::test]
    async fn test_stylesheet_failure_uses_default_color() {
        let fetcher = Arc::new(
            MemoryFetcher::new().with_page("https://www.imdb.com/title/tt0111161/criticreviews", CRITIC_REVIEWS),
        );
        let data = adapter(SHAWSHANK, URL, fetcher).movie_info_with_ratings().await.unwrap();
        assert_eq!(data.critic_ratings().unwrap().custom(), Favorability::Favorable.default_color());
    }

    #[tokio::test]
    async fn test_unreachable_stylesheet_is_skipped() {
        let html = SHAWSHANK.replacen(
            r#"<link rel="stylesheet""#,
            r#"<link rel="stylesheet" href="https://cdn.test/missing.css"><link rel="stylesheet""#,
            1,
        );
        let fetcher = full_fetcher();
        let data = adapter(&html, URL, fetcher.clone()).movie_info_with_ratings().await.unwrap();

        assert_eq!(data.critic_ratings().unwrap().custom(), "#66CC33");
        let requests = fetcher.requests();
        let missing = requests.iter().position(|r| r == "https://cdn.test/missing.css").unwrap();
        let found = requests.iter().position(|r| r == CSS_URL).unwrap();
        assert!(missing < found);
    }

    #[tokio::test]
    async fn test_critic_count_failure_is_transient() {
        let fetcher = Arc::new(MemoryFetcher::new().with_page(CSS_URL, STYLESHEET));
        let err = adapter(SHAWSHANK, URL, fetcher).movie_info_with_ratings().await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_unrated_movie_has_no_categories() {
        let fetcher = Arc::new(MemoryFetcher::new());
        let data = adapter(UPCOMING, "https://www.imdb.com/title/tt2837574/", fetcher.clone())
            .movie_info_with_ratings()
            .await
            .unwrap();
        assert!(data.user_ratings().is_none());
        assert!(data.critic_ratings().is_none());
        assert!(data.toplist_position().is_none());
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_series_page_is_not_a_movie() {
        let adapter = adapter(SERIES, "https://www.imdb.com/title/tt0944947/", Arc::new(MemoryFetcher::new()));
        assert!(matches!(adapter.movie_info().await, Err(SiteError::NotAMovie { .. })));
        assert!(matches!(adapter.movie_info_with_ratings().await, Err(SiteError::NotAMovie { .. })));
    }

    #[test]
    fn test_inject_into_existing_anchors() {
        let mut adapter = adapter(SHAWSHANK, URL, full_fetcher());
        let summary = adapter.inject_ratings(&rotten_data(), &DisplayLocale::default()).unwrap();
        assert_eq!(summary.inserted, vec![AUDIENCE_SCORE_ID, TOMATOMETER_ID]);
        assert!(summary.synthesized.is_empty());

        let document = adapter.document();
        let audience = document.find_by_id(AUDIENCE_SCORE_ID).unwrap();
        assert!(audience.text().contains("98%"));
        assert!(audience.text().contains("250,000 ratings"));

        let review_bar = document.find(crate::dom::by_class("titleReviewBar")).unwrap();
        let first = review_bar.child_elements().next().unwrap();
        assert_eq!(first.id(), Some(TOMATOMETER_ID));
        assert!(first.text().contains("91%"));
        assert!(first.text().contains("77 critic reviews"));
        assert_eq!(first.attr("title"), Some("Critics Consensus: Uplifting."));
    }

    #[test]
    fn test_inject_twice_is_idempotent() {
        let mut adapter = adapter(SHAWSHANK, URL, full_fetcher());
        adapter.inject_ratings(&rotten_data(), &DisplayLocale::default()).unwrap();
        let second = adapter.inject_ratings(&rotten_data(), &DisplayLocale::default()).unwrap();
        assert!(second.is_noop());
        assert_eq!(second.skipped, vec![AUDIENCE_SCORE_ID, TOMATOMETER_ID]);

        let html = adapter.document().to_html();
        assert_eq!(html.matches(&format!("id=\"{}\"", AUDIENCE_SCORE_ID)).count(), 1);
        assert_eq!(html.matches(&format!("id=\"{}\"", TOMATOMETER_ID)).count(), 1);
    }

    #[test]
    fn test_inject_synthesizes_missing_anchors() {
        let mut adapter = adapter(UPCOMING, "https://www.imdb.com/title/tt2837574/", Arc::new(MemoryFetcher::new()));
        let info = MovieInfo::new("The Old Man & the Gun", Some(2018), None).unwrap();
        let unrated = MovieInfoWithRatings::new(info, "https://www.rottentomatoes.com/m/the_old_man_and_the_gun", SiteName::RottenTomatoes);

        let summary = adapter.inject_ratings(&unrated, &DisplayLocale::default()).unwrap();
        assert_eq!(summary.synthesized, vec!["ratings_wrapper", "titleReviewBar"]);

        let document = adapter.document();
        let audience = document.find_by_id(AUDIENCE_SCORE_ID).unwrap();
        assert!(audience.text().contains("N/A"));
        assert!(audience.text().contains('-'));
        assert!(document.find_by_id(TOMATOMETER_ID).unwrap().text().contains("N/A"));
    }

    #[test]
    fn test_inject_formats_counts_for_locale() {
        let mut adapter = adapter(SHAWSHANK, URL, full_fetcher());
        let locale = DisplayLocale::parse("de-DE").unwrap();
        adapter.inject_ratings(&rotten_data(), &locale).unwrap();
        let audience = adapter.document().find_by_id(AUDIENCE_SCORE_ID).unwrap();
        assert!(audience.text().contains("250.000 ratings"));
    }

    #[test]
    fn test_inject_without_any_anchor_fails() {
        let html = r#"<html><body><p>Nothing here</p></body></html>"#;
        let mut adapter = adapter(html, URL, full_fetcher());
        let err = adapter.inject_ratings(&rotten_data(), &DisplayLocale::default()).unwrap_err();
        assert!(matches!(err, SiteError::MalformedPage { .. }));
    }

    #[test]
    fn test_failed_inject_leaves_page_untouched() {
        let html = r#"<html><body><div class="title_bar_wrapper"></div></body></html>"#;
        let mut adapter = adapter(html, URL, full_fetcher());
        let before = adapter.document().clone();

        let err = adapter.inject_ratings(&rotten_data(), &DisplayLocale::default()).unwrap_err();
        assert!(matches!(err, SiteError::MalformedPage { .. }));
        assert!(!adapter.document().contains_id(AUDIENCE_SCORE_ID));
        assert_eq!(adapter.document(), &before);
    }
}
