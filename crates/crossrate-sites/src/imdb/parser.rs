use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;
use crossrate_models::{Favorability, MovieInfo};
use crate::numbers::{parse_count, parse_score};
use crate::structured::{self, MarkupIdentity};
use crate::SiteError;

mod selectors {
    use super::*;

    fn parse(css: &str) -> Selector {
        Selector::parse(css).expect("static selector")
    }

    pub static HEADING: LazyLock<Selector> = LazyLock::new(|| parse(".title_wrapper h1, h1"));
    pub static TITLE_YEAR: LazyLock<Selector> = LazyLock::new(|| parse("#titleYear a, #titleYear"));
    pub static RATING_VALUE: LazyLock<Selector> =
        LazyLock::new(|| parse(r#".ratings_wrapper [itemprop="ratingValue"]"#));
    pub static RATING_COUNT: LazyLock<Selector> =
        LazyLock::new(|| parse(r#".ratings_wrapper [itemprop="ratingCount"]"#));
    pub static METASCORE: LazyLock<Selector> = LazyLock::new(|| parse(".metacriticScore"));
    pub static TOPLIST: LazyLock<Selector> = LazyLock::new(|| parse(r#"a[href*="/chart/top"]"#));
    pub static STYLESHEETS: LazyLock<Selector> = LazyLock::new(|| parse(r#"link[rel="stylesheet"][href]"#));
    pub static CRITIC_COUNT: LazyLock<Selector> = LazyLock::new(|| parse(r#"[itemprop="ratingCount"]"#));
}

static TOPLIST_RANK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\s*(\d+)").expect("rank pattern"));

/// Everything the title page itself says about ratings.
#[derive(Debug, Clone, PartialEq)]
pub struct TitlePage {
    pub info: MovieInfo,
    pub user_score: Option<f64>,
    pub user_count: Option<u64>,
    pub metascore: Option<Metascore>,
    pub toplist_position: Option<u32>,
    /// Absolute stylesheet URLs, in document order
    pub stylesheets: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metascore {
    pub score: f64,
    pub band: Favorability,
}

pub fn parse_movie_info(html: &str, url: &str) -> Result<MovieInfo, SiteError> {
    let document = Html::parse_document(html);
    movie_info(&document, url)
}

fn movie_info(document: &Html, url: &str) -> Result<MovieInfo, SiteError> {
    let fallback = MarkupIdentity {
        title: document.select(&selectors::HEADING).next().and_then(heading_title),
        year: document
            .select(&selectors::TITLE_YEAR)
            .next()
            .and_then(|e| structured::year_from_date(text_of(e).trim_matches(|c| c == '(' || c == ')'))),
    };
    structured::movie_info(document, url, "datePublished", fallback)
}

/// Heading text without the nested year span
fn heading_title(heading: ElementRef<'_>) -> Option<String> {
    let title = heading.text().next()?.trim().to_string();
    (!title.is_empty()).then_some(title)
}

pub fn parse_title_page(html: &str, url: &str) -> Result<TitlePage, SiteError> {
    let document = Html::parse_document(html);
    let info = movie_info(&document, url)?;

    let aggregate = structured::movie_object(&document).and_then(|data| data.get("aggregateRating").cloned());
    let user_score = aggregate
        .as_ref()
        .and_then(|a| structured::number_field(a, "ratingValue"))
        .or_else(|| first_text(&document, &selectors::RATING_VALUE).and_then(|t| parse_score(&t)));
    let user_count = aggregate
        .as_ref()
        .and_then(|a| structured::count_field(a, "ratingCount"))
        .or_else(|| first_text(&document, &selectors::RATING_COUNT).and_then(|t| parse_count(&t)));

    let metascore = document.select(&selectors::METASCORE).next().and_then(|element| {
        let score = parse_score(&text_of(element))?;
        let band = element
            .value()
            .classes()
            .find_map(Favorability::from_css_class)
            .unwrap_or_else(|| Favorability::from_score(Some(score)));
        Some(Metascore { score, band })
    });

    let toplist_position = document.select(&selectors::TOPLIST).find_map(|link| {
        TOPLIST_RANK
            .captures(&text_of(link))
            .and_then(|caps| caps[1].parse().ok())
    });

    let base = Url::parse(url).ok();
    let stylesheets = document
        .select(&selectors::STYLESHEETS)
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| match &base {
            Some(base) => base.join(href).ok().map(|u| u.to_string()),
            None => Url::parse(href).ok().map(|u| u.to_string()),
        })
        .collect();

    debug!(
        url = %url,
        user_score = ?user_score,
        user_count = ?user_count,
        metascore = ?metascore,
        toplist_position = ?toplist_position,
        "Parsed IMDb title page"
    );

    Ok(TitlePage {
        info,
        user_score,
        user_count,
        metascore,
        toplist_position,
        stylesheets,
    })
}

/// Number of critic reviews behind the Metascore, from the `criticreviews` page
pub fn parse_critic_review_count(html: &str) -> Option<u64> {
    let document = Html::parse_document(html);
    first_text(&document, &selectors::CRITIC_COUNT).and_then(|t| parse_count(&t))
}

/// Background color the stylesheet assigns to a Metascore band class.
pub fn extract_band_color(css: &str, band: Favorability) -> Option<String> {
    let pattern = format!(
        r"\.{}\b[^{{}}]*\{{[^}}]*?background-color\s*:\s*([^;}}]+)",
        regex::escape(band.css_class())
    );
    let regex = Regex::new(&pattern).ok()?;
    regex.captures(css).map(|caps| {
        caps[1]
            .trim()
            .trim_end_matches("!important")
            .trim()
            .to_string()
    })
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(text_of)
        .find(|text| !text.trim().is_empty())
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
