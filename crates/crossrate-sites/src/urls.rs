//! Movie page URL patterns and canonical forms.

use crossrate_models::SiteName;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static IMDB_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"imdb\.com/title/(tt\d+)").expect("imdb title pattern"));

static ROTTEN_MOVIE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"rottentomatoes\.com/m/([^/?&#]+)").expect("rotten movie pattern"));

/// Pattern identifying a movie page of `site` anywhere inside a URL string.
pub fn page_pattern(site: SiteName) -> &'static Regex {
    match site {
        SiteName::Imdb => &IMDB_TITLE,
        SiteName::RottenTomatoes => &ROTTEN_MOVIE,
    }
}

pub fn is_movie_page(site: SiteName, url: &str) -> bool {
    page_pattern(site).is_match(url)
}

/// Which site a movie page URL belongs to
pub fn site_for_url(url: &str) -> Option<SiteName> {
    SiteName::ALL.into_iter().find(|site| is_movie_page(*site, url))
}

/// Canonical movie page URL: `https://www.imdb.com/title/tt0111161/` or
/// `https://www.rottentomatoes.com/m/shawshank_redemption`. URLs that do not
/// match the site pattern only lose their query string and fragment.
pub fn canonical_url(site: SiteName, url: &str) -> String {
    if let Some(id) = page_pattern(site).captures(url).and_then(|c| c.get(1)) {
        return match site {
            SiteName::Imdb => format!("https://www.imdb.com/title/{}/", id.as_str()),
            SiteName::RottenTomatoes => format!("https://www.rottentomatoes.com/m/{}", id.as_str()),
        };
    }
    strip_query(url)
}

pub fn strip_query(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or(url)
            .to_string(),
    }
}
