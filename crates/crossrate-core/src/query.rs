//! Search query construction and redirect-notice handling.

use crossrate_config::SearchConfig;
use crossrate_models::{MovieInfo, SiteName};
use url::Url;

/// Paths a search engine uses for its "you are leaving" interstitial
const REDIRECT_NOTICE_PATHS: &[&str] = &["/url", "/interstitial"];
const REDIRECT_NOTICE_PARAMS: &[&str] = &["q", "url"];

/// A search engine that can jump straight to its first result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEngine {
    base_url: String,
    lucky_param: String,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl SearchEngine {
    pub fn new(base_url: impl Into<String>, lucky_param: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            lucky_param: lucky_param.into(),
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.base_url.trim(), config.lucky_param.trim())
    }

    /// `<base>?<lucky>=1&q=<percent-encoded query>`
    pub fn search_url(&self, info: &MovieInfo, target: SiteName) -> String {
        format!(
            "{}?{}=1&q={}",
            self.base_url,
            self.lucky_param,
            urlencoding::encode(&query_text(info, target))
        )
    }
}

/// `"{title} {year} site:{host}"`, the year left out when unknown
pub fn query_text(info: &MovieInfo, target: SiteName) -> String {
    match info.year() {
        Some(year) => format!("{} {} site:{}", info.title(), year, target.host()),
        None => format!("{} site:{}", info.title(), target.host()),
    }
}

/// Destination of a redirect-notice URL (`https://www.google.com/url?q=<dest>`),
/// or the URL itself when it is not one.
pub fn unwrap_redirect_notice(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };
    if !REDIRECT_NOTICE_PATHS.contains(&parsed.path()) {
        return url.to_string();
    }

    parsed
        .query_pairs()
        .find(|(key, value)| {
            REDIRECT_NOTICE_PARAMS.contains(&&**key)
                && (value.starts_with("http://") || value.starts_with("https://"))
        })
        .map(|(_, value)| value.into_owned())
        .unwrap_or_else(|| url.to_string())
}
