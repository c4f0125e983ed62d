//! JSON-LD (`application/ld+json`) metadata shared by both sites.

use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;
use crossrate_models::MovieInfo;
use crate::SiteError;

static LD_JSON: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).expect("ld+json selector"));

/// Types that mark a page as something other than a movie
const NON_MOVIE_TYPES: &[&str] = &[
    "TVSeries",
    "TVSeason",
    "TVEpisode",
    "TVMiniSeries",
    "CreativeWorkSeries",
    "VideoGame",
    "VideoGameSeries",
    "PodcastSeries",
];

/// What the page's structured data says it describes.
#[derive(Debug, Clone, PartialEq)]
pub enum PageSubject {
    Movie(Value),
    /// A known non-movie type (`TVSeries`, ...), and no `Movie` object
    NotMovie(String),
    /// Only unrelated objects (breadcrumbs, organization) or none at all
    Unknown,
}

/// Every JSON-LD object carrying an `@type`, in document order, looking
/// through arrays and `@graph` containers. Blocks that fail to parse are
/// skipped.
pub fn typed_objects(html: &Html) -> Vec<Value> {
    let mut found = Vec::new();
    for script in html.select(&LD_JSON) {
        let text: String = script.text().collect();
        match serde_json::from_str::<Value>(text.trim()) {
            Ok(value) => collect_typed(value, &mut found),
            Err(e) => debug!(error = %e, "Skipping unparseable JSON-LD block"),
        }
    }
    found
}

fn collect_typed(value: Value, found: &mut Vec<Value>) {
    match value {
        Value::Array(items) => items.into_iter().for_each(|item| collect_typed(item, found)),
        Value::Object(mut map) => {
            let graph = map.remove("@graph");
            if map.contains_key("@type") {
                found.push(Value::Object(map));
            }
            if let Some(graph) = graph {
                collect_typed(graph, found);
            }
        }
        _ => {}
    }
}

/// All `@type` entries of a JSON-LD object
pub fn types_of(value: &Value) -> Vec<&str> {
    match value.get("@type") {
        Some(Value::String(kind)) => vec![kind.as_str()],
        Some(Value::Array(kinds)) => kinds.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

pub fn has_type(value: &Value, kind: &str) -> bool {
    types_of(value).contains(&kind)
}

/// A `Movie` object anywhere on the page wins over every other typed object.
pub fn page_subject(html: &Html) -> PageSubject {
    let (movies, others): (Vec<Value>, Vec<Value>) =
        typed_objects(html).into_iter().partition(|o| has_type(o, "Movie"));

    if let Some(movie) = movies.into_iter().next() {
        return PageSubject::Movie(movie);
    }

    others
        .iter()
        .flat_map(types_of)
        .find(|kind| NON_MOVIE_TYPES.contains(kind))
        .map(|kind| PageSubject::NotMovie(kind.to_string()))
        .unwrap_or(PageSubject::Unknown)
}

/// The page's `Movie` object, if it has one
pub fn movie_object(html: &Html) -> Option<Value> {
    match page_subject(html) {
        PageSubject::Movie(value) => Some(value),
        _ => None,
    }
}

pub fn string_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty())
}

/// Year from an ISO date (`1994-10-14`) or a bare year
pub fn year_from_date(date: &str) -> Option<u16> {
    let year = date.trim().get(..4)?;
    year.parse().ok().filter(|y| (1870..=2200).contains(y))
}

/// Name of the first director, given either as an object or a list
pub fn first_director(value: &Value) -> Option<String> {
    let director = match value.get("director")? {
        Value::Array(people) => people.first()?,
        other => other,
    };
    match director {
        Value::String(name) => Some(name.clone()),
        person => string_field(person, "name").map(str::to_string),
    }
}

/// Numbers in JSON-LD show up both as numbers and as strings
pub fn number_field(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => crate::numbers::parse_score(s),
        _ => None,
    }
}

pub fn count_field(value: &Value, key: &str) -> Option<u64> {
    match value.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => crate::numbers::parse_count(s),
        _ => None,
    }
}

/// Identity fields read from markup when JSON-LD lacks them.
#[derive(Debug, Default)]
pub struct MarkupIdentity {
    pub title: Option<String>,
    pub year: Option<u16>,
}

/// Build `MovieInfo` from the page's JSON-LD, rejecting anything that is
/// not a movie. `date_key` is the field holding the release date.
pub fn movie_info(
    html: &Html,
    url: &str,
    date_key: &str,
    fallback: MarkupIdentity,
) -> Result<MovieInfo, SiteError> {
    let data = match page_subject(html) {
        PageSubject::Movie(value) => Some(value),
        PageSubject::NotMovie(kind) => {
            return Err(SiteError::NotAMovie {
                url: url.to_string(),
                kind,
            })
        }
        PageSubject::Unknown => None,
    };

    let title = data
        .as_ref()
        .and_then(|d| string_field(d, "name"))
        .map(str::to_string)
        .or(fallback.title)
        .ok_or_else(|| SiteError::malformed(url, "no movie title in structured data or heading"))?;
    let year = data
        .as_ref()
        .and_then(|d| string_field(d, date_key))
        .and_then(year_from_date)
        .or(fallback.year);
    let director = data.as_ref().and_then(first_director);

    MovieInfo::new(decode_entities(&title), year, director)
        .map_err(|e| SiteError::malformed(url, e.to_string()))
}

/// JSON-LD strings on both sites carry HTML entities for a handful of
/// characters (`Old Man &amp; the Gun`).
pub fn decode_entities(text: &str) -> String {
    text.replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(ld: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><head><script type="application/ld+json">{}</script></head><body></body></html>"#,
            ld
        ))
    }

    #[test]
    fn test_movie_from_object_director() {
        let html = page(r#"{"@type":"Movie","name":"Heat","datePublished":"1995-12-15","director":{"@type":"Person","name":"Michael Mann"}}"#);
        let info = movie_info(&html, "u", "datePublished", MarkupIdentity::default()).unwrap();
        assert_eq!(info.title(), "Heat");
        assert_eq!(info.year(), Some(1995));
        assert_eq!(info.director(), Some("Michael Mann"));
    }

    #[test]
    fn test_movie_from_array_director_and_graph() {
        let html = page(r#"{"@context":"https://schema.org","@graph":[{"@type":"Movie","name":"The Old Man &amp; the Gun","dateCreated":"2018","director":[{"name":"David Lowery"},{"name":"Someone Else"}]}]}"#);
        let info = movie_info(&html, "u", "dateCreated", MarkupIdentity::default()).unwrap();
        assert_eq!(info.title(), "The Old Man & the Gun");
        assert_eq!(info.year(), Some(2018));
        assert_eq!(info.director(), Some("David Lowery"));
    }

    #[test]
    fn test_tv_series_is_not_a_movie() {
        let html = page(r#"{"@type":"TVSeries","name":"Game of Thrones"}"#);
        let err = movie_info(&html, "https://www.imdb.com/title/tt0944947/", "datePublished", MarkupIdentity::default())
            .unwrap_err();
        match err {
            SiteError::NotAMovie { kind, .. } => assert_eq!(kind, "TVSeries"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_movie_after_unrelated_blocks() {
        let html = Html::parse_document(concat!(
            r#"<html><head><script type="application/ld+json">{"@type":"BreadcrumbList","itemListElement":[]}</script>"#,
            r#"<script type="application/ld+json">[{"@type":"Organization","name":"Fandango"},{"@type":"WebSite","name":"Rotten Tomatoes"}]</script>"#,
            r#"<script type="application/ld+json">{"@type":"Movie","name":"Heat","dateCreated":"1995-12-15"}</script>"#,
            r#"</head><body></body></html>"#
        ));
        let info = movie_info(&html, "u", "dateCreated", MarkupIdentity::default()).unwrap();
        assert_eq!(info.title(), "Heat");
        assert_eq!(info.year(), Some(1995));
    }

    #[test]
    fn test_movie_in_graph_next_to_web_page() {
        let html = page(r#"{"@graph":[{"@type":"WebPage","name":"Heat (1995)"},{"@type":["Movie","CreativeWork"],"name":"Heat"}]}"#);
        assert!(matches!(page_subject(&html), PageSubject::Movie(ref v) if string_field(v, "name") == Some("Heat")));
    }

    #[test]
    fn test_unrelated_blocks_only_fall_back_to_markup() {
        let html = page(r#"{"@type":"BreadcrumbList","itemListElement":[]}"#);
        assert_eq!(page_subject(&html), PageSubject::Unknown);
        let fallback = MarkupIdentity {
            title: Some("Heat".to_string()),
            year: None,
        };
        assert_eq!(movie_info(&html, "u", "dateCreated", fallback).unwrap().title(), "Heat");
    }

    #[test]
    fn test_series_behind_breadcrumbs_is_not_a_movie() {
        let html = page(r#"[{"@type":"BreadcrumbList"},{"@type":"TVSeries","name":"Game of Thrones"}]"#);
        assert_eq!(page_subject(&html), PageSubject::NotMovie("TVSeries".to_string()));
    }

    #[test]
    fn test_fallback_title_without_json_ld() {
        let html = Html::parse_document("<html><body><h1>Heat</h1></body></html>");
        let fallback = MarkupIdentity {
            title: Some("Heat".to_string()),
            year: Some(1995),
        };
        let info = movie_info(&html, "u", "datePublished", fallback).unwrap();
        assert_eq!(info.title(), "Heat");
        assert_eq!(info.year(), Some(1995));
        assert_eq!(info.director(), None);
    }

    #[test]
    fn test_missing_title_is_malformed() {
        let html = Html::parse_document("<html><body></body></html>");
        let err = movie_info(&html, "u", "datePublished", MarkupIdentity::default()).unwrap_err();
        assert!(matches!(err, SiteError::MalformedPage { .. }));
    }

    #[test]
    fn test_numeric_fields_accept_strings() {
        let value = json!({"ratingValue": "9.3", "ratingCount": "2,912,345", "bestRating": 10});
        assert_eq!(number_field(&value, "ratingValue"), Some(9.3));
        assert_eq!(count_field(&value, "ratingCount"), Some(2_912_345));
        assert_eq!(number_field(&value, "bestRating"), Some(10.0));
        assert_eq!(count_field(&value, "missing"), None);
    }
}
