use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use crossrate_models::{MovieInfo, Ratings, Summary};
use crate::numbers::{parse_count, parse_score};
use crate::structured::{self, MarkupIdentity};
use crate::SiteError;

mod selectors {
    use super::*;

    fn parse(css: &str) -> Selector {
        Selector::parse(css).expect("static selector")
    }

    pub static SCORE_BOARD: LazyLock<Selector> = LazyLock::new(|| parse("score-board"));
    pub static TITLE: LazyLock<Selector> = LazyLock::new(|| parse(r#"score-board [slot="title"]"#));
    pub static INFO: LazyLock<Selector> = LazyLock::new(|| parse(r#"score-board [slot="info"]"#));
    pub static CRITICS_COUNT: LazyLock<Selector> = LazyLock::new(|| parse(r#"score-board [slot="critics-count"]"#));
    pub static AUDIENCE_COUNT: LazyLock<Selector> = LazyLock::new(|| parse(r#"score-board [slot="audience-count"]"#));
    pub static CONSENSUS: LazyLock<Selector> = LazyLock::new(|| parse(r#"[data-qa="critics-consensus"]"#));
}

pub const CONSENSUS_TITLE: &str = "Critics Consensus";

/// Scores and summary read from a movie page.
#[derive(Debug, Clone, PartialEq)]
pub struct MoviePage {
    pub info: MovieInfo,
    pub critic_ratings: Option<Ratings>,
    pub user_ratings: Option<Ratings>,
    pub summary: Option<Summary>,
}

/// One score category of the scoreboard
struct Category {
    score_attr: &'static str,
    state_attr: &'static str,
    count: &'static LazyLock<Selector>,
    fresh: &'static str,
    stale: &'static str,
}

static TOMATOMETER: Category = Category {
    score_attr: "tomatometerscore",
    state_attr: "tomatometerstate",
    count: &selectors::CRITICS_COUNT,
    fresh: "fresh",
    stale: "rotten",
};

static AUDIENCE: Category = Category {
    score_attr: "audiencescore",
    state_attr: "audiencestate",
    count: &selectors::AUDIENCE_COUNT,
    fresh: "upright",
    stale: "spilled",
};

pub fn parse_movie_info(html: &str, url: &str) -> Result<MovieInfo, SiteError> {
    let document = Html::parse_document(html);
    movie_info(&document, url)
}

fn movie_info(document: &Html, url: &str) -> Result<MovieInfo, SiteError> {
    let fallback = MarkupIdentity {
        title: first_text(document, &selectors::TITLE),
        year: first_text(document, &selectors::INFO).and_then(|info| structured::year_from_date(&info)),
    };
    structured::movie_info(document, url, "dateCreated", fallback)
}

pub fn parse_movie_page(html: &str, url: &str) -> Result<MoviePage, SiteError> {
    let document = Html::parse_document(html);
    let info = movie_info(&document, url)?;

    let board = document
        .select(&selectors::SCORE_BOARD)
        .next()
        .ok_or_else(|| SiteError::malformed(url, "no score-board element"))?;

    let critic_ratings = category(&document, board, &TOMATOMETER, url)?;
    let user_ratings = category(&document, board, &AUDIENCE, url)?;
    let summary = first_text(&document, &selectors::CONSENSUS).map(|content| Summary {
        title: CONSENSUS_TITLE.to_string(),
        content,
    });

    debug!(
        url = %url,
        critic = ?critic_ratings,
        user = ?user_ratings,
        has_consensus = summary.is_some(),
        "Parsed Rotten Tomatoes movie page"
    );

    Ok(MoviePage {
        info,
        critic_ratings,
        user_ratings,
        summary,
    })
}

/// An empty score attribute means the category is not rated yet.
fn category(
    document: &Html,
    board: ElementRef<'_>,
    category: &Category,
    url: &str,
) -> Result<Option<Ratings>, SiteError> {
    let Some(score) = board.value().attr(category.score_attr).and_then(parse_score) else {
        return Ok(None);
    };

    let count = first_text(document, category.count)
        .and_then(|text| parse_count(&text))
        .ok_or_else(|| SiteError::malformed(url, format!("{} present without a count", category.score_attr)))?;

    let state = board
        .value()
        .attr(category.state_attr)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(if score >= 60.0 { category.fresh } else { category.stale });

    Ok(Some(Ratings::rated(score, count, state)))
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(|e| e.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" "))
        .find(|text| !text.is_empty())
}
