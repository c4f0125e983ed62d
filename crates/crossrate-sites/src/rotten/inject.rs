//! IMDb rating and Metascore rendered next to the Rotten Tomatoes scoreboard.

use crossrate_models::{Favorability, MovieInfoWithRatings};
use tracing::debug;
use crate::dom::{by_id, by_tag, Document, Element};
use crate::numbers::DisplayLocale;
use crate::templates::{count_label, source_link, span, NOT_AVAILABLE, NO_COUNT};
use crate::traits::InjectionSummary;
use crate::SiteError;

pub const CONTAINER_ID: &str = "mv-imdb-scores";
pub const IMDB_RATING_ID: &str = "mv-imdb-rating";
pub const METASCORE_ID: &str = "mv-metascore";

const SCORE_BOARD: &str = "score-board";
const TOPLIST_URL: &str = "https://www.imdb.com/chart/top";

pub fn inject(
    document: &mut Document,
    url: &str,
    data: &MovieInfoWithRatings,
    locale: &DisplayLocale,
) -> Result<InjectionSummary, SiteError> {
    let mut summary = InjectionSummary::default();

    if !document.contains_id(CONTAINER_ID) {
        synthesize_container(document, url)?;
        summary.synthesized.push(CONTAINER_ID);
    }

    let blocks = [
        (IMDB_RATING_ID, imdb_rating(data, locale)),
        (METASCORE_ID, metascore(data, locale)),
    ];
    for (id, block) in blocks {
        if document.contains_id(id) {
            summary.skipped.push(id);
        } else if document.append_to(by_id(CONTAINER_ID), block) {
            summary.inserted.push(id);
        } else {
            return Err(SiteError::malformed(url, format!("#{} vanished during injection", CONTAINER_ID)));
        }
    }

    debug!(url = %url, ?summary, "Injected IMDb ratings");
    Ok(summary)
}

fn synthesize_container(document: &mut Document, url: &str) -> Result<(), SiteError> {
    let container = Element::new("section")
        .with_id(CONTAINER_ID)
        .with_class("mv-imdb-scores")
        .with_class("panel-rt");
    if document.insert_after(by_tag(SCORE_BOARD), container) {
        Ok(())
    } else {
        Err(SiteError::malformed(url, "no score-board to place IMDb scores after"))
    }
}

fn imdb_rating(data: &MovieInfoWithRatings, locale: &DisplayLocale) -> Element {
    let ratings = data.user_ratings();
    let (score, count) = match ratings.and_then(|r| r.score().map(|s| (s, r.count()))) {
        Some((score, count)) => (locale.format_score(score, 1), count_label(count, "rating", locale)),
        None => (NOT_AVAILABLE.to_string(), NO_COUNT.to_string()),
    };

    let mut link = source_link(data.url(), "IMDb rating");
    if let Some(logo) = ratings.map(|r| r.custom()).filter(|c| !c.is_empty()) {
        link = link.with_child(
            Element::new("img")
                .with_class("mv-imdb-rating__logo")
                .with_attr("src", logo)
                .with_attr("alt", "IMDb"),
        );
    }
    link = link
        .with_child(span("mv-imdb-rating__score", score))
        .with_child(span("mv-imdb-rating__scale", "/10"));

    let mut block = Element::new("div")
        .with_id(IMDB_RATING_ID)
        .with_class("mv-imdb-rating")
        .with_child(link)
        .with_child(span("mv-imdb-rating__count", count));

    if let Some(position) = data.toplist_position() {
        block = block.with_child(
            source_link(TOPLIST_URL, "IMDb Top Rated Movies")
                .with_class("mv-imdb-rating__toplist")
                .with_text(format!("Top Rated #{}", position)),
        );
    }
    block
}

fn metascore(data: &MovieInfoWithRatings, locale: &DisplayLocale) -> Element {
    let ratings = data.critic_ratings();
    let score = ratings.and_then(|r| r.score());
    let band = Favorability::from_score(score);
    let color = ratings
        .map(|r| r.custom())
        .filter(|c| c.starts_with('#') || c.starts_with("rgb"))
        .unwrap_or(band.default_color());

    let (score_text, count) = match score {
        Some(score) => (
            format!("{}", score.round()),
            count_label(ratings.and_then(|r| r.count()), "critic review", locale),
        ),
        None => (NOT_AVAILABLE.to_string(), NO_COUNT.to_string()),
    };

    Element::new("div")
        .with_id(METASCORE_ID)
        .with_class("mv-metascore")
        .with_child(
            source_link(&critic_reviews_url(data.url()), "Metascore").with_child(
                span("mv-metascore__score", score_text)
                    .with_class(band.css_class())
                    .with_attr("style", format!("background-color: {}", color)),
            ),
        )
        .with_child(span("mv-metascore__label", "Metascore"))
        .with_child(span("mv-metascore__count", count))
}

fn critic_reviews_url(title_url: &str) -> String {
    if title_url.ends_with('/') {
        format!("{}criticreviews", title_url)
    } else {
        format!("{}/criticreviews", title_url)
    }
}
