//! Rotten Tomatoes scores rendered into an IMDb title page.

use crossrate_models::{MovieInfoWithRatings, Ratings};
use tracing::debug;
use crate::dom::{by_class, Document, Element};
use crate::numbers::DisplayLocale;
use crate::templates::{count_label, source_link, span, NOT_AVAILABLE, NO_COUNT};
use crate::traits::InjectionSummary;
use crate::SiteError;

pub const AUDIENCE_SCORE_ID: &str = "mv-audience-score";
pub const TOMATOMETER_ID: &str = "mv-tomatometer";

const RATINGS_WRAPPER: &str = "ratings_wrapper";
const TITLE_BAR_WRAPPER: &str = "title_bar_wrapper";
const REVIEW_BAR: &str = "titleReviewBar";
const PLOT_SUMMARY_WRAPPER: &str = "plot_summary_wrapper";

/// Where a block goes: into an anchor the page already has, or into one
/// created for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Found,
    Synthesized,
}

/// Both anchors are resolved before the document is touched, so a failure
/// leaves the page as it was.
pub fn inject(
    document: &mut Document,
    url: &str,
    data: &MovieInfoWithRatings,
    locale: &DisplayLocale,
) -> Result<InjectionSummary, SiteError> {
    let mut summary = InjectionSummary::default();

    let audience_anchor = if document.contains_id(AUDIENCE_SCORE_ID) {
        summary.skipped.push(AUDIENCE_SCORE_ID);
        None
    } else {
        Some(ratings_wrapper_anchor(document, url)?)
    };
    let review_anchor = if document.contains_id(TOMATOMETER_ID) {
        summary.skipped.push(TOMATOMETER_ID);
        None
    } else {
        Some(review_bar_anchor(document, url)?)
    };

    if let Some(anchor) = audience_anchor {
        let block = audience_score(data, locale);
        match anchor {
            Anchor::Found => {
                document.append_to(by_class(RATINGS_WRAPPER), block);
            }
            Anchor::Synthesized => {
                synthesize_ratings_wrapper(document, block);
                summary.synthesized.push(RATINGS_WRAPPER);
            }
        }
        summary.inserted.push(AUDIENCE_SCORE_ID);
    }

    if let Some(anchor) = review_anchor {
        let block = tomatometer(data, locale);
        match anchor {
            Anchor::Found => {
                document.prepend_to(by_class(REVIEW_BAR), block);
            }
            Anchor::Synthesized => {
                synthesize_review_bar(document, block);
                summary.synthesized.push(REVIEW_BAR);
            }
        }
        summary.inserted.push(TOMATOMETER_ID);
    }

    debug!(url = %url, ?summary, "Injected Rotten Tomatoes ratings");
    Ok(summary)
}

fn ratings_wrapper_anchor(document: &Document, url: &str) -> Result<Anchor, SiteError> {
    if document.find(by_class(RATINGS_WRAPPER)).is_some() {
        Ok(Anchor::Found)
    } else if document.find(by_class(TITLE_BAR_WRAPPER)).is_some() {
        Ok(Anchor::Synthesized)
    } else {
        Err(SiteError::malformed(url, "no .ratings_wrapper or .title_bar_wrapper to hold the audience score"))
    }
}

fn review_bar_anchor(document: &Document, url: &str) -> Result<Anchor, SiteError> {
    if document.find(by_class(REVIEW_BAR)).is_some() {
        Ok(Anchor::Found)
    } else if document.find(by_class(PLOT_SUMMARY_WRAPPER)).is_some() {
        Ok(Anchor::Synthesized)
    } else {
        Err(SiteError::malformed(url, "no .titleReviewBar or .plot_summary_wrapper to hold the Tomatometer"))
    }
}

/// Unrated titles have no `.ratings_wrapper`; build one in the title bar.
fn synthesize_ratings_wrapper(document: &mut Document, block: Element) {
    let wrapper = Element::new("div")
        .with_class(RATINGS_WRAPPER)
        .with_class("mv-synthesized")
        .with_child(block);
    document.prepend_to(by_class(TITLE_BAR_WRAPPER), wrapper);
}

/// Titles without critic reviews have no `.titleReviewBar`; add one after
/// the plot summary.
fn synthesize_review_bar(document: &mut Document, block: Element) {
    let bar = Element::new("div")
        .with_class(REVIEW_BAR)
        .with_class("mv-synthesized")
        .with_child(block);
    document.insert_after(by_class(PLOT_SUMMARY_WRAPPER), bar);
}

fn rated(ratings: Option<&Ratings>) -> Option<(&Ratings, f64)> {
    ratings.and_then(|r| r.score().map(|score| (r, score)))
}

fn audience_score(data: &MovieInfoWithRatings, locale: &DisplayLocale) -> Element {
    let (state, score, count) = match rated(data.user_ratings()) {
        Some((ratings, score)) => (
            ratings.custom().to_string(),
            format!("{}%", score.round()),
            count_label(ratings.count(), "rating", locale),
        ),
        None => ("none".to_string(), NOT_AVAILABLE.to_string(), NO_COUNT.to_string()),
    };

    Element::new("div")
        .with_id(AUDIENCE_SCORE_ID)
        .with_class("mv-rating")
        .with_class(&format!("mv-audience--{}", state))
        .with_child(
            source_link(data.url(), "Audience Score on Rotten Tomatoes")
                .with_child(Element::new("span").with_class("mv-icon").with_class(&format!("mv-icon--{}", state)))
                .with_child(span("mv-rating__score", score)),
        )
        .with_child(span("mv-rating__label", "Audience Score"))
        .with_child(span("mv-rating__count", count))
}

fn tomatometer(data: &MovieInfoWithRatings, locale: &DisplayLocale) -> Element {
    let (state, score, count) = match rated(data.critic_ratings()) {
        Some((ratings, score)) => (
            ratings.custom().to_string(),
            format!("{}%", score.round()),
            count_label(ratings.count(), "critic review", locale),
        ),
        None => ("none".to_string(), NOT_AVAILABLE.to_string(), NO_COUNT.to_string()),
    };

    let mut block = Element::new("div")
        .with_id(TOMATOMETER_ID)
        .with_class("titleReviewBarItem")
        .with_class("mv-tomatometer")
        .with_child(
            source_link(data.url(), "Tomatometer on Rotten Tomatoes").with_child(
                Element::new("div")
                    .with_class("mv-tomatometer__score")
                    .with_class(&format!("mv-icon--{}", state))
                    .with_child(Element::new("span").with_text(score)),
            ),
        )
        .with_child(
            Element::new("div")
                .with_class("titleReviewBarSubItem")
                .with_child(Element::new("div").with_text("Tomatometer"))
                .with_child(Element::new("div").with_child(span("subText", count))),
        );

    if let Some(consensus) = data.summary() {
        block.set_attr("title", format!("{}: {}", consensus.title, consensus.content));
    }
    block
}
