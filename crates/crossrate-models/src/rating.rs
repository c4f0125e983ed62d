use serde::{Deserialize, Serialize};
use std::fmt;
use crate::ModelError;

/// A rating category (critic or user) as shown on one site.
///
/// `score` and `count` are either both present or both absent; a rating
/// without a count cannot be constructed. `custom` is an opaque site-specific
/// decoration: a color code, an icon URL, or a state token such as
/// `certified-fresh`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRatings")]
pub struct Ratings {
    score: Option<f64>,
    count: Option<u64>,
    custom: String,
}

#[derive(Deserialize)]
struct RawRatings {
    score: Option<f64>,
    count: Option<u64>,
    #[serde(default)]
    custom: String,
}

impl TryFrom<RawRatings> for Ratings {
    type Error = ModelError;

    fn try_from(raw: RawRatings) -> Result<Self, Self::Error> {
        match (raw.score, raw.count) {
            (Some(score), Some(count)) => Ok(Ratings::rated(score, count, raw.custom)),
            (None, None) => Ok(Ratings::not_yet_rated(raw.custom)),
            (score, count) => Err(ModelError::PartialRating { score, count }),
        }
    }
}

impl Ratings {
    pub fn rated(score: f64, count: u64, custom: impl Into<String>) -> Self {
        Self {
            score: Some(score),
            count: Some(count),
            custom: custom.into(),
        }
    }

    /// Placeholder variant: the category exists but has no score yet
    pub fn not_yet_rated(custom: impl Into<String>) -> Self {
        Self {
            score: None,
            count: None,
            custom: custom.into(),
        }
    }

    /// Build from optional parts, rejecting the partial state
    pub fn from_parts(
        score: Option<f64>,
        count: Option<u64>,
        custom: impl Into<String>,
    ) -> Result<Self, ModelError> {
        RawRatings {
            score,
            count,
            custom: custom.into(),
        }
        .try_into()
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn count(&self) -> Option<u64> {
        self.count
    }

    pub fn custom(&self) -> &str {
        &self.custom
    }

    pub fn is_rated(&self) -> bool {
        self.score.is_some()
    }
}

/// Metascore favorability band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Favorability {
    Favorable,
    Mixed,
    Unfavorable,
    Tbd,
}

impl Favorability {
    pub const ALL: [Favorability; 4] = [
        Favorability::Favorable,
        Favorability::Mixed,
        Favorability::Unfavorable,
        Favorability::Tbd,
    ];

    /// Band a critic score: >= 61 favorable, 41..=60 mixed, <= 40 unfavorable.
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => Favorability::Tbd,
            Some(s) if s >= 61.0 => Favorability::Favorable,
            Some(s) if s >= 41.0 => Favorability::Mixed,
            Some(_) => Favorability::Unfavorable,
        }
    }

    /// Recognize a band from an IMDb class list token like `score_mixed`
    pub fn from_css_class(class: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|band| band.css_class() == class)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Favorability::Favorable => "favorable",
            Favorability::Mixed => "mixed",
            Favorability::Unfavorable => "unfavorable",
            Favorability::Tbd => "tbd",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Favorability::Favorable => "score_favorable",
            Favorability::Mixed => "score_mixed",
            Favorability::Unfavorable => "score_unfavorable",
            Favorability::Tbd => "score_tbd",
        }
    }

    /// Color used when the site stylesheet cannot be consulted
    pub fn default_color(&self) -> &'static str {
        match self {
            Favorability::Favorable => "#54A72A",
            Favorability::Mixed => "#FFCC33",
            Favorability::Unfavorable => "#FF0000",
            Favorability::Tbd => "#CCCCCC",
        }
    }
}

impl fmt::Display for Favorability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
