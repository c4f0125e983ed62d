use serde::{Deserialize, Serialize};
use crate::{ModelError, Ratings, SiteName, TOPLIST_SIZE};

/// Identity of a movie as read from the page currently loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMovieInfo")]
pub struct MovieInfo {
    title: String,
    year: Option<u16>,
    director: Option<String>,
}

#[derive(Deserialize)]
struct RawMovieInfo {
    title: String,
    #[serde(default)]
    year: Option<u16>,
    #[serde(default)]
    director: Option<String>,
}

impl TryFrom<RawMovieInfo> for MovieInfo {
    type Error = ModelError;

    fn try_from(raw: RawMovieInfo) -> Result<Self, Self::Error> {
        MovieInfo::new(raw.title, raw.year, raw.director)
    }
}

impl MovieInfo {
    /// Title is trimmed; an empty title is rejected
    pub fn new(
        title: impl Into<String>,
        year: Option<u16>,
        director: Option<String>,
    ) -> Result<Self, ModelError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(ModelError::EmptyTitle);
        }
        let director = director
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        Ok(Self { title, year, director })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn year(&self) -> Option<u16> {
        self.year
    }

    pub fn director(&self) -> Option<&str> {
        self.director.as_deref()
    }
}

/// Short critical blurb (Rotten Tomatoes critics consensus).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub title: String,
    pub content: String,
}

/// Normalized cross-site result: everything one site knows about a movie.
///
/// `url` is canonical and `page_name` tells which site produced the data, so
/// the matching adapter can be looked up again when rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawMovieInfoWithRatings")]
pub struct MovieInfoWithRatings {
    info: MovieInfo,
    url: String,
    page_name: SiteName,
    toplist_position: Option<u16>,
    summary: Option<Summary>,
    critic_ratings: Option<Ratings>,
    user_ratings: Option<Ratings>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMovieInfoWithRatings {
    info: MovieInfo,
    url: String,
    page_name: SiteName,
    #[serde(default)]
    toplist_position: Option<u32>,
    #[serde(default)]
    summary: Option<Summary>,
    #[serde(default)]
    critic_ratings: Option<Ratings>,
    #[serde(default)]
    user_ratings: Option<Ratings>,
}

impl TryFrom<RawMovieInfoWithRatings> for MovieInfoWithRatings {
    type Error = ModelError;

    fn try_from(raw: RawMovieInfoWithRatings) -> Result<Self, Self::Error> {
        let toplist_position = raw.toplist_position.map(checked_toplist_position).transpose()?;
        Ok(Self {
            info: raw.info,
            url: raw.url,
            page_name: raw.page_name,
            toplist_position,
            summary: raw.summary,
            critic_ratings: raw.critic_ratings,
            user_ratings: raw.user_ratings,
        })
    }
}

fn checked_toplist_position(position: u32) -> Result<u16, ModelError> {
    u16::try_from(position)
        .ok()
        .filter(|p| (1..=TOPLIST_SIZE).contains(p))
        .ok_or(ModelError::ToplistOutOfRange(position))
}

impl MovieInfoWithRatings {
    pub fn new(info: MovieInfo, url: impl Into<String>, page_name: SiteName) -> Self {
        Self {
            info,
            url: url.into(),
            page_name,
            toplist_position: None,
            summary: None,
            critic_ratings: None,
            user_ratings: None,
        }
    }

    /// Positions outside the chart are dropped rather than stored
    pub fn with_toplist_position(mut self, position: Option<u32>) -> Self {
        self.toplist_position = position.and_then(|p| checked_toplist_position(p).ok());
        self
    }

    pub fn with_summary(mut self, summary: Option<Summary>) -> Self {
        self.summary = summary;
        self
    }

    pub fn with_critic_ratings(mut self, ratings: Option<Ratings>) -> Self {
        self.critic_ratings = ratings;
        self
    }

    pub fn with_user_ratings(mut self, ratings: Option<Ratings>) -> Self {
        self.user_ratings = ratings;
        self
    }

    pub fn info(&self) -> &MovieInfo {
        &self.info
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn page_name(&self) -> SiteName {
        self.page_name
    }

    pub fn toplist_position(&self) -> Option<u16> {
        self.toplist_position
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn critic_ratings(&self) -> Option<&Ratings> {
        self.critic_ratings.as_ref()
    }

    pub fn user_ratings(&self) -> Option<&Ratings> {
        self.user_ratings.as_ref()
    }
}
