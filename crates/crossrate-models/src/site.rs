use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::ModelError;

/// The two movie sites ratings are cross-linked between.
///
/// Serialized as the page name used on the wire (`"imdb"`, `"rotten"`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SiteName {
    #[serde(rename = "imdb")]
    Imdb,
    #[serde(rename = "rotten", alias = "rottentomatoes")]
    RottenTomatoes,
}

impl SiteName {
    pub const ALL: [SiteName; 2] = [SiteName::Imdb, SiteName::RottenTomatoes];

    /// Page name token identifying the site in requests and results
    pub fn page_name(&self) -> &'static str {
        match self {
            SiteName::Imdb => "imdb",
            SiteName::RottenTomatoes => "rotten",
        }
    }

    /// Host used in search restrictions (`site:<host>`)
    pub fn host(&self) -> &'static str {
        match self {
            SiteName::Imdb => "imdb.com",
            SiteName::RottenTomatoes => "rottentomatoes.com",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SiteName::Imdb => "IMDb",
            SiteName::RottenTomatoes => "Rotten Tomatoes",
        }
    }

    /// The site a page on `self` pulls its missing ratings from
    pub fn other(&self) -> SiteName {
        match self {
            SiteName::Imdb => SiteName::RottenTomatoes,
            SiteName::RottenTomatoes => SiteName::Imdb,
        }
    }
}

impl fmt::Display for SiteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.page_name())
    }
}

impl FromStr for SiteName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "imdb" => Ok(SiteName::Imdb),
            "rotten" | "rottentomatoes" => Ok(SiteName::RottenTomatoes),
            _ => Err(ModelError::UnknownSite(s.to_string())),
        }
    }
}
