use crossrate_models::SiteName;
use thiserror::Error;

/// Failures of extraction, resolution and injection.
#[derive(Debug, Error)]
pub enum SiteError {
    /// Structured metadata says the page is something other than a movie
    #[error("{url} is not a movie page (structured data type: {kind})")]
    NotAMovie { url: String, kind: String },

    #[error("unsupported site: {0}")]
    UnsupportedSite(String),

    #[error("no {site} page found in search results at {search_url}")]
    NoMatchFound { site: SiteName, search_url: String },

    /// Network failure, timeout or non-success status; never retried here
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// Expected markup is absent and the absence does not mean "not rated yet"
    #[error("malformed page {url}: {reason}")]
    MalformedPage { url: String, reason: String },
}

impl SiteError {
    pub fn fetch(url: impl Into<String>, message: impl ToString) -> Self {
        SiteError::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn malformed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        SiteError::MalformedPage {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Whether retrying the same request later could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, SiteError::Fetch { .. })
    }

    /// Stable identifier used in serialized error responses
    pub fn kind(&self) -> &'static str {
        match self {
            SiteError::NotAMovie { .. } => "notAMovie",
            SiteError::UnsupportedSite(_) => "unsupportedSite",
            SiteError::NoMatchFound { .. } => "noMatchFound",
            SiteError::Fetch { .. } => "transientFetch",
            SiteError::MalformedPage { .. } => "malformedPage",
        }
    }
}
