use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use url::Url;
use crate::paths::PathManager;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Outbound HTTP settings shared by every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

/// Search engine used to find the other site's page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_base_url")]
    pub base_url: String,
    /// Query parameter that asks the engine to redirect to its first hit
    #[serde(default = "default_lucky_param")]
    pub lucky_param: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// BCP-47 tag used to format counts; falls back to the environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("http.timeout_secs must be greater than zero")]
    ZeroTimeout,
    #[error("http.user_agent must not be empty")]
    EmptyUserAgent,
    #[error("search.base_url must be an absolute http(s) URL without a query, got '{0}'")]
    InvalidSearchUrl(String),
    #[error("search.lucky_param must not be empty")]
    EmptyLuckyParam,
    #[error("display.locale '{0}' is not a language tag")]
    InvalidLocale(String),
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

fn default_search_base_url() -> String {
    "https://www.google.com/search".to_string()
}

fn default_lucky_param() -> String {
    "btnI".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            accept_language: default_accept_language(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_base_url(),
            lucky_param: default_lucky_param(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load `path` (or the default config file) if it exists, otherwise defaults
    pub fn load_or_default(path: Option<&PathBuf>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path.clone(),
            None => PathManager::default().config_file(),
        };
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout.into());
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyUserAgent.into());
        }

        // The search query is appended, so the base carries none of its own
        let search_url_ok = Url::parse(self.search.base_url.trim())
            .map(|url| {
                matches!(url.scheme(), "http" | "https")
                    && url.host_str().is_some_and(|host| !host.is_empty())
                    && url.query().is_none()
                    && url.fragment().is_none()
            })
            .unwrap_or(false);
        if !search_url_ok {
            return Err(ConfigError::InvalidSearchUrl(self.search.base_url.clone()).into());
        }
        if self.search.lucky_param.trim().is_empty() {
            return Err(ConfigError::EmptyLuckyParam.into());
        }

        if let Some(locale) = &self.display.locale {
            let language = locale.split(['-', '_', '.']).next().unwrap_or_default();
            if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ConfigError::InvalidLocale(locale.clone()).into());
            }
        }

        Ok(())
    }
}
