//! Scraper configuration.
//!
//! [`ScraperConfig`] carries every endpoint root, limit and timing knob the
//! pipeline uses. It is passed explicitly to constructors so tests can point the
//! scraper at a mock server instead of the live archive.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::user_agent;

/// Default archive host.
pub const DEFAULT_BASE_URL: &str = "https://archive.org";

/// Default collection scraped when none is configured.
pub const DEFAULT_COLLECTION: &str = "psp-homebrew-library";

/// Rows requested per search page.
pub const DEFAULT_SEARCH_ROWS: u32 = 10_000;

/// Upper bound on search pages fetched for one collection.
pub const DEFAULT_MAX_SEARCH_PAGES: u32 = 10;

/// Per-request timeout applied to every API call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect timeout applied to every API call.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause after each metadata request.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

/// Default output file name.
pub const DEFAULT_OUTPUT_FILE: &str = "psp_homebrew_library.json";

/// Errors raised by [`ScraperConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The base URL is not an absolute http(s) URL.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The collection name is empty.
    #[error("collection name must not be empty")]
    EmptyCollection,

    /// A numeric limit that must be positive was zero.
    #[error("`{field}` must be greater than zero")]
    Zero {
        /// Name of the offending setting.
        field: &'static str,
    },
}

/// Explicit configuration for a scrape run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScraperConfig {
    /// Archive root, e.g. `https://archive.org`. No trailing slash.
    pub base_url: String,
    /// Collection queried with `collection:<name>`.
    pub collection: String,
    /// `rows` parameter of each search request.
    pub search_rows: u32,
    /// Maximum number of search pages requested.
    pub max_search_pages: u32,
    /// Whole-request timeout.
    pub request_timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Pause after each metadata request. Zero disables throttling.
    pub request_delay: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            search_rows: DEFAULT_SEARCH_ROWS,
            max_search_pages: DEFAULT_MAX_SEARCH_PAGES,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: user_agent::default_user_agent(),
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }
}

impl ScraperConfig {
    /// Default configuration rooted at `base_url` (used with mock servers).
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            ..Self::default()
        }
    }

    /// Checks that the configuration can drive a run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a malformed base URL, an empty collection,
    /// or a zero row/page/timeout limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        if self.collection.trim().is_empty() {
            return Err(ConfigError::EmptyCollection);
        }
        if self.search_rows == 0 {
            return Err(ConfigError::Zero {
                field: "search_rows",
            });
        }
        if self.max_search_pages == 0 {
            return Err(ConfigError::Zero {
                field: "max_search_pages",
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Zero {
                field: "request_timeout",
            });
        }
        Ok(())
    }

    /// `<base>/details/<identifier>`
    #[must_use]
    pub fn details_url(&self, identifier: &str) -> String {
        format!("{}/details/{}", self.base_url, urlencoding::encode(identifier))
    }

    pub(crate) fn search_url(&self) -> String {
        format!("{}/advancedsearch.php", self.base_url)
    }

    pub(crate) fn metadata_url(&self, identifier: &str) -> String {
        format!(
            "{}/metadata/{}",
            self.base_url,
            urlencoding::encode(identifier)
        )
    }

    pub(crate) fn download_url(&self, identifier: &str, file_name: &str) -> String {
        let encoded_name = file_name
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/download/{}/{encoded_name}",
            self.base_url,
            urlencoding::encode(identifier)
        )
    }
}

/// Strips trailing slashes so URL joins never produce `//`.
#[must_use]
pub fn normalize_base_url(base_url: String) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.len() == base_url.len() {
        base_url
    } else {
        trimmed.to_string()
    }
}
