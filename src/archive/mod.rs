//! Client for the archive's search and metadata APIs.
//!
//! # Architecture
//!
//! - [`ArchiveClient`] - Shared HTTP client plus the [`ScraperConfig`] it was built from
//! - [`ArchiveClient::list_collection`] - Collection enumeration via `advancedsearch.php`
//! - [`ArchiveClient::fetch_item`] - Per-item metadata fetch and record derivation
//! - [`FetchError`] - Typed failure for any single API call
//!
//! # Example
//!
//! ```no_run
//! use homebrew_catalog::{ArchiveClient, ScraperConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArchiveClient::new(ScraperConfig::default())?;
//! let listing = client.list_collection().await?;
//! for identifier in listing.identifiers() {
//!     let record = client.fetch_item(identifier).await?;
//!     println!("{} -> {:?}", record.identifier, record.download_url);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod http_client;
mod metadata;
mod search;

pub use error::FetchError;
pub use http_client::build_api_client;
pub use metadata::{ItemFile, ItemMetadata, ItemMetadataResponse, StringList};
pub use search::CollectionListing;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::ScraperConfig;

/// Archive API client shared across one scrape run.
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    client: Client,
    config: ScraperConfig,
}

impl ArchiveClient {
    /// Builds a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: ScraperConfig) -> Result<Self, FetchError> {
        let client = build_api_client(&config)?;
        Ok(Self { client, config })
    }

    /// Returns the configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// GETs `url` and decodes the JSON body, mapping every failure to [`FetchError`].
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let url_str = url.to_string();
        debug!(url = %url_str, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::network(&url_str, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url_str, status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::decode(&url_str, e))
    }
}

fn parse_url(raw: &str) -> Result<Url, FetchError> {
    Url::parse(raw).map_err(|_| FetchError::invalid_url(raw))
}
