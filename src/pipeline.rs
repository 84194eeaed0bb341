//! Sequential scrape pipeline: enumerate, fetch each item, aggregate.
//!
//! [`CatalogScraper::run`] never fails. A listing failure yields an empty
//! catalog and a per-item failure skips that identifier; both are recorded in
//! the returned [`ScrapeReport`] instead of being swallowed.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::archive::{ArchiveClient, CollectionListing, FetchError};
use crate::catalog::{Catalog, CategoryStats, ItemRecord};
use crate::config::ScraperConfig;
use crate::throttle::{FixedDelay, Throttle};

/// Result of processing one identifier.
#[derive(Debug)]
pub enum ItemOutcome {
    /// Record with a download link; goes into the catalog.
    Cataloged(ItemRecord),
    /// Metadata fetched but no supported archive file was listed.
    NoDownload(ItemRecord),
    /// The metadata request failed.
    Failed(FetchError),
}

/// A per-item failure kept for the run report.
#[derive(Debug)]
pub struct ItemFailure {
    /// Identifier whose metadata could not be fetched.
    pub identifier: String,
    /// What went wrong.
    pub error: FetchError,
}

/// Everything a run produced.
#[derive(Debug)]
pub struct ScrapeReport {
    /// The catalog to write.
    pub catalog: Catalog,
    /// Number of identifiers listed for the collection.
    pub enumerated: usize,
    /// Whether the listing stopped short of the reported collection size.
    pub listing_truncated: bool,
    /// Why the listing failed, if it did.
    pub enumeration_error: Option<FetchError>,
    /// Identifiers whose metadata request failed.
    pub failures: Vec<ItemFailure>,
    /// Identifiers dropped for lacking a supported download file.
    pub skipped_no_download: Vec<String>,
}

impl ScrapeReport {
    /// Number of cataloged items.
    #[must_use]
    pub fn cataloged(&self) -> usize {
        self.catalog.total_items()
    }

    /// Number of failed metadata requests.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Per-category counts over the catalog.
    #[must_use]
    pub fn category_stats(&self) -> CategoryStats {
        self.catalog.category_stats()
    }
}

/// Drives one full scrape of a collection.
pub struct CatalogScraper {
    client: ArchiveClient,
    throttle: Arc<dyn Throttle>,
}

impl std::fmt::Debug for CatalogScraper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogScraper")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl CatalogScraper {
    /// Creates a scraper that pauses `config.request_delay` after each item.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: ScraperConfig) -> Result<Self, FetchError> {
        let throttle = Arc::new(FixedDelay::new(config.request_delay));
        let client = ArchiveClient::new(config)?;
        Ok(Self::with_throttle(client, throttle))
    }

    /// Creates a scraper with an explicit pause policy.
    #[must_use]
    pub fn with_throttle(client: ArchiveClient, throttle: Arc<dyn Throttle>) -> Self {
        Self { client, throttle }
    }

    /// The underlying API client.
    #[must_use]
    pub fn client(&self) -> &ArchiveClient {
        &self.client
    }

    /// Fetches one identifier and classifies the result.
    pub async fn process_item(&self, identifier: &str) -> ItemOutcome {
        match self.client.fetch_item(identifier).await {
            Ok(record) if record.has_download() => ItemOutcome::Cataloged(record),
            Ok(record) => ItemOutcome::NoDownload(record),
            Err(error) => ItemOutcome::Failed(error),
        }
    }

    /// Runs the whole pipeline and returns the report. The catalog is not
    /// written here.
    #[instrument(skip(self), fields(collection = %self.client.config().collection))]
    pub async fn run(&self) -> ScrapeReport {
        info!("Listing collection items");
        let (listing, enumeration_error) = match self.client.list_collection().await {
            Ok(listing) => (listing, None),
            Err(error) => {
                warn!(error = %error, kind = error.kind(), "Failed to list collection items");
                (CollectionListing::default(), Some(error))
            }
        };
        let listing_truncated = listing.is_truncated();
        let identifiers = listing.into_identifiers();
        let total = identifiers.len();

        let mut records = Vec::with_capacity(total);
        let mut failures = Vec::new();
        let mut skipped_no_download = Vec::new();

        for (index, identifier) in identifiers.into_iter().enumerate() {
            info!(identifier = %identifier, "Processing {}/{}", index + 1, total);

            match self.process_item(&identifier).await {
                ItemOutcome::Cataloged(record) => records.push(record),
                ItemOutcome::NoDownload(_) => {
                    info!(identifier = %identifier, "No downloadable archive file; skipping");
                    skipped_no_download.push(identifier);
                }
                ItemOutcome::Failed(error) => {
                    warn!(
                        identifier = %identifier,
                        error = %error,
                        kind = error.kind(),
                        "Failed to fetch item details"
                    );
                    failures.push(ItemFailure { identifier, error });
                }
            }

            self.throttle.pause().await;
        }

        let catalog = Catalog::from_records(records, Utc::now());
        info!(
            cataloged = catalog.total_items(),
            skipped = skipped_no_download.len(),
            failed = failures.len(),
            enumerated = total,
            "Scrape complete"
        );

        ScrapeReport {
            catalog,
            enumerated: total,
            listing_truncated,
            enumeration_error,
            failures,
            skipped_no_download,
        }
    }
}
