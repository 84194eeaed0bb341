//! Catalog records, the output envelope, and their derivation rules.
//!
//! - [`ItemRecord`] - One normalized archive item
//! - [`Catalog`] - The JSON envelope written at the end of a run
//! - [`CategoryStats`] - Per-category counts for the final report
//! - [`write_catalog`] - Indented UTF-8 JSON output

mod classify;
mod download;
mod stats;
mod writer;

pub use classify::{CATEGORY_PRIORITY, UNKNOWN_CATEGORY, extract_category, extract_tags};
pub use download::{FALLBACK_EXTENSIONS, PREFERRED_EXTENSION, select_download_file};
pub use stats::CategoryStats;
pub use writer::{CatalogWriteError, write_catalog};

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::archive::ItemMetadataResponse;
use crate::config::ScraperConfig;

/// `scraped_at` format: `YYYY-MM-DD HH:MM:SS UTC`.
pub const SCRAPED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// One archive item, normalized for the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Archive identifier.
    pub identifier: String,
    /// Display title, possibly empty.
    pub title: String,
    /// Category from [`extract_category`].
    pub category: String,
    /// Tags from [`extract_tags`].
    pub tags: BTreeSet<String>,
    /// Chosen download link; `None` keeps the record out of the catalog.
    pub download_url: Option<String>,
    /// Item details page.
    pub url: String,
}

impl ItemRecord {
    /// Derives a record from a metadata API response.
    #[must_use]
    pub fn from_metadata(
        config: &ScraperConfig,
        identifier: &str,
        response: &ItemMetadataResponse,
    ) -> Self {
        let metadata = response.metadata();
        let subjects = metadata.subject.as_slice();
        let keywords = metadata.keywords.as_slice();

        Self {
            identifier: identifier.to_string(),
            title: metadata.title(),
            category: extract_category(subjects),
            tags: extract_tags(subjects, keywords),
            download_url: select_download_file(response.files())
                .map(|name| config.download_url(identifier, name)),
            url: config.details_url(identifier),
        }
    }

    /// Whether a download link was resolved.
    #[must_use]
    pub fn has_download(&self) -> bool {
        self.download_url.is_some()
    }
}

/// The catalog envelope: item count, generation time, and downloadable items.
///
/// Built only through [`Catalog::from_records`], which drops records without a
/// download link, so `total_items` always equals `items.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    total_items: usize,
    scraped_at: String,
    items: Vec<ItemRecord>,
}

impl Catalog {
    /// Builds a catalog from records in enumeration order.
    #[must_use]
    pub fn from_records(
        records: impl IntoIterator<Item = ItemRecord>,
        scraped_at: DateTime<Utc>,
    ) -> Self {
        let items: Vec<ItemRecord> = records
            .into_iter()
            .filter(ItemRecord::has_download)
            .collect();
        Self {
            total_items: items.len(),
            scraped_at: scraped_at.format(SCRAPED_AT_FORMAT).to_string(),
            items,
        }
    }

    /// Number of cataloged items.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Generation timestamp as written to the file.
    #[must_use]
    pub fn scraped_at(&self) -> &str {
        &self.scraped_at
    }

    /// Cataloged items in enumeration order.
    #[must_use]
    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }

    /// Whether the catalog has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Per-category counts over the cataloged items.
    #[must_use]
    pub fn category_stats(&self) -> CategoryStats {
        CategoryStats::from_records(&self.items)
    }
}
