//! Homebrew catalog library
//!
//! Builds a JSON catalog of downloadable homebrew from an archive.org
//! collection: list the collection's identifiers through the search API, fetch
//! each item's metadata, derive a normalized record, and keep the items that
//! ship a supported archive file.
//!
//! # Architecture
//!
//! - [`config`] - Explicit endpoint roots, limits and timings
//! - [`archive`] - Search and metadata API client
//! - [`catalog`] - Item records, classification, output envelope and writer
//! - [`throttle`] - Pause policy between metadata requests
//! - [`pipeline`] - Sequential enumerate → fetch → aggregate driver

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod catalog;
pub mod config;
pub mod pipeline;
#[cfg(test)]
pub mod test_support;
pub mod throttle;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use archive::{ArchiveClient, CollectionListing, FetchError, ItemMetadataResponse};
pub use catalog::{
    Catalog, CatalogWriteError, CategoryStats, ItemRecord, extract_category, extract_tags,
    select_download_file, write_catalog,
};
pub use config::{ConfigError, DEFAULT_OUTPUT_FILE, ScraperConfig};
pub use pipeline::{CatalogScraper, ItemFailure, ItemOutcome, ScrapeReport};
pub use throttle::{FixedDelay, Throttle};
