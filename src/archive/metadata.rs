//! Item metadata fetch (`/metadata/<identifier>`).

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::catalog::ItemRecord;

use super::{ArchiveClient, FetchError, parse_url};

// ==================== Metadata API Response Types ====================

/// Top-level metadata API response.
///
/// Every field is optional: the archive answers `{}` for unknown identifiers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemMetadataResponse {
    #[serde(default)]
    metadata: Option<ItemMetadata>,
    #[serde(default)]
    files: Option<Vec<ItemFile>>,
}

impl ItemMetadataResponse {
    /// The `metadata` object, or an empty one.
    #[must_use]
    pub fn metadata(&self) -> ItemMetadata {
        self.metadata.clone().unwrap_or_default()
    }

    /// The `files` list in archive order.
    #[must_use]
    pub fn files(&self) -> &[ItemFile] {
        self.files.as_deref().unwrap_or(&[])
    }
}

/// The `metadata` object of an item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemMetadata {
    #[serde(default)]
    title: Value,
    /// Subjects, normalized from a string or a list.
    #[serde(default)]
    pub subject: StringList,
    /// Keywords, normalized from a string or a list.
    #[serde(default)]
    pub keywords: StringList,
}

impl ItemMetadata {
    /// Display title: a string verbatim, the first string of a list, else empty.
    #[must_use]
    pub fn title(&self) -> String {
        match &self.title {
            Value::String(s) => s.clone(),
            Value::Array(values) => values
                .iter()
                .find_map(|v| v.as_str().map(str::to_string))
                .unwrap_or_default(),
            _ => String::new(),
        }
    }
}

/// One entry of the `files` list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFile {
    #[serde(default)]
    name: Option<String>,
}

impl ItemFile {
    /// File name relative to the item, empty when absent.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// A metadata field the archive sends as either one string or a list.
///
/// A single string becomes a one-element list, `null` becomes empty, and
/// non-string list entries keep their JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct StringList(Vec<String>);

impl StringList {
    /// Entries in archive order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Value> for StringList {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self(Vec::new()),
            Value::String(s) => Self(vec![s]),
            Value::Array(values) => Self(values.into_iter().map(value_text).collect()),
            other => Self(vec![other.to_string()]),
        }
    }
}

impl From<Vec<String>> for StringList {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

// ==================== Fetch ====================

impl ArchiveClient {
    /// Fetches the raw metadata document for `identifier`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on network, timeout, HTTP-status or decode failure.
    pub async fn fetch_metadata(&self, identifier: &str) -> Result<ItemMetadataResponse, FetchError> {
        let url = parse_url(&self.config.metadata_url(identifier))?;
        self.get_json(url).await
    }

    /// Fetches `identifier` and derives its catalog record.
    ///
    /// The record's `download_url` is `None` when no file has a supported
    /// archive extension.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the metadata request fails.
    #[instrument(skip(self), fields(identifier = %identifier))]
    pub async fn fetch_item(&self, identifier: &str) -> Result<ItemRecord, FetchError> {
        let response = self.fetch_metadata(identifier).await?;
        let record = ItemRecord::from_metadata(&self.config, identifier, &response);
        debug!(
            category = %record.category,
            tags = record.tags.len(),
            has_download = record.download_url.is_some(),
            "Derived item record"
        );
        Ok(record)
    }
}
