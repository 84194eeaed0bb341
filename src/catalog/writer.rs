//! Catalog JSON file output.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::{debug, instrument};

use super::Catalog;

/// Errors produced while writing the catalog file.
#[derive(Debug, Error)]
pub enum CatalogWriteError {
    /// I/O error creating or writing the output file.
    #[error("I/O error writing catalog to {path}: {source}")]
    Io {
        /// Destination path.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// JSON serialization error (shouldn't occur for well-formed records).
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CatalogWriteError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Writes `catalog` to `path` as indented UTF-8 JSON, replacing any existing file.
///
/// Missing parent directories are created. Non-ASCII text is written as-is.
/// A file left half-written by a serialization failure is removed.
///
/// # Errors
///
/// Returns [`CatalogWriteError`] on I/O or serialization failure.
#[instrument(skip(catalog), fields(path = %path.display(), items = catalog.total_items()))]
pub fn write_catalog(catalog: &Catalog, path: &Path) -> Result<(), CatalogWriteError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| CatalogWriteError::io(parent, e))?;
        debug!(dir = %parent.display(), "Created output directory");
    }

    let file = fs::File::create(path).map_err(|e| CatalogWriteError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    if let Err(err) = serde_json::to_writer_pretty(&mut writer, catalog) {
        drop(writer);
        // Best-effort cleanup so a truncated catalog is never left behind.
        let _ = fs::remove_file(path);
        return Err(err.into());
    }
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|e| CatalogWriteError::io(path, e))?;

    debug!("Catalog written");
    Ok(())
}
