//! Download file selection by extension preference.

use crate::archive::ItemFile;

/// Extension that always wins when present.
pub const PREFERRED_EXTENSION: &str = ".zip";

/// Extensions accepted when no `.zip` exists. They share one rank: the first
/// file in list order carrying any of them is chosen.
pub const FALLBACK_EXTENSIONS: [&str; 3] = [".rar", ".7z", ".pbp"];

/// Picks the file to link as the item's download.
///
/// First pass: the first file whose name ends in [`PREFERRED_EXTENSION`]
/// (case-insensitive). Second pass: the first file ending in any of
/// [`FALLBACK_EXTENSIONS`]. Returns the file name, or `None` if nothing matches.
#[must_use]
pub fn select_download_file(files: &[ItemFile]) -> Option<&str> {
    let names = || files.iter().map(ItemFile::name);

    names()
        .find(|name| has_extension(name, &[PREFERRED_EXTENSION]))
        .or_else(|| names().find(|name| has_extension(name, &FALLBACK_EXTENSIONS)))
}

fn has_extension(name: &str, extensions: &[&str]) -> bool {
    let lowered = name.to_lowercase();
    extensions.iter().any(|ext| lowered.ends_with(ext))
}
