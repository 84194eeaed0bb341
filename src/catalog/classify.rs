//! Category and tag derivation from item subjects and keywords.

use std::collections::{BTreeSet, HashSet};

/// Known categories, highest priority first.
pub const CATEGORY_PRIORITY: [&str; 8] = [
    "Games",
    "Emulators",
    "Applications",
    "Utilities",
    "Media",
    "Demos",
    "Plugins",
    "Themes",
];

/// Category used when an item has no subjects at all.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Classifies an item from its subjects.
///
/// Categories are tried in [`CATEGORY_PRIORITY`] order; for each, every subject
/// is checked for a case-insensitive substring match. The first hit wins, so a
/// higher-priority category matched by a later subject still beats a
/// lower-priority one matched by an earlier subject. Without a match the first
/// subject is returned verbatim, and without subjects [`UNKNOWN_CATEGORY`].
#[must_use]
pub fn extract_category(subjects: &[String]) -> String {
    let lowered: Vec<String> = subjects.iter().map(|s| s.to_lowercase()).collect();

    for category in CATEGORY_PRIORITY {
        let needle = category.to_lowercase();
        if lowered.iter().any(|subject| subject.contains(&needle)) {
            return category.to_string();
        }
    }

    subjects
        .first()
        .cloned()
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string())
}

/// Unions subjects and keywords into a trimmed, deduplicated tag set.
///
/// Tags are compared case-insensitively after trimming; the first spelling
/// seen is the one kept.
#[must_use]
pub fn extract_tags(subjects: &[String], keywords: &[String]) -> BTreeSet<String> {
    let mut seen = HashSet::new();
    subjects
        .iter()
        .chain(keywords)
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty() && seen.insert(tag.to_lowercase()))
        .map(str::to_string)
        .collect()
}
