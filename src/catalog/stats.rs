//! Per-category counts over cataloged records.

use std::collections::HashMap;
use std::fmt;

use super::ItemRecord;

/// Category counts sorted by descending count; ties keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryStats {
    entries: Vec<(String, usize)>,
}

impl CategoryStats {
    /// Tallies categories over `records`.
    #[must_use]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ItemRecord>) -> Self {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut entries: Vec<(String, usize)> = Vec::new();

        for record in records {
            match positions.get(record.category.as_str()) {
                Some(&index) => entries[index].1 += 1,
                None => {
                    positions.insert(&record.category, entries.len());
                    entries.push((record.category.clone(), 1));
                }
            }
        }

        // Stable sort keeps first-seen order among equal counts.
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Self { entries }
    }

    /// `(category, count)` pairs, most common first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Count for `category`, zero if absent.
    #[must_use]
    pub fn count(&self, category: &str) -> usize {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map_or(0, |(_, count)| *count)
    }

    /// Number of distinct categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no records were tallied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for CategoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, count) in self.iter() {
            writeln!(f, "  {name}: {count}")?;
        }
        Ok(())
    }
}
