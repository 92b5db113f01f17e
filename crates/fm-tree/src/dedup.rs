//! Case-insensitive deduplication of resource records.
//!
//! Web servers on case-insensitive filesystems answer `/Config.php` and
//! `/config.php` alike, so scanners report both. Records collapse on their
//! lower-cased path with this tie-break:
//!
//! 1. A fully upper-case variant is kept over any other casing.
//! 2. Otherwise the last record encountered wins.
//!
//! Output order is the order in which each lower-cased path first appeared.

use std::collections::hash_map::Entry;

use fm_core::{FxHashMap, ResourceRecord, fx_hash_map_with_capacity};
use tracing::debug;

/// Output of [`deduplicate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deduplicated {
    /// One record per lower-cased path.
    pub records: Vec<ResourceRecord>,
    /// Number of records discarded.
    pub duplicates: usize,
}

/// Collapses records whose paths differ only by case.
///
/// # Examples
///
/// ```
/// use fm_core::ResourceRecord;
/// use fm_tree::deduplicate;
///
/// let result = deduplicate(vec![
///     ResourceRecord::new("/app/config.php", Some(512), 200, false),
///     ResourceRecord::new("/app/Config.php", Some(256), 200, false),
/// ]);
/// assert_eq!(result.duplicates, 1);
/// assert_eq!(result.records[0].path, "/app/Config.php");
/// assert_eq!(result.records[0].size_bytes, Some(256));
/// ```
pub fn deduplicate<I>(records: I) -> Deduplicated
where
    I: IntoIterator<Item = ResourceRecord>,
{
    let records = records.into_iter();
    let mut index: FxHashMap<String, usize> = fx_hash_map_with_capacity(records.size_hint().0);
    let mut kept: Vec<ResourceRecord> = Vec::with_capacity(records.size_hint().0);
    let mut duplicates = 0;

    for record in records {
        match index.entry(record.lower_key()) {
            Entry::Occupied(slot) => {
                duplicates += 1;
                let current = &mut kept[*slot.get()];
                if prefer_incoming(current, &record) {
                    debug!(kept = %record.path, dropped = %current.path, "Duplicate path");
                    *current = record;
                } else {
                    debug!(kept = %current.path, dropped = %record.path, "Duplicate path");
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(kept.len());
                kept.push(record);
            }
        }
    }

    Deduplicated {
        records: kept,
        duplicates,
    }
}

/// Returns `true` if `incoming` should replace `current`.
#[inline]
fn prefer_incoming(current: &ResourceRecord, incoming: &ResourceRecord) -> bool {
    incoming.is_fully_uppercase() || !current.is_fully_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, size: u64) -> ResourceRecord {
        ResourceRecord::new(path, Some(size), 200, path.ends_with('/'))
    }

    #[test]
    fn test_last_encountered_wins_without_uppercase() {
        let result = deduplicate(vec![
            record("/a/Readme.txt", 1),
            record("/a/README.txt", 2),
            record("/a/readme.TXT", 3),
        ]);
        assert_eq!(result.duplicates, 2);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].path, "/a/readme.TXT");
        assert_eq!(result.records[0].size_bytes, Some(3));
    }

    #[test]
    fn test_uppercase_variant_is_kept() {
        let result = deduplicate(vec![
            record("/ADMIN/", 1),
            record("/admin/", 2),
            record("/Admin/", 3),
        ]);
        assert_eq!(result.duplicates, 2);
        assert_eq!(result.records[0].path, "/ADMIN/");
        assert_eq!(result.records[0].size_bytes, Some(1));
    }

    #[test]
    fn test_uppercase_arriving_late_replaces() {
        let result = deduplicate(vec![record("/admin", 1), record("/ADMIN", 2)]);
        assert_eq!(result.records[0].path, "/ADMIN");
    }

    #[test]
    fn test_last_uppercase_wins_among_uppercase() {
        let result = deduplicate(vec![record("/A.TXT", 1), record("/a.txt", 2), record("/A.TXT", 3)]);
        assert_eq!(result.records[0].size_bytes, Some(3));
    }

    #[test]
    fn test_first_seen_order_preserved() {
        let result = deduplicate(vec![
            record("/b", 1),
            record("/a", 2),
            record("/B", 3),
            record("/c", 4),
        ]);
        let paths: Vec<_> = result.records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/B", "/a", "/c"]);
    }

    #[test]
    fn test_directory_and_file_are_distinct() {
        let result = deduplicate(vec![record("/app", 1), record("/app/", 2)]);
        assert_eq!(result.duplicates, 0);
        assert_eq!(result.records.len(), 2);
    }

    #[test]
    fn test_at_most_one_record_per_lower_path() {
        let inputs = [
            "/x/Y", "/X/y", "/x/y", "/X/Y", "/z", "/Z", "/q/", "/Q/", "/q/r", "/x/y/",
        ];
        let result = deduplicate(inputs.iter().map(|p| record(p, 0)));

        let mut seen = std::collections::HashSet::new();
        for r in &result.records {
            assert!(seen.insert(r.lower_key()), "duplicate key {}", r.path);
        }
        assert_eq!(result.records.len() + result.duplicates, inputs.len());

        // Fully upper-case variants survived wherever one existed
        let kept: Vec<_> = result.records.iter().map(|r| r.path.as_str()).collect();
        assert!(kept.contains(&"/X/Y"));
        assert!(kept.contains(&"/Z"));
        assert!(kept.contains(&"/Q/"));
    }
}
