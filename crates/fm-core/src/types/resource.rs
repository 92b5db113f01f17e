//! Resource records produced from scanner output lines.
//!
//! A [`ResourceRecord`] is created once per accepted line, after the base URL
//! has been applied, and is never mutated afterwards. The classifier wraps it
//! in a [`ClassifiedResource`].

use serde::{Deserialize, Serialize};

use super::tag::ClassificationTag;

/// One discovered resource: a root-relative path with its size and status.
///
/// # Path Shape
///
/// - Starts with `/` once a base URL is known (the full URL otherwise).
/// - Ends with `/` if and only if [`is_dir`](Self::is_dir) is set.
///
/// # Examples
///
/// ```
/// use fm_core::ResourceRecord;
///
/// let record = ResourceRecord::new("/app/Config.php", Some(256), 200, false);
/// assert_eq!(record.lower_key(), "/app/config.php");
/// assert_eq!(record.file_name('/'), "Config.php");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Root-relative path (or verbatim URL in degraded mode).
    pub path: String,

    /// Content length reported by the scanner, if any.
    pub size_bytes: Option<u64>,

    /// HTTP status code reported by the scanner.
    pub status_code: u16,

    /// Whether the scanner marked this resource as a directory.
    pub is_dir: bool,
}

impl ResourceRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(path: impl Into<String>, size_bytes: Option<u64>, status_code: u16, is_dir: bool) -> Self {
        Self {
            path: path.into(),
            size_bytes,
            status_code,
            is_dir,
        }
    }

    /// Returns the case-insensitive identity of this record.
    #[must_use]
    pub fn lower_key(&self) -> String {
        self.path.to_lowercase()
    }

    /// Returns `true` if the path is written entirely in upper case.
    ///
    /// At least one cased character must be present and none may be lower
    /// case, so `/` or `/123` are not upper case.
    ///
    /// # Examples
    ///
    /// ```
    /// use fm_core::ResourceRecord;
    ///
    /// assert!(ResourceRecord::new("/APP/CONFIG.PHP", None, 200, false).is_fully_uppercase());
    /// assert!(!ResourceRecord::new("/app/Config.php", None, 200, false).is_fully_uppercase());
    /// assert!(!ResourceRecord::new("/2024/", None, 200, true).is_fully_uppercase());
    /// ```
    #[must_use]
    pub fn is_fully_uppercase(&self) -> bool {
        let mut cased = false;
        for c in self.path.chars() {
            if c.is_lowercase() {
                return false;
            }
            if c.is_uppercase() {
                cased = true;
            }
        }
        cased
    }

    /// Returns the final non-empty path segment.
    ///
    /// For directories this is the directory name without its trailing
    /// separator. The root path yields an empty string.
    #[must_use]
    pub fn file_name(&self, separator: char) -> &str {
        self.path
            .trim_end_matches(separator)
            .rsplit(separator)
            .next()
            .unwrap_or_default()
    }

    /// Returns the non-empty path segments in order.
    pub fn segments(&self, separator: char) -> impl Iterator<Item = &str> {
        self.path.split(separator).filter(|s| !s.is_empty())
    }
}

/// A resource paired with the tag the classifier assigned to it.
///
/// Serializes flat: the record's fields plus a `tag` field (`null` when the
/// resource matched no rule).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassifiedResource {
    /// The underlying record.
    #[serde(flatten)]
    pub record: ResourceRecord,

    /// The first matching classification, if any.
    pub tag: Option<ClassificationTag>,
}

impl ClassifiedResource {
    /// Returns `true` if the resource carries a classification.
    #[inline]
    #[must_use]
    pub const fn is_interesting(&self) -> bool {
        self.tag.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_key() {
        let record = ResourceRecord::new("/Admin/Login.PHP", None, 200, false);
        assert_eq!(record.lower_key(), "/admin/login.php");
    }

    #[test]
    fn test_is_fully_uppercase() {
        assert!(ResourceRecord::new("/ADMIN/", None, 200, true).is_fully_uppercase());
        assert!(ResourceRecord::new("/A-1_B.TXT", None, 200, false).is_fully_uppercase());
        assert!(!ResourceRecord::new("/Admin/", None, 200, true).is_fully_uppercase());
        assert!(!ResourceRecord::new("/", None, 200, true).is_fully_uppercase());
    }

    #[test]
    fn test_file_name() {
        let file = ResourceRecord::new("/app/readme.txt", None, 200, false);
        assert_eq!(file.file_name('/'), "readme.txt");

        let dir = ResourceRecord::new("/app/assets/", None, 200, true);
        assert_eq!(dir.file_name('/'), "assets");

        let root = ResourceRecord::new("/", None, 200, true);
        assert_eq!(root.file_name('/'), "");
    }

    #[test]
    fn test_segments_skip_empty() {
        let record = ResourceRecord::new("/app//js/main.js", None, 200, false);
        let segments: Vec<_> = record.segments('/').collect();
        assert_eq!(segments, vec!["app", "js", "main.js"]);
    }

    #[test]
    fn test_classified_resource_serializes_flat() {
        let resource = ClassifiedResource {
            record: ResourceRecord::new("/backup.sql", Some(10), 200, false),
            tag: Some(ClassificationTag::Database),
        };
        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value["path"], "/backup.sql");
        assert_eq!(value["size_bytes"], 10);
        assert_eq!(value["tag"], "database");
        assert!(resource.is_interesting());
    }
}
