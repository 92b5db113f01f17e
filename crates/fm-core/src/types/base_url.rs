//! The detected (or configured) origin of a scan.

use serde::{Deserialize, Serialize};

/// The `scheme://host[:port]` shared by the scanned URLs.
///
/// [`BaseUrl::Unknown`] is the degraded mode: no origin could be determined,
/// so URLs are kept verbatim instead of being reduced to paths.
///
/// # Examples
///
/// ```
/// use fm_core::BaseUrl;
///
/// let base = BaseUrl::Detected("http://h".to_owned());
/// assert_eq!(base.to_string(), "http://h");
/// assert_eq!(BaseUrl::Unknown.to_string(), "unknown");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "origin")]
pub enum BaseUrl {
    /// An origin inferred from the URLs, or supplied explicitly.
    Detected(String),

    /// No origin could be determined.
    #[default]
    Unknown,
}

impl BaseUrl {
    /// Returns the origin string, if known.
    #[inline]
    #[must_use]
    pub fn as_origin(&self) -> Option<&str> {
        match self {
            Self::Detected(origin) => Some(origin),
            Self::Unknown => None,
        }
    }

    /// Returns `true` for the degraded mode.
    #[inline]
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Joins a root-relative path onto the origin.
    ///
    /// In degraded mode the path is already a full URL and is returned as-is.
    ///
    /// # Examples
    ///
    /// ```
    /// use fm_core::BaseUrl;
    ///
    /// let base = BaseUrl::Detected("https://example.com".to_owned());
    /// assert_eq!(base.join("/admin/"), "https://example.com/admin/");
    /// assert_eq!(BaseUrl::Unknown.join("https://x/y"), "https://x/y");
    /// ```
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        match self {
            Self::Detected(origin) => format!("{origin}{path}"),
            Self::Unknown => path.to_owned(),
        }
    }
}

impl std::fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Detected(origin) => f.write_str(origin),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}
