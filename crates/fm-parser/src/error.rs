//! Error types for the fm-parser crate.
//!
//! Two kinds of failure live here:
//!
//! - [`ParseError`]: the parser itself could not be built. Fatal.
//! - [`LineRejection`]: a single line was skipped. Never fatal; the caller
//!   counts it and moves on.

/// Errors that can occur while constructing a [`LineParser`](crate::LineParser).
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A built-in pattern failed to compile.
    #[error("failed to compile line pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The accepted status code set is empty, so every line would be rejected.
    #[error("no accepted status codes configured")]
    NoAcceptedStatus,
}

/// Why a scanner output line did not produce a resource.
///
/// # Examples
///
/// ```
/// use fm_parser::LineRejection;
///
/// let reason = LineRejection::StatusNotAccepted(404);
/// assert_eq!(reason.kind(), "status_not_accepted");
/// assert!(reason.to_string().contains("404"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum LineRejection {
    /// The line is empty or whitespace only.
    #[error("blank line")]
    Blank,

    /// No `http://` or `https://` URL was found.
    #[error("no URL found")]
    NoUrl,

    /// No three-digit status token was found.
    #[error("no status code found")]
    NoStatus,

    /// The status code is not in the accepted set.
    #[error("status code {0} is not accepted")]
    StatusNotAccepted(u16),
}

impl LineRejection {
    /// Returns a stable machine name for statistics keys.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::NoUrl => "no_url",
            Self::NoStatus => "no_status",
            Self::StatusNotAccepted(_) => "status_not_accepted",
        }
    }
}
