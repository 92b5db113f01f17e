//! Base URL detection and URL-to-path reduction.
//!
//! A scan usually targets a single origin, but scanner output can contain
//! links to other hosts (redirect targets, absolute links picked up by the
//! extractor). The detector picks the origin most URLs share:
//!
//! 1. One distinct origin: that origin.
//! 2. Several: the one with the most URLs, ties going to the lexicographically
//!    smallest origin.
//! 3. None: [`BaseUrl::Unknown`], and URLs are kept verbatim downstream.

use fm_core::{BaseUrl, FxHashMap, fx_hash_map};
use tracing::{debug, warn};

/// Result of a base URL vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// The winning origin, or `Unknown` if no URL had a usable origin.
    pub base: BaseUrl,
    /// Number of distinct origins seen.
    pub distinct_origins: usize,
    /// Number of URLs that voted for the winner.
    pub supporting_urls: usize,
}

/// Extracts the lower-cased `scheme://host[:port]` of an HTTP(S) URL.
///
/// User info (`user:pass@`) is dropped. Returns `None` for other schemes
/// and for URLs with an empty host.
///
/// # Examples
///
/// ```
/// use fm_parser::origin_of;
///
/// assert_eq!(origin_of("HTTP://Example.com:8080/a?b"), Some("http://example.com:8080".to_owned()));
/// assert_eq!(origin_of("https://user@h/x"), Some("https://h".to_owned()));
/// assert_eq!(origin_of("http:///x"), None);
/// assert_eq!(origin_of("ftp://h/x"), None);
/// ```
#[must_use]
pub fn origin_of(url: &str) -> Option<String> {
    let (scheme, _, host) = split_url(url)?;
    Some(format!("{scheme}://{host}"))
}

/// Splits a URL into lower-cased scheme, the remainder after the authority,
/// and the lower-cased host.
fn split_url(url: &str) -> Option<(String, &str, String)> {
    let (scheme, rest) = url.split_once("://")?;
    let scheme = scheme.to_ascii_lowercase();
    if scheme != "http" && scheme != "https" {
        return None;
    }

    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (authority, remainder) = rest.split_at(end);
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    if host.is_empty() {
        return None;
    }

    Some((scheme, remainder, host.to_lowercase()))
}

/// Votes for the base URL across `urls`.
///
/// Emits a warning when the vote is ambiguous (several origins) or empty.
///
/// # Examples
///
/// ```
/// use fm_core::BaseUrl;
/// use fm_parser::detect_base_url;
///
/// let detection = detect_base_url(["http://h/a", "http://h/b", "http://cdn/x"]);
/// assert_eq!(detection.base, BaseUrl::Detected("http://h".to_owned()));
/// assert_eq!(detection.distinct_origins, 2);
/// assert_eq!(detection.supporting_urls, 2);
/// ```
pub fn detect_base_url<'a, I>(urls: I) -> Detection
where
    I: IntoIterator<Item = &'a str>,
{
    let mut votes: FxHashMap<String, usize> = fx_hash_map();
    for url in urls {
        if let Some(origin) = origin_of(url) {
            *votes.entry(origin).or_insert(0) += 1;
        }
    }

    let distinct_origins = votes.len();
    // Highest count wins; on equal counts the smaller origin compares greater.
    let winner = votes
        .into_iter()
        .max_by(|(a_origin, a_count), (b_origin, b_count)| {
            a_count.cmp(b_count).then_with(|| b_origin.cmp(a_origin))
        });

    match winner {
        Some((origin, supporting_urls)) => {
            if distinct_origins > 1 {
                warn!(
                    base_url = %origin,
                    distinct_origins,
                    supporting_urls,
                    "Multiple origins in input, using the most common one"
                );
            } else {
                debug!(base_url = %origin, "Detected base URL");
            }
            Detection {
                base: BaseUrl::Detected(origin),
                distinct_origins,
                supporting_urls,
            }
        }
        None => {
            warn!("Could not detect a base URL, keeping URLs verbatim");
            Detection {
                base: BaseUrl::Unknown,
                distinct_origins: 0,
                supporting_urls: 0,
            }
        }
    }
}

/// Normalizes an explicitly configured base URL to its origin.
///
/// Any path on the configured value is ignored.
///
/// # Examples
///
/// ```
/// use fm_core::BaseUrl;
/// use fm_parser::configured_base_url;
///
/// assert_eq!(
///     configured_base_url("https://Target.local/app/"),
///     Some(BaseUrl::Detected("https://target.local".to_owned()))
/// );
/// assert_eq!(configured_base_url("not a url"), None);
/// ```
#[must_use]
pub fn configured_base_url(value: &str) -> Option<BaseUrl> {
    origin_of(value).map(BaseUrl::Detected)
}

/// A URL reduced against the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduced {
    /// Root-relative path, or the verbatim URL in degraded mode.
    pub path: String,
    /// `true` if the URL belongs to a different origin than the base.
    pub foreign: bool,
}

/// Reduces `url` to its root-relative path.
///
/// The URL is expected to be query- and fragment-free (the line parser strips
/// both). URLs from another origin are reduced the same way and flagged as
/// foreign. In degraded mode URLs come back unchanged.
///
/// # Examples
///
/// ```
/// use fm_core::BaseUrl;
/// use fm_parser::reduce_url;
///
/// let base = BaseUrl::Detected("http://h".to_owned());
/// assert_eq!(reduce_url("http://H/app/x.php", &base).path, "/app/x.php");
/// assert_eq!(reduce_url("http://h", &base).path, "/");
///
/// let foreign = reduce_url("http://other/x", &base);
/// assert_eq!(foreign.path, "/x");
/// assert!(foreign.foreign);
/// ```
#[must_use]
pub fn reduce_url(url: &str, base: &BaseUrl) -> Reduced {
    let Some(base_origin) = base.as_origin() else {
        return Reduced {
            path: url.to_owned(),
            foreign: false,
        };
    };

    match split_url(url) {
        Some((scheme, remainder, host)) => Reduced {
            path: root_relative(remainder),
            foreign: format!("{scheme}://{host}") != base_origin,
        },
        None => Reduced {
            path: root_relative(authority_remainder(url)),
            foreign: true,
        },
    }
}

/// Everything after the authority, for URLs `split_url` cannot read.
fn authority_remainder(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    rest.find('/').map_or("", |idx| &rest[idx..])
}

fn root_relative(remainder: &str) -> String {
    if remainder.starts_with('/') {
        remainder.to_owned()
    } else {
        format!("/{remainder}")
    }
}
