//! Parsing of individual scanner output lines.
//!
//! A typical feroxbuster line looks like:
//!
//! ```text
//! 200      GET     1234l      10w     512c http://h/app/config.php
//! 301      GET        9l      28w     310c http://h/app => http://h/app/
//! ```
//!
//! The parser takes the first HTTP(S) URL on the line, the first three-digit
//! token as the status code and the first `<digits>c` token as the content
//! length. Anything else on the line is ignored.

use fm_core::{BaseUrl, ParseConfig, ResourceRecord};
use regex::{Regex, RegexBuilder};

use crate::error::{LineRejection, ParseError};
use crate::origin::reduce_url;

/// Pattern for the first absolute HTTP(S) URL on a line.
const URL_PATTERN: &str = r"https?://\S+";

/// Token that introduces a redirect target in scanner output.
const REDIRECT_MARKER: &str = "=>";

/// A successfully parsed line, before the base URL is applied.
///
/// The URL has trailing punctuation, query string and fragment removed, and
/// carries exactly one trailing slash if and only if it is a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// Normalized absolute URL.
    pub url: String,
    /// Status code from the line.
    pub status_code: u16,
    /// Content length in bytes, if the line carried one.
    pub size_bytes: Option<u64>,
    /// Whether the scanner marked the resource as a directory.
    pub is_dir: bool,
}

/// A [`ParsedLine`] resolved against the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// The final record.
    pub record: ResourceRecord,
    /// `true` if the URL's origin differs from the base URL.
    pub foreign: bool,
}

impl ParsedLine {
    /// Reduces the URL to a root-relative path and builds the record.
    ///
    /// The origin root itself (`http://h` or `http://h/`) always becomes the
    /// directory `/`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fm_core::BaseUrl;
    /// use fm_parser::ParsedLine;
    ///
    /// let line = ParsedLine {
    ///     url: "http://h/app/".to_owned(),
    ///     status_code: 200,
    ///     size_bytes: None,
    ///     is_dir: true,
    /// };
    /// let resolved = line.resolve(&BaseUrl::Detected("http://h".to_owned()));
    /// assert_eq!(resolved.record.path, "/app/");
    /// assert!(resolved.record.is_dir);
    /// ```
    #[must_use]
    pub fn resolve(self, base: &BaseUrl) -> Resolved {
        let reduced = reduce_url(&self.url, base);
        let is_dir = self.is_dir || reduced.path == "/";
        Resolved {
            record: ResourceRecord::new(reduced.path, self.size_bytes, self.status_code, is_dir),
            foreign: reduced.foreign,
        }
    }
}

/// Parser for scanner output lines.
///
/// Holds the compiled URL pattern and the accepted status codes. Build it
/// once and reuse it for every line.
///
/// # Examples
///
/// ```
/// use fm_core::ParseConfig;
/// use fm_parser::{LineParser, LineRejection};
///
/// let parser = LineParser::new(&ParseConfig::default())?;
///
/// let line = parser.parse("200  GET  10l  5w  512c http://h/app/config.php")?;
/// assert_eq!(line.url, "http://h/app/config.php");
/// assert_eq!(line.size_bytes, Some(512));
///
/// assert_eq!(
///     parser.parse("404  GET  1l  1w  9c http://h/missing"),
///     Err(LineRejection::StatusNotAccepted(404))
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct LineParser {
    url_pattern: Regex,
    config: ParseConfig,
}

impl LineParser {
    /// Creates a parser from the parse configuration.
    pub fn new(config: &ParseConfig) -> Result<Self, ParseError> {
        if config.accepted_status_codes.is_empty() {
            return Err(ParseError::NoAcceptedStatus);
        }

        let url_pattern = RegexBuilder::new(URL_PATTERN)
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            url_pattern,
            config: config.clone(),
        })
    }

    /// Parses one line.
    ///
    /// Status and size tokens are looked up before the URL first, then after
    /// it. A missing size is not an error.
    pub fn parse(&self, line: &str) -> Result<ParsedLine, LineRejection> {
        if line.trim().is_empty() {
            return Err(LineRejection::Blank);
        }

        let found = self.url_pattern.find(line).ok_or(LineRejection::NoUrl)?;
        let before = &line[..found.start()];
        let after = &line[found.end()..];
        let tokens = || before.split_whitespace().chain(after.split_whitespace());

        let status_code = tokens()
            .find_map(parse_status_token)
            .ok_or(LineRejection::NoStatus)?;
        if !self.config.accepts(status_code) {
            return Err(LineRejection::StatusNotAccepted(status_code));
        }

        let size_bytes = tokens().find_map(parse_size_token);

        let raw = strip_query_and_fragment(trim_url(found.as_str()));
        let is_dir = raw.ends_with('/') || redirects_to_directory(raw, after);

        Ok(ParsedLine {
            url: normalize_trailing_slash(raw, is_dir),
            status_code,
            size_bytes,
            is_dir,
        })
    }
}

/// Parses a token made of exactly three ASCII digits.
fn parse_status_token(token: &str) -> Option<u16> {
    if token.len() == 3 && token.bytes().all(|b| b.is_ascii_digit()) {
        token.parse().ok()
    } else {
        None
    }
}

/// Parses a `<digits>c` content-length token. Overflowing values count as absent.
fn parse_size_token(token: &str) -> Option<u64> {
    let digits = token.strip_suffix('c')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Removes trailing commas and whitespace picked up by the `\S+` match.
fn trim_url(url: &str) -> &str {
    url.trim_end_matches(|c: char| c == ',' || c.is_whitespace())
}

fn strip_query_and_fragment(url: &str) -> &str {
    url.find(['?', '#']).map_or(url, |idx| &url[..idx])
}

/// Detects `<url> => <url>/`, the scanner's notation for a directory redirect.
fn redirects_to_directory(url: &str, after: &str) -> bool {
    let Some(target) = after.trim_start().strip_prefix(REDIRECT_MARKER) else {
        return false;
    };
    let Some(target) = target.split_whitespace().next() else {
        return false;
    };
    let target = strip_query_and_fragment(trim_url(target));

    target
        .strip_suffix('/')
        .is_some_and(|stem| stem.trim_end_matches('/').eq_ignore_ascii_case(url.trim_end_matches('/')))
}

/// Collapses trailing slashes to exactly one for directories and none for files.
fn normalize_trailing_slash(url: &str, is_dir: bool) -> String {
    let trimmed = url.trim_end_matches('/');
    if is_dir {
        format!("{trimmed}/")
    } else {
        trimmed.to_owned()
    }
}
