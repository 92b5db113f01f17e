//! Scanner output parsing for ferox-map.
//!
//! This crate covers the first two pipeline stages:
//!
//! - [`LineParser`]: turns one raw line into a [`ParsedLine`] or a
//!   [`LineRejection`]
//! - [`detect_base_url`]: votes for the origin shared by the parsed URLs,
//!   after which [`ParsedLine::resolve`] reduces each URL to a root-relative
//!   path
//!
//! # Example
//!
//! ```
//! use fm_core::{BaseUrl, ParseConfig};
//! use fm_parser::{LineParser, detect_base_url};
//!
//! let parser = LineParser::new(&ParseConfig::default())?;
//! let lines = [
//!     "200      GET     1234l      10w     512c http://h/app/config.php",
//!     "garbage",
//!     "200      GET      900l       6w     300c http://h/app/readme.txt",
//! ];
//!
//! let parsed: Vec<_> = lines.iter().filter_map(|l| parser.parse(l).ok()).collect();
//! let detection = detect_base_url(parsed.iter().map(|p| p.url.as_str()));
//! assert_eq!(detection.base, BaseUrl::Detected("http://h".to_owned()));
//!
//! let paths: Vec<_> = parsed
//!     .into_iter()
//!     .map(|p| p.resolve(&detection.base).record.path)
//!     .collect();
//! assert_eq!(paths, ["/app/config.php", "/app/readme.txt"]);
//! # Ok::<(), fm_parser::ParseError>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod error;
mod line;
mod origin;

pub use error::{LineRejection, ParseError};
pub use line::{LineParser, ParsedLine, Resolved};
pub use origin::{Detection, Reduced, configured_base_url, detect_base_url, origin_of, reduce_url};
