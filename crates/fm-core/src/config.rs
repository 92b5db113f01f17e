//! Configuration structures for the ferox-map tool.
//!
//! This module provides configuration types for every stage of the pipeline:
//!
//! - [`ParseConfig`] - Line parsing (accepted status codes, separator, base URL)
//! - [`ClassifyConfig`] - Ordered classification rules
//! - [`ReportConfig`] - Text rendering options used by the CLI
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`] and deserialize with
//! `#[serde(default)]`, so a config file only needs the fields it changes.

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

use crate::error::ConfigError;
use crate::types::ClassificationTag;

/// Configuration for the line parser and path reduction.
///
/// # Examples
///
/// ```
/// use fm_core::ParseConfig;
///
/// let config = ParseConfig::default();
/// assert_eq!(config.accepted_status_codes.as_slice(), &[200]);
/// assert_eq!(config.separator, '/');
/// assert!(config.base_url.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Status codes whose lines are kept. Everything else is rejected.
    pub accepted_status_codes: SmallVec<[u16; 4]>,

    /// Path segment separator.
    pub separator: char,

    /// Explicit origin (`scheme://host`). When unset the origin is detected
    /// from the input.
    pub base_url: Option<String>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            accepted_status_codes: smallvec![200],
            separator: '/',
            base_url: None,
        }
    }
}

impl ParseConfig {
    /// Returns `true` if lines with `code` are kept.
    #[inline]
    #[must_use]
    pub fn accepts(&self, code: u16) -> bool {
        self.accepted_status_codes.contains(&code)
    }
}

/// One classification rule: a tag and the pattern that assigns it.
///
/// Patterns are regular expressions matched case-insensitively against the
/// file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Tag assigned when the pattern matches.
    pub tag: ClassificationTag,

    /// Regular expression matched against the file name.
    pub pattern: String,
}

impl RuleConfig {
    /// Creates a rule from a tag and pattern.
    #[must_use]
    pub fn new(tag: ClassificationTag, pattern: impl Into<String>) -> Self {
        Self {
            tag,
            pattern: pattern.into(),
        }
    }
}

/// Configuration for the classifier.
///
/// Rules are evaluated top to bottom and the first match wins, so the order
/// of [`rules`](Self::rules) is part of the observable output.
///
/// # Examples
///
/// ```
/// use fm_core::{ClassificationTag, ClassifyConfig};
///
/// let config = ClassifyConfig::default();
/// assert_eq!(config.rules.len(), ClassificationTag::PRECEDENCE.len());
/// assert_eq!(config.rules[0].tag, ClassificationTag::SensitiveKeyword);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Ordered rule list.
    pub rules: Vec<RuleConfig>,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            rules: ClassificationTag::PRECEDENCE
                .iter()
                .map(|&tag| RuleConfig::new(tag, tag.default_pattern()))
                .collect(),
        }
    }
}

/// Options for the text views rendered by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Deepest tree level printed by the text tree (`None` prints everything).
    pub max_depth: Option<usize>,

    /// Whether file sizes are printed next to file names.
    pub show_sizes: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            show_sizes: true,
        }
    }
}

/// Root configuration for the ferox-map tool.
///
/// # Examples
///
/// ```
/// use fm_core::Config;
///
/// let config = Config::default();
/// assert!(config.validate().is_ok());
///
/// let json = serde_json::to_string_pretty(&config).unwrap();
/// let parsed: Config = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, parsed);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Line parser configuration.
    pub parse: ParseConfig,

    /// Classifier configuration.
    pub classify: ClassifyConfig,

    /// Text report configuration.
    pub report: ReportConfig,
}

impl Config {
    /// Loads and validates a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_owned()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants serde cannot express.
    ///
    /// Regex syntax is checked later, when the classifier compiles the rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parse = &self.parse;

        if parse.accepted_status_codes.is_empty() {
            return Err(ConfigError::invalid(
                "parse.accepted_status_codes",
                "must contain at least one status code",
            ));
        }
        if let Some(code) = parse
            .accepted_status_codes
            .iter()
            .find(|code| !(100..=599).contains(*code))
        {
            return Err(ConfigError::invalid(
                "parse.accepted_status_codes",
                format!("{code} is not an HTTP status code"),
            ));
        }
        if parse.separator.is_whitespace() {
            return Err(ConfigError::invalid(
                "parse.separator",
                "must not be whitespace",
            ));
        }
        if let Some(base) = &parse.base_url {
            let lower = base.to_ascii_lowercase();
            if !(lower.starts_with("http://") || lower.starts_with("https://")) {
                return Err(ConfigError::invalid(
                    "parse.base_url",
                    format!("'{base}' must start with http:// or https://"),
                ));
            }
        }
        if self.classify.rules.iter().any(|rule| rule.pattern.is_empty()) {
            return Err(ConfigError::invalid(
                "classify.rules",
                "patterns must not be empty",
            ));
        }

        Ok(())
    }
}
