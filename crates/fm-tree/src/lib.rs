//! Deduplication, classification and tree construction for ferox-map.
//!
//! This crate turns raw scanner output into a classified directory tree.
//!
//! # Overview
//!
//! The main entry point is [`Pipeline`], which runs these stages in order:
//!
//! - [`LineParser`](fm_parser::LineParser): one record per usable line
//! - [`detect_base_url`](fm_parser::detect_base_url): the shared origin
//! - [`deduplicate`]: case-insensitive collapse of repeated paths
//! - [`Classifier`]: ordered first-match tagging of file names
//! - [`ResourceTree`]: arena tree of directories and files
//! - [`aggregate`]: per-directory immediate-children counts
//!
//! # Example
//!
//! ```
//! use fm_core::{BaseUrl, ClassificationTag, Config};
//! use fm_tree::Pipeline;
//!
//! let input = "\
//! 200      GET     1234l      10w     512c http://h/app/config.php
//! 200      GET     1234l      10w     256c http://h/app/Config.php
//! 200      GET      900l       6w     300c http://h/app/readme.txt
//! ";
//!
//! let report = Pipeline::new(&Config::default())?.run(input.lines())?;
//!
//! assert_eq!(report.base_url, BaseUrl::Detected("http://h".to_owned()));
//! assert_eq!(report.stats.duplicates, 1);
//! assert_eq!(report.summary.total_dirs, 2);
//! assert_eq!(report.summary.total_files, 2);
//!
//! let config = &report.resources[0];
//! assert_eq!(config.record.path, "/app/Config.php");
//! assert_eq!(config.tag, Some(ClassificationTag::NetworkConfig));
//! # Ok::<(), fm_tree::PipelineError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! lines ──► LineParser ──► detect_base_url ──► resolve ──► deduplicate
//!                                                              │
//!            TreeSummary ◄── aggregate ◄── ResourceTree ◄── Classifier
//! ```
//!
//! Everything runs on the calling thread over an in-memory line sequence.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod aggregate;
mod classify;
mod dedup;
mod error;
mod stats;
mod tree;

use std::collections::BTreeMap;

use fm_core::{BaseUrl, ClassificationTag, ClassifiedResource, Config, ConfigError};
use fm_parser::{LineParser, configured_base_url, detect_base_url};
use tracing::{debug, trace, warn};

pub use aggregate::{DirectoryCounts, TreeSummary, aggregate, group_files_by_directory};
pub use classify::{Classifier, group_by_tag};
pub use dedup::{Deduplicated, deduplicate};
pub use error::{ClassifyError, PipelineError};
pub use stats::RunStats;
pub use tree::{Conflict, ConflictKind, NestedNode, NodeId, NodeKind, ResourceTree, TreeNode};

/// Everything produced by one pipeline run.
#[derive(Debug, Clone)]
pub struct Report {
    /// The detected or configured origin, or `Unknown`.
    pub base_url: BaseUrl,
    /// Deduplicated, classified resources in first-seen order.
    pub resources: Vec<ClassifiedResource>,
    /// The directory tree.
    pub tree: ResourceTree,
    /// Per-directory counts and totals.
    pub summary: TreeSummary,
    /// Run counters, including records dropped by deduplication.
    pub stats: RunStats,
}

impl Report {
    /// Tagged resources grouped by tag, in precedence order.
    #[must_use]
    pub fn interesting(&self) -> BTreeMap<ClassificationTag, Vec<&ClassifiedResource>> {
        group_by_tag(&self.resources)
    }

    /// File URLs grouped under their parent directory URL.
    #[must_use]
    pub fn grouped_urls(&self) -> BTreeMap<String, Vec<String>> {
        group_files_by_directory(&self.tree, &self.base_url)
    }
}

/// A configured, reusable pipeline.
///
/// Construction validates the configuration and compiles every pattern, so
/// [`run`](Self::run) can only fail on input with no usable lines.
#[derive(Debug, Clone)]
pub struct Pipeline {
    parser: LineParser,
    classifier: Classifier,
    separator: char,
    base_url: Option<BaseUrl>,
}

impl Pipeline {
    /// Validates `config` and builds the parser and classifier.
    pub fn new(config: &Config) -> Result<Self, PipelineError> {
        config.validate()?;

        let parser = LineParser::new(&config.parse)?;
        let classifier = Classifier::new(&config.classify)?;
        let base_url = config
            .parse
            .base_url
            .as_deref()
            .map(|value| {
                configured_base_url(value).ok_or_else(|| {
                    ConfigError::invalid("parse.base_url", format!("no usable origin in '{value}'"))
                })
            })
            .transpose()?;

        Ok(Self {
            parser,
            classifier,
            separator: config.parse.separator,
            base_url,
        })
    }

    /// Runs every stage over `lines`.
    ///
    /// Malformed lines are skipped and counted. The run fails only if no
    /// line produced a record.
    pub fn run<I, S>(&self, lines: I) -> Result<Report, PipelineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stats = RunStats::default();

        let mut parsed = Vec::new();
        for (number, line) in lines.into_iter().enumerate() {
            stats.lines_total += 1;
            match self.parser.parse(line.as_ref()) {
                Ok(line) => parsed.push(line),
                Err(rejection) => {
                    trace!(line = number + 1, reason = rejection.kind(), "Rejected line");
                    stats.record_rejection(rejection);
                }
            }
        }
        stats.records_parsed = parsed.len();
        debug!(
            lines = stats.lines_total,
            parsed = stats.records_parsed,
            rejected = stats.rejected_total(),
            "Parsed input"
        );

        if parsed.is_empty() {
            warn!(lines = stats.lines_total, "No valid records in input");
            return Err(PipelineError::NoRecords {
                lines: stats.lines_total,
            });
        }

        let detection = detect_base_url(parsed.iter().map(|line| line.url.as_str()));
        stats.distinct_origins = detection.distinct_origins;
        let base_url = match &self.base_url {
            Some(configured) => {
                debug!(base_url = %configured, "Using configured base URL");
                configured.clone()
            }
            None => detection.base,
        };

        let records = parsed.into_iter().map(|line| {
            let resolved = line.resolve(&base_url);
            if resolved.foreign {
                stats.foreign_origin += 1;
            }
            resolved.record
        });
        let deduplicated = deduplicate(records);
        if stats.foreign_origin > 0 {
            warn!(
                count = stats.foreign_origin,
                base_url = %base_url,
                "Records from other origins reduced to their paths"
            );
        }
        stats.duplicates = deduplicated.duplicates;
        debug!(
            kept = deduplicated.records.len(),
            duplicates = deduplicated.duplicates,
            "Deduplicated records"
        );

        let resources: Vec<ClassifiedResource> = deduplicated
            .records
            .into_iter()
            .map(|record| self.classifier.classify(record, self.separator))
            .collect();
        stats.tagged = resources.iter().filter(|r| r.is_interesting()).count();
        debug!(tagged = stats.tagged, "Classified resources");

        let tree = ResourceTree::build(&resources, self.separator);
        stats.conflicts = tree.conflicts().len();
        let summary = aggregate(&tree);
        debug!(
            dirs = summary.total_dirs,
            files = summary.total_files,
            conflicts = stats.conflicts,
            "Built tree"
        );

        Ok(Report {
            base_url,
            resources,
            tree,
            summary,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fm_core::ParseConfig;

    #[test]
    fn test_invalid_configured_base_url() {
        let config = Config {
            parse: ParseConfig {
                base_url: Some("http:///nohost".to_owned()),
                ..ParseConfig::default()
            },
            ..Config::default()
        };
        let err = Pipeline::new(&config).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_configured_base_url_overrides_vote() {
        let config = Config {
            parse: ParseConfig {
                base_url: Some("http://cdn".to_owned()),
                ..ParseConfig::default()
            },
            ..Config::default()
        };
        let report = Pipeline::new(&config)
            .unwrap()
            .run(["200 GET 1l 1w 5c http://h/a.txt", "200 GET 1l 1w 5c http://cdn/b.txt"])
            .unwrap();

        assert_eq!(report.base_url, BaseUrl::Detected("http://cdn".to_owned()));
        assert_eq!(report.stats.distinct_origins, 2);
        assert_eq!(report.stats.foreign_origin, 1);
        let paths: Vec<_> = report.resources.iter().map(|r| r.record.path.as_str()).collect();
        assert_eq!(paths, vec!["/a.txt", "/b.txt"]);
    }

    #[test]
    fn test_interesting_and_grouped_views() {
        let report = Pipeline::new(&Config::default())
            .unwrap()
            .run([
                "200 GET 1l 1w 10c http://h/db/dump.sql",
                "200 GET 1l 1w 10c http://h/db/notes.txt",
                "200 GET 1l 1w 10c http://h/.env",
            ])
            .unwrap();

        let interesting = report.interesting();
        assert_eq!(interesting.len(), 2);
        assert_eq!(interesting[&ClassificationTag::Database][0].record.path, "/db/dump.sql");

        let grouped = report.grouped_urls();
        assert_eq!(grouped["http://h/"], vec!["http://h/.env"]);
        assert_eq!(
            grouped["http://h/db/"],
            vec!["http://h/db/dump.sql", "http://h/db/notes.txt"]
        );
    }
}
