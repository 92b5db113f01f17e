//! Core types, errors, and configuration for the ferox-map tool.
//!
//! This crate provides the foundational types shared across the workspace:
//!
//! - Error types for configuration loading and validation
//! - Configuration structures ([`Config`] and its sections)
//! - Domain types ([`ResourceRecord`], [`ClassificationTag`], [`BaseUrl`])
//! - The `FxHashMap` alias used for vote and dedup indexes
//!
//! Nothing in here touches the filesystem except [`Config::from_json_file`].

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod types;

pub use config::{ClassifyConfig, Config, ParseConfig, ReportConfig, RuleConfig};
pub use error::ConfigError;
pub use hash::{FxHashMap, fx_hash_map, fx_hash_map_with_capacity};
pub use types::{BaseUrl, ClassificationTag, ClassifiedResource, ResourceRecord};
