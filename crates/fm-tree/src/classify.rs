//! Ordered first-match classification of file names.
//!
//! The classifier is a literal list of `(tag, pattern)` pairs evaluated top to
//! bottom. The first pattern that matches the file name decides the tag, so
//! rule order is part of the output contract and is never rearranged.
//!
//! Only file names are classified. Directories always come back untagged.

use std::collections::BTreeMap;

use fm_core::{ClassificationTag, ClassifiedResource, ClassifyConfig, ResourceRecord};
use regex::{Regex, RegexBuilder};

use crate::error::ClassifyError;

/// A compiled classification rule.
#[derive(Debug, Clone)]
struct Rule {
    tag: ClassificationTag,
    pattern: Regex,
}

/// Assigns at most one [`ClassificationTag`] to each file.
///
/// # Examples
///
/// ```
/// use fm_core::{ClassificationTag, ClassifyConfig};
/// use fm_tree::Classifier;
///
/// let classifier = Classifier::new(&ClassifyConfig::default())?;
///
/// assert_eq!(classifier.classify_name("Config.php"), Some(ClassificationTag::NetworkConfig));
/// assert_eq!(classifier.classify_name("admin.bak"), Some(ClassificationTag::SensitiveKeyword));
/// assert_eq!(classifier.classify_name("readme.txt"), None);
/// # Ok::<(), fm_tree::ClassifyError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Classifier {
    /// Compiles the configured rules, preserving their order.
    pub fn new(config: &ClassifyConfig) -> Result<Self, ClassifyError> {
        let rules = config
            .rules
            .iter()
            .map(|rule| {
                RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|pattern| Rule {
                        tag: rule.tag,
                        pattern,
                    })
                    .map_err(|source| ClassifyError::InvalidPattern {
                        tag: rule.tag,
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    /// Returns the rules in evaluation order as `(tag, pattern)` pairs.
    pub fn rules(&self) -> impl Iterator<Item = (ClassificationTag, &str)> {
        self.rules.iter().map(|rule| (rule.tag, rule.pattern.as_str()))
    }

    /// Classifies a bare file name.
    ///
    /// Pure: the same name always yields the same tag for a given rule set.
    #[must_use]
    pub fn classify_name(&self, file_name: &str) -> Option<ClassificationTag> {
        if file_name.is_empty() {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(file_name))
            .map(|rule| rule.tag)
    }

    /// Classifies a record by its final path segment.
    #[must_use]
    pub fn classify(&self, record: ResourceRecord, separator: char) -> ClassifiedResource {
        let tag = if record.is_dir {
            None
        } else {
            self.classify_name(record.file_name(separator))
        };
        ClassifiedResource { record, tag }
    }
}

/// Groups tagged resources by tag, paths sorted within each group.
///
/// Untagged resources are left out. Groups iterate in precedence order.
pub fn group_by_tag(
    resources: &[ClassifiedResource],
) -> BTreeMap<ClassificationTag, Vec<&ClassifiedResource>> {
    let mut groups: BTreeMap<ClassificationTag, Vec<&ClassifiedResource>> = BTreeMap::new();
    for resource in resources {
        if let Some(tag) = resource.tag {
            groups.entry(tag).or_default().push(resource);
        }
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| a.record.path.cmp(&b.record.path));
    }
    groups
}
