//! Per-directory counts and directory-grouped URL views.

use std::collections::BTreeMap;

use fm_core::BaseUrl;
use serde::{Deserialize, Serialize};

use crate::tree::{NodeId, NodeKind, ResourceTree};

/// Immediate-children counts of one directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryCounts {
    /// Direct subdirectories.
    pub subdirectory_count: usize,
    /// Direct files.
    pub file_count: usize,
}

/// Aggregated counts over a whole tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSummary {
    /// Counts keyed by directory display path (`/`, `/app/`).
    pub directories: BTreeMap<String, DirectoryCounts>,
    /// Number of directories, root included.
    pub total_dirs: usize,
    /// Number of files.
    pub total_files: usize,
}

/// Counts the immediate children of every directory in one depth-first walk.
///
/// # Examples
///
/// ```
/// use fm_core::{ClassifiedResource, ResourceRecord};
/// use fm_tree::{ResourceTree, aggregate};
///
/// let resources = vec![ClassifiedResource {
///     record: ResourceRecord::new("/app/readme.txt", Some(300), 200, false),
///     tag: None,
/// }];
/// let summary = aggregate(&ResourceTree::build(&resources, '/'));
///
/// assert_eq!(summary.total_dirs, 2);
/// assert_eq!(summary.total_files, 1);
/// assert_eq!(summary.directories["/"].subdirectory_count, 1);
/// assert_eq!(summary.directories["/app/"].file_count, 1);
/// ```
#[must_use]
pub fn aggregate(tree: &ResourceTree) -> TreeSummary {
    let mut summary = TreeSummary::default();
    let mut stack = vec![tree.root()];

    while let Some(id) = stack.pop() {
        let node = tree.node(id);
        if node.kind == NodeKind::File {
            summary.total_files += 1;
            continue;
        }

        summary.total_dirs += 1;
        let mut counts = DirectoryCounts::default();
        for child in tree.children(id) {
            match tree.node(child).kind {
                NodeKind::Directory => counts.subdirectory_count += 1,
                NodeKind::File => counts.file_count += 1,
            }
            stack.push(child);
        }
        summary.directories.insert(tree.path_of(id), counts);
    }

    summary
}

/// Groups file URLs under the URL of their parent directory.
///
/// Keys end with the separator, and both keys and file lists are sorted.
/// Directories without files do not appear.
///
/// # Examples
///
/// ```
/// use fm_core::{BaseUrl, ClassifiedResource, ResourceRecord};
/// use fm_tree::{ResourceTree, group_files_by_directory};
///
/// let resources = vec![ClassifiedResource {
///     record: ResourceRecord::new("/app/readme.txt", Some(300), 200, false),
///     tag: None,
/// }];
/// let tree = ResourceTree::build(&resources, '/');
/// let groups = group_files_by_directory(&tree, &BaseUrl::Detected("http://h".to_owned()));
///
/// assert_eq!(groups["http://h/app/"], vec!["http://h/app/readme.txt"]);
/// ```
#[must_use]
pub fn group_files_by_directory(tree: &ResourceTree, base: &BaseUrl) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut stack = vec![tree.root()];

    while let Some(id) = stack.pop() {
        let files: Vec<NodeId> = tree
            .children(id)
            .filter(|&child| {
                let is_dir = tree.node(child).is_dir();
                if is_dir {
                    stack.push(child);
                }
                !is_dir
            })
            .collect();
        if files.is_empty() {
            continue;
        }

        let mut urls: Vec<String> = files
            .into_iter()
            .map(|file| base.join(&tree.path_of(file)))
            .collect();
        urls.sort();
        groups.insert(base.join(&tree.path_of(id)), urls);
    }

    groups
}
