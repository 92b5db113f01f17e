//! Arena-backed directory tree built from classified resources.
//!
//! All nodes live in a single `Vec<TreeNode>` owned by [`ResourceTree`].
//! Nodes refer to each other by [`NodeId`], children are keyed by their
//! lower-cased name, and the tree only grows top-down from path segments, so
//! it is acyclic by construction.
//!
//! # Scanner Inconsistencies
//!
//! Scanner output sometimes uses one name both as a file and as a directory
//! prefix (`/api` reported as a file, then `/api/v1/`). Such clashes never
//! fail the build:
//!
//! - A file node that a later path needs as a directory is promoted to a
//!   directory ([`ConflictKind::CoercedToDirectory`]).
//! - A file whose name already exists as a directory leaves the directory
//!   alone ([`ConflictKind::ShadowedFile`]).
//!
//! Both are recorded in [`ResourceTree::conflicts`].

use std::collections::BTreeMap;

use fm_core::{ClassificationTag, ClassifiedResource};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::warn;

/// Lightweight index into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The synthetic root directory.
    pub const ROOT: Self = Self(0);

    #[inline]
    fn new(index: usize) -> Self {
        debug_assert!(u32::try_from(index).is_ok(), "NodeId overflow");
        #[allow(clippy::cast_possible_truncation)]
        Self(index as u32)
    }

    /// Returns the index as a `usize` for arena access.
    #[inline]
    #[must_use]
    pub const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Whether a node is a directory or a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// May have children.
    Directory,
    /// Always a leaf.
    File,
}

/// A single directory or file in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Segment name as first sighted (NOT the full path).
    pub name: String,

    /// Directory or file.
    pub kind: NodeKind,

    /// Children keyed by lower-cased name, which also fixes their order.
    pub children: BTreeMap<String, NodeId>,

    /// Content length. Files only.
    pub size_bytes: Option<u64>,

    /// Classification. Files only.
    pub tag: Option<ClassificationTag>,

    /// Parent node. `None` for the root.
    pub parent: Option<NodeId>,

    /// `true` if this directory was first created as a file.
    pub coerced: bool,
}

impl TreeNode {
    fn directory(name: &str, parent: Option<NodeId>) -> Self {
        Self {
            name: name.to_owned(),
            kind: NodeKind::Directory,
            children: BTreeMap::new(),
            size_bytes: None,
            tag: None,
            parent,
            coerced: false,
        }
    }

    fn file(name: &str, parent: NodeId, resource: &ClassifiedResource) -> Self {
        Self {
            name: name.to_owned(),
            kind: NodeKind::File,
            children: BTreeMap::new(),
            size_bytes: resource.record.size_bytes,
            tag: resource.tag,
            parent: Some(parent),
            coerced: false,
        }
    }

    /// Returns `true` for directory nodes.
    #[inline]
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

/// The kind of structural clash found while building the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// A file node was promoted to a directory.
    CoercedToDirectory,
    /// A file was not added because a directory of that name exists.
    ShadowedFile,
}

/// A structural clash, kept so no data disappears silently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Conflict {
    /// Path of the affected node or record.
    pub path: String,
    /// What happened.
    pub kind: ConflictKind,
}

/// An owned, nested view of the tree for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedNode {
    /// Segment name.
    pub name: String,
    /// Directory or file.
    pub kind: NodeKind,
    /// Content length (files only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// Classification (files only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<ClassificationTag>,
    /// Children in canonical order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NestedNode>,
}

/// The directory tree of one scan.
///
/// # Examples
///
/// ```
/// use fm_core::{ClassifiedResource, ResourceRecord};
/// use fm_tree::{NodeKind, ResourceTree};
///
/// let resources = vec![ClassifiedResource {
///     record: ResourceRecord::new("/app/readme.txt", Some(300), 200, false),
///     tag: None,
/// }];
/// let tree = ResourceTree::build(&resources, '/');
///
/// let app = tree.find("/APP/").unwrap();
/// assert_eq!(tree.node(app).kind, NodeKind::Directory);
/// assert_eq!(tree.path_of(app), "/app/");
///
/// let readme = tree.find("/app/readme.txt").unwrap();
/// assert_eq!(tree.node(readme).size_bytes, Some(300));
/// ```
#[derive(Debug, Clone)]
pub struct ResourceTree {
    nodes: Vec<TreeNode>,
    separator: char,
    conflicts: Vec<Conflict>,
}

impl ResourceTree {
    /// Creates a tree holding only the root directory.
    #[must_use]
    pub fn new(separator: char) -> Self {
        let mut root_name = [0u8; 4];
        Self {
            nodes: vec![TreeNode::directory(separator.encode_utf8(&mut root_name), None)],
            separator,
            conflicts: Vec::new(),
        }
    }

    /// Builds a tree from deduplicated, classified resources.
    #[must_use]
    pub fn build(resources: &[ClassifiedResource], separator: char) -> Self {
        let mut tree = Self::new(separator);
        for resource in resources {
            tree.insert(resource);
        }
        tree
    }

    /// Inserts one resource, creating intermediate directories as needed.
    ///
    /// The root path (no segments) leaves the tree unchanged.
    pub fn insert(&mut self, resource: &ClassifiedResource) {
        let record = &resource.record;
        let segments: SmallVec<[&str; 8]> = record.segments(self.separator).collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut current = NodeId::ROOT;
        for segment in parents {
            current = self.directory_child(current, segment);
        }

        if record.is_dir {
            self.directory_child(current, last);
        } else {
            self.file_child(current, last, resource);
        }
    }

    /// Returns the directory child `name` of `parent`, creating or coercing it.
    fn directory_child(&mut self, parent: NodeId, name: &str) -> NodeId {
        let key = name.to_lowercase();
        if let Some(&existing) = self.nodes[parent.idx()].children.get(&key) {
            if self.nodes[existing.idx()].kind == NodeKind::File {
                let node = &mut self.nodes[existing.idx()];
                node.kind = NodeKind::Directory;
                node.size_bytes = None;
                node.tag = None;
                node.coerced = true;

                let path = self.path_of(existing);
                warn!(path = %path, "File node used as a directory, coercing");
                self.conflicts.push(Conflict {
                    path,
                    kind: ConflictKind::CoercedToDirectory,
                });
            }
            return existing;
        }

        self.push_child(parent, key, TreeNode::directory(name, Some(parent)))
    }

    /// Adds or updates the file child `name` of `parent`.
    fn file_child(&mut self, parent: NodeId, name: &str, resource: &ClassifiedResource) {
        let key = name.to_lowercase();
        if let Some(&existing) = self.nodes[parent.idx()].children.get(&key) {
            let node = &mut self.nodes[existing.idx()];
            if node.kind == NodeKind::Directory {
                warn!(path = %resource.record.path, "File shadowed by a directory of the same name");
                self.conflicts.push(Conflict {
                    path: resource.record.path.clone(),
                    kind: ConflictKind::ShadowedFile,
                });
            } else {
                node.size_bytes = resource.record.size_bytes;
                node.tag = resource.tag;
            }
            return;
        }

        self.push_child(parent, key, TreeNode::file(name, parent, resource));
    }

    fn push_child(&mut self, parent: NodeId, key: String, node: TreeNode) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.idx()].children.insert(key, id);
        id
    }

    /// Returns the root directory.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Returns the node at `id`.
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.idx()]
    }

    /// Returns the direct children of `id` in canonical order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.idx()].children.values().copied()
    }

    /// Returns the path separator used to split resource paths.
    #[inline]
    #[must_use]
    pub const fn separator(&self) -> char {
        self.separator
    }

    /// Returns every structural clash recorded during the build.
    #[inline]
    #[must_use]
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Total number of nodes, root included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree holds nothing but the root.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Looks up a path case-insensitively.
    ///
    /// A trailing separator is ignored, so `/app` and `/app/` find the same
    /// node.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<NodeId> {
        path.split(self.separator)
            .filter(|segment| !segment.is_empty())
            .try_fold(NodeId::ROOT, |current, segment| {
                self.nodes[current.idx()]
                    .children
                    .get(&segment.to_lowercase())
                    .copied()
            })
    }

    /// Reconstructs the display path of a node by walking up to the root.
    ///
    /// Directories end with the separator; the root is the separator alone.
    #[must_use]
    pub fn path_of(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = id;
        while let Some(parent) = self.nodes[current.idx()].parent {
            segments.push(self.nodes[current.idx()].name.as_str());
            current = parent;
        }
        segments.reverse();

        let mut path = String::new();
        for segment in segments {
            path.push(self.separator);
            path.push_str(segment);
        }
        if self.nodes[id.idx()].is_dir() {
            path.push(self.separator);
        }
        path
    }

    /// Converts the arena into an owned nested structure.
    #[must_use]
    pub fn to_nested(&self) -> NestedNode {
        self.nest(NodeId::ROOT)
    }

    fn nest(&self, id: NodeId) -> NestedNode {
        let node = self.node(id);
        NestedNode {
            name: node.name.clone(),
            kind: node.kind,
            size_bytes: node.size_bytes,
            tag: node.tag,
            children: self.children(id).map(|child| self.nest(child)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fm_core::ResourceRecord;

    fn file(path: &str, size: u64) -> ClassifiedResource {
        ClassifiedResource {
            record: ResourceRecord::new(path, Some(size), 200, false),
            tag: None,
        }
    }

    fn dir(path: &str) -> ClassifiedResource {
        ClassifiedResource {
            record: ResourceRecord::new(path, None, 200, true),
            tag: None,
        }
    }

    fn child_names(tree: &ResourceTree, id: NodeId) -> Vec<String> {
        tree.children(id).map(|c| tree.node(c).name.clone()).collect()
    }

    #[test]
    fn test_root_only() {
        let tree = ResourceTree::new('/');
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.node(tree.root()).name, "/");
        assert_eq!(tree.path_of(tree.root()), "/");
    }

    #[test]
    fn test_intermediate_directories_created() {
        let tree = ResourceTree::build(&[file("/a/b/c.txt", 5)], '/');
        assert_eq!(tree.len(), 4);

        let b = tree.find("/a/b").unwrap();
        assert!(tree.node(b).is_dir());
        assert_eq!(tree.path_of(b), "/a/b/");

        let c = tree.find("/a/b/c.txt").unwrap();
        assert_eq!(tree.node(c).kind, NodeKind::File);
        assert_eq!(tree.path_of(c), "/a/b/c.txt");
    }

    #[test]
    fn test_root_path_is_ignored() {
        let tree = ResourceTree::build(&[dir("/")], '/');
        assert!(tree.is_empty());
    }

    #[test]
    fn test_siblings_case_insensitive_first_casing_kept() {
        let tree = ResourceTree::build(&[file("/App/x.js", 1), file("/app/y.js", 2)], '/');
        assert_eq!(child_names(&tree, tree.root()), vec!["App"]);

        let app = tree.find("/app").unwrap();
        assert_eq!(child_names(&tree, app), vec!["x.js", "y.js"]);
    }

    #[test]
    fn test_children_sorted_case_insensitively() {
        let tree = ResourceTree::build(
            &[file("/b.txt", 1), file("/C.txt", 1), file("/a.txt", 1), dir("/B/")],
            '/',
        );
        // "b" sorts before "b.txt"; "C.txt" sorts as "c.txt"
        assert_eq!(
            child_names(&tree, tree.root()),
            vec!["a.txt", "B", "b.txt", "C.txt"]
        );
    }

    #[test]
    fn test_file_coerced_to_directory() {
        let tree = ResourceTree::build(&[file("/api", 10), file("/api/v1.json", 3)], '/');

        let api = tree.find("/api").unwrap();
        let node = tree.node(api);
        assert!(node.is_dir());
        assert!(node.coerced);
        assert_eq!(node.size_bytes, None);
        assert_eq!(
            tree.conflicts(),
            &[Conflict {
                path: "/api/".to_owned(),
                kind: ConflictKind::CoercedToDirectory,
            }]
        );
        assert!(tree.find("/api/v1.json").is_some());
    }

    #[test]
    fn test_directory_record_coerces_file() {
        let tree = ResourceTree::build(&[file("/docs", 10), dir("/docs/")], '/');
        assert!(tree.node(tree.find("/docs").unwrap()).is_dir());
        assert_eq!(tree.conflicts().len(), 1);
    }

    #[test]
    fn test_directory_never_becomes_file() {
        let tree = ResourceTree::build(&[dir("/images/"), file("/images", 99)], '/');

        let images = tree.node(tree.find("/images").unwrap());
        assert!(images.is_dir());
        assert!(!images.coerced);
        assert_eq!(
            tree.conflicts(),
            &[Conflict {
                path: "/images".to_owned(),
                kind: ConflictKind::ShadowedFile,
            }]
        );
    }

    #[test]
    fn test_every_path_reachable() {
        let resources = vec![
            file("/a/b/c.txt", 1),
            dir("/a/d/"),
            file("/e.txt", 2),
            file("/a/b/f.txt", 3),
        ];
        let tree = ResourceTree::build(&resources, '/');
        for resource in &resources {
            let id = tree.find(&resource.record.path).unwrap();
            assert_eq!(tree.path_of(id), resource.record.path);
            assert_eq!(tree.node(id).is_dir(), resource.record.is_dir);
        }
    }

    #[test]
    fn test_custom_separator() {
        let tree = ResourceTree::build(&[file(r"\share\data.bin", 1)], '\\');
        let id = tree.find(r"\SHARE\data.bin").unwrap();
        assert_eq!(tree.path_of(id), r"\share\data.bin");
        assert_eq!(tree.node(tree.root()).name, r"\");
    }

    #[test]
    fn test_file_carries_size_and_tag() {
        let resource = ClassifiedResource {
            record: ResourceRecord::new("/dump.sql", Some(42), 200, false),
            tag: Some(ClassificationTag::Database),
        };
        let tree = ResourceTree::build(&[resource], '/');
        let node = tree.node(tree.find("/dump.sql").unwrap());
        assert_eq!(node.size_bytes, Some(42));
        assert_eq!(node.tag, Some(ClassificationTag::Database));
    }

    #[test]
    fn test_to_nested() {
        let tree = ResourceTree::build(&[file("/app/readme.txt", 300), dir("/img/")], '/');
        let nested = tree.to_nested();

        assert_eq!(nested.name, "/");
        assert_eq!(nested.children.len(), 2);
        assert_eq!(nested.children[0].name, "app");
        assert_eq!(nested.children[0].children[0].size_bytes, Some(300));
        assert_eq!(nested.children[1].kind, NodeKind::Directory);
        assert!(nested.children[1].children.is_empty());

        let json = serde_json::to_value(&nested).unwrap();
        assert_eq!(json["children"][1], serde_json::json!({"name": "img", "kind": "directory"}));
    }
}
