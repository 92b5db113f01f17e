//! Text, JSON and CSV views of a pipeline [`Report`].
//!
//! Every function returns the rendered text without a trailing newline so
//! the caller decides how to terminate it.

use std::collections::BTreeMap;
use std::fmt::Write;

use fm_core::{BaseUrl, ClassifiedResource, ReportConfig};
use fm_tree::{Conflict, ConflictKind, NestedNode, NodeId, Report, ResourceTree, RunStats, TreeSummary};
use serde::Serialize;

/// Width of the label column in the summary.
const LABEL_WIDTH: usize = 21;

/// Formats a byte count with binary units.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    #[allow(clippy::cast_precision_loss)]
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < MB {
        format!("{:.1} KB", b / KB)
    } else if b < GB {
        format!("{:.1} MB", b / MB)
    } else {
        format!("{:.2} GB", b / GB)
    }
}

fn finish(mut out: String) -> String {
    let len = out.trim_end_matches('\n').len();
    out.truncate(len);
    out
}

fn conflict_label(kind: ConflictKind) -> &'static str {
    match kind {
        ConflictKind::CoercedToDirectory => "file coerced to directory",
        ConflictKind::ShadowedFile => "file shadowed by directory",
    }
}

// =============================================================================
// SUMMARY
// =============================================================================

/// Renders the run summary, optionally with the per-directory table.
pub fn render_summary(report: &Report, detailed: bool) -> String {
    let mut out = String::new();
    let stats = &report.stats;

    let _ = writeln!(out, "Scan Summary");
    let _ = writeln!(out, "============");
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", "Base URL:", report.base_url);
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", "Directories:", report.summary.total_dirs);
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", "Files:", report.summary.total_files);
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", "Duplicates removed:", stats.duplicates);
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", "Foreign origin:", stats.foreign_origin);
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", "Tree conflicts:", stats.conflicts);
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", "Input lines:", stats.lines_total);
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", "  Parsed:", stats.records_parsed);
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", "  Blank:", stats.rejected_blank);
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", "  No URL:", stats.rejected_no_url);
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", "  No status:", stats.rejected_no_status);
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", "  Status filtered:", stats.rejected_status);
    let _ = writeln!(out);

    let interesting = report.interesting();
    if interesting.is_empty() {
        let _ = writeln!(out, "Interesting files: none");
    } else {
        let _ = writeln!(out, "Interesting files ({}):", stats.tagged);
        for (tag, resources) in &interesting {
            let _ = writeln!(out, "  {} ({}):", tag.label(), resources.len());
            for resource in resources {
                let url = report.base_url.join(&resource.record.path);
                match resource.record.size_bytes {
                    Some(size) => {
                        let _ = writeln!(out, "    {url}  ({})", format_size(size));
                    }
                    None => {
                        let _ = writeln!(out, "    {url}");
                    }
                }
            }
        }
    }

    if detailed {
        write_directory_table(&mut out, &report.summary);
        write_conflicts(&mut out, report.tree.conflicts());
    }

    finish(out)
}

fn write_directory_table(out: &mut String, summary: &TreeSummary) {
    let width = summary.directories.keys().map(String::len).max().unwrap_or(0);

    let _ = writeln!(out);
    let _ = writeln!(out, "Directory counts:");
    for (path, counts) in &summary.directories {
        let _ = writeln!(
            out,
            "  {path:<width$}  {:>4} dirs  {:>4} files",
            counts.subdirectory_count, counts.file_count
        );
    }
}

fn write_conflicts(out: &mut String, conflicts: &[Conflict]) {
    if conflicts.is_empty() {
        return;
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Conflicts ({}):", conflicts.len());
    for conflict in conflicts {
        let _ = writeln!(out, "  {}: {}", conflict_label(conflict.kind), conflict.path);
    }
}

// =============================================================================
// TREE
// =============================================================================

/// Renders the tree with box-drawing guides, directories before files.
///
/// `max_depth` counts levels below the root; directories cut off by it show
/// how many entries were hidden.
pub fn render_tree(tree: &ResourceTree, options: ReportConfig) -> String {
    let mut out = String::new();
    let root = tree.root();
    out.push_str(&tree.node(root).name);

    if options.max_depth == Some(0) {
        write_hidden(&mut out, tree, root);
    } else {
        write_children(&mut out, tree, root, "", 0, options);
    }
    out
}

/// Children of `id` with directories first, each group in tree order.
fn display_order(tree: &ResourceTree, id: NodeId) -> Vec<NodeId> {
    let mut children: Vec<NodeId> = tree.children(id).collect();
    children.sort_by_key(|&child| !tree.node(child).is_dir());
    children
}

fn write_children(
    out: &mut String,
    tree: &ResourceTree,
    id: NodeId,
    prefix: &str,
    depth: usize,
    options: ReportConfig,
) {
    let children = display_order(tree, id);
    let count = children.len();

    for (index, child) in children.into_iter().enumerate() {
        let last = index + 1 == count;
        let node = tree.node(child);
        let branch = if last { "└── " } else { "├── " };
        let _ = write!(out, "\n{prefix}{branch}{}", node.name);

        if node.is_dir() {
            out.push(tree.separator());
            if node.children.is_empty() {
                continue;
            }
            if options.max_depth.is_some_and(|max| depth + 1 >= max) {
                write_hidden(out, tree, child);
            } else {
                let guide = if last { "    " } else { "│   " };
                write_children(out, tree, child, &format!("{prefix}{guide}"), depth + 1, options);
            }
            continue;
        }

        if options.show_sizes {
            if let Some(size) = node.size_bytes {
                let _ = write!(out, "  ({})", format_size(size));
            }
        }
        if let Some(tag) = node.tag {
            let _ = write!(out, "  [{tag}]");
        }
    }
}

fn write_hidden(out: &mut String, tree: &ResourceTree, id: NodeId) {
    let hidden = tree.node(id).children.len();
    if hidden > 0 {
        let _ = write!(out, "  ... {hidden} more");
    }
}

// =============================================================================
// MACHINE-READABLE REPORTS
// =============================================================================

/// Serializes the full report as pretty JSON.
pub fn json_report(report: &Report) -> serde_json::Result<String> {
    #[derive(Serialize)]
    struct JsonReport<'a> {
        base_url: &'a BaseUrl,
        stats: &'a RunStats,
        summary: &'a TreeSummary,
        conflicts: &'a [Conflict],
        tree: NestedNode,
        grouped_urls: BTreeMap<String, Vec<String>>,
        resources: &'a [ClassifiedResource],
    }

    let json = JsonReport {
        base_url: &report.base_url,
        stats: &report.stats,
        summary: &report.summary,
        conflicts: report.tree.conflicts(),
        tree: report.tree.to_nested(),
        grouped_urls: report.grouped_urls(),
        resources: &report.resources,
    };
    serde_json::to_string_pretty(&json)
}

/// Renders one CSV row per resource, in first-seen order.
pub fn csv_report(report: &Report) -> String {
    let mut out = String::from("url,path,status_code,size_bytes,is_dir,tag\n");

    for resource in &report.resources {
        let record = &resource.record;
        let url = escape_csv(&report.base_url.join(&record.path));
        let path = escape_csv(&record.path);
        let size = record.size_bytes.map(|s| s.to_string()).unwrap_or_default();
        let tag = resource.tag.map(|t| t.as_str()).unwrap_or_default();

        let _ = writeln!(
            out,
            "{url},{path},{},{size},{},{tag}",
            record.status_code, record.is_dir
        );
    }

    finish(out)
}

/// Escapes a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fm_core::Config;
    use fm_tree::Pipeline;

    const INPUT: &str = "\
200      GET     1234l      10w     512c http://h/app/config.php
200      GET     1234l      10w     256c http://h/app/Config.php
200      GET      900l       6w     300c http://h/app/readme.txt
200      GET        1l       1w    2048c http://h/app/js/main.js
200      GET        1l       1w      99c http://h/backup.zip
200      GET        1l       1w       0c http://h/img/
";

    fn report() -> Report {
        Pipeline::new(&Config::default())
            .unwrap()
            .run(INPUT.lines())
            .unwrap()
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_048_576), "1.0 MB");
        assert_eq!(format_size(1_073_741_824), "1.00 GB");
    }

    #[test]
    fn test_render_tree() {
        let text = render_tree(&report().tree, ReportConfig::default());
        insta::assert_snapshot!(text, @r"
        /
        ├── app/
        │   ├── js/
        │   │   └── main.js  (2.0 KB)
        │   ├── Config.php  (256 B)  [network_config]
        │   └── readme.txt  (300 B)
        ├── img/
        └── backup.zip  (99 B)  [archive]
        ");
    }

    #[test]
    fn test_render_tree_max_depth_without_sizes() {
        let options = ReportConfig {
            max_depth: Some(1),
            show_sizes: false,
        };
        let text = render_tree(&report().tree, options);
        insta::assert_snapshot!(text, @r"
        /
        ├── app/  ... 3 more
        ├── img/
        └── backup.zip  [archive]
        ");
    }

    #[test]
    fn test_render_tree_depth_zero() {
        let options = ReportConfig {
            max_depth: Some(0),
            show_sizes: true,
        };
        assert_eq!(render_tree(&report().tree, options), "/  ... 3 more");
    }

    #[test]
    fn test_render_summary() {
        let text = render_summary(&report(), false);
        insta::assert_snapshot!(text, @r"
        Scan Summary
        ============

        Base URL:            http://h
        Directories:         4
        Files:               4
        Duplicates removed:  1
        Foreign origin:      0
        Tree conflicts:      0

        Input lines:         6
          Parsed:            6
          Blank:             0
          No URL:            0
          No status:         0
          Status filtered:   0

        Interesting files (2):
          Configuration/Environment Files (1):
            http://h/app/Config.php  (256 B)
          Archive Files (1):
            http://h/backup.zip  (99 B)
        ");
    }

    #[test]
    fn test_render_summary_detailed() {
        let text = render_summary(&report(), true);
        let table: Vec<_> = text
            .split("Directory counts:\n")
            .nth(1)
            .unwrap()
            .lines()
            .collect();
        assert_eq!(
            table,
            vec![
                "  /            2 dirs     1 files",
                "  /app/        1 dirs     2 files",
                "  /app/js/     0 dirs     1 files",
                "  /img/        0 dirs     0 files",
            ]
        );
    }

    #[test]
    fn test_summary_lists_conflicts() {
        let report = Pipeline::new(&Config::default())
            .unwrap()
            .run(["200 GET 1l 1w 5c http://h/api", "200 GET 1l 1w 5c http://h/api/v1"])
            .unwrap();
        let text = render_summary(&report, true);
        assert!(text.ends_with("Conflicts (1):\n  file coerced to directory: /api/"));
    }

    #[test]
    fn test_csv_report() {
        let csv = csv_report(&report());
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "url,path,status_code,size_bytes,is_dir,tag");
        assert_eq!(
            lines[1],
            "http://h/app/Config.php,/app/Config.php,200,256,false,network_config"
        );
        assert_eq!(lines[2], "http://h/app/readme.txt,/app/readme.txt,200,300,false,");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_json_report() {
        let json: serde_json::Value = serde_json::from_str(&json_report(&report()).unwrap()).unwrap();

        assert_eq!(json["base_url"]["kind"], "detected");
        assert_eq!(json["base_url"]["origin"], "http://h");
        assert_eq!(json["summary"]["total_files"], 4);
        assert_eq!(json["stats"]["duplicates"], 1);
        assert_eq!(json["tree"]["name"], "/");
        assert_eq!(json["resources"][0]["path"], "/app/Config.php");
        assert_eq!(json["resources"][0]["tag"], "network_config");
        assert_eq!(json["grouped_urls"]["http://h/"][0], "http://h/backup.zip");
    }
}
