//! Folder tree construction from flat slash-delimited path lists.
//!
//! Every browsing screen renders the same shape: a forest of top-level nodes
//! (no synthetic `/` root). Node ids are the cumulative path, so the same input
//! always yields the same ids and child order.

use serde::Serialize;

use crate::types::{FileMetadata, MetadataMap};

/// Segment the backend stores to keep otherwise empty folders registered.
pub const FOLDER_PLACEHOLDER: &str = ".folder_placeholder";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Folder { children: Vec<FolderNode> },
    File { meta: FileMetadata },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderNode {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl FolderNode {
    fn folder(path: String, name: &str) -> Self {
        Self { id: path.clone(), name: name.to_string(), path, kind: NodeKind::Folder { children: Vec::new() } }
    }

    fn file(path: String, name: &str, meta: FileMetadata) -> Self {
        Self { id: path.clone(), name: name.to_string(), path, kind: NodeKind::File { meta } }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    pub fn is_folder(&self) -> bool {
        !self.is_file()
    }

    pub fn children(&self) -> &[FolderNode] {
        match &self.kind {
            NodeKind::Folder { children } => children,
            NodeKind::File { .. } => &[],
        }
    }

    pub fn meta(&self) -> Option<&FileMetadata> {
        match &self.kind {
            NodeKind::File { meta } => Some(meta),
            NodeKind::Folder { .. } => None,
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<FolderNode>> {
        match &mut self.kind {
            NodeKind::Folder { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }
}

/// Builds the forest for `paths`, attaching file metadata by path.
///
/// Empty segments are dropped, empty paths are skipped, and the placeholder
/// segment never becomes a node. A final segment starting with `.` names a
/// hidden folder rather than a file. A placeholder in the middle of a path
/// is skipped too, so `a/.folder_placeholder/b.pdf` becomes `a/b.pdf`; its
/// metadata is still looked up under the raw path first.
pub fn build_tree<S: AsRef<str>>(paths: &[S], metadata: &MetadataMap) -> Vec<FolderNode> {
    let mut roots: Vec<FolderNode> = Vec::new();

    for raw in paths {
        let parts: Vec<&str> = raw.as_ref().split('/').map(str::trim).filter(|p| !p.is_empty()).collect();
        if parts.is_empty() {
            continue;
        }
        insert_path(&mut roots, raw.as_ref(), &parts, metadata);
    }

    tracing::debug!(inputs = paths.len(), roots = roots.len(), "folder tree built");
    roots
}

fn insert_path(roots: &mut Vec<FolderNode>, raw: &str, parts: &[&str], metadata: &MetadataMap) {
    // a trailing placeholder registers the folders above it and nothing else
    let ends_in_placeholder = parts.last() == Some(&FOLDER_PLACEHOLDER);
    let visible: Vec<&str> = parts.iter().copied().filter(|p| *p != FOLDER_PLACEHOLDER).collect();
    if visible.is_empty() {
        return;
    }

    let mut level = roots;
    let last = visible.len() - 1;

    for (index, part) in visible.iter().enumerate() {
        let is_file = index == last && !ends_in_placeholder && !part.starts_with('.');
        let pos = match level.iter().position(|n| n.name == *part) {
            Some(pos) => pos,
            None => {
                let node_path = visible[..=index].join("/");
                let node = if is_file {
                    let meta = metadata.get(raw).or_else(|| metadata.get(&node_path)).cloned().unwrap_or_default();
                    FolderNode::file(node_path, part, meta)
                } else {
                    FolderNode::folder(node_path, part)
                };
                level.push(node);
                level.len() - 1
            }
        };
        match level[pos].children_mut() {
            Some(children) => level = children,
            // a file with the same name as an intermediate segment stops the walk
            None => return,
        }
    }
}

/// All descendant files of `node` in tree order (the node itself if it is a file).
pub fn collect_files(node: &FolderNode) -> Vec<&FolderNode> {
    let mut out = Vec::new();
    collect_files_into(node, &mut out);
    out
}

fn collect_files_into<'a>(node: &'a FolderNode, out: &mut Vec<&'a FolderNode>) {
    match &node.kind {
        NodeKind::File { .. } => out.push(node),
        NodeKind::Folder { children } => {
            for child in children {
                collect_files_into(child, out);
            }
        }
    }
}

/// Every file in the forest, in tree order.
pub fn all_files(forest: &[FolderNode]) -> Vec<&FolderNode> {
    forest.iter().flat_map(collect_files).collect()
}

/// All descendant folders of `node`, including itself when it is a folder.
pub fn collect_folders(node: &FolderNode) -> Vec<&FolderNode> {
    let mut out = Vec::new();
    let mut stack = vec![node];
    while let Some(n) = stack.pop() {
        if n.is_folder() {
            out.push(n);
            for child in n.children().iter().rev() {
                stack.push(child);
            }
        }
    }
    out
}

pub fn find_node<'a>(forest: &'a [FolderNode], id: &str) -> Option<&'a FolderNode> {
    for node in forest {
        if node.id == id {
            return Some(node);
        }
        // ids are cumulative paths, so only descend into a matching prefix
        if node.is_folder() && id.starts_with(&format!("{}/", node.id)) {
            return find_node(node.children(), id);
        }
    }
    None
}

/// The tree restricted to one top-level folder.
pub fn subtree(forest: &[FolderNode], top_name: &str) -> Vec<FolderNode> {
    forest.iter().filter(|n| n.name == top_name).cloned().collect()
}

/// Case-insensitive name search.
///
/// A folder whose name matches is kept whole; otherwise it is kept with only
/// the descendants that match. Files are kept when their name matches.
pub fn filter_tree(forest: &[FolderNode], term: &str) -> Vec<FolderNode> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return forest.to_vec();
    }
    forest.iter().filter_map(|n| filter_node(n, &term)).collect()
}

fn filter_node(node: &FolderNode, term: &str) -> Option<FolderNode> {
    if node.name.to_lowercase().contains(term) {
        return Some(node.clone());
    }
    match &node.kind {
        NodeKind::File { .. } => None,
        NodeKind::Folder { children } => {
            let kept: Vec<FolderNode> = children.iter().filter_map(|c| filter_node(c, term)).collect();
            if kept.is_empty() {
                None
            } else {
                Some(FolderNode { kind: NodeKind::Folder { children: kept }, ..node.clone() })
            }
        }
    }
}

/// File counts for one top-level folder card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderSummary {
    pub name: String,
    pub total_files: usize,
    pub ocr_completed_files: usize,
    pub classified_files: usize,
}

pub fn top_level_summaries(forest: &[FolderNode]) -> Vec<FolderSummary> {
    forest
        .iter()
        .filter(|n| n.is_folder())
        .map(|n| {
            let files = collect_files(n);
            FolderSummary {
                name: n.name.clone(),
                total_files: files.len(),
                ocr_completed_files: files.iter().filter(|f| f.meta().is_some_and(|m| m.ocr_completed)).count(),
                classified_files: files.iter().filter(|f| f.meta().is_some_and(|m| m.is_classified)).count(),
            }
        })
        .collect()
}

/// The first segment of a path, i.e. the top-level folder it was uploaded into.
pub fn top_level_folder(path: &str) -> Option<&str> {
    let mut parts = path.split('/').filter(|p| !p.is_empty());
    let first = parts.next()?;
    // a bare file name has no folder
    parts.next().map(|_| first)
}

/// Last segment of a path, accepting either separator.
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).find(|s| !s.is_empty()).unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(nodes: &[FolderNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn builds_shared_prefixes_in_first_seen_order() {
        let tree = build_tree(&["a/b/c.pdf", "a/b/d.pdf", "a/e.pdf"], &MetadataMap::new());
        assert_eq!(names(&tree), vec!["a"]);
        let a = &tree[0];
        assert!(a.is_folder());
        assert_eq!(names(a.children()), vec!["b", "e.pdf"]);
        let b = &a.children()[0];
        assert!(b.is_folder());
        assert_eq!(b.id, "a/b");
        assert_eq!(names(b.children()), vec!["c.pdf", "d.pdf"]);
        assert!(b.children().iter().all(|n| n.is_file()));
        assert!(a.children()[1].is_file());
        assert_eq!(a.children()[1].path, "a/e.pdf");
    }

    #[test]
    fn building_twice_is_identical() {
        let paths = ["x/1.pdf", "y/z/2.pdf", "x/w/3.pdf", "y/4.pdf", "x/1.pdf"];
        let meta = MetadataMap::new();
        assert_eq!(build_tree(&paths, &meta), build_tree(&paths, &meta));
    }

    #[test]
    fn duplicate_paths_collapse() {
        let tree = build_tree(&["a/b.pdf", "a/b.pdf"], &MetadataMap::new());
        assert_eq!(tree[0].children().len(), 1);
    }

    #[test]
    fn placeholder_segment_is_not_a_node() {
        let tree = build_tree(&["docs/empty/.folder_placeholder", "docs/keep.pdf", "docs/.folder_placeholder"], &MetadataMap::new());
        let docs = &tree[0];
        assert_eq!(names(docs.children()), vec!["empty", "keep.pdf"]);
        let empty = &docs.children()[0];
        assert!(empty.is_folder());
        assert!(empty.children().is_empty());
        assert!(find_node(&tree, "docs/.folder_placeholder").is_none());
    }

    #[test]
    fn mid_path_placeholder_keeps_raw_metadata() {
        let mut meta = MetadataMap::new();
        meta.insert("a/.folder_placeholder/b.pdf".into(), FileMetadata { doc_id: Some(9), ..Default::default() });
        let tree = build_tree(&["a/.folder_placeholder/b.pdf"], &meta);
        let file = find_node(&tree, "a/b.pdf").unwrap();
        assert_eq!(file.path, "a/b.pdf");
        assert_eq!(file.meta().unwrap().doc_id, Some(9));
        assert_eq!(names(tree[0].children()), vec!["b.pdf"]);
    }

    #[test]
    fn bare_name_is_top_level_file() {
        let tree = build_tree(&["loose.pdf", "dir/inner.pdf"], &MetadataMap::new());
        assert_eq!(names(&tree), vec!["loose.pdf", "dir"]);
        assert!(tree[0].is_file());
    }

    #[test]
    fn hidden_last_segment_is_folder() {
        let tree = build_tree(&["a/.cache"], &MetadataMap::new());
        assert!(tree[0].children()[0].is_folder());
    }

    #[test]
    fn empty_paths_and_segments_are_filtered() {
        let tree = build_tree(&["", "   ", "/a//b.pdf/"], &MetadataMap::new());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children()[0].id, "a/b.pdf");
    }

    #[test]
    fn metadata_attached_to_files() {
        let mut meta = MetadataMap::new();
        meta.insert("a/b.pdf".into(), FileMetadata { ocr_completed: true, doc_id: Some(5), ..Default::default() });
        let tree = build_tree(&["a/b.pdf"], &meta);
        let file = find_node(&tree, "a/b.pdf").unwrap();
        assert_eq!(file.meta().unwrap().doc_id, Some(5));
        assert!(tree[0].meta().is_none());
    }

    #[test]
    fn collect_files_in_tree_order() {
        let tree = build_tree(&["a/b/c.pdf", "a/b/d.pdf", "a/e.pdf"], &MetadataMap::new());
        let ids: Vec<&str> = collect_files(&tree[0]).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a/b/c.pdf", "a/b/d.pdf", "a/e.pdf"]);
        let folders: Vec<&str> = collect_folders(&tree[0]).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(folders, vec!["a", "a/b"]);
    }

    #[test]
    fn filter_keeps_matching_folder_whole() {
        let tree = build_tree(&["Reports/q1.pdf", "Reports/q2.pdf", "misc/report-old.pdf", "misc/other.pdf"], &MetadataMap::new());
        let filtered = filter_tree(&tree, "report");
        assert_eq!(names(&filtered), vec!["Reports", "misc"]);
        assert_eq!(filtered[0].children().len(), 2);
        assert_eq!(names(filtered[1].children()), vec!["report-old.pdf"]);
        assert_eq!(filter_tree(&tree, "  "), tree);
        assert!(filter_tree(&tree, "zzz").is_empty());
    }

    #[test]
    fn summaries_count_metadata_flags() {
        let mut meta = MetadataMap::new();
        meta.insert("a/1.pdf".into(), FileMetadata { ocr_completed: true, is_classified: true, ..Default::default() });
        meta.insert("a/x/2.pdf".into(), FileMetadata { ocr_completed: true, ..Default::default() });
        let tree = build_tree(&["a/1.pdf", "a/x/2.pdf", "a/3.pdf", "b/.folder_placeholder", "top.pdf"], &meta);
        let s = top_level_summaries(&tree);
        assert_eq!(s.len(), 2);
        assert_eq!(s[0], FolderSummary { name: "a".into(), total_files: 3, ocr_completed_files: 2, classified_files: 1 });
        assert_eq!(s[1].total_files, 0);
    }

    #[test]
    fn path_helpers() {
        assert_eq!(top_level_folder("a/b/c.pdf"), Some("a"));
        assert_eq!(top_level_folder("c.pdf"), None);
        assert_eq!(file_name("a/b/c.pdf"), "c.pdf");
        assert_eq!(file_name("C:\\x\\y.pdf"), "y.pdf");
        assert_eq!(subtree(&build_tree(&["a/1", "b/2"], &MetadataMap::new()), "b")[0].name, "b");
    }
}
