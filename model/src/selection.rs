//! Checkbox state over a folder tree.

use std::collections::HashSet;

use crate::tree::{all_files, collect_files, collect_folders, FolderNode};

/// Selected file ids and, when folder tracking is on, selected folder ids.
///
/// All mutations only touch these two sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    files: HashSet<String>,
    folders: HashSet<String>,
    track_folders: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variant used by the document screen, which also remembers folder ids.
    pub fn with_folder_tracking() -> Self {
        Self { track_folders: true, ..Self::default() }
    }

    pub fn toggle_file(&mut self, id: &str) {
        if !self.files.remove(id) {
            self.files.insert(id.to_string());
        }
    }

    /// Selects every descendant file of `node` unless all of them already are,
    /// in which case they are all deselected.
    pub fn toggle_folder(&mut self, node: &FolderNode) {
        if node.is_file() {
            self.toggle_file(&node.id);
            return;
        }
        let files = collect_files(node);
        let fully_selected = if self.track_folders && files.is_empty() {
            // nothing to check below it, so the folder id itself decides
            self.folders.contains(&node.id)
        } else {
            self.is_checked(node)
        };
        for f in &files {
            if fully_selected {
                self.files.remove(&f.id);
            } else {
                self.files.insert(f.id.clone());
            }
        }
        if self.track_folders {
            for folder in collect_folders(node) {
                if fully_selected {
                    self.folders.remove(&folder.id);
                } else {
                    self.folders.insert(folder.id.clone());
                }
            }
        }
    }

    /// A file is checked when selected; a folder when it has at least one file
    /// below it and every one of them is selected.
    pub fn is_checked(&self, node: &FolderNode) -> bool {
        if node.is_file() {
            return self.files.contains(&node.id);
        }
        let files = collect_files(node);
        !files.is_empty() && files.iter().all(|f| self.files.contains(&f.id))
    }

    /// True when some but not all files below `node` are selected.
    pub fn is_partial(&self, node: &FolderNode) -> bool {
        if node.is_file() {
            return false;
        }
        let files = collect_files(node);
        let selected = files.iter().filter(|f| self.files.contains(&f.id)).count();
        selected > 0 && selected < files.len()
    }

    pub fn is_file_selected(&self, id: &str) -> bool {
        self.files.contains(id)
    }

    pub fn is_folder_selected(&self, id: &str) -> bool {
        self.folders.contains(id)
    }

    pub fn selected_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn folder_ids(&self) -> impl Iterator<Item = &str> {
        self.folders.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.files.clear();
        self.folders.clear();
    }

    /// Selected file paths in tree order, ignoring ids no longer in `forest`.
    pub fn selected_paths(&self, forest: &[FolderNode]) -> Vec<String> {
        all_files(forest)
            .into_iter()
            .filter(|f| self.files.contains(&f.id))
            .map(|f| f.path.clone())
            .collect()
    }
}
