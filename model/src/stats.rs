//! Classification statistics derived from the file tree's metadata.

use std::collections::HashMap;

use serde::Serialize;

use crate::tree::{all_files, collect_files, FolderNode};

pub const UNCLASSIFIED: &str = "Unclassified";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub name: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderStats {
    pub name: String,
    pub total_files: usize,
    pub classified_files: usize,
    pub unclassified_files: usize,
    pub classification_rate: f64,
    pub categories: Vec<CategoryShare>,
}

/// Which metadata field a share is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Agency,
    DocumentType,
}

fn category_of(file: &FolderNode, by: GroupBy) -> Option<&str> {
    let meta = file.meta()?;
    if !meta.is_classified {
        return None;
    }
    let v = match by {
        GroupBy::Agency => meta.agency.as_deref(),
        GroupBy::DocumentType => meta.document_type.as_deref(),
    };
    v.map(str::trim).filter(|s| !s.is_empty())
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Shares sorted by count (largest first, ties by name) with the unclassified
/// bucket always last.
pub fn category_shares(files: &[&FolderNode], by: GroupBy) -> Vec<CategoryShare> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut unclassified = 0;
    for f in files {
        match category_of(f, by) {
            Some(c) => *counts.entry(c).or_insert(0) += 1,
            None => unclassified += 1,
        }
    }
    let total = files.len();
    let mut shares: Vec<CategoryShare> = counts
        .into_iter()
        .map(|(name, count)| CategoryShare { name: name.to_string(), count, percentage: percent(count, total) })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    if unclassified > 0 {
        shares.push(CategoryShare {
            name: UNCLASSIFIED.to_string(),
            count: unclassified,
            percentage: percent(unclassified, total),
        });
    }
    shares
}

/// One entry per top-level folder, in tree order.
pub fn folder_stats(forest: &[FolderNode], by: GroupBy) -> Vec<FolderStats> {
    forest
        .iter()
        .filter(|n| n.is_folder())
        .map(|folder| {
            let files = collect_files(folder);
            let classified = files.iter().filter(|f| category_of(f, by).is_some()).count();
            FolderStats {
                name: folder.name.clone(),
                total_files: files.len(),
                classified_files: classified,
                unclassified_files: files.len() - classified,
                classification_rate: percent(classified, files.len()),
                categories: category_shares(&files, by),
            }
        })
        .collect()
}

/// Shares across every file in the forest.
pub fn overall_shares(forest: &[FolderNode], by: GroupBy) -> Vec<CategoryShare> {
    category_shares(&all_files(forest), by)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_tree;
    use crate::types::{FileMetadata, MetadataMap};

    fn classified(doc_type: &str) -> FileMetadata {
        FileMetadata { is_classified: true, document_type: Some(doc_type.into()), ..FileMetadata::default() }
    }

    fn forest() -> Vec<FolderNode> {
        let mut meta = MetadataMap::new();
        meta.insert("fin/1.pdf".into(), classified("Report"));
        meta.insert("fin/2.pdf".into(), classified("Report"));
        meta.insert("fin/3.pdf".into(), classified("Bill"));
        meta.insert("hr/a.pdf".into(), classified("Bill"));
        build_tree(&["fin/1.pdf", "fin/2.pdf", "fin/3.pdf", "fin/4.pdf", "hr/a.pdf", "loose.pdf"], &meta)
    }

    #[test]
    fn per_folder_counts_and_rate() {
        let stats = folder_stats(&forest(), GroupBy::DocumentType);
        assert_eq!(stats.len(), 2);
        let fin = &stats[0];
        assert_eq!((fin.total_files, fin.classified_files, fin.unclassified_files), (4, 3, 1));
        assert_eq!(fin.classification_rate, 75.0);
        let names: Vec<&str> = fin.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Report", "Bill", UNCLASSIFIED]);
        assert_eq!(fin.categories[0].percentage, 50.0);
    }

    #[test]
    fn overall_includes_loose_files() {
        let shares = overall_shares(&forest(), GroupBy::DocumentType);
        let total: usize = shares.iter().map(|s| s.count).sum();
        assert_eq!(total, 6);
        assert_eq!(shares.last().unwrap().count, 2);
    }

    #[test]
    fn grouping_by_agency_without_agencies_is_all_unclassified() {
        let stats = folder_stats(&forest(), GroupBy::Agency);
        assert_eq!(stats[1].classified_files, 0);
        assert_eq!(stats[1].categories, vec![CategoryShare { name: UNCLASSIFIED.into(), count: 1, percentage: 100.0 }]);
    }

    #[test]
    fn empty_folder_has_zero_rate() {
        let stats = folder_stats(&build_tree(&["e/.folder_placeholder"], &MetadataMap::new()), GroupBy::Agency);
        assert_eq!(stats[0].classification_rate, 0.0);
        assert!(stats[0].categories.is_empty());
    }
}
