//! Change-history records: the write-back form sent after a successful
//! classification, and the read-side views over `/api/history/list`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{ModelError, ModelResult};
use crate::tree::{build_tree, file_name, top_level_folder, FolderNode};
use crate::types::{ChangeType, ClassifyDocumentResponse, FieldConfidence, HistoryItem, MetadataMap};

/// Path segment used when the classifier left an axis empty.
pub const UNKNOWN_SEGMENT: &str = "unknown";

/// One `multipart/form-data` submission to `POST /api/history/add`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub doc_id: i64,
    pub file_name: String,
    pub full_path: String,
    pub original_path: String,
    pub agency: String,
    pub document_type: String,
    pub confidence: FieldConfidence,
    pub change_type: ChangeType,
}

impl HistoryRecord {
    /// Builds the record for a freshly classified file.
    ///
    /// The classified location is `<top-level folder>/<agency>/<document type>/<file name>`;
    /// a file uploaded without a folder drops the first segment.
    pub fn from_classification(doc_id: i64, source_path: &str, resp: &ClassifyDocumentResponse) -> ModelResult<Self> {
        if !resp.success {
            return Err(ModelError::Backend(resp.error.clone().unwrap_or_else(|| "classification failed".into())));
        }
        let name = file_name(source_path).to_string();
        let original = top_level_folder(source_path).unwrap_or_default().to_string();
        let agency = non_blank(resp.agency.as_deref());
        let document_type = non_blank(resp.document_type.as_deref());

        let full_path = [original.as_str(), agency.as_str(), document_type.as_str(), name.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("/");

        Ok(Self {
            doc_id,
            file_name: name,
            full_path,
            original_path: original,
            agency,
            document_type,
            confidence: resp.confidence.unwrap_or_default(),
            change_type: ChangeType::Created,
        })
    }

    /// Form fields in submission order.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("doc_id", self.doc_id.to_string()),
            ("file_name", self.file_name.clone()),
            ("full_path", self.full_path.clone()),
            ("original_path", self.original_path.clone()),
            ("agency", self.agency.clone()),
            ("document_type", self.document_type.clone()),
            ("confidence_agency", fmt_confidence(self.confidence.agency)),
            ("confidence_document_type", fmt_confidence(self.confidence.document_type)),
            ("change_type", self.change_type.as_str().to_string()),
        ]
    }
}

fn non_blank(v: Option<&str>) -> String {
    match v.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => UNKNOWN_SEGMENT.to_string(),
    }
}

fn fmt_confidence(v: Option<f64>) -> String {
    v.map(|c| c.to_string()).unwrap_or_default()
}

/// Classified locations of history entries as a browsable tree.
pub fn history_tree(items: &[HistoryItem]) -> Vec<FolderNode> {
    let paths: Vec<&str> = items.iter().map(|i| i.full_path.as_str()).collect();
    build_tree(&paths, &MetadataMap::new())
}

/// Entry counts per first segment of the classified path, for the folder cards.
pub fn history_counts_by_top_folder(items: &[HistoryItem]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for item in items {
        let top = item.full_path.split('/').find(|s| !s.is_empty()).unwrap_or_default();
        *counts.entry(top.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Entries whose classified path lies under `folder`.
pub fn history_in_folder<'a>(items: &'a [HistoryItem], folder: &str) -> Vec<&'a HistoryItem> {
    let prefix = format!("{}/", folder.trim_end_matches('/'));
    items.iter().filter(|i| i.full_path.starts_with(&prefix)).collect()
}
