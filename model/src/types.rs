//! Wire types for the document backend.
//!
//! These mirror the JSON bodies of the external REST service. Fields the
//! backend may omit are `Option` or `#[serde(default)]`; the dashboard never
//! assumes more than it renders.
//!
//! ## Main Categories
//!
//! - **Files**: file listing with per-path metadata, upload and removal
//! - **Categories**: AI generation, training, batch classification
//! - **Classification**: single-document classification and change history
//! - **Members**: account CRUD, admin listing, session
//! - **Statistics**: dashboard aggregates and processing logs

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Metadata the backend attaches to a file path.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct FileMetadata {
    #[serde(default)]
    pub doc_id: Option<i64>,
    #[serde(default)]
    pub ocr_completed: bool,
    #[serde(default)]
    pub is_classified: bool,
    #[serde(default)]
    pub agency: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub classified_date: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub full_path: Option<String>,
}

pub type MetadataMap = HashMap<String, FileMetadata>;

/// `GET /api/files` in its indexed form.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct FilesResponse {
    #[serde(default)]
    pub file_paths: Vec<String>,
    #[serde(default)]
    pub metadata: MetadataMap,
}

/// One row of the plain listing form of `GET /api/files`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FileEntry {
    #[serde(alias = "filename")]
    pub filepath: String,
    #[serde(default)]
    pub doc_id: Option<i64>,
    #[serde(default)]
    pub page_count: Option<u32>,
}

/// The backend answers `/api/files` either as `{file_paths, metadata}` or as
/// an array of `{filepath}` rows depending on the route version.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum FilesPayload {
    Indexed(FilesResponse),
    Listing(Vec<FileEntry>),
}

impl FilesPayload {
    /// Normalises both shapes into paths plus metadata.
    pub fn into_parts(self) -> (Vec<String>, MetadataMap) {
        match self {
            FilesPayload::Indexed(r) => (r.file_paths, r.metadata),
            FilesPayload::Listing(rows) => {
                let mut meta = MetadataMap::new();
                let mut paths = Vec::with_capacity(rows.len());
                for row in rows {
                    if row.doc_id.is_some() || row.page_count.is_some() {
                        meta.insert(
                            row.filepath.clone(),
                            FileMetadata { doc_id: row.doc_id, page_count: row.page_count, ..Default::default() },
                        );
                    }
                    paths.push(row.filepath);
                }
                (paths, meta)
            }
        }
    }
}

/// Looks up the `doc_id` of a file, matching either the relative listing path
/// or the stored `full_path`.
pub fn find_doc_id(metadata: &MetadataMap, path: &str) -> Option<i64> {
    if let Some(id) = metadata.get(path).and_then(|m| m.doc_id) {
        return Some(id);
    }
    metadata
        .values()
        .find(|m| m.full_path.as_deref() == Some(path))
        .and_then(|m| m.doc_id)
}

/// `POST /upload`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct UploadResponse {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub file_list: Option<Vec<String>>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub file_count: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// `DELETE /api/remove?path=`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RemoveResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Generic `{ success, error? }` body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SuccessResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// `POST /api/category/auto-generate`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AutoGenerateRequest {
    pub files: Vec<String>,
    pub level: u8,
}

/// `POST /api/category/train`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrainRequest {
    pub categories: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TrainResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub model_path: Option<String>,
    #[serde(default)]
    pub training_time: Option<f64>,
    #[serde(default)]
    pub total_samples: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `POST /api/category/classify-with-custom-model`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CustomClassifyRequest {
    pub model_path: String,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct CustomClassification {
    #[serde(default, alias = "file_path")]
    pub file: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct CustomClassifyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub classified_files: u64,
    #[serde(default)]
    pub total_files: u64,
    #[serde(default)]
    pub results: Vec<CustomClassification>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Per-axis confidence returned by the two-task classifier.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
pub struct FieldConfidence {
    #[serde(default, rename = "기관")]
    pub agency: Option<f64>,
    #[serde(default, rename = "문서유형")]
    pub document_type: Option<f64>,
}

/// `POST /api/classify/document`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ClassifyDocumentResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, rename = "기관")]
    pub agency: Option<String>,
    #[serde(default, rename = "문서유형")]
    pub document_type: Option<String>,
    #[serde(default)]
    pub confidence: Option<FieldConfidence>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Created,
    Updated,
    Deleted,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Created => "created",
            ChangeType::Updated => "updated",
            ChangeType::Deleted => "deleted",
        }
    }
}

/// One entry of `GET /api/history/list`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct HistoryItem {
    #[serde(default)]
    pub id: Option<i64>,
    pub file_name: String,
    #[serde(default)]
    pub original_path: Option<String>,
    pub full_path: String,
    #[serde(default)]
    pub agency: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub confidence: Option<FieldConfidence>,
    pub change_type: ChangeType,
    #[serde(default)]
    pub previous_category: Option<String>,
    #[serde(default)]
    pub change_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct HistoryListResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub history: Vec<HistoryItem>,
    #[serde(default)]
    pub error: Option<String>,
}

/// An account as returned by `/member/*` and `/admin/members`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Member {
    #[serde(default)]
    pub member_id: Option<i64>,
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub member_grade: Option<String>,
}

/// `GET /admin/members?skip&limit`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct MemberListResponse {
    #[serde(default)]
    pub items: Vec<Member>,
    #[serde(default, rename = "itemCount")]
    pub item_count: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct MemberCount {
    #[serde(default)]
    pub total_members: u64,
}

/// `POST /member/add`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct NewMember {
    pub id: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// `PUT /member/update`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct MemberUpdate {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoginRequest {
    pub id: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct LoginResponse {
    #[serde(default)]
    pub user: Option<Member>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// `GET /session/remaining`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SessionRemaining {
    #[serde(default)]
    pub remaining: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// FastAPI style `{ "detail": "..." }` error body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ErrorDetail {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorDetail {
    pub fn best_message(&self) -> Option<&str> {
        self.detail.as_deref().or(self.error.as_deref()).or(self.message.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct DailyCount {
    pub date: String,
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub updated: u64,
}

/// `GET /api/statistics/dashboard`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct DashboardStatistics {
    #[serde(default)]
    pub total_documents: u64,
    #[serde(default)]
    pub ocr_completed: u64,
    #[serde(default)]
    pub classified: u64,
    #[serde(default)]
    pub categories: u64,
    #[serde(default)]
    pub daily: Vec<DailyCount>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ProcessingLog {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `GET /api/statistics/processing-logs?limit`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ProcessingLogsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub logs: Vec<ProcessingLog>,
}
