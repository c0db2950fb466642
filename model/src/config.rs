use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Runtime settings the host serves at `/ui-config.json` and the web UI reads
/// on startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Origin of the document backend, e.g. `http://localhost:8000`.
    pub backend_origin: String,
    pub session_poll_secs: u32,
    pub history_limit: u32,
    pub processing_logs_limit: u32,
    pub admin_page_size: u32,
    /// Seed for the batch ETA until the first file finishes.
    pub default_item_secs: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            backend_origin: "http://localhost:8000".to_string(),
            session_poll_secs: 10,
            history_limit: 100,
            processing_logs_limit: 50,
            admin_page_size: 10,
            default_item_secs: 20,
        }
    }
}

impl UiConfig {
    pub fn validate(&self) -> ModelResult<()> {
        let origin = self.backend_origin.trim();
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            return Err(ModelError::validation("backend_origin", "must start with http:// or https://"));
        }
        for (field, v) in [
            ("session_poll_secs", self.session_poll_secs),
            ("history_limit", self.history_limit),
            ("processing_logs_limit", self.processing_logs_limit),
            ("admin_page_size", self.admin_page_size),
            ("default_item_secs", self.default_item_secs),
        ] {
            if v == 0 {
                return Err(ModelError::validation(field, "must be > 0"));
            }
        }
        Ok(())
    }

    /// `backend_origin` joined with an absolute path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.backend_origin.trim().trim_end_matches('/'), path.trim_start_matches('/'))
    }
}
