use thiserror::Error;

/// Errors surfaced by the dashboard core.
///
/// None of these are fatal: every caller reports them inline (toast, alert or
/// field message) and leaves its state machine in the current step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A form field or wizard precondition failed before any request was sent.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },
    /// A wizard action that is not allowed from the current step.
    #[error("cannot {action} from step '{from}'")]
    InvalidTransition { from: &'static str, action: &'static str },
    /// The backend answered, but not with the JSON we expected.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// The backend answered with `success: false` or a non-2xx status.
    #[error("backend error: {0}")]
    Backend(String),
    /// The request never completed.
    #[error("network error: {0}")]
    Transport(String),
}

impl ModelError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ModelError::Validation { field: field.to_string(), message: message.into() }
    }

    /// Message suitable for a toast or an alert box.
    pub fn user_message(&self) -> String {
        match self {
            ModelError::Validation { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type ModelResult<T> = Result<T, ModelError>;
