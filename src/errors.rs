use thiserror::Error;

/// Top-level application error.
/// All variants carry a human-readable message for display/logging.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Lookup errors ────────────────────────────────────────────────────────
    #[error("Lookup request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} responded with status {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Could not parse response from {source_name}: {message}")]
    Parse { source_name: String, message: String },

    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    // ── Validation errors ────────────────────────────────────────────────────
    #[error("Field '{field_name}' exceeds max length of {max_length} (actual: {actual_length})")]
    FieldTooLong { field_name: String, max_length: usize, actual_length: usize },
}

impl AppError {
    pub fn parse(source_name: impl Into<String>, message: impl ToString) -> Self {
        AppError::Parse { source_name: source_name.into(), message: message.to_string() }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::FieldTooLong { .. })
    }
}
