/// Core error types for the Carda engine.
use std::path::PathBuf;

use crate::notice;

/// A specialized Result type for Carda operations.
pub type CardaResult<T> = Result<T, CardaError>;

/// Top-level error type encompassing all Carda subsystems.
#[derive(Debug, thiserror::Error)]
pub enum CardaError {
    #[error("invalid project: {0}")]
    InvalidProject(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("export error: {0}")]
    Export(String),

    #[error("an export is already in progress")]
    ExportInProgress,

    #[error("asset error: {message} ({path:?})")]
    Asset { message: String, path: PathBuf },

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported feature: {0}")]
    Unsupported(String),
}

impl CardaError {
    /// Create an asset error.
    pub fn asset(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        CardaError::Asset {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create an invalid-project error.
    pub fn invalid_project(message: impl Into<String>) -> Self {
        CardaError::InvalidProject(message.into())
    }

    /// Localization key a front end shows for this error.
    pub fn notice_key(&self) -> &'static str {
        match self {
            CardaError::InvalidProject(_)
            | CardaError::Validation(_)
            | CardaError::Serialization(_) => notice::INVALID_PROJECT,
            CardaError::Asset { .. } => notice::IMAGE_LOAD_FAILED,
            CardaError::Export(_) | CardaError::ExportInProgress => notice::EXPORT_FAILED,
            CardaError::Unsupported(_) => notice::LOCAL_FONTS_BLOCKED,
            CardaError::Render(_)
            | CardaError::Config(_)
            | CardaError::Io(_)
            | CardaError::InvalidArgument(_) => notice::OPERATION_FAILED,
        }
    }
}
