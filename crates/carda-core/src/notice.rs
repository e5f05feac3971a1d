//! User-facing notices.
//!
//! The engine never produces display text. Anything a front end should show
//! is reported as a localization key plus a free-form detail for logs.

use serde::{Deserialize, Serialize};

pub const INVALID_PROJECT: &str = "common.invalid_project";
pub const PROJECT_LOADED: &str = "common.project_loaded";
pub const EXPORT_FAILED: &str = "common.export_failed";
pub const IMAGE_LOAD_FAILED: &str = "common.image_load_failed";
pub const FONT_MISSING: &str = "properties.font_missing";
pub const LOCAL_FONTS_BLOCKED: &str = "properties.local_fonts_blocked";
pub const OPERATION_FAILED: &str = "common.operation_failed";

/// A notice raised while loading assets or rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Localization key.
    pub key: String,
    /// Id of the layer the notice concerns, if any.
    pub layer: Option<String>,
    /// Diagnostic detail, not meant for display.
    pub detail: String,
}

impl Notice {
    pub fn new(key: &str, detail: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            layer: None,
            detail: detail.into(),
        }
    }

    pub fn for_layer(key: &str, layer: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            layer: Some(layer.into()),
            detail: detail.into(),
        }
    }
}
