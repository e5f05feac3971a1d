use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use carda_core::{CardaError, CardaResult};

use crate::canvas::CanvasConfig;
use crate::layer::Layer;

/// Format version written into saved projects.
pub const SNAPSHOT_VERSION: &str = "1.2.0";

/// Saved state of a composition: canvas plus the ordered layer list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    #[serde(default)]
    pub version: String,
    /// Save time, milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
    pub canvas_config: CanvasConfig,
    /// Bottom-most layer first.
    pub layers: Vec<Layer>,
}

impl ProjectSnapshot {
    /// Snapshot `layers` and `canvas` stamped with the current time.
    pub fn capture(canvas: &CanvasConfig, layers: &[Layer]) -> Self {
        Self::capture_at(canvas, layers, Utc::now())
    }

    pub fn capture_at(canvas: &CanvasConfig, layers: &[Layer], at: DateTime<Utc>) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            timestamp: at.timestamp_millis(),
            canvas_config: canvas.clone(),
            layers: layers.to_vec(),
        }
    }

    /// Parse a snapshot. Files without `layers` or `canvasConfig`, or whose
    /// contents do not match the layer model, are rejected as invalid projects.
    pub fn from_json(json: &str) -> CardaResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| CardaError::invalid_project(format!("not JSON: {}", e)))?;
        for key in ["layers", "canvasConfig"] {
            if value.get(key).map_or(true, |v| v.is_null()) {
                return Err(CardaError::invalid_project(format!("missing `{}`", key)));
            }
        }
        serde_json::from_value(value).map_err(|e| CardaError::invalid_project(e.to_string()))
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> CardaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_file(path: &Path) -> CardaResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json(&contents)?;
        tracing::info!(
            "loaded project {} ({} layers, {})",
            path.display(),
            snapshot.layers.len(),
            snapshot.canvas_config.aspect_ratio
        );
        Ok(snapshot)
    }

    pub fn save_file(&self, path: &Path) -> CardaResult<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        tracing::info!("saved project {}", path.display());
        Ok(())
    }
}

/// File name offered when saving a project on `date`.
pub fn suggested_file_name(date: NaiveDate) -> String {
    format!("carda-project-{}.json", date.format("%Y-%m-%d"))
}
