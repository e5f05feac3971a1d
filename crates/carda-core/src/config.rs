use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CardaError, CardaResult};

/// Default file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "carda.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Multiplier applied to the logical canvas size on export.
    pub export_pixel_ratio: f64,
    /// Font family used when a text layer names a family that is not loaded.
    pub default_font: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            export_pixel_ratio: 2.0,
            default_font: None,
        }
    }
}

impl RenderConfig {
    /// Export pixel ratio, falling back to 2 for non-positive or non-finite values.
    pub fn pixel_ratio(&self) -> f64 {
        if self.export_pixel_ratio.is_finite() && self.export_pixel_ratio > 0.0 {
            self.export_pixel_ratio
        } else {
            2.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directories scanned for `.ttf` / `.otf` fonts.
    pub font_dirs: Vec<PathBuf>,
    /// Directory of general preset backgrounds.
    pub general_backgrounds: Option<PathBuf>,
    /// Directory of national preset backgrounds.
    pub nation_backgrounds: Option<PathBuf>,
    /// JSON file with additional text effect presets.
    pub text_presets: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct CardaConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
}

impl CardaConfig {
    pub fn from_toml_str(contents: &str) -> CardaResult<Self> {
        toml::from_str(contents).map_err(|e| CardaError::Config(e.to_string()))
    }

    pub fn load_from_file(path: &Path) -> CardaResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&contents)?;
        config.resolve_relative_paths(path.parent().unwrap_or_else(|| Path::new(".")));
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> CardaResult<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| CardaError::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Make relative asset paths relative to the config file's directory.
    fn resolve_relative_paths(&mut self, base: &Path) {
        let fix = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        self.assets.font_dirs.iter_mut().for_each(fix);
        if let Some(p) = self.assets.general_backgrounds.as_mut() {
            fix(p);
        }
        if let Some(p) = self.assets.nation_backgrounds.as_mut() {
            fix(p);
        }
        if let Some(p) = self.assets.text_presets.as_mut() {
            fix(p);
        }
    }
}
