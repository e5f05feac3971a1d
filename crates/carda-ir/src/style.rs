//! Style sub-configurations carried by layers.
//!
//! Colors stay as the strings found in project files so a load/save cycle
//! reproduces them exactly; they are parsed when a frame is rendered.

use serde::{Deserialize, Serialize};

fn full_opacity() -> f64 {
    100.0
}

/// Drop shadow offset from the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "ShadowConfig::default_color")]
    pub color: String,
    #[serde(default)]
    pub blur: f64,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
    #[serde(default = "full_opacity")]
    pub opacity: f64,
}

impl ShadowConfig {
    fn default_color() -> String {
        "#000000".to_string()
    }

    /// Shadow a freshly added text layer starts with.
    pub fn text_default() -> Self {
        Self {
            enabled: true,
            color: "rgba(0,0,0,0.8)".to_string(),
            blur: 4.0,
            offset_x: 2.0,
            offset_y: 2.0,
            opacity: 100.0,
        }
    }
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            color: Self::default_color(),
            blur: 10.0,
            offset_x: 0.0,
            offset_y: 0.0,
            opacity: 100.0,
        }
    }
}

/// Zero-offset halo around the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlowConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "white")]
    pub color: String,
    #[serde(default)]
    pub blur: f64,
    #[serde(default)]
    pub spread: f64,
}

fn white() -> String {
    "#ffffff".to_string()
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            color: white(),
            blur: 10.0,
            spread: 0.0,
        }
    }
}

/// Outline painted around an image's opaque pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "white")]
    pub color: String,
    #[serde(default)]
    pub width: f64,
    #[serde(default = "full_opacity")]
    pub opacity: f64,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            color: white(),
            width: 2.0,
            opacity: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Font and typographic settings of a text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextConfig {
    pub content: String,
    pub font_family: String,
    pub font_size: f64,
    pub color: String,
    pub bold: bool,
    pub italic: bool,
    pub align: TextAlign,
    pub letter_spacing: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect_preset_id: Option<String>,
    /// Kept verbatim across load/save; presets drive the rendered paint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_shadows: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient_layers: Option<serde_json::Value>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            content: "PLAYER NAME".to_string(),
            font_family: "Impact".to_string(),
            font_size: 40.0,
            color: white(),
            bold: false,
            italic: false,
            align: TextAlign::Center,
            letter_spacing: 2.0,
            effect_preset_id: None,
            blend_mode: None,
            multi_shadows: None,
            gradient_layers: None,
        }
    }
}

/// Watermark-style repeated text drawn over the background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatternConfig {
    pub enabled: bool,
    pub text: String,
    /// Font size in logical pixels.
    pub size: f64,
    /// 0..100
    pub opacity: f64,
    /// Degrees applied to every tile.
    pub rotation: f64,
    /// Horizontal spacing, percent of canvas width.
    pub gap_x: f64,
    /// Vertical spacing, percent of canvas height.
    pub gap_y: f64,
    pub color: String,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            text: "SPIE".to_string(),
            size: 24.0,
            opacity: 10.0,
            rotation: -15.0,
            gap_x: 20.0,
            gap_y: 20.0,
            color: white(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    #[default]
    Solid,
    Gradient,
}

/// Border ring drawn around the canvas edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameConfig {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: FrameKind,
    pub color: String,
    /// Second gradient stop; gradients fall back to `color` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color2: Option<String>,
    /// Ring thickness in logical pixels.
    pub width: f64,
    /// Corner radius, percent of the shorter canvas side (0..50).
    pub radius: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: FrameKind::Solid,
            color: white(),
            color2: None,
            width: 10.0,
            radius: 0.0,
        }
    }
}
