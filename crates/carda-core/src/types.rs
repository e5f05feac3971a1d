use serde::{Deserialize, Serialize};

/// The kind of content a layer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    /// Full-bleed canvas fill: color, optional image and pattern.
    Background,
    /// A raster image placed on the canvas.
    Image,
    /// A single styled text run.
    Text,
    /// Full-bleed decorative border ring.
    Frame,
}

impl LayerType {
    /// Background and frame layers always cover the whole canvas.
    pub fn is_full_bleed(&self) -> bool {
        matches!(self, LayerType::Background | LayerType::Frame)
    }
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Background => write!(f, "background"),
            LayerType::Image => write!(f, "image"),
            LayerType::Text => write!(f, "text"),
            LayerType::Frame => write!(f, "frame"),
        }
    }
}

/// Separable blend mode used when compositing a painted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    /// Standard alpha blending (Porter-Duff "over").
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
}

impl BlendMode {
    /// Blend a backdrop channel `cb` with a source channel `cs`, both in 0..1.
    pub fn apply(&self, cb: f32, cs: f32) -> f32 {
        match self {
            BlendMode::Normal => cs,
            BlendMode::Multiply => cb * cs,
            BlendMode::Screen => cb + cs - cb * cs,
            BlendMode::Overlay => {
                if cb <= 0.5 {
                    2.0 * cb * cs
                } else {
                    let cs2 = 2.0 * cs - 1.0;
                    cb + cs2 - cb * cs2
                }
            }
        }
    }
}
