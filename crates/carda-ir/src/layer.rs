use serde::{Deserialize, Serialize};

use carda_core::LayerType;

use crate::style::{FrameConfig, GlowConfig, PatternConfig, ShadowConfig, StrokeConfig, TextConfig};

/// Unique identifier for a layer. Generated once, never changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Type-specific payload of a layer. Serialized with a `type` tag inside the
/// layer object itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayerContent {
    /// Full-bleed fill. Ignores position, size and rotation.
    #[serde(rename_all = "camelCase")]
    Background {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        background_color: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src: Option<String>,
        /// Percent, 100..200.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        background_scale: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern_config: Option<PatternConfig>,
    },
    /// Raster image, contain-fit inside the layer box.
    #[serde(rename_all = "camelCase")]
    Image {
        #[serde(default)]
        src: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        shadow: Option<ShadowConfig>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        glow: Option<GlowConfig>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke: Option<StrokeConfig>,
    },
    /// Single line of styled text.
    #[serde(rename_all = "camelCase")]
    Text {
        #[serde(default)]
        text_config: TextConfig,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        shadow: Option<ShadowConfig>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        glow: Option<GlowConfig>,
    },
    /// Full-bleed border ring. Never interactive.
    #[serde(rename_all = "camelCase")]
    Frame {
        #[serde(default)]
        frame_config: FrameConfig,
    },
}

impl LayerContent {
    pub fn layer_type(&self) -> LayerType {
        match self {
            LayerContent::Background { .. } => LayerType::Background,
            LayerContent::Image { .. } => LayerType::Image,
            LayerContent::Text { .. } => LayerType::Text,
            LayerContent::Frame { .. } => LayerType::Frame,
        }
    }
}

fn yes() -> bool {
    true
}

fn unit_scale() -> f64 {
    1.0
}

fn full_opacity() -> f64 {
    100.0
}

/// One visual element of the composition.
///
/// Position is the layer's center in percent of the canvas; `width`/`height`
/// are percent of the canvas, with `0` meaning "size from content".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    /// Unique layer identifier.
    pub id: LayerId,
    /// Display name or localization key.
    #[serde(default)]
    pub name: String,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    /// Degrees.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "unit_scale")]
    pub scale: f64,
    /// 0..100
    #[serde(default = "full_opacity")]
    pub opacity: f64,
    /// Editor-only settings kept verbatim across load/save; not rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_shadows: Option<serde_json::Value>,
    /// Type-specific payload.
    #[serde(flatten)]
    pub content: LayerContent,
}

impl Layer {
    /// Create a visible, unlocked layer centered on the canvas.
    pub fn new(id: LayerId, content: LayerContent) -> Self {
        Self {
            id,
            name: String::new(),
            visible: true,
            locked: false,
            x: 50.0,
            y: 50.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            scale: 1.0,
            opacity: 100.0,
            blend_mode: None,
            advanced_shadows: None,
            content,
        }
    }

    /// Builder: set name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder: set center position (percent).
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Builder: set size (percent, 0 = auto).
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builder: set rotation in degrees.
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Builder: set scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Builder: set opacity (0..100).
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Builder: set visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Builder: set lock state.
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Get the layer type.
    pub fn layer_type(&self) -> LayerType {
        self.content.layer_type()
    }

    pub fn is_full_bleed(&self) -> bool {
        self.layer_type().is_full_bleed()
    }

    /// Visible and unlocked, and not a frame.
    pub fn is_interactive(&self) -> bool {
        self.visible && !self.locked && self.layer_type() != LayerType::Frame
    }

    /// Shadow settings, for layer types that carry one.
    pub fn shadow(&self) -> Option<&ShadowConfig> {
        match &self.content {
            LayerContent::Image { shadow, .. } | LayerContent::Text { shadow, .. } => {
                shadow.as_ref()
            }
            _ => None,
        }
    }

    /// Glow settings, for layer types that carry one.
    pub fn glow(&self) -> Option<&GlowConfig> {
        match &self.content {
            LayerContent::Image { glow, .. } | LayerContent::Text { glow, .. } => glow.as_ref(),
            _ => None,
        }
    }

    /// Replace shadow and glow. Returns false when the layer type has neither.
    pub fn set_effects(&mut self, new_shadow: Option<ShadowConfig>, new_glow: Option<GlowConfig>) -> bool {
        match &mut self.content {
            LayerContent::Image { shadow, glow, .. } | LayerContent::Text { shadow, glow, .. } => {
                *shadow = new_shadow;
                *glow = new_glow;
                true
            }
            _ => false,
        }
    }

    pub fn text_config(&self) -> Option<&TextConfig> {
        match &self.content {
            LayerContent::Text { text_config, .. } => Some(text_config),
            _ => None,
        }
    }

    pub fn frame_config(&self) -> Option<&FrameConfig> {
        match &self.content {
            LayerContent::Frame { frame_config } => Some(frame_config),
            _ => None,
        }
    }

    /// Image source for image and background layers.
    pub fn src(&self) -> Option<&str> {
        match &self.content {
            LayerContent::Image { src, .. } => Some(src.as_str()).filter(|s| !s.is_empty()),
            LayerContent::Background { src, .. } => src.as_deref().filter(|s| !s.is_empty()),
            _ => None,
        }
    }
}
