use serde::{Deserialize, Serialize};

use crate::layer::Layer;
use crate::style::{GlowConfig, ShadowConfig};

/// Style fields carried between layers by copy/paste style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleClipboard {
    pub opacity: f64,
    pub rotation: f64,
    pub scale: f64,
    pub shadow: Option<ShadowConfig>,
    pub glow: Option<GlowConfig>,
}

impl StyleClipboard {
    pub fn copy_from(layer: &Layer) -> Self {
        Self {
            opacity: layer.opacity,
            rotation: layer.rotation,
            scale: layer.scale,
            shadow: layer.shadow().cloned(),
            glow: layer.glow().cloned(),
        }
    }

    /// A copy of `target` carrying this style. Position, identity, type and
    /// content stay as they were; layer types without effects only take the
    /// transform fields.
    pub fn paste_onto(&self, target: &Layer) -> Layer {
        let mut layer = target.clone();
        layer.opacity = self.opacity;
        layer.rotation = self.rotation;
        layer.scale = self.scale;
        layer.set_effects(self.shadow.clone(), self.glow.clone());
        layer
    }
}
