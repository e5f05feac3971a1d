use serde::{Deserialize, Serialize};

use carda_core::{CardaError, CardaResult, Size2D};

/// Length of the longer canvas edge for every aspect ratio.
pub const BASE_EDGE: u32 = 1080;

/// Supported canvas aspect ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape16x9,
    #[serde(rename = "9:16")]
    Portrait9x16,
    #[serde(rename = "4:3")]
    Landscape4x3,
    #[serde(rename = "3:4")]
    Portrait3x4,
    #[serde(rename = "3:2")]
    Landscape3x2,
    #[serde(rename = "2:3")]
    Portrait2x3,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 7] = [
        AspectRatio::Square,
        AspectRatio::Landscape16x9,
        AspectRatio::Portrait9x16,
        AspectRatio::Landscape4x3,
        AspectRatio::Portrait3x4,
        AspectRatio::Landscape3x2,
        AspectRatio::Portrait2x3,
    ];

    /// The `W:H` label used in project files.
    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape16x9 => "16:9",
            AspectRatio::Portrait9x16 => "9:16",
            AspectRatio::Landscape4x3 => "4:3",
            AspectRatio::Portrait3x4 => "3:4",
            AspectRatio::Landscape3x2 => "3:2",
            AspectRatio::Portrait2x3 => "2:3",
        }
    }

    /// Ratio as `(width, height)` parts.
    pub fn parts(&self) -> (u32, u32) {
        match self {
            AspectRatio::Square => (1, 1),
            AspectRatio::Landscape16x9 => (16, 9),
            AspectRatio::Portrait9x16 => (9, 16),
            AspectRatio::Landscape4x3 => (4, 3),
            AspectRatio::Portrait3x4 => (3, 4),
            AspectRatio::Landscape3x2 => (3, 2),
            AspectRatio::Portrait2x3 => (2, 3),
        }
    }

    /// Width divided by height.
    pub fn ratio(&self) -> f64 {
        let (w, h) = self.parts();
        w as f64 / h as f64
    }

    /// Logical pixel dimensions with the longer edge at [`BASE_EDGE`].
    pub fn dimensions(&self) -> (u32, u32) {
        let (w, h) = self.parts();
        let base = BASE_EDGE as f64;
        if w >= h {
            (BASE_EDGE, (base * h as f64 / w as f64).round() as u32)
        } else {
            ((base * w as f64 / h as f64).round() as u32, BASE_EDGE)
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = CardaError;

    fn from_str(s: &str) -> CardaResult<Self> {
        AspectRatio::ALL
            .into_iter()
            .find(|r| r.label() == s.trim())
            .ok_or_else(|| CardaError::InvalidArgument(format!("unknown aspect ratio '{}'", s)))
    }
}

fn unit_display_scale() -> f64 {
    1.0
}

/// Logical size of the composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: AspectRatio,
    /// Preview-only zoom; never affects exports.
    #[serde(default = "unit_display_scale")]
    pub scale_display: f64,
}

impl CanvasConfig {
    /// Canvas for `ratio` with the longer edge at 1080.
    pub fn for_ratio(ratio: AspectRatio) -> Self {
        let (width, height) = ratio.dimensions();
        Self {
            width,
            height,
            aspect_ratio: ratio,
            scale_display: 1.0,
        }
    }

    /// Switch ratio and recompute width/height. Layers keep their percent
    /// geometry and therefore follow the new canvas.
    pub fn set_aspect_ratio(&mut self, ratio: AspectRatio) {
        let (width, height) = ratio.dimensions();
        self.width = width;
        self.height = height;
        self.aspect_ratio = ratio;
    }

    pub fn size(&self) -> Size2D {
        Size2D::new(self.width as f64, self.height as f64)
    }

    /// Width / height of the logical canvas.
    pub fn aspect(&self) -> f64 {
        self.size().aspect_ratio()
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self::for_ratio(AspectRatio::Square)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_canvas() {
        let c = CanvasConfig::default();
        assert_eq!((c.width, c.height), (1080, 1080));
        assert_eq!(c.aspect_ratio, AspectRatio::Square);
        assert_eq!(c.scale_display, 1.0);
    }

    #[test]
    fn test_ratio_dimensions_anchor_longer_edge() {
        assert_eq!(AspectRatio::Landscape16x9.dimensions(), (1080, 608));
        assert_eq!(AspectRatio::Portrait9x16.dimensions(), (608, 1080));
        assert_eq!(AspectRatio::Landscape4x3.dimensions(), (1080, 810));
        assert_eq!(AspectRatio::Portrait3x4.dimensions(), (810, 1080));
        assert_eq!(AspectRatio::Landscape3x2.dimensions(), (1080, 720));
        assert_eq!(AspectRatio::Portrait2x3.dimensions(), (720, 1080));
        for r in AspectRatio::ALL {
            let (w, h) = r.dimensions();
            assert_eq!(w.max(h), BASE_EDGE);
        }
    }

    #[test]
    fn test_set_aspect_ratio() {
        let mut c = CanvasConfig::default();
        c.scale_display = 0.5;
        c.set_aspect_ratio(AspectRatio::Portrait3x4);
        assert_eq!((c.width, c.height), (810, 1080));
        assert_eq!(c.scale_display, 0.5);
    }

    #[test]
    fn test_ratio_labels_roundtrip() {
        for r in AspectRatio::ALL {
            assert_eq!(r.label().parse::<AspectRatio>().unwrap(), r);
            let json = serde_json::to_string(&r).unwrap();
            assert_eq!(json, format!("\"{}\"", r.label()));
        }
        assert!("5:4".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_canvas_json_shape() {
        let json = serde_json::to_value(CanvasConfig::for_ratio(AspectRatio::Landscape16x9)).unwrap();
        assert_eq!(json["aspectRatio"], "16:9");
        assert_eq!(json["scaleDisplay"], 1.0);
        assert_eq!(json["height"], 608);
    }
}
