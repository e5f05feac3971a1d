//! Constructors for new layers with their starting styles.
//!
//! Names are localization keys; front ends translate them.

use carda_core::Size2D;

use crate::canvas::CanvasConfig;
use crate::layer::{Layer, LayerContent, LayerId};
use crate::style::{FrameConfig, GlowConfig, PatternConfig, ShadowConfig, StrokeConfig, TextConfig};

pub const BACKGROUND_NAME_KEY: &str = "layer_types.background";
pub const TEXT_NAME_KEY: &str = "layer_types.player_name";
pub const FRAME_NAME_KEY: &str = "layer_types.frame";
pub const IMAGE_NAME_KEY: &str = "layer_types.image";

/// Background color of a fresh project.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#1f1f1f";

/// Share of the canvas an imported image occupies along its limiting axis.
pub const IMPORT_FIT_PERCENT: f64 = 50.0;

impl Layer {
    /// The locked, full-bleed background every new session starts with.
    pub fn default_background() -> Self {
        Layer::new(
            LayerId::generate(),
            LayerContent::Background {
                background_color: Some(DEFAULT_BACKGROUND_COLOR.to_string()),
                src: None,
                background_scale: Some(100.0),
                pattern_config: Some(PatternConfig::default()),
            },
        )
        .with_name(BACKGROUND_NAME_KEY)
        .with_locked(true)
        .with_position(0.0, 0.0)
        .with_size(100.0, 100.0)
    }

    /// A centered, auto-sized text layer.
    pub fn default_text() -> Self {
        Layer::new(
            LayerId::generate(),
            LayerContent::Text {
                text_config: TextConfig::default(),
                shadow: Some(ShadowConfig::text_default()),
                glow: None,
            },
        )
        .with_name(TEXT_NAME_KEY)
    }

    /// A locked full-bleed frame ring.
    pub fn default_frame() -> Self {
        Layer::new(
            LayerId::generate(),
            LayerContent::Frame {
                frame_config: FrameConfig::default(),
            },
        )
        .with_name(FRAME_NAME_KEY)
        .with_locked(true)
        .with_position(0.0, 0.0)
        .with_size(100.0, 100.0)
    }

    /// An image layer covering half the canvas in each direction, with
    /// shadow, glow and stroke present but disabled.
    pub fn default_image(src: impl Into<String>) -> Self {
        Layer::new(
            LayerId::generate(),
            LayerContent::Image {
                src: src.into(),
                shadow: Some(ShadowConfig::default()),
                glow: Some(GlowConfig::default()),
                stroke: Some(StrokeConfig::default()),
            },
        )
        .with_name(IMAGE_NAME_KEY)
        .with_size(IMPORT_FIT_PERCENT, IMPORT_FIT_PERCENT)
    }

    /// An image layer sized so the image fills 50% of the canvas along its
    /// limiting axis, preserving the image's aspect ratio.
    pub fn imported_image(
        name: impl Into<String>,
        src: impl Into<String>,
        natural: Size2D,
        canvas: &CanvasConfig,
    ) -> Self {
        let (width, height) = import_fit(natural, canvas.size());
        Layer::default_image(src)
            .with_name(name)
            .with_size(width, height)
    }
}

/// Percent size for an imported image of `natural` pixels on `canvas`.
///
/// Images narrower than the canvas (relative to aspect) take 50% of the
/// height; wider ones take 50% of the width. Degenerate inputs fall back to
/// 50% width with automatic height.
pub fn import_fit(natural: Size2D, canvas: Size2D) -> (f64, f64) {
    let image_aspect = natural.aspect_ratio();
    let canvas_aspect = canvas.aspect_ratio();
    if !(image_aspect.is_finite() && image_aspect > 0.0 && canvas_aspect > 0.0) {
        return (IMPORT_FIT_PERCENT, 0.0);
    }
    if image_aspect < canvas_aspect {
        (
            IMPORT_FIT_PERCENT * image_aspect / canvas_aspect,
            IMPORT_FIT_PERCENT,
        )
    } else {
        (
            IMPORT_FIT_PERCENT,
            IMPORT_FIT_PERCENT * canvas_aspect / image_aspect,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::AspectRatio;
    use carda_core::LayerType;

    #[test]
    fn test_default_background() {
        let bg = Layer::default_background();
        assert_eq!(bg.layer_type(), LayerType::Background);
        assert!(bg.locked);
        assert!(bg.visible);
        assert_eq!((bg.width, bg.height), (100.0, 100.0));
        match &bg.content {
            LayerContent::Background {
                background_color,
                background_scale,
                ..
            } => {
                assert_eq!(background_color.as_deref(), Some("#1f1f1f"));
                assert_eq!(*background_scale, Some(100.0));
            }
            _ => panic!("expected background"),
        }
    }

    #[test]
    fn test_default_text_is_auto_sized() {
        let text = Layer::default_text();
        assert_eq!((text.x, text.y), (50.0, 50.0));
        assert_eq!((text.width, text.height), (0.0, 0.0));
        assert!(text.shadow().is_some_and(|s| s.enabled));
        assert_eq!(text.name, TEXT_NAME_KEY);
    }

    #[test]
    fn test_default_frame_locked() {
        let frame = Layer::default_frame();
        assert!(frame.locked);
        assert_eq!(frame.frame_config().map(|f| f.width), Some(10.0));
    }

    #[test]
    fn test_import_fit_tall_image() {
        // 1:2 image on a square canvas: limited by height.
        let (w, h) = import_fit(Size2D::new(500.0, 1000.0), Size2D::new(1080.0, 1080.0));
        assert!((w - 25.0).abs() < 1e-9);
        assert_eq!(h, 50.0);
    }

    #[test]
    fn test_import_fit_wide_image() {
        let (w, h) = import_fit(Size2D::new(1600.0, 900.0), Size2D::new(1080.0, 1080.0));
        assert_eq!(w, 50.0);
        assert!((h - 50.0 * 900.0 / 1600.0).abs() < 1e-9);
    }

    #[test]
    fn test_import_fit_degenerate() {
        assert_eq!(import_fit(Size2D::new(0.0, 0.0), Size2D::new(1080.0, 1080.0)), (50.0, 0.0));
    }

    #[test]
    fn test_imported_image_keeps_name_and_aspect() {
        let canvas = CanvasConfig::for_ratio(AspectRatio::Landscape16x9);
        let layer = Layer::imported_image("hero.png", "data:image/png;base64,AA==", Size2D::new(400.0, 400.0), &canvas);
        assert_eq!(layer.name, "hero.png");
        // Pixel aspect of the placed box equals the image aspect.
        let px_w = layer.width / 100.0 * canvas.width as f64;
        let px_h = layer.height / 100.0 * canvas.height as f64;
        assert!((px_w / px_h - 1.0).abs() < 1e-9);
        assert_eq!(layer.height, 50.0);
    }
}
