//! Effect resolution: layer styles to concrete paint instructions.
//!
//! Nothing here touches pixels. The rasterizer consumes the resolved values.

use carda_core::{BlendMode, Color};
use carda_ir::style::{FrameConfig, FrameKind, GlowConfig, PatternConfig, ShadowConfig, TextAlign};
use carda_ir::{Layer, LayerContent};

use crate::presets::{FillSpec, PresetRegistry, TextEffectPreset};

/// Parse a stored color, logging and substituting `fallback` on failure.
pub fn color_or(value: &str, fallback: Color) -> Color {
    match Color::parse(value) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Unparseable color '{}': {}", value, e);
            fallback
        }
    }
}

/// A blurred, offset silhouette drawn beneath content.
/// Lengths are logical canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropShadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    /// Silhouette growth before blurring; only glows use it.
    pub spread: f64,
    pub color: Color,
}

/// Bound on shadow offsets, blurs, spreads and stroke widths, logical pixels.
pub const MAX_EFFECT_PX: f64 = 540.0;
/// Bound on text and pattern font sizes, logical pixels.
pub const MAX_FONT_SIZE: f64 = 2_000.0;

fn effect_len(v: f64) -> f64 {
    finite(v).clamp(-MAX_EFFECT_PX, MAX_EFFECT_PX)
}

fn px(v: f64) -> String {
    format!("{}px", v)
}

impl DropShadow {
    /// Drop shadow from a shadow config, or `None` when disabled.
    pub fn from_shadow(shadow: &ShadowConfig) -> Option<Self> {
        if !shadow.enabled {
            return None;
        }
        let opacity = if shadow.opacity.is_finite() {
            (shadow.opacity / 100.0).clamp(0.0, 1.0)
        } else {
            1.0
        };
        Some(Self {
            offset_x: effect_len(shadow.offset_x),
            offset_y: effect_len(shadow.offset_y),
            blur: effect_len(shadow.blur).max(0.0),
            spread: 0.0,
            color: color_or(&shadow.color, Color::BLACK).scale_alpha(opacity as f32),
        })
    }

    /// A centered drop shadow from a glow config, or `None` when disabled.
    pub fn from_glow(glow: &GlowConfig) -> Option<Self> {
        if !glow.enabled {
            return None;
        }
        Some(Self {
            offset_x: 0.0,
            offset_y: 0.0,
            blur: effect_len(glow.blur).max(0.0),
            spread: effect_len(glow.spread).max(0.0),
            color: color_or(&glow.color, Color::WHITE),
        })
    }

    /// CSS filter function form, e.g. `drop-shadow(2px 2px 4px rgba(0, 0, 0, 0.8))`.
    pub fn to_css(&self) -> String {
        format!(
            "drop-shadow({} {} {} {})",
            px(self.offset_x),
            px(self.offset_y),
            px(self.blur),
            self.color.to_css()
        )
    }

    /// CSS `text-shadow` entry form.
    pub fn to_text_shadow_css(&self) -> String {
        format!(
            "{} {} {} {}",
            px(self.offset_x),
            px(self.offset_y),
            px(self.blur),
            self.color.to_css()
        )
    }

    /// Nothing would be visible.
    pub fn is_invisible(&self) -> bool {
        self.color.a <= 0.0
    }
}

fn finite(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Shadow followed by glow. Disabled effects contribute nothing.
fn shadow_then_glow(shadow: Option<&ShadowConfig>, glow: Option<&GlowConfig>) -> Vec<DropShadow> {
    shadow
        .and_then(DropShadow::from_shadow)
        .into_iter()
        .chain(glow.and_then(DropShadow::from_glow))
        .collect()
}

/// Filter chain for an image layer, applied in order: each drop shadow acts
/// on the output of the previous one.
pub fn image_filters(layer: &Layer) -> Vec<DropShadow> {
    match &layer.content {
        LayerContent::Image { shadow, glow, .. } => {
            shadow_then_glow(shadow.as_ref(), glow.as_ref())
        }
        _ => Vec::new(),
    }
}

/// Join a filter chain into a CSS `filter` value. An empty chain is `none`.
pub fn filter_css(filters: &[DropShadow]) -> String {
    if filters.is_empty() {
        return "none".to_string();
    }
    filters
        .iter()
        .map(DropShadow::to_css)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Outline drawn around an image's opaque pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    /// Logical pixels.
    pub width: f64,
    pub color: Color,
}

/// Resolved image stroke, if enabled and wider than zero.
pub fn image_outline(layer: &Layer) -> Option<Outline> {
    let LayerContent::Image {
        stroke: Some(stroke),
        ..
    } = &layer.content
    else {
        return None;
    };
    if !stroke.enabled || !(stroke.width > 0.0) {
        return None;
    }
    let opacity = if stroke.opacity.is_finite() {
        (stroke.opacity / 100.0).clamp(0.0, 1.0)
    } else {
        1.0
    };
    Some(Outline {
        width: effect_len(stroke.width),
        color: color_or(&stroke.color, Color::WHITE).scale_alpha(opacity as f32),
    })
}

/// A linear gradient over a box, CSS angle convention.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    /// Degrees; 0 points up, 90 points right.
    pub angle: f64,
    /// Sorted by offset, offsets in 0..1.
    pub stops: Vec<(f32, Color)>,
}

impl LinearGradient {
    pub fn new(angle: f64, mut stops: Vec<(f32, Color)>) -> Self {
        for stop in stops.iter_mut() {
            stop.0 = stop.0.clamp(0.0, 1.0);
        }
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self {
            angle: finite(angle),
            stops,
        }
    }

    /// Color at position `t` along the gradient line.
    pub fn color_at(&self, t: f32) -> Color {
        let Some(first) = self.stops.first() else {
            return Color::TRANSPARENT;
        };
        if t <= first.0 {
            return first.1;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.0 {
                let span = b.0 - a.0;
                if span <= f32::EPSILON {
                    return b.1;
                }
                return a.1.lerp(&b.1, (t - a.0) / span);
            }
        }
        self.stops[self.stops.len() - 1].1
    }

    /// Gradient position of point (`x`, `y`) in a `w`×`h` box, per the CSS
    /// rule that the gradient line passes through the box center and its
    /// ends touch the corners.
    pub fn position(&self, x: f64, y: f64, w: f64, h: f64) -> f32 {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let len = (w * sin).abs() + (h * cos).abs();
        if len <= f64::EPSILON {
            return 0.5;
        }
        let dx = x - w / 2.0;
        let dy = y - h / 2.0;
        ((dx * sin - dy * cos) / len + 0.5) as f32
    }

    pub fn sample(&self, x: f64, y: f64, w: f64, h: f64) -> Color {
        self.color_at(self.position(x, y, w, h))
    }
}

/// Paint source for glyphs, frames and pattern text.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Color),
    Linear(LinearGradient),
}

impl Fill {
    pub fn sample(&self, x: f64, y: f64, w: f64, h: f64) -> Color {
        match self {
            Fill::Solid(c) => *c,
            Fill::Linear(g) => g.sample(x, y, w, h),
        }
    }

    fn from_spec(spec: &FillSpec) -> Self {
        match spec {
            FillSpec::Solid { color } => Fill::Solid(color_or(color, Color::WHITE)),
            FillSpec::LinearGradient { angle, stops } => Fill::Linear(LinearGradient::new(
                *angle,
                stops
                    .iter()
                    .map(|s| (s.offset as f32, color_or(&s.color, Color::TRANSPARENT)))
                    .collect(),
            )),
        }
    }
}

/// A fill layered over the ones below it.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintLayer {
    pub fill: Fill,
    pub blend: BlendMode,
}

/// Everything needed to rasterize a text layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPaint {
    pub content: String,
    pub font_family: String,
    /// Logical pixels.
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub align: TextAlign,
    /// Logical pixels between glyphs.
    pub letter_spacing: f64,
    /// Bottom to top.
    pub fills: Vec<PaintLayer>,
    pub stroke: Option<Outline>,
    /// First entry is drawn on top, as with CSS `text-shadow`.
    pub shadows: Vec<DropShadow>,
    /// How the finished text is composited onto the canvas.
    pub blend: BlendMode,
}

impl TextPaint {
    /// CSS `text-shadow` value for the resolved stack.
    pub fn text_shadow_css(&self) -> String {
        if self.shadows.is_empty() {
            return "none".to_string();
        }
        self.shadows
            .iter()
            .map(DropShadow::to_text_shadow_css)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Merge a text layer's base style with its effect preset.
///
/// Font, size, alignment and spacing always come from the layer. A preset's
/// fills replace the layer color, its shadow stack replaces the base stack
/// and its stroke is added. Unknown preset ids resolve as `none`.
pub fn resolve_text_paint(layer: &Layer, presets: &PresetRegistry) -> Option<TextPaint> {
    let LayerContent::Text {
        text_config,
        shadow,
        glow,
    } = &layer.content
    else {
        return None;
    };
    let preset: Option<&TextEffectPreset> = text_config
        .effect_preset_id
        .as_deref()
        .and_then(|id| presets.get(id));

    let mut paint = TextPaint {
        content: text_config.content.clone(),
        font_family: text_config.font_family.clone(),
        font_size: finite(text_config.font_size).clamp(0.0, MAX_FONT_SIZE),
        bold: text_config.bold,
        italic: text_config.italic,
        align: text_config.align,
        letter_spacing: effect_len(text_config.letter_spacing),
        fills: vec![PaintLayer {
            fill: Fill::Solid(color_or(&text_config.color, Color::WHITE)),
            blend: BlendMode::Normal,
        }],
        stroke: None,
        shadows: shadow_then_glow(shadow.as_ref(), glow.as_ref()),
        blend: BlendMode::Normal,
    };

    if let Some(preset) = preset {
        if !preset.fills.is_empty() {
            paint.fills = preset
                .fills
                .iter()
                .map(|f| PaintLayer {
                    fill: Fill::from_spec(&f.fill),
                    blend: f.blend,
                })
                .collect();
        }
        if let Some(stroke) = &preset.stroke {
            if stroke.width > 0.0 {
                paint.stroke = Some(Outline {
                    width: effect_len(stroke.width),
                    color: color_or(&stroke.color, Color::TRANSPARENT),
                });
            }
        }
        if let Some(shadows) = &preset.shadows {
            paint.shadows = shadows
                .iter()
                .map(|s| DropShadow {
                    offset_x: effect_len(s.offset_x),
                    offset_y: effect_len(s.offset_y),
                    blur: effect_len(s.blur).max(0.0),
                    spread: 0.0,
                    color: color_or(&s.color, Color::BLACK),
                })
                .collect();
        }
        paint.blend = preset.blend_mode;
    }
    Some(paint)
}

/// Pattern tiles per row and per column.
pub const PATTERN_GRID: usize = 20;

/// One repeated pattern label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternTile {
    pub row: usize,
    pub col: usize,
    /// Center of the label, percent of the background.
    pub left: f64,
    pub top: f64,
}

/// The fixed 20×20 grid of pattern labels. Odd rows shift right by half a
/// column gap.
pub fn pattern_tiles(config: &PatternConfig) -> Vec<PatternTile> {
    let mut tiles = Vec::with_capacity(PATTERN_GRID * PATTERN_GRID);
    for row in 0..PATTERN_GRID {
        let (gap_x, gap_y) = (finite(config.gap_x), finite(config.gap_y));
        let stagger = if row % 2 == 1 { gap_x / 2.0 } else { 0.0 };
        for col in 0..PATTERN_GRID {
            tiles.push(PatternTile {
                row,
                col,
                left: col as f64 * gap_x + stagger,
                top: row as f64 * gap_y,
            });
        }
    }
    tiles
}

/// Resolved pattern overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternPaint {
    pub text: String,
    /// Logical pixels.
    pub size: f64,
    pub color: Color,
    /// Degrees, applied to each tile about its center.
    pub rotation: f64,
    pub tiles: Vec<PatternTile>,
}

pub fn resolve_pattern(config: &PatternConfig) -> Option<PatternPaint> {
    if !config.enabled || config.text.is_empty() {
        return None;
    }
    let opacity = (finite(config.opacity) / 100.0).clamp(0.0, 1.0);
    Some(PatternPaint {
        text: config.text.clone(),
        size: finite(config.size).clamp(0.0, MAX_FONT_SIZE),
        color: color_or(&config.color, Color::WHITE).scale_alpha(opacity as f32),
        rotation: finite(config.rotation),
        tiles: pattern_tiles(config),
    })
}

/// Resolved background layer.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundPaint {
    pub color: Color,
    pub src: Option<String>,
    /// Percent, already clamped to 100..200.
    pub scale: f64,
    pub pattern: Option<PatternPaint>,
}

pub fn resolve_background(layer: &Layer) -> Option<BackgroundPaint> {
    let LayerContent::Background {
        background_color,
        background_scale,
        pattern_config,
        ..
    } = &layer.content
    else {
        return None;
    };
    Some(BackgroundPaint {
        color: background_color
            .as_deref()
            .map(|c| color_or(c, Color::BLACK))
            .unwrap_or(Color::BLACK),
        src: layer.src().map(str::to_string),
        scale: crate::geometry::clamp_background_scale(*background_scale),
        pattern: pattern_config.as_ref().and_then(resolve_pattern),
    })
}

/// Resolved frame ring.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePaint {
    pub fill: Fill,
    /// Ring thickness, logical pixels.
    pub width: f64,
    /// Outer corner radius, percent of the shorter surface side.
    pub radius: f64,
}

pub fn resolve_frame(config: &FrameConfig) -> Option<FramePaint> {
    if !config.enabled {
        return None;
    }
    let first = color_or(&config.color, Color::WHITE);
    let fill = match config.kind {
        FrameKind::Solid => Fill::Solid(first),
        FrameKind::Gradient => {
            let second = config
                .color2
                .as_deref()
                .map(|c| color_or(c, first))
                .unwrap_or(first);
            Fill::Linear(LinearGradient::new(45.0, vec![(0.0, first), (1.0, second)]))
        }
    };
    Some(FramePaint {
        fill,
        width: finite(config.width).max(0.0),
        radius: finite(config.radius).clamp(0.0, 50.0),
    })
}

/// Corner radius, in percent, clipping the whole composition: that of the
/// first visible frame layer whose frame is enabled, else 0.
pub fn global_corner_radius(layers: &[Layer]) -> f64 {
    layers
        .iter()
        .filter(|l| l.visible)
        .filter_map(Layer::frame_config)
        .find(|f| f.enabled)
        .map(|f| finite(f.radius).clamp(0.0, 50.0))
        .unwrap_or(0.0)
}

/// Pixel radius for a percent radius on a `w`×`h` surface.
pub fn corner_radius_px(radius_percent: f64, w: f64, h: f64) -> f64 {
    (radius_percent / 100.0 * w.min(h)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carda_ir::style::TextConfig;
    use carda_ir::LayerId;

    fn image_layer(shadow: ShadowConfig, glow: GlowConfig) -> Layer {
        let mut layer = Layer::default_image("data:image/png;base64,AAAA");
        layer.set_effects(Some(shadow), Some(glow));
        layer
    }

    fn text_layer(preset: Option<&str>) -> Layer {
        Layer::new(
            LayerId::new("t"),
            LayerContent::Text {
                text_config: TextConfig {
                    effect_preset_id: preset.map(str::to_string),
                    color: "#ff0000".to_string(),
                    ..TextConfig::default()
                },
                shadow: Some(ShadowConfig::text_default()),
                glow: None,
            },
        )
    }

    #[test]
    fn test_effect_lengths_are_bounded() {
        let layer = image_layer(
            ShadowConfig {
                enabled: true,
                offset_x: 1e12,
                offset_y: f64::NAN,
                blur: 1e9,
                ..ShadowConfig::default()
            },
            GlowConfig {
                enabled: true,
                spread: 1e7,
                ..GlowConfig::default()
            },
        );
        let filters = image_filters(&layer);
        assert_eq!(filters[0].offset_x, MAX_EFFECT_PX);
        assert_eq!(filters[0].offset_y, 0.0);
        assert_eq!(filters[0].blur, MAX_EFFECT_PX);
        assert_eq!(filters[1].spread, MAX_EFFECT_PX);

        let mut text = text_layer(None);
        if let LayerContent::Text { text_config, .. } = &mut text.content {
            text_config.font_size = 1e9;
        }
        let paint = resolve_text_paint(&text, &PresetRegistry::new()).unwrap();
        assert_eq!(paint.font_size, MAX_FONT_SIZE);
    }

    #[test]
    fn test_filter_chain_order() {
        let layer = image_layer(
            ShadowConfig {
                enabled: true,
                offset_x: 3.0,
                offset_y: 4.0,
                blur: 10.0,
                ..ShadowConfig::default()
            },
            GlowConfig {
                enabled: true,
                blur: 6.0,
                ..GlowConfig::default()
            },
        );
        let filters = image_filters(&layer);
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].offset_x, 3.0);
        assert_eq!(filters[1].offset_x, 0.0);
        assert_eq!(
            filter_css(&filters),
            "drop-shadow(3px 4px 10px rgba(0, 0, 0, 1)) drop-shadow(0px 0px 6px rgba(255, 255, 255, 1))"
        );
    }

    #[test]
    fn test_disabled_effects_contribute_nothing() {
        let layer = image_layer(ShadowConfig::default(), GlowConfig::default());
        assert!(image_filters(&layer).is_empty());
        assert_eq!(filter_css(&[]), "none");
    }

    #[test]
    fn test_shadow_opacity_scales_alpha() {
        let s = DropShadow::from_shadow(&ShadowConfig {
            enabled: true,
            opacity: 50.0,
            color: "rgba(0,0,0,0.8)".to_string(),
            ..ShadowConfig::default()
        })
        .unwrap();
        assert!((s.color.a - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_text_without_preset_uses_base() {
        let registry = PresetRegistry::new();
        let paint = resolve_text_paint(&text_layer(None), &registry).unwrap();
        assert_eq!(paint.fills.len(), 1);
        assert_eq!(paint.fills[0].fill, Fill::Solid(Color::RED));
        assert_eq!(paint.shadows.len(), 1);
        assert_eq!(paint.text_shadow_css(), "2px 2px 4px rgba(0, 0, 0, 0.8)");
        assert_eq!(paint.font_size, 40.0);
        assert!(paint.stroke.is_none());
    }

    #[test]
    fn test_gold_replaces_fill_and_clears_shadows() {
        let registry = PresetRegistry::new();
        let paint = resolve_text_paint(&text_layer(Some("gold")), &registry).unwrap();
        assert!(matches!(paint.fills[0].fill, Fill::Linear(_)));
        assert!(paint.shadows.is_empty());
        assert_eq!(paint.text_shadow_css(), "none");
        assert_eq!(paint.font_family, "Impact");
    }

    #[test]
    fn test_vintage_keeps_base_font_and_adds_stroke() {
        let registry = PresetRegistry::new();
        let paint = resolve_text_paint(&text_layer(Some("vintage3d")), &registry).unwrap();
        assert_eq!(paint.shadows.len(), 7);
        assert_eq!(paint.stroke.map(|s| s.width), Some(1.0));
        assert_eq!(paint.letter_spacing, 2.0);
        assert_eq!(paint.align, TextAlign::Center);
    }

    #[test]
    fn test_unknown_preset_behaves_as_none() {
        let registry = PresetRegistry::new();
        let a = resolve_text_paint(&text_layer(Some("chrome")), &registry).unwrap();
        let b = resolve_text_paint(&text_layer(None), &registry).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_text_glow_follows_shadow() {
        let registry = PresetRegistry::new();
        let mut layer = text_layer(None);
        layer.set_effects(
            Some(ShadowConfig::text_default()),
            Some(GlowConfig {
                enabled: true,
                ..GlowConfig::default()
            }),
        );
        let paint = resolve_text_paint(&layer, &registry).unwrap();
        assert_eq!(paint.shadows.len(), 2);
        assert_eq!(paint.shadows[1].color, Color::WHITE);
    }

    #[test]
    fn test_gradient_directions() {
        let g = LinearGradient::new(90.0, vec![(0.0, Color::BLACK), (1.0, Color::WHITE)]);
        assert!(g.position(0.0, 5.0, 10.0, 10.0).abs() < 1e-6);
        assert!((g.position(10.0, 5.0, 10.0, 10.0) - 1.0).abs() < 1e-6);

        let down = LinearGradient::new(180.0, vec![(0.0, Color::BLACK), (1.0, Color::WHITE)]);
        assert!((down.position(5.0, 10.0, 10.0, 10.0) - 1.0).abs() < 1e-6);

        let diag = LinearGradient::new(45.0, vec![(0.0, Color::BLACK), (1.0, Color::WHITE)]);
        assert!(diag.position(0.0, 10.0, 10.0, 10.0).abs() < 1e-6);
        assert!((diag.position(10.0, 0.0, 10.0, 10.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_gradient_color_at() {
        let g = LinearGradient::new(
            90.0,
            vec![(1.0, Color::WHITE), (0.0, Color::BLACK), (0.5, Color::RED)],
        );
        assert_eq!(g.color_at(-1.0), Color::BLACK);
        assert_eq!(g.color_at(0.5), Color::RED);
        assert_eq!(g.color_at(2.0), Color::WHITE);
        let quarter = g.color_at(0.25);
        assert!((quarter.r - 0.5).abs() < 1e-6);
        assert!(quarter.g.abs() < 1e-6);
    }

    #[test]
    fn test_pattern_grid() {
        let config = PatternConfig {
            enabled: true,
            gap_x: 20.0,
            gap_y: 25.0,
            ..PatternConfig::default()
        };
        let tiles = pattern_tiles(&config);
        assert_eq!(tiles.len(), 400);
        let at = |r: usize, c: usize| tiles[r * PATTERN_GRID + c];
        assert_eq!((at(0, 0).left, at(0, 0).top), (0.0, 0.0));
        assert_eq!((at(0, 3).left, at(0, 3).top), (60.0, 0.0));
        assert_eq!((at(1, 0).left, at(1, 0).top), (10.0, 25.0));
        assert_eq!(at(3, 2).left, 50.0);
    }

    #[test]
    fn test_pattern_disabled_or_empty() {
        assert!(resolve_pattern(&PatternConfig::default()).is_none());
        let empty = PatternConfig {
            enabled: true,
            text: String::new(),
            ..PatternConfig::default()
        };
        assert!(resolve_pattern(&empty).is_none());
    }

    #[test]
    fn test_frame_gradient() {
        let frame = resolve_frame(&FrameConfig {
            enabled: true,
            kind: FrameKind::Gradient,
            color: "#ff0000".to_string(),
            color2: Some("#0000ff".to_string()),
            ..FrameConfig::default()
        })
        .unwrap();
        match frame.fill {
            Fill::Linear(g) => {
                assert_eq!(g.angle, 45.0);
                assert_eq!(g.stops[0].1, Color::RED);
                assert_eq!(g.stops[1].1, Color::BLUE);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(resolve_frame(&FrameConfig::default()).is_none());
    }

    #[test]
    fn test_global_corner_radius() {
        let frame = |enabled: bool, visible: bool, radius: f64| {
            let mut layer = Layer::default_frame().with_visible(visible);
            if let LayerContent::Frame { frame_config } = &mut layer.content {
                frame_config.enabled = enabled;
                frame_config.radius = radius;
            }
            layer
        };
        assert_eq!(global_corner_radius(&[]), 0.0);
        assert_eq!(global_corner_radius(&[frame(false, true, 10.0)]), 0.0);
        assert_eq!(
            global_corner_radius(&[
                frame(true, false, 5.0),
                frame(false, true, 8.0),
                frame(true, true, 20.0),
                frame(true, true, 30.0),
            ]),
            20.0
        );
        assert_eq!(corner_radius_px(20.0, 1080.0, 810.0), 162.0);
    }

    #[test]
    fn test_background_resolution() {
        let mut layer = Layer::default_background();
        if let LayerContent::Background {
            background_scale, ..
        } = &mut layer.content
        {
            *background_scale = Some(500.0);
        }
        let bg = resolve_background(&layer).unwrap();
        assert_eq!(bg.scale, 200.0);
        assert_eq!(bg.color.to_rgba8(), [0x1f, 0x1f, 0x1f, 255]);
        assert!(bg.src.is_none());
        assert!(bg.pattern.is_none());
    }
}
