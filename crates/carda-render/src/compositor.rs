//! Compositor: turns a layer list into one RGBA frame.
//!
//! Rendering is a pure function of the layers, the canvas, the target size
//! and the loaded assets. Layers are drawn in list order, so later layers
//! cover earlier ones. A layer whose resources cannot be loaded is skipped
//! and reported as a [`Notice`]; the rest of the composition still renders.

use carda_core::hash::{self, ContentHash};
use carda_core::notice::{self, Notice};
use carda_core::{BlendMode, Color, FrameBuffer, LayerType, Point2D, Rect, Size2D, Transform2D};
use carda_ir::style::TextAlign;
use carda_ir::{CanvasConfig, Layer, LayerId};
use rayon::prelude::*;
use serde::Serialize;

use crate::assets::AssetRegistry;
use crate::effects::{self, FramePaint, PatternPaint, TextPaint};
use crate::geometry::{self, LayerGeometry, RenderTarget, ResolvedBox};
use crate::image_loader;
use crate::raster::{self, Mask, Sprite};
use crate::text::TextStyle;

/// Dashed outline drawn around the selected layer in previews.
pub const SELECTION_COLOR: Color = Color {
    r: 0x3b as f32 / 255.0,
    g: 0x82 as f32 / 255.0,
    b: 0xf6 as f32 / 255.0,
    a: 1.0,
};
/// Selection outline thickness, logical pixels.
pub const SELECTION_WIDTH: f64 = 2.0;
const SELECTION_DASH: f64 = 6.0;

/// Per-render switches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    /// Layer to decorate with the selection outline. Locked layers and
    /// frames are never decorated.
    pub selection: Option<LayerId>,
}

/// Result of a render pass.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub frame: FrameBuffer,
    /// Resources that could not be loaded during this pass.
    pub notices: Vec<Notice>,
}

impl RenderOutput {
    /// Compute the content hash of the rendered frame.
    ///
    /// Two identical renders produce the same hash.
    pub fn content_hash(&self) -> ContentHash {
        hash::hash_frame(&self.frame)
    }

    pub fn width(&self) -> u32 {
        self.frame.width
    }

    pub fn height(&self) -> u32 {
        self.frame.height
    }
}

/// Where a layer ended up on the render target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerPlacement {
    pub id: String,
    pub kind: LayerType,
    /// Box center, target pixels.
    pub center_x: f64,
    pub center_y: f64,
    /// Untransformed box size, target pixels.
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub scale: f64,
    /// Axis-aligned bounds after rotation and scale.
    pub bounds: Rect,
    pub visible: bool,
    pub interactive: bool,
}

/// Back-to-front CPU compositor over a set of loaded assets.
pub struct Compositor<'a> {
    assets: &'a AssetRegistry,
}

impl<'a> Compositor<'a> {
    pub fn new(assets: &'a AssetRegistry) -> Self {
        Self { assets }
    }

    pub fn assets(&self) -> &AssetRegistry {
        self.assets
    }

    /// Render `layers` bottom to top onto a transparent `target`.
    pub fn render(
        &self,
        layers: &[Layer],
        target: &RenderTarget,
        options: &RenderOptions,
    ) -> RenderOutput {
        let mut frame = FrameBuffer::new(target.width, target.height);
        let mut notices = Vec::new();

        for layer in layers.iter().filter(|l| l.visible) {
            let placed = match layer.layer_type() {
                LayerType::Background => self.draw_background(&mut frame, layer, target, &mut notices),
                LayerType::Image => self.draw_image(&mut frame, layer, target, &mut notices),
                LayerType::Text => self.draw_text(&mut frame, layer, target, &mut notices),
                LayerType::Frame => self.draw_frame(&mut frame, layer, target),
            };
            if let Some(placed) = placed {
                if options.selection.as_ref() == Some(&layer.id) && decorates_selection(layer) {
                    raster::draw_dashed_rect(
                        &mut frame,
                        &placed.local_rect(),
                        &placed.transform,
                        &SELECTION_COLOR,
                        target.px(SELECTION_WIDTH).max(1.0),
                        target.px(SELECTION_DASH),
                    );
                }
            }
        }

        let radius = effects::global_corner_radius(layers);
        raster::clip_rounded(
            &mut frame,
            effects::corner_radius_px(radius, target.width as f64, target.height as f64),
        );

        tracing::debug!(
            "Rendered {} layers at {}x{} ({} notices)",
            layers.len(),
            target.width,
            target.height,
            notices.len()
        );
        RenderOutput { frame, notices }
    }

    /// Render at a canvas's logical size times `pixel_ratio`.
    pub fn render_canvas(
        &self,
        layers: &[Layer],
        canvas: &CanvasConfig,
        pixel_ratio: f64,
        options: &RenderOptions,
    ) -> RenderOutput {
        self.render(layers, &RenderTarget::scaled(canvas, pixel_ratio), options)
    }

    /// Placement of every layer, visible or not, in list order. Hidden
    /// layers report their declared box without loading content.
    pub fn layout(&self, layers: &[Layer], target: &RenderTarget) -> Vec<LayerPlacement> {
        layers
            .iter()
            .map(|layer| {
                let placed = if layer.visible {
                    self.resolve_box(layer, target)
                } else if layer.is_full_bleed() {
                    full_bleed(target)
                } else {
                    ResolvedBox::resolve(layer, target, Size2D::new(0.0, 0.0))
                };
                LayerPlacement {
                    id: layer.id.to_string(),
                    kind: layer.layer_type(),
                    center_x: placed.transform.position.x,
                    center_y: placed.transform.position.y,
                    width: placed.size.width,
                    height: placed.size.height,
                    rotation: placed.transform.rotation,
                    scale: placed.transform.scale,
                    bounds: placed.bounds(),
                    visible: layer.visible,
                    interactive: layer.is_interactive(),
                }
            })
            .collect()
    }

    /// Topmost visible, unlocked, non-frame layer under `point` (target
    /// pixels).
    pub fn hit_test(
        &self,
        layers: &[Layer],
        target: &RenderTarget,
        point: Point2D,
    ) -> Option<LayerId> {
        layers
            .iter()
            .rev()
            .filter(|l| l.is_interactive())
            .find(|l| self.resolve_box(l, target).contains(point))
            .map(|l| l.id.clone())
    }

    /// Box a layer occupies on `target`. Content that cannot be loaded
    /// contributes an empty intrinsic size.
    pub fn resolve_box(&self, layer: &Layer, target: &RenderTarget) -> ResolvedBox {
        if layer.is_full_bleed() {
            return full_bleed(target);
        }
        let intrinsic = match layer.layer_type() {
            LayerType::Image => layer
                .src()
                .and_then(|src| self.assets.image(src).ok())
                .map(|img| natural_size(&img, target.unit))
                .unwrap_or(Size2D::new(0.0, 0.0)),
            LayerType::Text => effects::resolve_text_paint(layer, self.assets.presets())
                .and_then(|paint| self.assets.text().measure(&text_style(&paint, target.unit)))
                .unwrap_or(Size2D::new(0.0, 0.0)),
            _ => Size2D::new(0.0, 0.0),
        };
        ResolvedBox::resolve(layer, target, intrinsic)
    }

    fn draw_background(
        &self,
        frame: &mut FrameBuffer,
        layer: &Layer,
        target: &RenderTarget,
        notices: &mut Vec<Notice>,
    ) -> Option<ResolvedBox> {
        let paint = effects::resolve_background(layer)?;
        let mut surface = FrameBuffer::solid(target.width, target.height, &paint.color);

        if let Some(src) = &paint.src {
            match self.assets.image(src) {
                Ok(img) => {
                    let cover = cover_image(&img, target.width, target.height, paint.scale);
                    surface.composite_over(&cover, 0, 0);
                }
                Err(e) => {
                    tracing::warn!("Background image unavailable for layer {}: {}", layer.id, e);
                    notices.push(Notice::for_layer(
                        notice::IMAGE_LOAD_FAILED,
                        layer.id.as_str(),
                        e.to_string(),
                    ));
                }
            }
        }

        if let Some(pattern) = &paint.pattern {
            self.draw_pattern(&mut surface, pattern, target, layer, notices);
        }

        let opacity = LayerGeometry::of(layer).opacity as f32;
        composite_full(frame, surface, opacity);
        Some(full_bleed(target))
    }

    fn draw_pattern(
        &self,
        surface: &mut FrameBuffer,
        pattern: &PatternPaint,
        target: &RenderTarget,
        layer: &Layer,
        notices: &mut Vec<Notice>,
    ) {
        let text: &str = &pattern.text;
        let style = move |size: f64| TextStyle {
            text,
            family: "",
            size: size as f32,
            bold: false,
            italic: false,
            align: TextAlign::Center,
            letter_spacing: 0.0,
        };
        let font_px = target.px(pattern.size);
        let rendered = self.assets.text().measure(&style(font_px)).and_then(|measured| {
            let s = geometry::raster_scale(
                Size2D::new(measured.width.max(font_px), measured.height.max(font_px)),
                target,
            );
            self.assets.text().rasterize(&style(font_px * s)).map(|mask| (mask, s))
        });
        let Some((mask, s)) = rendered else {
            notices.push(Notice::for_layer(
                notice::FONT_MISSING,
                layer.id.as_str(),
                "no font available for the background pattern",
            ));
            return;
        };
        let label = Sprite::centered(mask.tint(&pattern.color));
        if label.is_empty() {
            return;
        }
        let (w, h) = (target.width as f64, target.height as f64);
        for tile in &pattern.tiles {
            let at = Point2D::new(tile.left / 100.0 * w, tile.top / 100.0 * h);
            let transform = Transform2D::new(at, 1.0 / s, pattern.rotation);
            raster::draw_sprite(surface, &label, &transform, 1.0, BlendMode::Normal);
        }
    }

    fn draw_image(
        &self,
        frame: &mut FrameBuffer,
        layer: &Layer,
        target: &RenderTarget,
        notices: &mut Vec<Notice>,
    ) -> Option<ResolvedBox> {
        let src = layer.src()?;
        let img = match self.assets.image(src) {
            Ok(img) => img,
            Err(e) => {
                tracing::warn!("Skipping image layer {}: {}", layer.id, e);
                notices.push(Notice::for_layer(
                    notice::IMAGE_LOAD_FAILED,
                    layer.id.as_str(),
                    e.to_string(),
                ));
                return None;
            }
        };
        let placed = ResolvedBox::resolve(layer, target, natural_size(&img, target.unit));
        let natural = Size2D::new(img.width as f64, img.height as f64);
        let fit = geometry::contain_rect(natural, placed.local_rect());
        let s = geometry::raster_scale(fit.size(), target);
        let (w, h) = ((fit.width * s).round() as u32, (fit.height * s).round() as u32);
        if w == 0 || h == 0 {
            return Some(placed);
        }

        let unit = target.unit * s;
        let mut sprite = Sprite::new(
            image_loader::resize_to(&img, w, h),
            (fit.x * s).round() as i32,
            (fit.y * s).round() as i32,
        );
        if let Some(outline) = effects::image_outline(layer) {
            sprite = raster::apply_outline(sprite, &outline, unit, false);
        }
        sprite = raster::apply_filter_chain(sprite, &effects::image_filters(layer), unit);

        let opacity = LayerGeometry::of(layer).opacity as f32;
        raster::draw_sprite(frame, &sprite, &enlarged(&placed.transform, s), opacity, BlendMode::Normal);
        Some(placed)
    }

    fn draw_text(
        &self,
        frame: &mut FrameBuffer,
        layer: &Layer,
        target: &RenderTarget,
        notices: &mut Vec<Notice>,
    ) -> Option<ResolvedBox> {
        let paint = effects::resolve_text_paint(layer, self.assets.presets())?;
        let base = text_style(&paint, target.unit);
        let rendered = self.assets.text().measure(&base).and_then(|measured| {
            let font_px = base.size as f64;
            let s = geometry::raster_scale(
                Size2D::new(measured.width.max(font_px), measured.height.max(font_px)),
                target,
            );
            self.assets
                .text()
                .rasterize(&text_style(&paint, target.unit * s))
                .map(|mask| (mask, s))
        });
        let Some((mask, s)) = rendered else {
            tracing::warn!("No font for text layer {} ({})", layer.id, paint.font_family);
            notices.push(Notice::for_layer(
                notice::FONT_MISSING,
                layer.id.as_str(),
                format!("font family '{}' is not available", paint.font_family),
            ));
            return None;
        };
        let placed = ResolvedBox::resolve(
            layer,
            target,
            Size2D::new(mask.width as f64 / s, mask.height as f64 / s),
        );
        if mask.is_empty() {
            return Some(placed);
        }

        let unit = target.unit * s;
        let origin_x = aligned_origin(paint.align, placed.size.width * s, mask.width);
        let origin_y = -((mask.height / 2) as i32);
        let mut sprite = Sprite::new(raster::paint_through(&mask, &paint.fills), origin_x, origin_y);
        if let Some(stroke) = &paint.stroke {
            sprite = raster::apply_outline(sprite, stroke, unit, true);
        }
        sprite = raster::apply_shadow_stack(sprite, &paint.shadows, unit);

        let opacity = LayerGeometry::of(layer).opacity as f32;
        raster::draw_sprite(frame, &sprite, &enlarged(&placed.transform, s), opacity, paint.blend);
        Some(placed)
    }

    fn draw_frame(
        &self,
        frame: &mut FrameBuffer,
        layer: &Layer,
        target: &RenderTarget,
    ) -> Option<ResolvedBox> {
        let paint = layer.frame_config().and_then(effects::resolve_frame)?;
        let ring = frame_ring(&paint, target);
        let surface = raster::fill_mask(&ring, &paint.fill);
        let opacity = LayerGeometry::of(layer).opacity as f32;
        composite_full(frame, surface, opacity);
        Some(full_bleed(target))
    }
}

fn decorates_selection(layer: &Layer) -> bool {
    !layer.locked && layer.layer_type() != LayerType::Frame
}

fn full_bleed(target: &RenderTarget) -> ResolvedBox {
    let size = target.size();
    ResolvedBox {
        size,
        transform: Transform2D::new(Point2D::new(size.width / 2.0, size.height / 2.0), 1.0, 0.0),
    }
}

/// Left edge of a `mask_width` text run inside a box `box_width` wide, both
/// in raster pixels, in center-origin coordinates. Runs at least as wide as
/// the box are centered.
fn aligned_origin(align: TextAlign, box_width: f64, mask_width: u32) -> i32 {
    let centered = -((mask_width / 2) as i32);
    let run = mask_width as f64;
    if !(box_width > run) {
        return centered;
    }
    match align {
        TextAlign::Left => (-box_width / 2.0).round() as i32,
        TextAlign::Center => centered,
        TextAlign::Right => (box_width / 2.0 - run).round() as i32,
    }
}

/// `transform` for a sprite rasterized at `raster_scale` of its box size.
fn enlarged(transform: &Transform2D, raster_scale: f64) -> Transform2D {
    if raster_scale == 1.0 {
        return *transform;
    }
    Transform2D::new(transform.position, transform.scale / raster_scale, transform.rotation)
}

fn natural_size(img: &FrameBuffer, unit: f64) -> Size2D {
    Size2D::new(img.width as f64 * unit, img.height as f64 * unit)
}

fn text_style(paint: &TextPaint, unit: f64) -> TextStyle<'_> {
    TextStyle {
        text: &paint.content,
        family: &paint.font_family,
        size: (paint.font_size * unit) as f32,
        bold: paint.bold,
        italic: paint.italic,
        align: paint.align,
        letter_spacing: (paint.letter_spacing * unit) as f32,
    }
}

fn composite_full(frame: &mut FrameBuffer, mut surface: FrameBuffer, opacity: f32) {
    if opacity <= 0.0 {
        return;
    }
    if opacity < 1.0 {
        surface.scale_alpha(opacity);
    }
    frame.composite_over(&surface, 0, 0);
}

/// Coverage of a frame ring: the rounded outer edge minus a square inner
/// edge inset by the ring width.
pub fn frame_ring(paint: &FramePaint, target: &RenderTarget) -> Mask {
    let (w, h) = (target.width as f64, target.height as f64);
    let radius = effects::corner_radius_px(paint.radius, w, h);
    let mut ring = raster::rounded_rect_mask(target.width, target.height, &target.rect(), radius);
    let inset = target.px(paint.width);
    let inner_rect = Rect::new(inset, inset, w - 2.0 * inset, h - 2.0 * inset);
    let inner = raster::rounded_rect_mask(target.width, target.height, &inner_rect, 0.0);
    for (o, i) in ring.data.iter_mut().zip(inner.data.iter()) {
        *o = ((*o as u32 * (255 - *i as u32) + 127) / 255) as u8;
    }
    ring
}

/// Scale `img` to cover a `width`×`height` surface, zoomed about the center
/// by `scale_percent`.
pub fn cover_image(img: &FrameBuffer, width: u32, height: u32, scale_percent: f64) -> FrameBuffer {
    let mut out = FrameBuffer::new(width, height);
    let source = Size2D::new(img.width as f64, img.height as f64);
    let dest = Size2D::new(width as f64, height as f64);
    if source.is_empty() || dest.is_empty() {
        return out;
    }
    let crop = geometry::background_crop(source, dest, scale_percent);
    let sx = crop.width / dest.width;
    let sy = crop.height / dest.height;
    let row_bytes = width as usize * FrameBuffer::BPP;
    out.data
        .par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let fy = crop.y + (y as f64 + 0.5) * sy - 0.5;
            for (x, px) in row.chunks_exact_mut(FrameBuffer::BPP).enumerate() {
                let fx = crop.x + (x as f64 + 0.5) * sx - 0.5;
                let fx = fx.clamp(0.0, source.width - 1.0);
                if let Some(s) = raster::sample_bilinear(img, fx, fy.clamp(0.0, source.height - 1.0)) {
                    px.copy_from_slice(&s);
                }
            }
        });
    out
}
