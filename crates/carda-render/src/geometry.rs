//! Percent geometry to pixel placement.
//!
//! Layers store positions and sizes as percentages of the canvas, so the
//! same layer list lays out identically at any render size. Style values
//! given in pixels (font size, shadow offsets, border widths) are logical
//! canvas pixels and are multiplied by [`RenderTarget::unit`].

use carda_core::{Point2D, Rect, Size2D, Transform2D};
use carda_ir::{CanvasConfig, Layer};

/// Pixel surface a render pass draws into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTarget {
    pub width: u32,
    pub height: u32,
    /// Target pixels per logical canvas pixel.
    pub unit: f64,
}

impl RenderTarget {
    /// A target of `width`×`height` pixels for `canvas`.
    pub fn for_canvas(canvas: &CanvasConfig, width: u32, height: u32) -> Self {
        let cw = canvas.width.max(1) as f64;
        let ch = canvas.height.max(1) as f64;
        let unit = (width as f64 / cw).min(height as f64 / ch);
        Self {
            width,
            height,
            unit: if unit.is_finite() { unit } else { 0.0 },
        }
    }

    /// The canvas at its logical size times `pixel_ratio`.
    pub fn scaled(canvas: &CanvasConfig, pixel_ratio: f64) -> Self {
        let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        let width = (canvas.width as f64 * ratio).round().max(1.0) as u32;
        let height = (canvas.height as f64 * ratio).round().max(1.0) as u32;
        Self::for_canvas(canvas, width, height)
    }

    pub fn size(&self) -> Size2D {
        Size2D::new(self.width as f64, self.height as f64)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f64, self.height as f64)
    }

    /// Convert a logical pixel length to target pixels.
    pub fn px(&self, logical: f64) -> f64 {
        if logical.is_finite() {
            logical * self.unit
        } else {
            0.0
        }
    }
}

/// Which container edge the preview canvas is fitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitAxis {
    Width,
    Height,
}

/// Largest canvas-aspect rectangle that fits a preview container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewFit {
    pub axis: FitAxis,
    pub width: f64,
    pub height: f64,
}

/// Fit `canvas` into `container`, then apply the preview-only display scale.
/// A zero-sized container yields no surface.
pub fn fit_canvas(canvas: &CanvasConfig, container: Size2D) -> Option<PreviewFit> {
    if container.is_empty() || canvas.width == 0 || canvas.height == 0 {
        return None;
    }
    let canvas_ratio = canvas.aspect();
    let container_ratio = container.aspect_ratio();
    let display = if canvas.scale_display.is_finite() && canvas.scale_display > 0.0 {
        canvas.scale_display
    } else {
        1.0
    };
    let (axis, width, height) = if canvas_ratio > container_ratio {
        (FitAxis::Width, container.width, container.width / canvas_ratio)
    } else {
        (FitAxis::Height, container.height * canvas_ratio, container.height)
    };
    Some(PreviewFit {
        axis,
        width: width * display,
        height: height * display,
    })
}

/// Largest position or size a layer may take, percent of the canvas.
pub const MAX_PERCENT: f64 = 10_000.0;
/// Largest layer scale.
pub const MAX_SCALE: f64 = 100.0;
/// Sprites are never rasterized larger than this multiple of the target's
/// longer side; bigger content is drawn at reduced resolution and scaled up.
const MAX_RASTER_FACTOR: f64 = 2.0;

/// Layer geometry after defensive clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerGeometry {
    /// Center in percent.
    pub x: f64,
    pub y: f64,
    /// Percent size; `None` means size from content.
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: f64,
    pub scale: f64,
    /// 0..1
    pub opacity: f64,
}

fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        fallback
    }
}

impl LayerGeometry {
    /// Read a layer's geometry, clamping values that cannot be drawn:
    /// non-finite numbers fall back to neutral values, non-positive sizes
    /// become automatic, negative scales collapse to zero and everything is
    /// bounded by [`MAX_PERCENT`] and [`MAX_SCALE`].
    pub fn of(layer: &Layer) -> Self {
        let size = |v: f64| {
            let v = finite_or(v, 0.0);
            if v > 0.0 {
                Some(v.min(MAX_PERCENT))
            } else {
                None
            }
        };
        let position = |v: f64| finite_or(v, 0.0).clamp(-MAX_PERCENT, MAX_PERCENT);
        Self {
            x: position(layer.x),
            y: position(layer.y),
            width: size(layer.width),
            height: size(layer.height),
            rotation: finite_or(layer.rotation, 0.0),
            scale: finite_or(layer.scale, 1.0).clamp(0.0, MAX_SCALE),
            opacity: (finite_or(layer.opacity, 100.0) / 100.0).clamp(0.0, 1.0),
        }
    }

    /// Center of the layer in target pixels.
    pub fn center(&self, target: &RenderTarget) -> Point2D {
        Point2D::new(
            self.x / 100.0 * target.width as f64,
            self.y / 100.0 * target.height as f64,
        )
    }

    /// Untransformed box size in target pixels. `intrinsic` is the content's
    /// natural size in target pixels and fills in automatic dimensions.
    pub fn box_size(&self, target: &RenderTarget, intrinsic: Size2D) -> Size2D {
        let w = self.width.map(|w| w / 100.0 * target.width as f64);
        let h = self.height.map(|h| h / 100.0 * target.height as f64);
        let aspect = intrinsic.aspect_ratio();
        match (w, h) {
            (Some(w), Some(h)) => Size2D::new(w, h),
            (Some(w), None) if aspect > 0.0 => Size2D::new(w, w / aspect),
            (None, Some(h)) => Size2D::new(h * aspect, h),
            (Some(w), None) => Size2D::new(w, intrinsic.height.max(0.0)),
            (None, None) => Size2D::new(intrinsic.width.max(0.0), intrinsic.height.max(0.0)),
        }
    }

    /// Transform placing a center-origin local box onto the target.
    pub fn transform(&self, target: &RenderTarget) -> Transform2D {
        Transform2D::new(self.center(target), self.scale, self.rotation)
    }
}

/// Placement of a layer's content box on the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedBox {
    /// Untransformed size in target pixels.
    pub size: Size2D,
    /// Rotation and scale about the box center.
    pub transform: Transform2D,
}

impl ResolvedBox {
    pub fn resolve(layer: &Layer, target: &RenderTarget, intrinsic: Size2D) -> Self {
        let geometry = LayerGeometry::of(layer);
        Self {
            size: geometry.box_size(target, intrinsic),
            transform: geometry.transform(target),
        }
    }

    /// The box in its own center-origin coordinates.
    pub fn local_rect(&self) -> Rect {
        Rect::new(
            -self.size.width / 2.0,
            -self.size.height / 2.0,
            self.size.width,
            self.size.height,
        )
    }

    /// Axis-aligned bounds after rotation and scale.
    pub fn bounds(&self) -> Rect {
        self.transform.bounds_of(&self.local_rect())
    }

    /// Whether a target point falls inside the transformed box.
    pub fn contains(&self, p: Point2D) -> bool {
        match self.transform.invert(p) {
            Some(local) => self.local_rect().contains(local),
            None => false,
        }
    }
}

/// Factor in (0, 1] by which content of `size` target pixels is rasterized
/// so that neither side exceeds twice the target's longer side.
pub fn raster_scale(size: Size2D, target: &RenderTarget) -> f64 {
    let limit = (target.width.max(target.height).max(1) as f64) * MAX_RASTER_FACTOR;
    let longest = size.width.max(size.height);
    if longest.is_finite() && longest > limit {
        limit / longest
    } else {
        1.0
    }
}

/// Scale that makes `source` cover `dest` entirely.
pub fn cover_scale(source: Size2D, dest: Size2D) -> f64 {
    if source.is_empty() {
        return 0.0;
    }
    (dest.width / source.width).max(dest.height / source.height)
}

/// Largest rectangle of `source`'s aspect centered inside `dest`.
pub fn contain_rect(source: Size2D, dest: Rect) -> Rect {
    if source.is_empty() || dest.width <= 0.0 || dest.height <= 0.0 {
        return Rect::new(dest.center().x, dest.center().y, 0.0, 0.0);
    }
    let scale = (dest.width / source.width).min(dest.height / source.height);
    Rect::from_center(
        dest.center(),
        Size2D::new(source.width * scale, source.height * scale),
    )
}

pub const MIN_BACKGROUND_SCALE: f64 = 100.0;
pub const MAX_BACKGROUND_SCALE: f64 = 200.0;

/// Background zoom in percent, clamped to 100..200. Missing means 100.
pub fn clamp_background_scale(scale: Option<f64>) -> f64 {
    match scale {
        Some(s) if s.is_finite() => s.clamp(MIN_BACKGROUND_SCALE, MAX_BACKGROUND_SCALE),
        _ => MIN_BACKGROUND_SCALE,
    }
}

/// Region of the source image that stays visible when it is cover-fitted
/// to `dest` and zoomed about the center by `scale_percent`.
pub fn background_crop(source: Size2D, dest: Size2D, scale_percent: f64) -> Rect {
    let zoom = clamp_background_scale(Some(scale_percent)) / 100.0;
    let scale = cover_scale(source, dest) * zoom;
    if scale <= 0.0 {
        return Rect::new(0.0, 0.0, 0.0, 0.0);
    }
    let visible = Size2D::new(dest.width / scale, dest.height / scale);
    Rect::from_center(
        Point2D::new(source.width / 2.0, source.height / 2.0),
        visible,
    )
}
