//! CPU rasterization primitives: coverage masks, fills, drop shadows and
//! transformed sprite drawing.

use rayon::prelude::*;

use carda_core::frame::blend_pixel;
use carda_core::{BlendMode, Color, FrameBuffer, Point2D, Rect, Transform2D};

use crate::blur;
use crate::effects::{DropShadow, Fill, Outline, PaintLayer};

/// 8-bit coverage raster.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Mask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    /// The alpha channel of a frame.
    pub fn from_alpha(frame: &FrameBuffer) -> Self {
        Self {
            width: frame.width,
            height: frame.height,
            data: frame.data.chunks_exact(4).map(|p| p[3]).collect(),
        }
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[y as usize * self.width as usize + x as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }

    /// Copy with `margin` empty pixels added on every side.
    pub fn padded(&self, margin: u32) -> Mask {
        if margin == 0 {
            return self.clone();
        }
        let mut out = Mask::new(self.width + 2 * margin, self.height + 2 * margin);
        let (src_w, out_w, m) = (self.width as usize, out.width as usize, margin as usize);
        for y in 0..self.height as usize {
            let dst = (y + m) * out_w + m;
            out.data[dst..dst + src_w].copy_from_slice(&self.data[y * src_w..(y + 1) * src_w]);
        }
        out
    }

    pub fn dilated(&self, radius: u32) -> Mask {
        Mask {
            width: self.width,
            height: self.height,
            data: blur::dilate(&self.data, self.width, self.height, radius),
        }
    }

    /// Gaussian blur for a CSS blur length in pixels.
    pub fn blurred(&self, blur_px: f64) -> Mask {
        let (radius, sigma) = blur::kernel_for_css_blur(blur_px);
        Mask {
            width: self.width,
            height: self.height,
            data: blur::blur_alpha(&self.data, self.width, self.height, radius, sigma),
        }
    }

    /// Coverage as 0..1 floats, for `FrameBuffer::apply_coverage`.
    pub fn coverage(&self) -> Vec<f32> {
        self.data.iter().map(|&v| v as f32 / 255.0).collect()
    }

    /// Paint a single color through the mask.
    pub fn tint(&self, color: &Color) -> FrameBuffer {
        let [r, g, b, a] = color.to_rgba8();
        let mut frame = FrameBuffer::new(self.width, self.height);
        for (px, &m) in frame.data.chunks_exact_mut(4).zip(self.data.iter()) {
            if m == 0 {
                continue;
            }
            px[0] = r;
            px[1] = g;
            px[2] = b;
            px[3] = ((a as u32 * m as u32 + 127) / 255) as u8;
        }
        frame
    }
}

/// Signed distance from (`px`, `py`) to a rounded rectangle's edge;
/// negative inside.
fn rounded_rect_distance(px: f64, py: f64, rect: &Rect, radius: f64) -> f64 {
    let c = rect.center();
    let r = radius.clamp(0.0, rect.width.min(rect.height) / 2.0);
    let qx = (px - c.x).abs() - (rect.width / 2.0 - r);
    let qy = (py - c.y).abs() - (rect.height / 2.0 - r);
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    let inside = qx.max(qy).min(0.0);
    outside + inside - r
}

/// Anti-aliased coverage of a rounded rectangle on a `width`×`height` grid.
pub fn rounded_rect_mask(width: u32, height: u32, rect: &Rect, radius: f64) -> Mask {
    let mut mask = Mask::new(width, height);
    if width == 0 || height == 0 || rect.width <= 0.0 || rect.height <= 0.0 {
        return mask;
    }
    mask.data
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let d = rounded_rect_distance(x as f64 + 0.5, y as f64 + 0.5, rect, radius);
                *out = ((0.5 - d).clamp(0.0, 1.0) * 255.0).round() as u8;
            }
        });
    mask
}

/// Multiply the frame's alpha by a full-surface rounded-rect clip.
pub fn clip_rounded(frame: &mut FrameBuffer, radius_px: f64) {
    if radius_px <= 0.0 {
        return;
    }
    let surface = Rect::new(0.0, 0.0, frame.width as f64, frame.height as f64);
    let mask = rounded_rect_mask(frame.width, frame.height, &surface, radius_px);
    frame.apply_coverage(&mask.coverage());
}

/// Evaluate a stack of fills over a `width`×`height` box and keep only what
/// the mask covers.
pub fn paint_through(mask: &Mask, layers: &[PaintLayer]) -> FrameBuffer {
    let (w, h) = (mask.width as f64, mask.height as f64);
    let mut frame = FrameBuffer::new(mask.width, mask.height);
    let row_bytes = mask.width as usize * FrameBuffer::BPP;
    if row_bytes == 0 {
        return frame;
    }
    frame
        .data
        .par_chunks_mut(row_bytes)
        .zip(mask.data.par_chunks(mask.width as usize))
        .enumerate()
        .for_each(|(y, (row, coverage))| {
            for (x, &m) in coverage.iter().enumerate() {
                if m == 0 {
                    continue;
                }
                let px = &mut row[x * 4..x * 4 + 4];
                let (cx, cy) = (x as f64 + 0.5, y as f64 + 0.5);
                for layer in layers {
                    let s = layer.fill.sample(cx, cy, w, h).to_rgba8();
                    blend_pixel(&s, px, layer.blend);
                }
                px[3] = ((px[3] as u32 * m as u32 + 127) / 255) as u8;
            }
        });
    frame
}

/// Paint one fill through a mask.
pub fn fill_mask(mask: &Mask, fill: &Fill) -> FrameBuffer {
    match fill {
        Fill::Solid(color) => mask.tint(color),
        other => paint_through(
            mask,
            &[PaintLayer {
                fill: other.clone(),
                blend: BlendMode::Normal,
            }],
        ),
    }
}

/// A raster positioned in a layer's local space, where the layer's center is
/// the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub frame: FrameBuffer,
    /// Local coordinates of the top-left pixel corner.
    pub origin_x: i32,
    pub origin_y: i32,
}

impl Sprite {
    pub fn new(frame: FrameBuffer, origin_x: i32, origin_y: i32) -> Self {
        Self {
            frame,
            origin_x,
            origin_y,
        }
    }

    /// A frame centered on the local origin.
    pub fn centered(frame: FrameBuffer) -> Self {
        let ox = -((frame.width / 2) as i32);
        let oy = -((frame.height / 2) as i32);
        Self::new(frame, ox, oy)
    }

    pub fn local_rect(&self) -> Rect {
        Rect::new(
            self.origin_x as f64,
            self.origin_y as f64,
            self.frame.width as f64,
            self.frame.height as f64,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.frame.width == 0 || self.frame.height == 0
    }
}

/// Composite sprites bottom to top into one sprite covering all of them.
pub fn flatten(sprites: &[Sprite]) -> Sprite {
    let Some(first) = sprites.first() else {
        return Sprite::new(FrameBuffer::new(0, 0), 0, 0);
    };
    let mut x0 = first.origin_x;
    let mut y0 = first.origin_y;
    let mut x1 = first.origin_x + first.frame.width as i32;
    let mut y1 = first.origin_y + first.frame.height as i32;
    for s in &sprites[1..] {
        x0 = x0.min(s.origin_x);
        y0 = y0.min(s.origin_y);
        x1 = x1.max(s.origin_x + s.frame.width as i32);
        y1 = y1.max(s.origin_y + s.frame.height as i32);
    }
    let mut out = FrameBuffer::new((x1 - x0).max(0) as u32, (y1 - y0).max(0) as u32);
    for s in sprites {
        out.composite_over(&s.frame, s.origin_x - x0, s.origin_y - y0);
    }
    Sprite::new(out, x0, y0)
}

/// Convert logical pixels to whole target pixels.
fn to_px(logical: f64, unit: f64) -> f64 {
    let v = logical * unit;
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// The tinted, blurred silhouette of `source` for one drop shadow.
pub fn shadow_sprite(source: &Sprite, shadow: &DropShadow, unit: f64) -> Sprite {
    let blur_px = to_px(shadow.blur, unit);
    let spread = to_px(shadow.spread, unit).round().max(0.0) as u32;
    let margin = blur::blur_margin(blur_px) + spread;
    let mut mask = Mask::from_alpha(&source.frame).padded(margin);
    if spread > 0 {
        mask = mask.dilated(spread);
    }
    if blur_px > 0.0 {
        mask = mask.blurred(blur_px);
    }
    Sprite::new(
        mask.tint(&shadow.color),
        source.origin_x - margin as i32 + to_px(shadow.offset_x, unit).round() as i32,
        source.origin_y - margin as i32 + to_px(shadow.offset_y, unit).round() as i32,
    )
}

/// Apply a filter chain in order; each shadow is cast by everything drawn so
/// far, and the content stays on top.
pub fn apply_filter_chain(source: Sprite, filters: &[DropShadow], unit: f64) -> Sprite {
    filters.iter().fold(source, |acc, shadow| {
        if shadow.is_invisible() || acc.is_empty() {
            return acc;
        }
        let under = shadow_sprite(&acc, shadow, unit);
        flatten(&[under, acc])
    })
}

/// Stack independent shadows of `source` beneath it. The first shadow ends
/// up directly under the content, the last at the bottom.
pub fn apply_shadow_stack(source: Sprite, shadows: &[DropShadow], unit: f64) -> Sprite {
    if source.is_empty() {
        return source;
    }
    let mut layers: Vec<Sprite> = shadows
        .iter()
        .rev()
        .filter(|s| !s.is_invisible())
        .map(|s| shadow_sprite(&source, s, unit))
        .collect();
    if layers.is_empty() {
        return source;
    }
    layers.push(source);
    flatten(&layers)
}

/// Outline the opaque parts of `source`, drawn beneath it.
pub fn apply_outline(source: Sprite, outline: &Outline, unit: f64, centered: bool) -> Sprite {
    let width_px = to_px(outline.width, unit);
    if source.is_empty() || width_px <= 0.0 {
        return source;
    }
    let reach = if centered { width_px / 2.0 } else { width_px };
    let radius = reach.round().max(1.0) as u32;
    let ring = Mask::from_alpha(&source.frame).padded(radius).dilated(radius);
    let under = Sprite::new(
        ring.tint(&outline.color),
        source.origin_x - radius as i32,
        source.origin_y - radius as i32,
    );
    flatten(&[under, source])
}

/// Sample with bilinear filtering; (`fx`, `fy`) are continuous coordinates
/// where pixel `i` has its center at `i`. Outside texels count as
/// transparent. Interpolation happens on premultiplied values.
pub fn sample_bilinear(frame: &FrameBuffer, fx: f64, fy: f64) -> Option<[u8; 4]> {
    let (w, h) = (frame.width as i64, frame.height as i64);
    if !(fx > -1.0 && fy > -1.0 && fx < w as f64 && fy < h as f64) {
        return None;
    }
    let x0 = fx.floor() as i64;
    let y0 = fy.floor() as i64;
    let tx = (fx - x0 as f64) as f32;
    let ty = (fy - y0 as f64) as f32;
    let mut acc = [0f32; 4];
    for (dx, dy, weight) in [
        (0, 0, (1.0 - tx) * (1.0 - ty)),
        (1, 0, tx * (1.0 - ty)),
        (0, 1, (1.0 - tx) * ty),
        (1, 1, tx * ty),
    ] {
        let (x, y) = (x0 + dx, y0 + dy);
        if weight <= 0.0 || x < 0 || y < 0 || x >= w || y >= h {
            continue;
        }
        let i = ((y * w + x) as usize) * 4;
        let p = &frame.data[i..i + 4];
        let a = p[3] as f32 * weight;
        acc[0] += p[0] as f32 * a;
        acc[1] += p[1] as f32 * a;
        acc[2] += p[2] as f32 * a;
        acc[3] += a;
    }
    if acc[3] < 0.5 {
        return None;
    }
    Some([
        (acc[0] / acc[3]).round().clamp(0.0, 255.0) as u8,
        (acc[1] / acc[3]).round().clamp(0.0, 255.0) as u8,
        (acc[2] / acc[3]).round().clamp(0.0, 255.0) as u8,
        acc[3].round().clamp(0.0, 255.0) as u8,
    ])
}

fn is_pixel_aligned(transform: &Transform2D, sprite: &Sprite) -> Option<(i32, i32)> {
    if transform.scale != 1.0 || transform.rotation.rem_euclid(360.0) != 0.0 {
        return None;
    }
    let x = transform.position.x + sprite.origin_x as f64;
    let y = transform.position.y + sprite.origin_y as f64;
    if x.fract() == 0.0 && y.fract() == 0.0 {
        Some((x as i32, y as i32))
    } else {
        None
    }
}

/// Draw a sprite onto `dst` through `transform`, scaling its alpha by
/// `opacity` and blending with `blend`.
pub fn draw_sprite(
    dst: &mut FrameBuffer,
    sprite: &Sprite,
    transform: &Transform2D,
    opacity: f32,
    blend: BlendMode,
) {
    let opacity = opacity.clamp(0.0, 1.0);
    if sprite.is_empty() || opacity <= 0.0 || dst.width == 0 || dst.height == 0 {
        return;
    }

    if let Some((dx, dy)) = is_pixel_aligned(transform, sprite) {
        if opacity >= 1.0 {
            dst.composite_blend(&sprite.frame, dx, dy, blend);
        } else {
            let mut faded = sprite.frame.clone();
            faded.scale_alpha(opacity);
            dst.composite_blend(&faded, dx, dy, blend);
        }
        return;
    }

    let surface = Rect::new(0.0, 0.0, dst.width as f64, dst.height as f64);
    let Some(bounds) = transform.bounds_of(&sprite.local_rect()).intersect(&surface) else {
        return;
    };
    let x0 = bounds.x.floor().max(0.0) as usize;
    let x1 = (bounds.right().ceil() as usize).min(dst.width as usize);
    let y0 = bounds.y.floor().max(0.0) as usize;
    let y1 = (bounds.bottom().ceil() as usize).min(dst.height as usize);
    let row_bytes = dst.width as usize * FrameBuffer::BPP;
    let (ox, oy) = (sprite.origin_x as f64, sprite.origin_y as f64);

    dst.data
        .par_chunks_mut(row_bytes)
        .enumerate()
        .skip(y0)
        .take(y1.saturating_sub(y0))
        .for_each(|(y, row)| {
            for x in x0..x1 {
                let p = Point2D::new(x as f64 + 0.5, y as f64 + 0.5);
                let Some(local) = transform.invert(p) else {
                    return;
                };
                let Some(mut s) = sample_bilinear(&sprite.frame, local.x - ox - 0.5, local.y - oy - 0.5)
                else {
                    continue;
                };
                s[3] = (s[3] as f32 * opacity).round() as u8;
                if s[3] == 0 {
                    continue;
                }
                blend_pixel(&s, &mut row[x * 4..x * 4 + 4], blend);
            }
        });
}

/// Dashed outline along a transformed local rectangle.
pub fn draw_dashed_rect(
    dst: &mut FrameBuffer,
    local: &Rect,
    transform: &Transform2D,
    color: &Color,
    thickness: f64,
    dash: f64,
) {
    let rgba = color.to_rgba8();
    let corners = [
        transform.apply(Point2D::new(local.x, local.y)),
        transform.apply(Point2D::new(local.right(), local.y)),
        transform.apply(Point2D::new(local.right(), local.bottom())),
        transform.apply(Point2D::new(local.x, local.bottom())),
    ];
    let half = (thickness / 2.0).max(0.5);
    let dash = dash.max(1.0);
    for i in 0..4 {
        let (a, b) = (corners[i], corners[(i + 1) % 4]);
        let len = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
        if !len.is_finite() {
            continue;
        }
        let steps = (len * 2.0).ceil() as usize;
        for step in 0..=steps {
            let d = step as f64 * 0.5;
            if ((d / dash).floor() as i64) % 2 == 1 {
                continue;
            }
            let t = if len > 0.0 { (d / len).min(1.0) } else { 0.0 };
            let p = a.lerp(&b, t);
            let (px0, px1) = ((p.x - half).floor() as i64, (p.x + half).ceil() as i64);
            let (py0, py1) = ((p.y - half).floor() as i64, (p.y + half).ceil() as i64);
            for py in py0.max(0)..py1.min(dst.height as i64) {
                for px in px0.max(0)..px1.min(dst.width as i64) {
                    dst.set_pixel(px as u32, py as u32, rgba);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque(w: u32, h: u32, rgba: [u8; 4]) -> FrameBuffer {
        let mut f = FrameBuffer::new(w, h);
        for px in f.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
        f
    }

    #[test]
    fn test_rounded_rect_corners() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mask = rounded_rect_mask(100, 100, &rect, 20.0);
        assert_eq!(mask.get(0, 0), 0);
        assert_eq!(mask.get(50, 50), 255);
        assert_eq!(mask.get(50, 0), 255);
        assert_eq!(mask.get(3, 3), 0);
        assert!(mask.get(8, 8) > 0);
    }

    #[test]
    fn test_clip_rounded_zero_radius_is_noop() {
        let mut frame = opaque(10, 10, [1, 2, 3, 255]);
        let before = frame.clone();
        clip_rounded(&mut frame, 0.0);
        assert_eq!(frame, before);
        clip_rounded(&mut frame, 5.0);
        assert_eq!(frame.get_pixel(0, 0).unwrap()[3], 0);
        assert_eq!(frame.get_pixel(5, 5).unwrap()[3], 255);
    }

    #[test]
    fn test_mask_padding_and_tint() {
        let mut mask = Mask::new(2, 1);
        mask.data = vec![255, 128];
        let padded = mask.padded(1);
        assert_eq!((padded.width, padded.height), (4, 3));
        assert_eq!(padded.get(1, 1), 255);
        assert_eq!(padded.get(2, 1), 128);
        assert_eq!(padded.get(0, 0), 0);

        let tinted = mask.tint(&Color::RED);
        assert_eq!(tinted.get_pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(tinted.get_pixel(1, 0), Some([255, 0, 0, 128]));
    }

    #[test]
    fn test_paint_through_gradient() {
        let mut mask = Mask::new(10, 1);
        mask.data.iter_mut().for_each(|v| *v = 255);
        let fill = Fill::Linear(crate::effects::LinearGradient::new(
            90.0,
            vec![(0.0, Color::BLACK), (1.0, Color::WHITE)],
        ));
        let frame = fill_mask(&mask, &fill);
        let left = frame.get_pixel(0, 0).unwrap();
        let right = frame.get_pixel(9, 0).unwrap();
        assert!(left[0] < 20);
        assert!(right[0] > 235);
        assert_eq!(left[3], 255);
    }

    #[test]
    fn test_flatten_covers_union() {
        let a = Sprite::new(opaque(2, 2, [255, 0, 0, 255]), -2, -2);
        let b = Sprite::new(opaque(2, 2, [0, 0, 255, 255]), 1, 1);
        let flat = flatten(&[a, b]);
        assert_eq!((flat.origin_x, flat.origin_y), (-2, -2));
        assert_eq!((flat.frame.width, flat.frame.height), (5, 5));
        assert_eq!(flat.frame.get_pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(flat.frame.get_pixel(4, 4), Some([0, 0, 255, 255]));
        assert_eq!(flat.frame.get_pixel(2, 2).unwrap()[3], 0);
    }

    #[test]
    fn test_hard_shadow_offset() {
        let content = Sprite::centered(opaque(4, 4, [255, 255, 255, 255]));
        let shadow = DropShadow {
            offset_x: 3.0,
            offset_y: 0.0,
            blur: 0.0,
            spread: 0.0,
            color: Color::BLACK,
        };
        let out = apply_filter_chain(content, &[shadow], 1.0);
        assert_eq!((out.frame.width, out.frame.height), (7, 4));
        assert_eq!(out.frame.get_pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(out.frame.get_pixel(6, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_shadow_scales_with_unit() {
        let content = Sprite::centered(opaque(4, 4, [255, 255, 255, 255]));
        let shadow = DropShadow {
            offset_x: 2.0,
            offset_y: 2.0,
            blur: 0.0,
            spread: 0.0,
            color: Color::BLACK,
        };
        let under = shadow_sprite(&content, &shadow, 2.0);
        assert_eq!(under.origin_x, content.origin_x + 4);
        assert_eq!(under.origin_y, content.origin_y + 4);
    }

    #[test]
    fn test_shadow_stack_first_on_top() {
        let content = Sprite::centered(opaque(2, 2, [255, 255, 255, 255]));
        let red = DropShadow {
            offset_x: 1.0,
            offset_y: 0.0,
            blur: 0.0,
            spread: 0.0,
            color: Color::RED,
        };
        let blue = DropShadow {
            offset_x: 2.0,
            color: Color::BLUE,
            ..red
        };
        let out = apply_shadow_stack(content, &[red, blue], 1.0);
        // column 2 is covered by both shadows; the first one wins
        assert_eq!(out.frame.get_pixel(2, 0), Some([255, 0, 0, 255]));
        assert_eq!(out.frame.get_pixel(3, 0), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_outline_surrounds_content() {
        let content = Sprite::centered(opaque(2, 2, [0, 255, 0, 255]));
        let out = apply_outline(
            content,
            &Outline {
                width: 1.0,
                color: Color::WHITE,
            },
            1.0,
            false,
        );
        assert_eq!((out.frame.width, out.frame.height), (4, 4));
        assert_eq!(out.frame.get_pixel(0, 1), Some([255, 255, 255, 255]));
        assert_eq!(out.frame.get_pixel(1, 1), Some([0, 255, 0, 255]));
    }

    #[test]
    fn test_draw_sprite_aligned_fast_path() {
        let mut dst = FrameBuffer::new(10, 10);
        let sprite = Sprite::centered(opaque(4, 4, [255, 0, 0, 255]));
        draw_sprite(
            &mut dst,
            &sprite,
            &Transform2D::new(Point2D::new(5.0, 5.0), 1.0, 0.0),
            1.0,
            BlendMode::Normal,
        );
        assert_eq!(dst.get_pixel(3, 3), Some([255, 0, 0, 255]));
        assert_eq!(dst.get_pixel(6, 6), Some([255, 0, 0, 255]));
        assert_eq!(dst.get_pixel(7, 7).unwrap()[3], 0);
        assert_eq!(dst.get_pixel(2, 2).unwrap()[3], 0);
    }

    #[test]
    fn test_draw_sprite_rotated() {
        let mut dst = FrameBuffer::new(20, 20);
        let sprite = Sprite::centered(opaque(10, 2, [0, 0, 255, 255]));
        draw_sprite(
            &mut dst,
            &sprite,
            &Transform2D::new(Point2D::new(10.0, 10.0), 1.0, 90.0),
            1.0,
            BlendMode::Normal,
        );
        // a horizontal bar turned upright
        assert_eq!(dst.get_pixel(10, 6).unwrap()[3], 255);
        assert_eq!(dst.get_pixel(6, 10).unwrap()[3], 0);
    }

    #[test]
    fn test_draw_sprite_scaled_and_faded() {
        let mut dst = FrameBuffer::new(20, 20);
        let sprite = Sprite::centered(opaque(4, 4, [255, 255, 255, 255]));
        draw_sprite(
            &mut dst,
            &sprite,
            &Transform2D::new(Point2D::new(10.0, 10.0), 2.0, 0.0),
            0.5,
            BlendMode::Normal,
        );
        assert_eq!(dst.get_pixel(10, 10).unwrap()[3], 128);
        assert_eq!(dst.get_pixel(7, 10).unwrap()[3], 128);
        assert_eq!(dst.get_pixel(2, 10).unwrap()[3], 0);
    }

    #[test]
    fn test_bilinear_outside_is_none() {
        let frame = opaque(2, 2, [9, 9, 9, 255]);
        assert!(sample_bilinear(&frame, -1.5, 0.0).is_none());
        assert_eq!(sample_bilinear(&frame, 0.5, 0.5), Some([9, 9, 9, 255]));
    }

    #[test]
    fn test_dashed_rect_has_gaps() {
        let mut dst = FrameBuffer::new(40, 40);
        draw_dashed_rect(
            &mut dst,
            &Rect::new(-15.0, -15.0, 30.0, 30.0),
            &Transform2D::new(Point2D::new(20.0, 20.0), 1.0, 0.0),
            &Color::from_rgb8(0x3b, 0x82, 0xf6, 1.0),
            2.0,
            6.0,
        );
        let top: Vec<u8> = (5..35).map(|x| dst.get_pixel(x, 5).unwrap()[3]).collect();
        assert!(top.iter().any(|&a| a == 255));
        assert!(top.iter().any(|&a| a == 0));
        assert_eq!(dst.get_pixel(20, 20).unwrap()[3], 0);
    }
}
