use crate::types::BlendMode;

/// An RGBA8 raster with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    /// Raw pixel data, 4 bytes per pixel, row-major.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Bytes per pixel.
    pub const BPP: usize = 4;

    /// Create a new frame buffer filled with zeros (transparent black).
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize) * Self::BPP;
        Self {
            data: vec![0u8; size],
            width,
            height,
        }
    }

    /// Create a frame buffer filled with a solid color.
    pub fn solid(width: u32, height: u32, color: &crate::Color) -> Self {
        let pixel = color.to_rgba8();
        let pixel_count = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixel_count * Self::BPP);
        for _ in 0..pixel_count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Wrap existing RGBA8 data. Returns None when the length does not match.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * Self::BPP {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
        })
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Total byte size of the pixel data.
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    /// True when every pixel is fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.data.chunks_exact(4).all(|p| p[3] == 0)
    }

    /// Get the RGBA value at a pixel coordinate. Returns None if out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y as usize) * (self.width as usize) + (x as usize)) * Self::BPP;
        Some([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ])
    }

    /// Set the RGBA value at a pixel coordinate. No-op if out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let offset = ((y as usize) * (self.width as usize) + (x as usize)) * Self::BPP;
        self.data[offset..offset + 4].copy_from_slice(&rgba);
    }

    /// Multiply every pixel's alpha by `factor` (clamped to 0..1).
    pub fn scale_alpha(&mut self, factor: f32) {
        let factor = factor.clamp(0.0, 1.0);
        if factor >= 1.0 {
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            px[3] = (px[3] as f32 * factor).round() as u8;
        }
    }

    /// Multiply alpha by a per-pixel coverage in 0..1 (same dimensions as self).
    pub fn apply_coverage(&mut self, coverage: &[f32]) {
        for (px, c) in self.data.chunks_exact_mut(4).zip(coverage.iter()) {
            px[3] = (px[3] as f32 * c.clamp(0.0, 1.0)).round() as u8;
        }
    }

    /// Apply an alpha mask to this buffer. Pixels outside the mask become transparent.
    pub fn apply_mask(&mut self, mask: &FrameBuffer, ox: i32, oy: i32) {
        let start_y = std::cmp::max(0, oy);
        let end_y = std::cmp::min(self.height as i32, oy + mask.height as i32);
        let start_x = std::cmp::max(0, ox);
        let end_x = std::cmp::min(self.width as i32, ox + mask.width as i32);

        for y in 0..(self.height as i32) {
            for x in 0..(self.width as i32) {
                let dst_idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;

                if x >= start_x && x < end_x && y >= start_y && y < end_y {
                    let mask_x = (x - ox) as usize;
                    let mask_y = (y - oy) as usize;
                    let mask_idx = (mask_y * (mask.width as usize) + mask_x) * 4;
                    let mask_a = mask.data[mask_idx + 3] as f32 / 255.0;
                    let current_a = self.data[dst_idx + 3] as f32;
                    self.data[dst_idx + 3] = (current_a * mask_a).round() as u8;
                } else {
                    self.data[dst_idx + 3] = 0;
                }
            }
        }
    }

    /// Alpha-composite `src` on top of `self` at position (dx, dy).
    /// Integer math over straight alpha, written to auto-vectorize.
    pub fn composite_over(&mut self, src: &FrameBuffer, dx: i32, dy: i32) {
        let Some((start_x, end_x, start_y, end_y)) = self.overlap(src, dx, dy) else {
            return;
        };

        let src_stride = (src.width * 4) as usize;
        let dst_stride = (self.width * 4) as usize;

        for sy in start_y..end_y {
            let dst_y = dy + sy;
            let src_row_start = (sy as usize * src_stride) + (start_x as usize * 4);
            let dst_row_start = (dst_y as usize * dst_stride) + ((dx + start_x) as usize * 4);
            let len = (end_x - start_x) as usize * 4;

            let src_slice = &src.data[src_row_start..src_row_start + len];
            let dst_slice = &mut self.data[dst_row_start..dst_row_start + len];

            for (s, d) in src_slice.chunks_exact(4).zip(dst_slice.chunks_exact_mut(4)) {
                blend_pixel_over(s, d);
            }
        }
    }

    /// Composite `src` at (dx, dy) using a separable blend mode, then
    /// source-over. `Normal` takes the integer fast path.
    pub fn composite_blend(&mut self, src: &FrameBuffer, dx: i32, dy: i32, mode: BlendMode) {
        if mode == BlendMode::Normal {
            self.composite_over(src, dx, dy);
            return;
        }
        let Some((start_x, end_x, start_y, end_y)) = self.overlap(src, dx, dy) else {
            return;
        };
        let src_stride = (src.width * 4) as usize;
        let dst_stride = (self.width * 4) as usize;

        for sy in start_y..end_y {
            let dst_y = dy + sy;
            let src_row_start = (sy as usize * src_stride) + (start_x as usize * 4);
            let dst_row_start = (dst_y as usize * dst_stride) + ((dx + start_x) as usize * 4);
            let len = (end_x - start_x) as usize * 4;

            let src_slice = &src.data[src_row_start..src_row_start + len];
            let dst_slice = &mut self.data[dst_row_start..dst_row_start + len];

            for (s, d) in src_slice.chunks_exact(4).zip(dst_slice.chunks_exact_mut(4)) {
                blend_pixel(s, d, mode);
            }
        }
    }

    /// Clipped overlap of `src` placed at (dx, dy), in source coordinates.
    fn overlap(&self, src: &FrameBuffer, dx: i32, dy: i32) -> Option<(i32, i32, i32, i32)> {
        let dst_width = self.width as i32;
        let dst_height = self.height as i32;

        let mut start_y = 0;
        let mut end_y = src.height as i32;
        let mut start_x = 0;
        let mut end_x = src.width as i32;

        if dy < 0 {
            start_y = -dy;
        }
        if dy + end_y > dst_height {
            end_y = dst_height - dy;
        }
        if dx < 0 {
            start_x = -dx;
        }
        if dx + end_x > dst_width {
            end_x = dst_width - dx;
        }

        if start_x >= end_x || start_y >= end_y {
            return None;
        }
        Some((start_x, end_x, start_y, end_y))
    }
}

/// Blend one straight-alpha pixel onto another with a separable blend mode:
/// the source color is mixed with the backdrop in proportion to the backdrop
/// alpha, then composited source-over.
#[inline]
pub fn blend_pixel(s: &[u8], d: &mut [u8], mode: BlendMode) {
    if mode == BlendMode::Normal {
        blend_pixel_over(s, d);
        return;
    }
    if s[3] == 0 {
        return;
    }
    let ab = d[3] as f32 / 255.0;
    let mut mixed = [0u8; 4];
    for c in 0..3 {
        let cs = s[c] as f32 / 255.0;
        let cb = d[c] as f32 / 255.0;
        let v = (1.0 - ab) * cs + ab * mode.apply(cb, cs);
        mixed[c] = (v * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    mixed[3] = s[3];
    blend_pixel_over(&mixed, d);
}

/// Porter-Duff source-over of one straight-alpha pixel onto another.
#[inline]
pub fn blend_pixel_over(s: &[u8], d: &mut [u8]) {
    let sa = s[3] as u32;
    if sa == 0 {
        return;
    }
    if sa == 255 {
        d[..4].copy_from_slice(&s[..4]);
        return;
    }

    let da = d[3] as u32;
    let inv_sa = 255 - sa;
    let out_a = sa + ((da * inv_sa) / 255);

    if out_a == 0 {
        return;
    }

    let d_weight = (da * inv_sa) / 255;
    for c in 0..3 {
        let v = (s[c] as u32 * sa + d[c] as u32 * d_weight) / out_a;
        d[c] = v.min(255) as u8;
    }
    d[3] = out_a as u8;
}
