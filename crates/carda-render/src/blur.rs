//! Separable gaussian blur and dilation on 8-bit coverage masks.
//!
//! Samples outside the mask count as zero, so a silhouette fades out at the
//! edges of its buffer instead of smearing the border pixels.

use rayon::prelude::*;

/// Blur parameters for a CSS blur length: the length is twice the standard
/// deviation, and the kernel reaches three deviations out.
pub fn kernel_for_css_blur(blur_px: f64) -> (u32, f32) {
    if !(blur_px > 0.0) || !blur_px.is_finite() {
        return (0, 0.0);
    }
    let sigma = (blur_px / 2.0) as f32;
    let radius = (sigma * 3.0).ceil().max(1.0) as u32;
    (radius, sigma)
}

/// Extra border, in pixels, a blur of `blur_px` needs around its source.
pub fn blur_margin(blur_px: f64) -> u32 {
    kernel_for_css_blur(blur_px).0
}

pub fn blur_alpha(src: &[u8], width: u32, height: u32, radius: u32, sigma: f32) -> Vec<u8> {
    let expected = width as usize * height as usize;
    if radius == 0 || !(sigma > 0.0) || src.len() != expected || expected == 0 {
        return src.to_vec();
    }
    let kernel = gaussian_kernel_q16(radius, sigma);
    let mut tmp = vec![0u8; expected];
    let mut out = vec![0u8; expected];
    horizontal_pass(src, &mut tmp, width, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    out
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> Vec<u32> {
    let r = radius as i32;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = i as f64;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // push rounding error into the center tap so the kernel sums to 1.0
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    weights
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    dst.par_chunks_mut(width as usize)
        .zip(src.par_chunks(width as usize))
        .for_each(|(out_row, in_row)| {
            for x in 0..w {
                let mut acc = 0u64;
                for (ki, &kw) in k.iter().enumerate() {
                    let sx = x + ki as i32 - radius;
                    if sx >= 0 && sx < w {
                        acc += kw as u64 * in_row[sx as usize] as u64;
                    }
                }
                out_row[x as usize] = q16_to_u8(acc);
            }
        });
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as usize;
    let h = height as i32;
    dst.par_chunks_mut(w).enumerate().for_each(|(y, out_row)| {
        let y = y as i32;
        for (x, out) in out_row.iter_mut().enumerate() {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sy = y + ki as i32 - radius;
                if sy >= 0 && sy < h {
                    acc += kw as u64 * src[sy as usize * w + x] as u64;
                }
            }
            *out = q16_to_u8(acc);
        }
    });
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

/// Grow coverage by `radius` pixels using a circular max filter.
pub fn dilate(src: &[u8], width: u32, height: u32, radius: u32) -> Vec<u8> {
    let expected = width as usize * height as usize;
    if radius == 0 || src.len() != expected || expected == 0 {
        return src.to_vec();
    }
    let r = radius as i32;
    let offsets: Vec<(i32, i32)> = (-r..=r)
        .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
        .filter(|(dx, dy)| dx * dx + dy * dy <= r * r)
        .collect();
    let (w, h) = (width as i32, height as i32);
    let mut out = vec![0u8; expected];
    out.par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as i32;
            for (x, out) in row.iter_mut().enumerate() {
                let x = x as i32;
                let mut best = 0u8;
                for &(dx, dy) in &offsets {
                    let (sx, sy) = (x + dx, y + dy);
                    if sx >= 0 && sx < w && sy >= 0 && sy < h {
                        best = best.max(src[(sy * w + sx) as usize]);
                        if best == 255 {
                            break;
                        }
                    }
                }
                *out = best;
            }
        });
    out
}
