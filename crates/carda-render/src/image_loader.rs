//! Image loading module.
//! Decodes PNG, JPEG, WebP and other formats into FrameBuffers, and converts
//! between files and the `data:` URIs layers store as their source.

use std::path::Path;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use carda_core::{CardaError, CardaResult, FrameBuffer};
use image::imageops::FilterType;
use image::ImageFormat;

fn from_dynamic(img: image::DynamicImage) -> FrameBuffer {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    FrameBuffer {
        data: rgba.into_raw(),
        width,
        height,
    }
}

/// Load an image file and convert it to a FrameBuffer.
pub fn load_image(path: &Path) -> CardaResult<FrameBuffer> {
    let img = image::open(path).map_err(|e| {
        CardaError::asset(
            format!("failed to load image '{}': {}", path.display(), e),
            path,
        )
    })?;
    Ok(from_dynamic(img))
}

/// Decode an image held in memory.
pub fn load_image_from_bytes(data: &[u8]) -> CardaResult<FrameBuffer> {
    let img = image::load_from_memory(data)
        .map_err(|e| CardaError::asset(format!("failed to decode image: {}", e), "<memory>"))?;
    Ok(from_dynamic(img))
}

/// Split a base64 `data:` URI into its MIME type and payload bytes.
pub fn decode_data_uri(uri: &str) -> CardaResult<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| CardaError::InvalidArgument("not a data URI".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CardaError::InvalidArgument("data URI has no payload".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| CardaError::Unsupported("only base64 data URIs are supported".to_string()))?;
    let bytes = BASE64_STANDARD
        .decode(payload.trim())
        .map_err(|e| CardaError::InvalidArgument(format!("invalid base64 payload: {}", e)))?;
    Ok((mime.to_string(), bytes))
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64_STANDARD.encode(bytes))
}

/// MIME type for an image file, judged by extension and then by content.
pub fn mime_for(path: &Path, bytes: &[u8]) -> CardaResult<&'static str> {
    if path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
    {
        return Ok("image/svg+xml");
    }
    ImageFormat::from_path(path)
        .or_else(|_| image::guess_format(bytes))
        .map(|f| f.to_mime_type())
        .map_err(|e| CardaError::asset(format!("unknown image format: {}", e), path))
}

/// Read an image file into a `data:` URI, checking that it decodes.
/// Returns the URI with the decoded frame.
pub fn file_to_data_uri(path: &Path) -> CardaResult<(String, FrameBuffer)> {
    let bytes = std::fs::read(path)
        .map_err(|e| CardaError::asset(format!("failed to read image: {}", e), path))?;
    let mime = mime_for(path, &bytes)?;
    let frame = load_image_from_bytes(&bytes).map_err(|e| CardaError::asset(e.to_string(), path))?;
    Ok((encode_data_uri(mime, &bytes), frame))
}

/// Decode a layer source: a `data:` URI, or a file path resolved against
/// `base_dir` when relative.
pub fn load_source(src: &str, base_dir: Option<&Path>) -> CardaResult<FrameBuffer> {
    if src.starts_with("data:") {
        let (_, bytes) = decode_data_uri(src)?;
        return load_image_from_bytes(&bytes);
    }
    let path = Path::new(src);
    match base_dir {
        Some(dir) if path.is_relative() => load_image(&dir.join(path)),
        _ => load_image(path),
    }
}

/// Resample to exactly `width`×`height` with a triangle filter.
pub fn resize_to(fb: &FrameBuffer, width: u32, height: u32) -> FrameBuffer {
    if width == fb.width && height == fb.height {
        return fb.clone();
    }
    if width == 0 || height == 0 || fb.width == 0 || fb.height == 0 {
        return FrameBuffer::new(width, height);
    }
    let Some(src) = image::RgbaImage::from_raw(fb.width, fb.height, fb.data.clone()) else {
        return FrameBuffer::new(width, height);
    };
    let resized = image::imageops::resize(&src, width, height, FilterType::Triangle);
    FrameBuffer {
        data: resized.into_raw(),
        width,
        height,
    }
}

/// Resize an image frame buffer to fit within the given max dimensions,
/// preserving aspect ratio. Never upscales.
pub fn resize_to_fit(fb: &FrameBuffer, max_width: u32, max_height: u32) -> FrameBuffer {
    if fb.width == 0 || fb.height == 0 {
        return fb.clone();
    }
    let scale_x = max_width as f64 / fb.width as f64;
    let scale_y = max_height as f64 / fb.height as f64;
    let scale = scale_x.min(scale_y).min(1.0);
    let new_width = (fb.width as f64 * scale) as u32;
    let new_height = (fb.height as f64 * scale) as u32;
    resize_to(fb, new_width, new_height)
}

/// Encode a frame as PNG bytes.
pub fn encode_png(fb: &FrameBuffer) -> CardaResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(fb.width, fb.height, fb.data.clone())
        .ok_or_else(|| CardaError::Export("frame buffer size mismatch".to_string()))?;
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .map_err(|e| CardaError::Export(format!("PNG encoding failed: {}", e)))?;
    Ok(out.into_inner())
}
