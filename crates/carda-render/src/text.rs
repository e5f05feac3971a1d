//! Text rendering module.
//! Uses fontdue for CPU-based font rasterization. Text is rasterized into a
//! coverage mask; paint (fills, strokes, shadows) is applied afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use carda_core::{CardaError, CardaResult, Size2D};
use carda_ir::style::TextAlign;
use fontdue::{Font, FontSettings};

use crate::raster::Mask;

/// Line advance as a multiple of the font size.
const LINE_SPACING: f32 = 1.3;
/// Horizontal shift per pixel of height for synthesized italics.
const ITALIC_SHEAR: f32 = 0.2;

/// Weight/slant of a font face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FaceStyle {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FaceStyle {
    pub fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => FaceStyle::Regular,
            (true, false) => FaceStyle::Bold,
            (false, true) => FaceStyle::Italic,
            (true, true) => FaceStyle::BoldItalic,
        }
    }

    fn is_bold(&self) -> bool {
        matches!(self, FaceStyle::Bold | FaceStyle::BoldItalic)
    }

    fn is_italic(&self) -> bool {
        matches!(self, FaceStyle::Italic | FaceStyle::BoldItalic)
    }
}

/// Split a font file stem like `Roboto-BoldItalic` into family and style.
pub fn parse_face_name(stem: &str) -> (String, FaceStyle) {
    const SUFFIXES: [(&str, FaceStyle); 7] = [
        ("-bolditalic", FaceStyle::BoldItalic),
        ("-boldoblique", FaceStyle::BoldItalic),
        ("-bold", FaceStyle::Bold),
        ("-italic", FaceStyle::Italic),
        ("-oblique", FaceStyle::Italic),
        ("-regular", FaceStyle::Regular),
        ("-book", FaceStyle::Regular),
    ];
    let lower = stem.to_ascii_lowercase();
    for (suffix, style) in SUFFIXES {
        if lower.ends_with(suffix) && lower.len() > suffix.len() {
            return (stem[..stem.len() - suffix.len()].to_string(), style);
        }
    }
    (stem.to_string(), FaceStyle::Regular)
}

/// Lookup key for a family name: case, spaces, dashes and underscores are
/// ignored, so `Arial Black` finds `ArialBlack.ttf`.
pub fn family_key(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

struct FontFamily {
    name: String,
    faces: BTreeMap<FaceStyle, Font>,
}

impl FontFamily {
    /// Best available face and which traits must be synthesized.
    fn face(&self, wanted: FaceStyle) -> Option<(&Font, bool, bool)> {
        if let Some(font) = self.faces.get(&wanted) {
            return Some((font, false, false));
        }
        let candidates = [
            FaceStyle::from_flags(wanted.is_bold(), false),
            FaceStyle::from_flags(false, wanted.is_italic()),
            FaceStyle::Regular,
        ];
        let (style, font) = candidates
            .iter()
            .find_map(|s| self.faces.get(s).map(|f| (*s, f)))
            .or_else(|| self.faces.iter().next().map(|(s, f)| (*s, f)))?;
        Some((
            font,
            wanted.is_bold() && !style.is_bold(),
            wanted.is_italic() && !style.is_italic(),
        ))
    }
}

/// Text to be laid out: one paragraph, `\n` separates lines.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle<'a> {
    pub text: &'a str,
    pub family: &'a str,
    /// Target pixels.
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub align: TextAlign,
    /// Target pixels added after every character.
    pub letter_spacing: f32,
}

/// Text renderer: holds parsed fonts by family and rasterizes text runs
/// into coverage masks.
pub struct TextRenderer {
    families: BTreeMap<String, FontFamily>,
    default_family: Option<String>,
}

struct ResolvedFace<'a> {
    font: &'a Font,
    synth_bold: bool,
    synth_italic: bool,
}

/// Measurements for a single line of text.
#[derive(Debug, Clone)]
struct LineMeasure {
    /// Total advance width, letter spacing included.
    width: f32,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            families: BTreeMap::new(),
            default_family: None,
        }
    }

    /// Family used when a requested family is not loaded.
    pub fn set_default_family(&mut self, family: Option<String>) {
        self.default_family = family;
    }

    /// Register parsed font data under `family`.
    pub fn load_font_bytes(
        &mut self,
        family: &str,
        style: FaceStyle,
        data: Vec<u8>,
    ) -> CardaResult<()> {
        let font = Font::from_bytes(data, FontSettings::default()).map_err(|e| {
            CardaError::asset(format!("failed to parse font {}: {}", family, e), family)
        })?;
        self.families
            .entry(family_key(family))
            .or_insert_with(|| FontFamily {
                name: family.to_string(),
                faces: BTreeMap::new(),
            })
            .faces
            .insert(style, font);
        Ok(())
    }

    /// Load a font file; family and style come from the file stem.
    pub fn load_font(&mut self, path: &Path) -> CardaResult<String> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| CardaError::asset("font file has no name", path))?;
        let (family, style) = parse_face_name(stem);
        let data = std::fs::read(path)
            .map_err(|e| CardaError::asset(format!("failed to read font file: {}", e), path))?;
        self.load_font_bytes(&family, style, data)
            .map_err(|e| CardaError::asset(e.to_string(), path))?;
        Ok(family)
    }

    /// Load every `.ttf`/`.otf` below `dir`. Unreadable files are skipped
    /// with a warning. Returns how many faces were loaded.
    pub fn load_dir(&mut self, dir: &Path) -> CardaResult<usize> {
        let mut loaded = 0;
        let mut pending = vec![dir.to_path_buf()];
        while let Some(current) = pending.pop() {
            let entries = std::fs::read_dir(&current)
                .map_err(|e| CardaError::asset(format!("cannot read font dir: {}", e), &current))?;
            let mut paths: Vec<_> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
            paths.sort();
            for path in paths {
                if path.is_dir() {
                    pending.push(path);
                    continue;
                }
                let is_font = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
                    .unwrap_or(false);
                if !is_font {
                    continue;
                }
                match self.load_font(&path) {
                    Ok(_) => loaded += 1,
                    Err(e) => tracing::warn!("Skipping font {}: {}", path.display(), e),
                }
            }
        }
        Ok(loaded)
    }

    pub fn clear(&mut self) {
        self.families.clear();
    }

    /// Display names of loaded families, sorted.
    pub fn families(&self) -> Vec<String> {
        let mut names: Vec<String> = self.families.values().map(|f| f.name.clone()).collect();
        names.sort();
        names
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.families.contains_key(&family_key(family))
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Find a face for `family`: the family itself, then the default family,
    /// then the first loaded family.
    fn resolve(&self, family: &str, bold: bool, italic: bool) -> Option<ResolvedFace<'_>> {
        let wanted = FaceStyle::from_flags(bold, italic);
        let fam = self
            .families
            .get(&family_key(family))
            .or_else(|| {
                self.default_family
                    .as_deref()
                    .and_then(|d| self.families.get(&family_key(d)))
            })
            .or_else(|| self.families.values().next())?;
        let (font, synth_bold, synth_italic) = fam.face(wanted)?;
        Some(ResolvedFace {
            font,
            synth_bold,
            synth_italic,
        })
    }

    /// Size of the laid-out text box, or `None` when no font is available.
    pub fn measure(&self, style: &TextStyle) -> Option<Size2D> {
        let face = self.resolve(style.family, style.bold, style.italic)?;
        let (lines, width, height, _) = self.layout(&face, style);
        if lines.is_empty() {
            return Some(Size2D::new(0.0, 0.0));
        }
        let (extra_w, extra_h) = Self::synthesis_padding(&face, style.size, height);
        Some(Size2D::new(
            (width + extra_w) as f64,
            (height + extra_h) as f64,
        ))
    }

    fn synthesis_padding(face: &ResolvedFace, size: f32, height: f32) -> (f32, f32) {
        let bold = if face.synth_bold { 2.0 * bold_radius(size) as f32 } else { 0.0 };
        let italic = if face.synth_italic {
            ((height.ceil().max(1.0) + bold) * ITALIC_SHEAR).ceil()
        } else {
            0.0
        };
        (bold + italic, bold)
    }

    fn layout(&self, face: &ResolvedFace, style: &TextStyle) -> (Vec<LineMeasure>, f32, f32, f32) {
        if style.text.is_empty() || !(style.size > 0.0) {
            return (Vec::new(), 0.0, 0.0, 0.0);
        }
        let size = style.size;
        let (ascent, descent) = match face.font.horizontal_line_metrics(size) {
            Some(m) => (m.ascent, -m.descent),
            None => (size * 0.8, size * 0.2),
        };
        let lines: Vec<LineMeasure> = style
            .text
            .split('\n')
            .map(|line| self.measure_line(face.font, line, size, style.letter_spacing))
            .collect();
        let width = lines.iter().map(|l| l.width).fold(0.0f32, f32::max);
        let height = size * LINE_SPACING * (lines.len() as f32 - 1.0) + ascent + descent;
        (lines, width.max(0.0), height.max(0.0), ascent)
    }

    /// Measure a single line of text.
    fn measure_line(&self, font: &Font, text: &str, size: f32, spacing: f32) -> LineMeasure {
        let mut width = 0.0f32;
        let mut prev: Option<char> = None;
        for ch in text.chars() {
            if let Some(p) = prev {
                width += font.horizontal_kern(p, ch, size).unwrap_or(0.0);
            }
            width += font.metrics(ch, size).advance_width + spacing;
            prev = Some(ch);
        }
        LineMeasure { width }
    }

    /// Rasterize text into a coverage mask sized to the text box, or `None`
    /// when no font is available.
    pub fn rasterize(&self, style: &TextStyle) -> Option<Mask> {
        let face = self.resolve(style.family, style.bold, style.italic)?;
        let (lines, width, height, ascent) = self.layout(&face, style);
        if lines.is_empty() {
            return Some(Mask::new(0, 0));
        }
        let mut mask = Mask::new(width.ceil().max(1.0) as u32, height.ceil().max(1.0) as u32);
        let mut baseline = ascent;
        for (line_text, measure) in style.text.split('\n').zip(lines.iter()) {
            let x_offset = match style.align {
                TextAlign::Left => 0.0,
                TextAlign::Center => (width - measure.width) / 2.0,
                TextAlign::Right => width - measure.width,
            };
            render_line_into(&mut mask, face.font, line_text, style, x_offset, baseline);
            baseline += style.size * LINE_SPACING;
        }

        if face.synth_bold {
            let r = bold_radius(style.size);
            mask = mask.padded(r).dilated(r);
        }
        if face.synth_italic {
            mask = shear(&mask, ITALIC_SHEAR);
        }
        Some(mask)
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Stroke growth for synthesized bold.
fn bold_radius(size: f32) -> u32 {
    (size / 32.0).round().max(1.0) as u32
}

fn render_line_into(
    mask: &mut Mask,
    font: &Font,
    text: &str,
    style: &TextStyle,
    x_offset: f32,
    baseline: f32,
) {
    let mut cursor = x_offset;
    let mut prev: Option<char> = None;
    for ch in text.chars() {
        if let Some(p) = prev {
            cursor += font.horizontal_kern(p, ch, style.size).unwrap_or(0.0);
        }
        let (metrics, bitmap) = font.rasterize(ch, style.size);
        let glyph_x = (cursor + metrics.xmin as f32).round() as i32;
        let glyph_y = (baseline - (metrics.height as i32 + metrics.ymin) as f32).round() as i32;
        for gy in 0..metrics.height {
            for gx in 0..metrics.width {
                let coverage = bitmap[gy * metrics.width + gx];
                if coverage == 0 {
                    continue;
                }
                let px = glyph_x + gx as i32;
                let py = glyph_y + gy as i32;
                if px >= 0 && py >= 0 && (px as u32) < mask.width && (py as u32) < mask.height {
                    let idx = py as usize * mask.width as usize + px as usize;
                    mask.data[idx] = mask.data[idx].max(coverage);
                }
            }
        }
        cursor += metrics.advance_width + style.letter_spacing;
        prev = Some(ch);
    }
}

/// Slant a mask to the right; the bottom row stays put.
fn shear(mask: &Mask, factor: f32) -> Mask {
    let extra = (mask.height as f32 * factor).ceil() as u32;
    let mut out = Mask::new(mask.width + extra, mask.height);
    for y in 0..mask.height {
        let shift = (mask.height - 1 - y) as f32 * factor;
        let whole = shift.floor() as u32;
        let frac = shift - whole as f32;
        for x in 0..mask.width {
            let v = mask.get(x, y) as f32;
            if v == 0.0 {
                continue;
            }
            let idx = y as usize * out.width as usize + (x + whole) as usize;
            out.data[idx] = (out.data[idx] as f32 + v * (1.0 - frac)).min(255.0) as u8;
            if frac > 0.0 && x + whole + 1 < out.width {
                out.data[idx + 1] = (out.data[idx + 1] as f32 + v * frac).min(255.0) as u8;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    const FIXTURE_FONT: &[u8] = include_bytes!("../tests/fixtures/DejaVuSansMono.ttf");

    fn renderer() -> TextRenderer {
        let mut r = TextRenderer::new();
        r.load_font_bytes("DejaVu Sans Mono", FaceStyle::Regular, FIXTURE_FONT.to_vec())
            .unwrap();
        r
    }

    fn style(text: &str) -> TextStyle<'_> {
        TextStyle {
            text,
            family: "Impact",
            size: 24.0,
            bold: false,
            italic: false,
            align: TextAlign::Left,
            letter_spacing: 0.0,
        }
    }

    #[test]
    fn test_parse_face_name() {
        assert_eq!(
            parse_face_name("Roboto-BoldItalic"),
            ("Roboto".to_string(), FaceStyle::BoldItalic)
        );
        assert_eq!(
            parse_face_name("DejaVuSans-Oblique"),
            ("DejaVuSans".to_string(), FaceStyle::Italic)
        );
        assert_eq!(parse_face_name("Impact"), ("Impact".to_string(), FaceStyle::Regular));
        assert_eq!(parse_face_name("-Bold"), ("-Bold".to_string(), FaceStyle::Regular));
    }

    #[test]
    fn test_family_key() {
        assert_eq!(family_key("Arial Black"), family_key("ArialBlack"));
        assert_eq!(family_key("open_sans"), "opensans");
    }

    #[test]
    fn test_no_fonts_yields_none() {
        let renderer = TextRenderer::new();
        assert!(renderer.measure(&style("Hello")).is_none());
        assert!(renderer.rasterize(&style("Hello")).is_none());
    }

    #[test]
    fn test_load_missing_font() {
        let mut renderer = TextRenderer::new();
        let result = renderer.load_font(Path::new("/nonexistent/font.ttf"));
        assert!(matches!(result, Err(CardaError::Asset { .. })));
        assert!(renderer
            .load_font_bytes("Broken", FaceStyle::Regular, vec![1, 2, 3])
            .is_err());
    }

    #[test]
    fn test_load_font_file_names_family_from_stem() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSansMono.ttf");
        let mut renderer = TextRenderer::new();
        let family = renderer.load_font(&path).unwrap();
        assert_eq!(family, "DejaVuSansMono");
        assert!(renderer.has_family("DejaVu Sans Mono"));
    }

    #[test]
    fn test_render_single_line() {
        let renderer = renderer();
        let mask = renderer.rasterize(&style("Hello")).unwrap();
        assert!(mask.width > 0 && mask.height > 0);
        assert!(!mask.is_empty(), "rendered text should have coverage");
    }

    #[test]
    fn test_render_multi_line() {
        let renderer = renderer();
        let single = renderer.measure(&style("Hello")).unwrap();
        let multi = renderer.measure(&style("Hello\nWorld")).unwrap();
        assert!(multi.height > single.height);
    }

    #[test]
    fn test_letter_spacing_widens() {
        let renderer = renderer();
        let tight = renderer.measure(&style("ABC")).unwrap();
        let spaced = renderer
            .measure(&TextStyle {
                letter_spacing: 4.0,
                ..style("ABC")
            })
            .unwrap();
        assert!((spaced.width - tight.width - 12.0).abs() < 0.5);
    }

    #[test]
    fn test_right_alignment_pushes_short_line() {
        let renderer = renderer();
        let aligned = |align| {
            renderer
                .rasterize(&TextStyle {
                    align,
                    ..style("i\nWWWWWW")
                })
                .unwrap()
        };
        let first_col = |m: &Mask| (0..m.width).find(|&x| (0..m.height / 2).any(|y| m.get(x, y) > 0));
        let left = aligned(TextAlign::Left);
        let right = aligned(TextAlign::Right);
        assert!(first_col(&right) > first_col(&left));
    }

    #[test]
    fn test_synthesized_styles_grow_box() {
        let renderer = renderer();
        let plain = renderer.measure(&style("Hello")).unwrap();
        let bold_italic = renderer
            .measure(&TextStyle {
                bold: true,
                italic: true,
                ..style("Hello")
            })
            .unwrap();
        assert!(bold_italic.width > plain.width);
        let mask = renderer
            .rasterize(&TextStyle {
                bold: true,
                italic: true,
                ..style("Hello")
            })
            .unwrap();
        assert_eq!(mask.width as f64, bold_italic.width.ceil());
    }

    #[test]
    fn test_unknown_family_falls_back() {
        let mut renderer = renderer();
        renderer.set_default_family(Some("DejaVu Sans Mono".to_string()));
        assert!(!renderer.has_family("Comic Sans MS"));
        assert!(renderer
            .rasterize(&TextStyle {
                family: "Comic Sans MS",
                ..style("Hi")
            })
            .is_some());
        assert!(!renderer.families().is_empty());
    }

    #[test]
    fn test_shear_widens_mask() {
        let mut mask = Mask::new(2, 5);
        mask.data.iter_mut().for_each(|v| *v = 255);
        let slanted = shear(&mask, 0.5);
        assert_eq!(slanted.width, 5);
        assert_eq!(slanted.get(0, 4), 255);
        assert_eq!(slanted.get(0, 0), 0);
        assert_eq!(slanted.get(2, 0), 255);
    }
}
