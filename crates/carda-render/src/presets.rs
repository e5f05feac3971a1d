//! Text effect presets.
//!
//! A preset is a row of data describing how glyphs are painted: fill layers,
//! an optional outline, an optional shadow stack and the blend mode used to
//! put the finished text onto the canvas. The built-in rows can be extended
//! at runtime or from a JSON file.

use std::path::Path;

use carda_core::{BlendMode, CardaError, CardaResult};
use serde::{Deserialize, Serialize};

/// Id of the preset that leaves the base style untouched.
pub const NONE_PRESET_ID: &str = "none";

/// One color stop of a linear gradient; `offset` runs 0..1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: String,
}

/// A paint source for glyph interiors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FillSpec {
    Solid {
        color: String,
    },
    /// CSS angle convention: 0° points up, 90° points right.
    LinearGradient {
        angle: f64,
        stops: Vec<GradientStop>,
    },
}

/// A fill painted over the fills below it with `blend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillLayer {
    #[serde(flatten)]
    pub fill: FillSpec,
    #[serde(default)]
    pub blend: BlendMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextShadowSpec {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStrokeSpec {
    pub width: f64,
    pub color: String,
}

/// A named text effect.
///
/// `fills` empty keeps the layer's own color. `shadows` of `None` keeps the
/// layer's shadow stack while `Some(vec![])` removes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEffectPreset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fills: Vec<FillLayer>,
    #[serde(default)]
    pub stroke: Option<TextStrokeSpec>,
    #[serde(default)]
    pub shadows: Option<Vec<TextShadowSpec>>,
    #[serde(default)]
    pub blend_mode: BlendMode,
}

impl TextEffectPreset {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fills: Vec::new(),
            stroke: None,
            shadows: None,
            blend_mode: BlendMode::Normal,
        }
    }

    /// True when the preset changes nothing.
    pub fn is_identity(&self) -> bool {
        self.fills.is_empty()
            && self.stroke.is_none()
            && self.shadows.is_none()
            && self.blend_mode == BlendMode::Normal
    }
}

fn rgb(r: u8, g: u8, b: u8) -> String {
    format!("rgba({},{},{},1)", r, g, b)
}

fn gradient(angle: f64, stops: &[(f64, String)]) -> FillLayer {
    FillLayer {
        fill: FillSpec::LinearGradient {
            angle,
            stops: stops
                .iter()
                .map(|(offset, color)| GradientStop {
                    offset: *offset,
                    color: color.clone(),
                })
                .collect(),
        },
        blend: BlendMode::Normal,
    }
}

/// Eleven-stop horizontal gradient alternating between the given shades,
/// the layout shared by the metal presets.
fn banded(a: String, b: String, c: String, d: String, last: String) -> FillLayer {
    gradient(
        90.0,
        &[
            (0.0, a.clone()),
            (0.01, a.clone()),
            (0.12, b.clone()),
            (0.22, c),
            (0.34, a.clone()),
            (0.44, d.clone()),
            (0.54, b),
            (0.65, d.clone()),
            (0.77, a),
            (0.90, d),
            (1.0, last),
        ],
    )
}

fn shadow(offset_x: f64, offset_y: f64, blur: f64, color: &str) -> TextShadowSpec {
    TextShadowSpec {
        offset_x,
        offset_y,
        blur,
        color: color.to_string(),
    }
}

fn gold() -> TextEffectPreset {
    let mut p = TextEffectPreset::new("gold", "Gold");
    p.fills.push(banded(
        rgb(223, 204, 162),
        rgb(213, 192, 145),
        rgb(228, 210, 171),
        rgb(228, 210, 171),
        rgb(196, 168, 117),
    ));
    p.shadows = Some(Vec::new());
    p
}

fn silver() -> TextEffectPreset {
    let mut p = TextEffectPreset::new("silver", "Silver");
    p.fills.push(banded(
        rgb(179, 171, 171),
        rgb(210, 202, 202),
        rgb(203, 197, 197),
        rgb(235, 225, 225),
        rgb(190, 186, 186),
    ));
    p.shadows = Some(Vec::new());
    p
}

fn metallic() -> TextEffectPreset {
    let mut p = TextEffectPreset::new("metallic", "Metallic");
    p.fills.push(banded(
        rgb(140, 145, 150),
        rgb(185, 190, 195),
        rgb(175, 180, 185),
        rgb(195, 200, 205),
        rgb(160, 165, 170),
    ));
    let mut sheen = gradient(
        90.0,
        &[
            (0.0, "rgba(255,255,255,0.08)".to_string()),
            (0.5, "rgba(255,255,255,0.15)".to_string()),
            (1.0, "rgba(255,255,255,0.08)".to_string()),
        ],
    );
    sheen.blend = BlendMode::Overlay;
    p.fills.push(sheen);
    p.stroke = Some(TextStrokeSpec {
        width: 0.3,
        color: "#444444".to_string(),
    });
    p.shadows = Some(vec![
        shadow(0.0, 0.0, 1.0, "rgba(255,255,255,0.6)"),
        shadow(1.0, 1.0, 2.0, "rgba(0,0,0,0.3)"),
        shadow(2.0, 2.0, 3.0, "rgba(0,0,0,0.2)"),
    ]);
    p.blend_mode = BlendMode::Screen;
    p
}

fn glass() -> TextEffectPreset {
    let mut p = TextEffectPreset::new("glass", "Glass");
    p.fills.push(gradient(
        135.0,
        &[
            (0.0, "rgba(255,255,255,0.2)".to_string()),
            (1.0, "rgba(255,255,255,0.05)".to_string()),
        ],
    ));
    p.fills.push(FillLayer {
        fill: FillSpec::Solid {
            color: "rgba(255, 255, 255, 0.4)".to_string(),
        },
        blend: BlendMode::Normal,
    });
    p.stroke = Some(TextStrokeSpec {
        width: 0.5,
        color: "rgba(255, 255, 255, 0.3)".to_string(),
    });
    p.shadows = Some(vec![
        shadow(0.0, 0.0, 8.0, "rgba(255, 255, 255, 0.6)"),
        shadow(0.0, 0.0, 15.0, "rgba(255, 255, 255, 0.4)"),
        shadow(0.0, 0.0, 25.0, "rgba(255, 255, 255, 0.2)"),
        shadow(0.0, 1.0, 2.0, "rgba(0, 0, 0, 0.1)"),
    ]);
    p
}

fn vintage3d() -> TextEffectPreset {
    let mut p = TextEffectPreset::new("vintage3d", "Vintage3D");
    p.fills.push(FillLayer {
        fill: FillSpec::Solid {
            color: "#fcedd8".to_string(),
        },
        blend: BlendMode::Normal,
    });
    p.stroke = Some(TextStrokeSpec {
        width: 1.0,
        color: "#fcedd8".to_string(),
    });
    p.shadows = Some(vec![
        shadow(2.0, 2.0, 0.0, "#eb452b"),
        shadow(4.0, 4.0, 0.0, "#efa032"),
        shadow(6.0, 6.0, 0.0, "#46b59b"),
        shadow(8.0, 8.0, 0.0, "#017e7f"),
        shadow(10.0, 10.0, 0.0, "#052939"),
        shadow(12.0, 12.0, 0.0, "#c11a2b"),
        shadow(14.0, 14.0, 4.0, "rgba(0, 0, 0, 0.3)"),
    ]);
    p
}

/// The presets every registry starts with, in menu order.
pub fn builtin_presets() -> Vec<TextEffectPreset> {
    vec![
        TextEffectPreset::new(NONE_PRESET_ID, "None"),
        gold(),
        silver(),
        metallic(),
        glass(),
        vintage3d(),
    ]
}

/// Lookup table of text effect presets keyed by id.
#[derive(Debug, Clone)]
pub struct PresetRegistry {
    presets: Vec<TextEffectPreset>,
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self {
            presets: builtin_presets(),
        }
    }
}

impl PresetRegistry {
    /// A registry holding only the built-in presets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a preset by id, ignoring ASCII case.
    pub fn get(&self, id: &str) -> Option<&TextEffectPreset> {
        self.presets.iter().find(|p| p.id.eq_ignore_ascii_case(id))
    }

    /// Add a preset, replacing any existing row with the same id.
    pub fn register(&mut self, preset: TextEffectPreset) {
        match self
            .presets
            .iter_mut()
            .find(|p| p.id.eq_ignore_ascii_case(&preset.id))
        {
            Some(existing) => *existing = preset,
            None => self.presets.push(preset),
        }
    }

    /// Register every preset in a JSON array file. Returns how many were read.
    pub fn load_json_file(&mut self, path: &Path) -> CardaResult<usize> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CardaError::asset(format!("cannot read presets: {}", e), path))?;
        let presets: Vec<TextEffectPreset> = serde_json::from_str(&contents)
            .map_err(|e| CardaError::asset(format!("invalid presets file: {}", e), path))?;
        let count = presets.len();
        for preset in presets {
            self.register(preset);
        }
        tracing::info!("Loaded {} text presets from {}", count, path.display());
        Ok(count)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextEffectPreset> {
        self.presets.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

/// Whether the editor offers a color picker for text using `preset_id`.
/// Presets that paint their own fill hide it.
pub fn color_control_visible(preset_id: Option<&str>) -> bool {
    match preset_id {
        None => true,
        Some(id) => {
            id.is_empty() || id == NONE_PRESET_ID || id == "outline" || id.starts_with("neon")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops_of(preset: &TextEffectPreset, layer: usize) -> Vec<GradientStop> {
        match &preset.fills[layer].fill {
            FillSpec::LinearGradient { stops, .. } => stops.clone(),
            other => panic!("expected gradient, got {:?}", other),
        }
    }

    #[test]
    fn test_builtin_ids_in_order() {
        let registry = PresetRegistry::new();
        assert_eq!(
            registry.ids(),
            vec!["none", "gold", "silver", "metallic", "glass", "vintage3d"]
        );
        assert!(registry.get("none").unwrap().is_identity());
    }

    #[test]
    fn test_gold_gradient_stops() {
        let registry = PresetRegistry::new();
        let gold = registry.get("gold").unwrap();
        let stops = stops_of(gold, 0);
        assert_eq!(stops.len(), 11);
        assert_eq!(stops[0].color, "rgba(223,204,162,1)");
        assert_eq!(stops[1].offset, 0.01);
        assert_eq!(stops[6].color, "rgba(213,192,145,1)");
        assert_eq!(stops[10].color, "rgba(196,168,117,1)");
        assert_eq!(gold.shadows, Some(Vec::new()));
        assert!(gold.stroke.is_none());
    }

    #[test]
    fn test_metallic_layers() {
        let registry = PresetRegistry::new();
        let metallic = registry.get("metallic").unwrap();
        assert_eq!(metallic.fills.len(), 2);
        assert_eq!(metallic.fills[1].blend, BlendMode::Overlay);
        assert_eq!(metallic.blend_mode, BlendMode::Screen);
        assert_eq!(metallic.shadows.as_ref().map(Vec::len), Some(3));
        assert_eq!(metallic.stroke.as_ref().map(|s| s.width), Some(0.3));
    }

    #[test]
    fn test_vintage_shadow_stack() {
        let registry = PresetRegistry::new();
        let shadows = registry.get("vintage3d").unwrap().shadows.clone().unwrap();
        assert_eq!(shadows.len(), 7);
        for (i, s) in shadows.iter().enumerate() {
            assert_eq!(s.offset_x, 2.0 * (i as f64 + 1.0));
        }
        assert_eq!(shadows[6].blur, 4.0);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = PresetRegistry::new();
        assert_eq!(registry.get("GOLD").map(|p| p.id.as_str()), Some("gold"));
        assert!(registry.get("chrome").is_none());
    }

    #[test]
    fn test_register_replaces_and_appends() {
        let mut registry = PresetRegistry::new();
        let before = registry.len();
        let mut neon = TextEffectPreset::new("neon-blue", "Neon Blue");
        neon.shadows = Some(vec![shadow(0.0, 0.0, 10.0, "#00f")]);
        registry.register(neon);
        assert_eq!(registry.len(), before + 1);

        registry.register(TextEffectPreset::new("Gold", "Flat gold"));
        assert_eq!(registry.len(), before + 1);
        assert_eq!(registry.get("gold").unwrap().name, "Flat gold");
    }

    #[test]
    fn test_load_json_file() {
        let dir = std::env::temp_dir().join(format!("carda-presets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("presets.json");
        std::fs::write(
            &path,
            r##"[{"id":"outline","name":"Outline","stroke":{"width":2,"color":"#000"}},
                 {"id":"sunset","name":"Sunset","fills":[{"kind":"linear-gradient","angle":180,
                  "stops":[{"offset":0,"color":"#f80"},{"offset":1,"color":"#f08"}]}],
                  "blendMode":"multiply"}]"##,
        )
        .unwrap();

        let mut registry = PresetRegistry::new();
        assert_eq!(registry.load_json_file(&path).unwrap(), 2);
        assert_eq!(registry.get("sunset").unwrap().blend_mode, BlendMode::Multiply);
        assert_eq!(registry.get("outline").unwrap().fills.len(), 0);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_json_file_errors() {
        let mut registry = PresetRegistry::new();
        let missing = std::env::temp_dir().join("carda-presets-missing.json");
        assert!(matches!(
            registry.load_json_file(&missing),
            Err(CardaError::Asset { .. })
        ));
    }

    #[test]
    fn test_color_control_visibility() {
        assert!(color_control_visible(None));
        assert!(color_control_visible(Some("none")));
        assert!(color_control_visible(Some("outline")));
        assert!(color_control_visible(Some("neon-pink")));
        assert!(!color_control_visible(Some("gold")));
        assert!(!color_control_visible(Some("vintage3d")));
    }
}
