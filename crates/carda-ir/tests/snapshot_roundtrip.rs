use carda_ir::style::{FrameKind, GlowConfig, PatternConfig, ShadowConfig, StrokeConfig, TextAlign};
use carda_ir::{AspectRatio, CanvasConfig, Layer, LayerContent, LayerStore, ProjectSnapshot};

const SAVED_PROJECT: &str = r##"{
  "version": "1.2.0",
  "timestamp": 1714557600000,
  "canvasConfig": { "width": 810, "height": 1080, "aspectRatio": "3:4", "scaleDisplay": 1 },
  "layers": [
    {
      "id": "bg01", "type": "background", "name": "layer_types.background",
      "visible": true, "locked": true, "x": 0, "y": 0, "width": 100, "height": 100,
      "rotation": 0, "scale": 1, "opacity": 100,
      "backgroundColor": "#1f1f1f", "src": "data:image/png;base64,AAAA", "backgroundScale": 140,
      "patternConfig": { "enabled": true, "text": "SPIE", "size": 24, "opacity": 10,
                          "rotation": -15, "gapX": 20, "gapY": 25, "color": "#ffffff" }
    },
    {
      "id": "img01", "type": "image", "name": "hero.png",
      "visible": true, "locked": false, "x": 50, "y": 40, "width": 50, "height": 37.5,
      "rotation": 5, "scale": 1.2, "opacity": 90,
      "blendMode": "multiply",
      "advancedShadows": [{ "x": 2, "y": 2, "blur": 6, "spread": 0, "color": "#000000", "inset": false }],
      "src": "data:image/png;base64,BBBB",
      "shadow": { "enabled": true, "color": "#000000", "blur": 10, "offsetX": 3, "offsetY": 4, "opacity": 100 },
      "glow": { "enabled": false, "color": "#ffffff", "blur": 10, "spread": 0 },
      "stroke": { "enabled": false, "color": "#ffffff", "width": 2, "opacity": 100 }
    },
    {
      "id": "txt01", "type": "text", "name": "layer_types.player_name",
      "visible": false, "locked": false, "x": 50, "y": 85, "width": 0, "height": 0,
      "rotation": 0, "scale": 1, "opacity": 100,
      "textConfig": { "content": "J. DOE", "fontFamily": "Impact", "fontSize": 64, "color": "#fcedd8",
                      "bold": true, "italic": false, "align": "left", "letterSpacing": 2,
                      "effectPresetId": "gold", "blendMode": "overlay",
                      "multiShadows": [{ "x": 1, "y": 1, "blur": 0, "color": "#000000" }],
                      "gradientLayers": [{ "type": "linear", "angle": 90,
                                           "stops": [{ "offset": 0, "color": "#ffffff" }] }] },
      "shadow": { "enabled": true, "color": "rgba(0,0,0,0.8)", "blur": 4, "offsetX": 2, "offsetY": 2, "opacity": 100 }
    },
    {
      "id": "frm01", "type": "frame", "name": "layer_types.frame",
      "visible": true, "locked": true, "x": 0, "y": 0, "width": 100, "height": 100,
      "rotation": 0, "scale": 1, "opacity": 100,
      "frameConfig": { "enabled": true, "type": "gradient", "color": "#ff0000", "color2": "#0000ff",
                       "width": 12, "radius": 20 }
    }
  ]
}"##;

#[test]
fn test_saved_project_loads_every_layer_type() {
    let snap = ProjectSnapshot::from_json(SAVED_PROJECT).unwrap();
    assert_eq!(snap.canvas_config.aspect_ratio, AspectRatio::Portrait3x4);
    assert_eq!(snap.layers.len(), 4);
    assert_eq!(snap.timestamp, 1_714_557_600_000);

    match &snap.layers[0].content {
        LayerContent::Background {
            background_scale,
            pattern_config: Some(PatternConfig { gap_y, enabled, .. }),
            ..
        } => {
            assert_eq!(*background_scale, Some(140.0));
            assert_eq!(*gap_y, 25.0);
            assert!(*enabled);
        }
        other => panic!("unexpected {:?}", other),
    }
    match &snap.layers[2].content {
        LayerContent::Text { text_config, .. } => {
            assert_eq!(text_config.align, TextAlign::Left);
            assert_eq!(text_config.effect_preset_id.as_deref(), Some("gold"));
            assert!(text_config.bold);
            assert_eq!(text_config.blend_mode, Some(serde_json::json!("overlay")));
            assert!(text_config.gradient_layers.is_some());
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(
        snap.layers[3].frame_config().map(|f| f.kind),
        Some(FrameKind::Gradient)
    );
    assert!(!snap.layers[2].visible);
    assert_eq!(snap.layers[1].blend_mode, Some(serde_json::json!("multiply")));
    assert!(snap.layers[1].advanced_shadows.is_some());
    assert!(snap.layers[0].blend_mode.is_none());
}

#[test]
fn test_roundtrip_is_lossless_at_json_level() {
    let original: serde_json::Value = serde_json::from_str(SAVED_PROJECT).unwrap();
    let snap = ProjectSnapshot::from_json(SAVED_PROJECT).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&snap.to_json_pretty().unwrap()).unwrap();
    assert_eq!(normalize_numbers(saved), normalize_numbers(original));
}

#[test]
fn test_roundtrip_of_built_project() {
    let mut store = LayerStore::new_session();
    store.add(Layer::default_text());
    let mut image = Layer::default_image("data:image/png;base64,CCCC");
    image.set_effects(
        Some(ShadowConfig {
            enabled: true,
            ..ShadowConfig::default()
        }),
        Some(GlowConfig {
            enabled: true,
            spread: 3.0,
            ..GlowConfig::default()
        }),
    );
    if let LayerContent::Image { stroke, .. } = &mut image.content {
        *stroke = Some(StrokeConfig {
            enabled: true,
            ..StrokeConfig::default()
        });
    }
    store.add(image);
    store.add(Layer::default_frame());

    let canvas = CanvasConfig::for_ratio(AspectRatio::Landscape16x9);
    let snap = ProjectSnapshot::capture(&canvas, store.layers());
    let loaded = ProjectSnapshot::from_json(&snap.to_json_pretty().unwrap()).unwrap();
    assert_eq!(loaded, snap);

    let mut restored = LayerStore::new_session();
    restored.replace_all(loaded.layers);
    assert_eq!(restored.layers(), store.layers());
    assert!(restored.selected().is_none());
}

#[test]
fn test_file_save_and_load() {
    let dir = std::env::temp_dir().join(format!("carda-ir-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("project.json");

    let snap = ProjectSnapshot::from_json(SAVED_PROJECT).unwrap();
    snap.save_file(&path).unwrap();
    let loaded = ProjectSnapshot::load_file(&path).unwrap();
    assert_eq!(loaded, snap);
    std::fs::remove_dir_all(&dir).ok();
}

/// Integers in the hand-written file come back as floats for f64 fields,
/// so both sides are compared with every number converted to f64.
fn normalize_numbers(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) => serde_json::json!(f),
            None => Value::Number(n),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize_numbers(v)))
                .collect(),
        ),
        other => other,
    }
}
