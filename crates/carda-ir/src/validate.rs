use std::collections::HashSet;

use carda_core::{CardaError, Color, LayerType};

use crate::layer::{Layer, LayerContent};
use crate::project::ProjectSnapshot;

/// Check a snapshot for structural problems a front end should warn about.
///
/// Loading never depends on this; it is a lint over an already parsed file.
pub fn validate_snapshot(snapshot: &ProjectSnapshot) -> Result<(), Vec<CardaError>> {
    let mut errors = Vec::new();
    let canvas = &snapshot.canvas_config;

    if canvas.width == 0 || canvas.height == 0 {
        errors.push(CardaError::Validation(
            "canvas dimensions must be non-zero".into(),
        ));
    }
    if !(canvas.scale_display.is_finite() && canvas.scale_display > 0.0) {
        errors.push(CardaError::Validation(
            "canvas scaleDisplay must be positive".into(),
        ));
    }

    errors.extend(validate_layers(&snapshot.layers));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Per-layer checks: unique ids, a single bottom background, value ranges,
/// and parseable colors.
pub fn validate_layers(layers: &[Layer]) -> Vec<CardaError> {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    for layer in layers {
        if !ids.insert(&layer.id) {
            errors.push(CardaError::Validation(format!(
                "duplicate layer id '{}'",
                layer.id
            )));
        }
    }

    let backgrounds: Vec<usize> = layers
        .iter()
        .enumerate()
        .filter(|(_, l)| l.layer_type() == LayerType::Background)
        .map(|(i, _)| i)
        .collect();
    match backgrounds.as_slice() {
        [] => errors.push(CardaError::Validation("project has no background layer".into())),
        [0] => {}
        [i] => errors.push(CardaError::Validation(format!(
            "background layer is at index {} instead of the bottom",
            i
        ))),
        many => errors.push(CardaError::Validation(format!(
            "project has {} background layers",
            many.len()
        ))),
    }

    for layer in layers {
        check_layer(layer, &mut errors);
    }
    errors
}

fn check_layer(layer: &Layer, errors: &mut Vec<CardaError>) {
    let id = &layer.id;
    let numbers = [
        ("x", layer.x),
        ("y", layer.y),
        ("width", layer.width),
        ("height", layer.height),
        ("rotation", layer.rotation),
        ("scale", layer.scale),
        ("opacity", layer.opacity),
    ];
    for (field, value) in numbers {
        if !value.is_finite() {
            errors.push(CardaError::Validation(format!(
                "layer '{}' has non-finite {}",
                id, field
            )));
        }
    }
    if !(0.0..=100.0).contains(&layer.opacity) {
        errors.push(CardaError::Validation(format!(
            "layer '{}' opacity {} outside 0..100",
            id, layer.opacity
        )));
    }
    if layer.width < 0.0 || layer.height < 0.0 {
        errors.push(CardaError::Validation(format!(
            "layer '{}' has a negative size",
            id
        )));
    }

    let mut colors: Vec<&str> = Vec::new();
    match &layer.content {
        LayerContent::Background {
            background_color,
            background_scale,
            pattern_config,
            ..
        } => {
            if let Some(c) = background_color {
                colors.push(c);
            }
            if let Some(scale) = background_scale {
                if !(100.0..=200.0).contains(scale) {
                    errors.push(CardaError::Validation(format!(
                        "layer '{}' backgroundScale {} outside 100..200",
                        id, scale
                    )));
                }
            }
            if let Some(p) = pattern_config {
                colors.push(&p.color);
            }
        }
        LayerContent::Image { src, shadow, glow, stroke } => {
            if src.is_empty() {
                errors.push(CardaError::Validation(format!(
                    "image layer '{}' has no source",
                    id
                )));
            }
            colors.extend(shadow.iter().map(|s| s.color.as_str()));
            colors.extend(glow.iter().map(|g| g.color.as_str()));
            colors.extend(stroke.iter().map(|s| s.color.as_str()));
        }
        LayerContent::Text {
            text_config,
            shadow,
            glow,
        } => {
            colors.push(&text_config.color);
            colors.extend(shadow.iter().map(|s| s.color.as_str()));
            colors.extend(glow.iter().map(|g| g.color.as_str()));
        }
        LayerContent::Frame { frame_config } => {
            if !(0.0..=50.0).contains(&frame_config.radius) {
                errors.push(CardaError::Validation(format!(
                    "frame '{}' radius {} outside 0..50",
                    id, frame_config.radius
                )));
            }
            colors.push(&frame_config.color);
            colors.extend(frame_config.color2.as_deref());
        }
    }
    for c in colors {
        if Color::parse(c).is_err() {
            errors.push(CardaError::Validation(format!(
                "layer '{}' has unparseable color '{}'",
                id, c
            )));
        }
    }
}
