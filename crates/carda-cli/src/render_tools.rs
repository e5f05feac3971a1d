use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use carda_core::CardaConfig;
use carda_ir::{LayerId, LayerStore};
use carda_render::export::{export_file_name, DEFAULT_EXPORT_NAME};
use carda_render::presets::color_control_visible;
use carda_render::{image_loader, AssetRegistry, Compositor, Exporter, PreviewSurface};

use crate::{load_assets, load_project, report_notices};

pub fn cmd_render(
    file: &Path,
    output: Option<&str>,
    pixel_ratio: Option<f64>,
    config: &CardaConfig,
) -> Result<()> {
    let start = Instant::now();
    let snapshot = load_project(file)?;
    let assets = load_assets(config, Some(file));
    let compositor = Compositor::new(&assets);
    let exporter = match pixel_ratio {
        Some(r) => Exporter::new(r),
        None => Exporter::from_config(config),
    };

    let Some(name) = export_file_name(output.unwrap_or(DEFAULT_EXPORT_NAME)) else {
        println!("Export cancelled: empty file name");
        return Ok(());
    };
    let mut store = LayerStore::from_layers(snapshot.layers);
    let report = exporter
        .export_to_file(&compositor, &mut store, &snapshot.canvas_config, Path::new(&name))
        .map_err(|e| anyhow::anyhow!("{} [{}]", e, e.notice_key()))?;
    report_notices(&report.notices);

    println!(
        "✅ Exported {} ({}x{}, {} bytes) in {:.2?}",
        report.path,
        report.width,
        report.height,
        report.bytes,
        start.elapsed()
    );
    println!("   sha256 {}", report.content_hash);
    Ok(())
}

pub fn cmd_preview(
    file: &Path,
    width: f64,
    height: f64,
    select: Option<&str>,
    output: &Path,
    config: &CardaConfig,
) -> Result<()> {
    let snapshot = load_project(file)?;
    let assets = load_assets(config, Some(file));
    let compositor = Compositor::new(&assets);
    let mut store = LayerStore::from_layers(snapshot.layers);
    if let Some(id) = select {
        let id = LayerId::new(id);
        store.select(Some(&id));
        if store.selected().is_none() {
            tracing::warn!("No layer with id {}; rendering without selection", id);
        }
    }

    let mut surface = PreviewSurface::new(snapshot.canvas_config);
    surface.resize(width, height);
    let Some(out) = surface.render(&compositor, &store) else {
        anyhow::bail!("container {}x{} has no drawable area", width, height);
    };
    report_notices(&out.notices);
    let png = image_loader::encode_png(&out.frame)?;
    std::fs::write(output, &png)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "👀 Preview {}x{} written to {}",
        out.width(),
        out.height(),
        output.display()
    );
    Ok(())
}

pub fn cmd_presets(json: bool, config: &CardaConfig) -> Result<()> {
    let assets = load_assets(config, None);
    let presets = assets.presets();
    if json {
        let rows: Vec<_> = presets.iter().collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    for preset in presets.iter() {
        println!(
            "  {:<10} {:<14} color picker: {}",
            preset.id,
            preset.name,
            if color_control_visible(Some(&preset.id)) { "yes" } else { "no" }
        );
    }
    Ok(())
}

pub fn cmd_fonts(config: &CardaConfig) -> Result<()> {
    let mut assets = AssetRegistry::from_config(config);
    let notices = assets.refresh();
    report_notices(&notices);
    let families = assets.font_families();
    if assets.local_fonts_available() {
        println!("🔤 {} local font families", families.len());
    } else {
        println!("🔤 Local fonts unavailable; built-in family list:");
    }
    for family in families {
        println!("  {}", family);
    }
    Ok(())
}
