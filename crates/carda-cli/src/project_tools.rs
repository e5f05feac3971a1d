use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use carda_core::{CardaConfig, Size2D};
use carda_ir::validate::validate_snapshot;
use carda_ir::{AspectRatio, CanvasConfig, Layer, LayerStore, ProjectSnapshot};
use carda_render::{image_loader, Compositor, RenderTarget};

use crate::{load_assets, load_project, AddKind};

fn save(snapshot_canvas: &CanvasConfig, store: &LayerStore, path: &Path) -> Result<()> {
    ProjectSnapshot::capture(snapshot_canvas, store.layers())
        .save_file(path)
        .with_context(|| format!("failed to write project {}", path.display()))
}

pub fn cmd_new(file: &Path, ratio: AspectRatio, force: bool) -> Result<()> {
    if file.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", file.display());
    }
    let store = LayerStore::new_session();
    let canvas = CanvasConfig::for_ratio(ratio);
    save(&canvas, &store, file)?;
    println!(
        "✨ Created {} ({} canvas, {}x{})",
        file.display(),
        ratio,
        canvas.width,
        canvas.height
    );
    Ok(())
}

pub fn cmd_check(file: &Path) -> Result<()> {
    println!("🔍 Checking {}", file.display());
    let snapshot = load_project(file)?;
    println!(
        "   ✓ Load OK ({} layers, {})",
        snapshot.layers.len(),
        snapshot.canvas_config.aspect_ratio
    );
    match validate_snapshot(&snapshot) {
        Ok(()) => {
            println!("   ✓ Validation OK");
            Ok(())
        }
        Err(errors) => {
            for e in &errors {
                println!("   ⚠️ {}", e);
            }
            anyhow::bail!("{} problem(s) found", errors.len());
        }
    }
}

pub fn cmd_inspect(file: &Path, json: bool, config: &CardaConfig) -> Result<()> {
    let snapshot = load_project(file)?;
    let assets = load_assets(config, Some(file));
    let canvas = &snapshot.canvas_config;
    let target = RenderTarget::scaled(canvas, 1.0);
    let placements = Compositor::new(&assets).layout(&snapshot.layers, &target);

    if json {
        println!("{}", serde_json::to_string_pretty(&placements)?);
        return Ok(());
    }

    println!(
        "📦 {} ({}x{}, {})",
        file.display(),
        canvas.width,
        canvas.height,
        canvas.aspect_ratio
    );
    for (layer, p) in snapshot.layers.iter().zip(placements.iter()).rev() {
        let flags = format!(
            "{}{}",
            if layer.visible { "" } else { " hidden" },
            if layer.locked { " locked" } else { "" }
        );
        println!(
            "  - [{}] {} '{}' at ({:.1}, {:.1}) size {:.1}x{:.1} rot {:.1}° scale {:.2}{}",
            p.kind, p.id, layer.name, p.center_x, p.center_y, p.width, p.height, p.rotation, p.scale, flags
        );
    }
    Ok(())
}

pub fn cmd_import_image(file: &Path, images: &[PathBuf]) -> Result<()> {
    let snapshot = load_project(file)?;
    let canvas = snapshot.canvas_config.clone();
    let mut store = LayerStore::from_layers(snapshot.layers);

    for path in images {
        let (uri, frame) = match image_loader::file_to_data_uri(path) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!("{} [{}]", e, e.notice_key());
                continue;
            }
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let natural = Size2D::new(frame.width as f64, frame.height as f64);
        let layer = Layer::imported_image(name, uri, natural, &canvas);
        let (w, h) = (layer.width, layer.height);
        let id = store.add(layer);
        println!(
            "🖼️  Imported {} as {} ({}x{} px, {:.1}% x {:.1}%)",
            path.display(),
            id,
            frame.width,
            frame.height,
            w,
            h
        );
    }
    save(&canvas, &store, file)
}

pub fn cmd_ratio(file: &Path, ratio: AspectRatio) -> Result<()> {
    let snapshot = load_project(file)?;
    let mut canvas = snapshot.canvas_config.clone();
    canvas.set_aspect_ratio(ratio);
    let store = LayerStore::from_layers(snapshot.layers);
    save(&canvas, &store, file)?;
    println!("📐 Canvas is now {} ({}x{})", ratio, canvas.width, canvas.height);
    Ok(())
}

pub fn cmd_add(file: &Path, kind: AddKind, text: Option<String>) -> Result<()> {
    let snapshot = load_project(file)?;
    let mut store = LayerStore::from_layers(snapshot.layers);
    let mut layer = match kind {
        AddKind::Text => Layer::default_text(),
        AddKind::Frame => Layer::default_frame(),
    };
    if let (Some(content), carda_ir::LayerContent::Text { text_config, .. }) =
        (text, &mut layer.content)
    {
        text_config.content = content;
    }
    let id = store.add(layer);
    save(&snapshot.canvas_config, &store, file)?;
    println!("➕ Added {:?} layer {}", kind, id);
    Ok(())
}
