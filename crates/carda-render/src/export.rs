//! PNG export: render at the export pixel ratio with the selection cleared.
//!
//! Only one export runs at a time per [`Exporter`]; a second request made
//! while one is in flight fails with [`CardaError::ExportInProgress`].

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use carda_core::hash::ContentHash;
use carda_core::{CardaConfig, CardaError, CardaResult, Notice};
use carda_ir::{CanvasConfig, LayerId, LayerStore};

use crate::compositor::{Compositor, RenderOptions};
use crate::geometry::RenderTarget;
use crate::image_loader;

/// File name offered when the user gives none.
pub const DEFAULT_EXPORT_NAME: &str = "player-card";

/// Normalize a user-supplied export name. Blank names cancel the export.
pub fn export_file_name(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    if name.to_ascii_lowercase().ends_with(".png") {
        Some(name.to_string())
    } else {
        Some(format!("{}.png", name))
    }
}

/// Clears the store's selection for as long as it lives and puts the
/// previous selection back when dropped, whether or not the work in between
/// succeeded.
pub struct SelectionGuard<'a> {
    store: &'a mut LayerStore,
    previous: Option<LayerId>,
}

impl<'a> SelectionGuard<'a> {
    pub fn new(store: &'a mut LayerStore) -> Self {
        let previous = store.selected().cloned();
        store.select(None);
        Self { store, previous }
    }

    pub fn store(&self) -> &LayerStore {
        self.store
    }

    /// Selection that will be restored.
    pub fn previous(&self) -> Option<&LayerId> {
        self.previous.as_ref()
    }
}

impl Drop for SelectionGuard<'_> {
    fn drop(&mut self) {
        self.store.select(self.previous.as_ref());
    }
}

/// Held while an export is running.
pub struct ExportTicket<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ExportTicket<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// An encoded export.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub content_hash: ContentHash,
    pub notices: Vec<Notice>,
}

/// Summary of an export written to disk.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExportReport {
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
    pub content_hash: String,
    pub notices: Vec<Notice>,
}

/// Renders and encodes exports, one at a time.
#[derive(Debug)]
pub struct Exporter {
    pixel_ratio: f64,
    in_progress: AtomicBool,
}

impl Exporter {
    pub fn new(pixel_ratio: f64) -> Self {
        Self {
            pixel_ratio,
            in_progress: AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &CardaConfig) -> Self {
        Self::new(config.render.pixel_ratio())
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn is_busy(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Claim the exporter, or fail if an export is already running.
    pub fn begin(&self) -> CardaResult<ExportTicket<'_>> {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CardaError::ExportInProgress)?;
        Ok(ExportTicket {
            flag: &self.in_progress,
        })
    }

    /// Render the store without selection decoration and encode it as PNG.
    /// The store's selection is cleared during the render and restored
    /// afterwards.
    pub fn export_png(
        &self,
        compositor: &Compositor,
        store: &mut LayerStore,
        canvas: &CanvasConfig,
    ) -> CardaResult<ExportedImage> {
        let _ticket = self.begin()?;
        let guard = SelectionGuard::new(store);
        self.render_encode(compositor, guard.store(), canvas)
    }

    /// Export to `path`. The selection is restored even when writing fails.
    pub fn export_to_file(
        &self,
        compositor: &Compositor,
        store: &mut LayerStore,
        canvas: &CanvasConfig,
        path: &Path,
    ) -> CardaResult<ExportReport> {
        let _ticket = self.begin()?;
        let guard = SelectionGuard::new(store);
        let image = self.render_encode(compositor, guard.store(), canvas)?;
        std::fs::write(path, &image.png).map_err(|e| {
            tracing::warn!("Export to {} failed: {}", path.display(), e);
            CardaError::Export(format!("failed to write {}: {}", path.display(), e))
        })?;
        tracing::info!(
            "Exported {}x{} PNG to {} ({} bytes)",
            image.width,
            image.height,
            path.display(),
            image.png.len()
        );
        Ok(ExportReport {
            path: path.display().to_string(),
            width: image.width,
            height: image.height,
            bytes: image.png.len(),
            content_hash: image.content_hash.to_hex(),
            notices: image.notices,
        })
    }

    fn render_encode(
        &self,
        compositor: &Compositor,
        store: &LayerStore,
        canvas: &CanvasConfig,
    ) -> CardaResult<ExportedImage> {
        let target = RenderTarget::scaled(canvas, self.pixel_ratio);
        let output = compositor.render(store.layers(), &target, &RenderOptions::default());
        let png = image_loader::encode_png(&output.frame)?;
        Ok(ExportedImage {
            png,
            width: output.width(),
            height: output.height(),
            content_hash: output.content_hash(),
            notices: output.notices,
        })
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::from_config(&CardaConfig::default())
    }
}
