//! Interactive preview surface: the canvas fitted into a resizable container.

use carda_core::{Point2D, Size2D};
use carda_ir::{CanvasConfig, LayerId, LayerStore};

use crate::compositor::{Compositor, RenderOptions, RenderOutput};
use crate::geometry::{self, PreviewFit, RenderTarget};

/// Tracks the container the preview lives in and the fitted canvas size.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSurface {
    canvas: CanvasConfig,
    container: Size2D,
    fit: Option<PreviewFit>,
}

impl PreviewSurface {
    pub fn new(canvas: CanvasConfig) -> Self {
        Self {
            canvas,
            container: Size2D::new(0.0, 0.0),
            fit: None,
        }
    }

    /// Container resized: refit immediately.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.container = Size2D::new(width, height);
        self.refit();
    }

    /// Canvas ratio or display scale changed.
    pub fn set_canvas(&mut self, canvas: CanvasConfig) {
        self.canvas = canvas;
        self.refit();
    }

    fn refit(&mut self) {
        self.fit = geometry::fit_canvas(&self.canvas, self.container);
        if let Some(fit) = &self.fit {
            tracing::debug!(
                "Preview fitted by {:?} to {:.1}x{:.1}",
                fit.axis,
                fit.width,
                fit.height
            );
        }
    }

    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    pub fn container(&self) -> Size2D {
        self.container
    }

    /// Current fit, or `None` while the container has no area.
    pub fn fit(&self) -> Option<PreviewFit> {
        self.fit
    }

    /// Pixel target for the current fit.
    pub fn target(&self) -> Option<RenderTarget> {
        let fit = self.fit?;
        let width = fit.width.round() as u32;
        let height = fit.height.round() as u32;
        if width == 0 || height == 0 {
            return None;
        }
        Some(RenderTarget::for_canvas(&self.canvas, width, height))
    }

    /// Render the store at the fitted size, outlining the selected layer.
    pub fn render(&self, compositor: &Compositor, store: &LayerStore) -> Option<RenderOutput> {
        let target = self.target()?;
        let options = RenderOptions {
            selection: store.selected().cloned(),
        };
        Some(compositor.render(store.layers(), &target, &options))
    }

    /// Layer under a point given in preview-surface pixels.
    pub fn pick(&self, compositor: &Compositor, store: &LayerStore, x: f64, y: f64) -> Option<LayerId> {
        let target = self.target()?;
        compositor.hit_test(store.layers(), &target, Point2D::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetRegistry;
    use crate::geometry::FitAxis;
    use carda_ir::{AspectRatio, Layer};

    #[test]
    fn test_zero_container_has_no_surface() {
        let mut preview = PreviewSurface::new(CanvasConfig::default());
        assert!(preview.fit().is_none());
        preview.resize(0.0, 300.0);
        assert!(preview.target().is_none());
        let assets = AssetRegistry::new();
        let store = LayerStore::new_session();
        assert!(preview.render(&Compositor::new(&assets), &store).is_none());
    }

    #[test]
    fn test_resize_refits_synchronously() {
        let mut preview = PreviewSurface::new(CanvasConfig::for_ratio(AspectRatio::Landscape3x2));
        preview.resize(900.0, 900.0);
        let fit = preview.fit().unwrap();
        assert_eq!(fit.axis, FitAxis::Width);
        assert_eq!(fit.width, 900.0);
        assert_eq!(fit.height, 600.0);

        preview.set_canvas(CanvasConfig::for_ratio(AspectRatio::Portrait2x3));
        let fit = preview.fit().unwrap();
        assert_eq!(fit.axis, FitAxis::Height);
        assert_eq!(fit.height, 900.0);
        assert!((fit.width - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_render_and_pick_follow_the_fit() {
        let assets = AssetRegistry::new();
        let compositor = Compositor::new(&assets);
        let mut store = LayerStore::new();
        let bg = store.add(Layer::default_background().with_locked(false));

        let mut preview = PreviewSurface::new(CanvasConfig::default());
        preview.resize(300.0, 200.0);
        let out = preview.render(&compositor, &store).unwrap();
        assert_eq!((out.width(), out.height()), (200, 200));
        assert_eq!(preview.pick(&compositor, &store, 100.0, 100.0), Some(bg));
        assert_eq!(preview.pick(&compositor, &store, 250.0, 100.0), None);
    }
}
