//! # carda-render
//!
//! The Carda rendering engine. Takes a layer list and a canvas and produces
//! RGBA frame buffers: previews fitted to a container, and PNG exports at a
//! fixed pixel ratio. Everything runs on the CPU; pixel loops are split
//! across rows with rayon.

pub mod assets;
pub mod blur;
pub mod compositor;
pub mod effects;
pub mod export;
pub mod geometry;
pub mod image_loader;
pub mod presets;
pub mod preview;
pub mod raster;
pub mod text;

pub use assets::{AssetRegistry, BackgroundSet};
pub use compositor::{Compositor, LayerPlacement, RenderOptions, RenderOutput};
pub use export::{ExportReport, Exporter, SelectionGuard};
pub use geometry::RenderTarget;
pub use presets::{PresetRegistry, TextEffectPreset};
pub use preview::PreviewSurface;
pub use text::TextRenderer;
