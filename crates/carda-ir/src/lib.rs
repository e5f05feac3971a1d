//! # carda-ir
//!
//! The composition model: typed layers, canvas configuration, the saved
//! project snapshot, and the layer store that owns z-order and selection.

pub mod canvas;
pub mod clipboard;
pub mod defaults;
pub mod layer;
pub mod project;
pub mod store;
pub mod style;
pub mod validate;

pub use canvas::{AspectRatio, CanvasConfig};
pub use clipboard::StyleClipboard;
pub use layer::{Layer, LayerContent, LayerId};
pub use project::ProjectSnapshot;
pub use store::{Direction, LayerStore};
