//! # carda-core
//!
//! Core types and primitives for the Carda card composer.
//! This crate contains foundational types shared across all Carda crates:
//! pixel buffers, colors, geometry primitives, content hashing, configuration,
//! notice keys and error types.

pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod hash;
pub mod math;
pub mod notice;
pub mod types;

pub use config::*;

pub use color::{Color, ColorError};
pub use error::{CardaError, CardaResult};
pub use frame::FrameBuffer;
pub use math::{Point2D, Rect, Size2D, Transform2D};
pub use notice::Notice;
pub use types::{BlendMode, LayerType};
