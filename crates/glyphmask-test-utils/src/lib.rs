//! Test utilities for glyphmask.
//!
//! Deterministic stand-ins for the glyph rasterizer plus small image
//! fixtures, so engine tests run without system fonts.
//!
//! - [`BlockRasterizer`] renders every character as a solid block whose width
//!   depends on the character.
//! - [`FailingRasterizer`] fails for a chosen set of characters.
//! - [`RecordingRasterizer`] records every call for later verification.
//!
//! # Example
//!
//! ```rust
//! use glyphmask_test_utils::BlockRasterizer;
//! use glyphmask_text::GlyphRasterizer;
//!
//! let mut raster = BlockRasterizer::new();
//! let glyph = raster.render("default", 40, 'W').unwrap();
//! assert_eq!(glyph.width(), 40);
//! assert_eq!(glyph.height(), 48);
//! ```

pub mod block;
pub mod failing;
pub mod fixtures;
pub mod recording;

pub use block::BlockRasterizer;
pub use failing::FailingRasterizer;
pub use fixtures::*;
pub use recording::{RasterCall, RecordingRasterizer};
