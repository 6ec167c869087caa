//! Glyphmask Text - glyph rasterization with cosmic-text
//!
//! This crate provides the glyph rasterizer capability used by the engine:
//! - [`GlyphRasterizer`], the `(font, pixel_size, char) -> RGBA bitmap` seam
//! - [`CosmicRasterizer`], backed by cosmic-text shaping and swash rendering
//! - [`CachedRasterizer`] and [`GlyphCache`] for the font-bitmap cache
//! - [`FontDatabase`] for system and custom font discovery
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glyphmask_text::{CachedRasterizer, CosmicRasterizer, FontDatabase, GlyphRasterizer};
//!
//! let mut db = FontDatabase::new();
//! db.load_fonts_dir("assets/fonts");
//! let mut raster = CachedRasterizer::new(CosmicRasterizer::new(db));
//!
//! let glyph = raster.render("default", 40, 'A').unwrap();
//! println!("{}x{}", glyph.width(), glyph.height());
//! ```

pub mod cache;
pub mod error;
pub mod font;
pub mod raster;

pub use cache::{CachedRasterizer, GlyphCache, GlyphKey};
pub use error::{RasterError, RasterResult};
pub use font::{DEFAULT_FONT, FontDatabase};
pub use raster::{CosmicRasterizer, GlyphRasterizer, LINE_HEIGHT_FACTOR, MAX_PIXEL_SIZE};
