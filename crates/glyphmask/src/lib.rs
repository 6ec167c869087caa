//! Glyphmask - synthetic text-on-image dataset generation
//!
//! Scatters words, word arcs and image assets over a background, keeps every
//! glyph a fixed distance from every other glyph, and emits the composite
//! together with an exact occupancy mask.
//!
//! The pieces, leaves first:
//! - [`bitmap`]: 1-bit masks with disk dilation and square growth
//! - [`sprite`]: one placed letter or asset with its exact and padded masks
//! - [`compose`]: normal, arc and asset words, trimmed to their ink
//! - [`collision`]: broad/narrow phase tests against the placed sprites
//! - [`region`]: polygonal placement regions and the template store
//! - [`placement`]: region-constrained and freeform layout passes
//! - [`mask`]: preview and full-resolution masks
//! - [`output`] and [`batch`]: saved samples and sequential batch runs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glyphmask::prelude::*;
//! use glyphmask_text::{CachedRasterizer, CosmicRasterizer, FontDatabase};
//! use rand::SeedableRng;
//!
//! let config = EngineConfig::load_or_default("config.yaml");
//! let words = WordList::load_or_fallback(&config.paths.words_file, &config.text.fallback_words);
//! let assets = AssetLibrary::load_dir(&config.paths.asset_dir);
//! let mut raster = CachedRasterizer::new(CosmicRasterizer::new(FontDatabase::new()));
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
//!
//! let engine = LayoutEngine::new(config).unwrap();
//! let inputs = LayoutInputs { words: &words, fonts: &[], assets: &assets };
//! let canvas = CanvasGeometry::at_origin(800, 600);
//! let layout = engine
//!     .generate_layout(LayoutMode::Freeform, &[], &canvas, &inputs, &mut raster, &mut rng)
//!     .unwrap();
//! let mask = build_mask(&layout.sprites, &canvas, engine.config().mask.grow_pixels);
//! mask.save("mask.png").unwrap();
//! ```

pub mod assets;
pub mod batch;
pub mod bitmap;
pub mod collision;
pub mod compose;
pub mod config;
pub mod error;
pub mod mask;
pub mod output;
pub mod placement;
pub mod region;
pub mod sprite;
pub mod transform;
pub mod words;

pub use error::{EngineError, EngineResult};

pub mod prelude {
    pub use crate::assets::{Asset, AssetLibrary};
    pub use crate::batch::{BatchRegions, BatchRunner, BatchSummary};
    pub use crate::bitmap::{BitMask, DiskKernel};
    pub use crate::collision::{CollisionIndex, CollisionStats, would_collide};
    pub use crate::compose::{WordComposer, WordComposition, WordRequest};
    pub use crate::config::EngineConfig;
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::mask::{HighResOutput, build_high_res_mask, build_mask};
    pub use crate::output::{ArtifactName, save_artifacts};
    pub use crate::placement::{
        LayoutEngine, LayoutInputs, LayoutMode, LayoutResult, PlacementReport,
    };
    pub use crate::region::{JsonRegionStore, Region, RegionRules, RegionStore, StyleRule};
    pub use crate::sprite::{GlyphSprite, TextStyle};
    pub use crate::words::{WordList, WordSource};
    pub use glyphmask_core::{CanvasGeometry, PlacementMode, Pos, Rect, Size};
}
